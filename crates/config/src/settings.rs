//! Settings documents and the layered cascade.

use std::path::Path;

use serde_json::{Map, Value};

use crate::keys::{FromSettingValue, TypedSettingKey};
use crate::{Result, SettingsError};

/// One flat settings document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
	values: Map<String, Value>,
}

impl Settings {
	/// Creates an empty settings document.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a settings document from JSON text.
	pub fn from_json_str(text: &str) -> Result<Self> {
		match serde_json::from_str::<Value>(text)? {
			Value::Object(values) => Ok(Self { values }),
			other => Err(SettingsError::NotAnObject(json_type_name(&other))),
		}
	}

	/// Reads and parses a settings file.
	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|error| SettingsError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_json_str(&text)
	}

	/// Returns the raw value at a dotted path.
	pub fn get(&self, path: &str) -> Option<&Value> {
		self.values.get(path)
	}

	/// Sets the raw value at a dotted path, returning the previous value.
	pub fn set(&mut self, path: impl Into<String>, value: Value) -> Option<Value> {
		self.values.insert(path.into(), value)
	}

	/// Removes the value at a dotted path.
	pub fn remove(&mut self, path: &str) -> Option<Value> {
		self.values.remove(path)
	}

	/// Builder form of [`Settings::set`].
	pub fn with(mut self, path: impl Into<String>, value: Value) -> Self {
		self.set(path, value);
		self
	}

	/// Iterates over all entries.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns true if there are no entries.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// Which layer of the cascade a subject belongs to.
///
/// Ordering is priority: later variants override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubjectKind {
	/// Built-in defaults shipped with the host.
	Default,
	/// Site-wide settings.
	Site,
	/// Organization settings.
	Org,
	/// The current user's settings.
	User,
}

/// A settings layer owned by one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSubject {
	/// Layer kind.
	pub kind: SubjectKind,
	/// The subject's own settings.
	pub settings: Settings,
}

/// Layered settings with a merged final view.
///
/// The cascade is either resolved (subjects plus merged `final` settings) or in
/// an error state, in which every typed read returns the key's default.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsCascade {
	subjects: Vec<SettingsSubject>,
	merged: std::result::Result<Settings, String>,
}

impl Default for SettingsCascade {
	fn default() -> Self {
		Self {
			subjects: Vec::new(),
			merged: Ok(Settings::new()),
		}
	}
}

impl SettingsCascade {
	/// Creates an empty resolved cascade.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a cascade in the error state.
	pub fn errored(message: impl Into<String>) -> Self {
		Self {
			subjects: Vec::new(),
			merged: Err(message.into()),
		}
	}

	/// Adds or replaces the subject layer of the given kind.
	pub fn with_subject(mut self, kind: SubjectKind, settings: Settings) -> Self {
		self.set_subject(kind, settings);
		self
	}

	/// Adds or replaces the subject layer of the given kind and re-merges.
	///
	/// Has no effect on the merged view of an errored cascade beyond recording
	/// the subject.
	pub fn set_subject(&mut self, kind: SubjectKind, settings: Settings) {
		match self.subjects.binary_search_by_key(&kind, |s| s.kind) {
			Ok(idx) => self.subjects[idx].settings = settings,
			Err(idx) => self.subjects.insert(idx, SettingsSubject { kind, settings }),
		}
		self.remerge();
	}

	/// Returns the subject layer of the given kind, if present.
	pub fn subject(&self, kind: SubjectKind) -> Option<&Settings> {
		self.subjects.iter().find(|s| s.kind == kind).map(|s| &s.settings)
	}

	/// Returns all subject layers in priority order (lowest first).
	pub fn subjects(&self) -> &[SettingsSubject] {
		&self.subjects
	}

	/// Returns the merged settings, or the error message.
	pub fn final_settings(&self) -> std::result::Result<&Settings, &str> {
		self.merged.as_ref().map_err(String::as_str)
	}

	/// Returns true if the cascade is in the error state.
	pub fn is_error(&self) -> bool {
		self.merged.is_err()
	}

	/// Resolves a typed key against the merged settings.
	///
	/// Absent keys, type mismatches and an errored cascade all resolve to the
	/// key's default.
	pub fn resolve<T: FromSettingValue>(&self, key: &TypedSettingKey<T>) -> T {
		let Ok(settings) = &self.merged else {
			return key.default_value();
		};
		let Some(raw) = settings.get(key.path()) else {
			return key.default_value();
		};
		match T::from_setting_value(raw) {
			Some(value) => value,
			None => {
				tracing::warn!(
					domain = "settings",
					path = key.path(),
					expected = T::TYPE_NAME,
					got = json_type_name(raw),
					"setting type mismatch; falling back to default",
				);
				key.default_value()
			}
		}
	}

	fn remerge(&mut self) {
		if self.merged.is_err() {
			return;
		}
		let mut merged = Settings::new();
		for subject in &self.subjects {
			for (path, value) in subject.settings.iter() {
				merged.set(path, value.clone());
			}
		}
		self.merged = Ok(merged);
	}
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests;
