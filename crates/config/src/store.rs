//! Runtime owner of the settings cascade.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::keys::{FromSettingValue, TypedSettingKey};
use crate::settings::{Settings, SettingsCascade, SubjectKind};
use crate::{Result, SettingsError};

/// A request to write one value into the user's settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationUpdate {
	/// Dotted settings path.
	pub path: String,
	/// New value. `Value::Null` removes the key.
	pub value: Value,
}

impl ConfigurationUpdate {
	/// Creates an update.
	pub fn new(path: impl Into<String>, value: impl Into<Value>) -> Self {
		Self {
			path: path.into(),
			value: value.into(),
		}
	}
}

/// Owns the current [`SettingsCascade`] and broadcasts every change.
///
/// Readers never cache a resolved value: they either call [`SettingsStore::resolve`]
/// or hold a [`watch::Receiver`] from [`SettingsStore::subscribe`] and re-resolve on
/// each change.
#[derive(Debug, Clone)]
pub struct SettingsStore {
	tx: Arc<watch::Sender<Arc<SettingsCascade>>>,
}

impl Default for SettingsStore {
	fn default() -> Self {
		Self::new(SettingsCascade::new())
	}
}

impl SettingsStore {
	/// Creates a store holding the given cascade.
	pub fn new(cascade: SettingsCascade) -> Self {
		let (tx, _rx) = watch::channel(Arc::new(cascade));
		Self { tx: Arc::new(tx) }
	}

	/// Returns the current cascade.
	pub fn current(&self) -> Arc<SettingsCascade> {
		self.tx.borrow().clone()
	}

	/// Resolves a typed key against the current cascade.
	pub fn resolve<T: FromSettingValue>(&self, key: &TypedSettingKey<T>) -> T {
		self.tx.borrow().resolve(key)
	}

	/// Subscribes to cascade changes.
	pub fn subscribe(&self) -> watch::Receiver<Arc<SettingsCascade>> {
		self.tx.subscribe()
	}

	/// Replaces the whole cascade.
	pub fn replace(&self, cascade: SettingsCascade) {
		self.tx.send_replace(Arc::new(cascade));
	}

	/// Applies one update to the user layer and notifies subscribers.
	///
	/// Fails if the cascade is in the error state.
	pub fn update(&self, update: ConfigurationUpdate) -> Result<()> {
		let mut outcome = Ok(());
		self.tx.send_if_modified(|cascade| {
			if let Ok(final_settings) = cascade.final_settings()
				&& final_settings.get(&update.path) == Some(&update.value)
				&& cascade.subject(SubjectKind::User).and_then(|s| s.get(&update.path)).is_some()
			{
				return false;
			}
			if let Err(message) = cascade.final_settings() {
				outcome = Err(SettingsError::Unavailable(message.to_string()));
				return false;
			}

			let mut user = cascade.subject(SubjectKind::User).cloned().unwrap_or_else(Settings::new);
			if update.value.is_null() {
				user.remove(&update.path);
			} else {
				user.set(update.path.clone(), update.value.clone());
			}
			Arc::make_mut(cascade).set_subject(SubjectKind::User, user);
			debug!(domain = "settings", path = %update.path, value = %update.value, "configuration updated");
			true
		});
		outcome
	}
}
