//! Typed setting keys.

use std::marker::PhantomData;

use serde_json::Value;

/// Conversion from a raw JSON setting value.
pub trait FromSettingValue: Sized + Clone {
	/// Type name used in diagnostics.
	const TYPE_NAME: &'static str;

	/// Converts a raw value, returning `None` on a type mismatch.
	fn from_setting_value(value: &Value) -> Option<Self>;
}

impl FromSettingValue for bool {
	const TYPE_NAME: &'static str = "bool";

	fn from_setting_value(value: &Value) -> Option<Self> {
		value.as_bool()
	}
}

/// Typed handle to a setting path with a compile-time default.
pub struct TypedSettingKey<T: FromSettingValue> {
	path: &'static str,
	default: fn() -> T,
	_marker: PhantomData<T>,
}

impl<T: FromSettingValue> Clone for TypedSettingKey<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T: FromSettingValue> Copy for TypedSettingKey<T> {}

impl<T: FromSettingValue> TypedSettingKey<T> {
	/// Creates a typed key.
	pub const fn new(path: &'static str, default: fn() -> T) -> Self {
		Self {
			path,
			default,
			_marker: PhantomData,
		}
	}

	/// Returns the dotted settings path.
	pub const fn path(&self) -> &'static str {
		self.path
	}

	/// Returns the compile-time default.
	pub fn default_value(&self) -> T {
		(self.default)()
	}
}

impl<T: FromSettingValue> std::fmt::Debug for TypedSettingKey<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TypedSettingKey").field("path", &self.path).field("type", &T::TYPE_NAME).finish()
	}
}

/// Whether the locations panel groups results by file.
pub const GROUP_BY_FILE: TypedSettingKey<bool> = TypedSettingKey::new("panel.locations.groupByFile", || false);
