//! Settings for the locations panel.
//!
//! Settings are flat JSON objects keyed by dotted paths such as
//! `panel.locations.groupByFile`. A [`SettingsCascade`] merges several subject
//! layers (defaults, site, organization, user) into one resolved view; typed
//! reads go through [`TypedSettingKey`] and never fail. The [`SettingsStore`]
//! owns the cascade at runtime, applies [`ConfigurationUpdate`]s to the user
//! layer and notifies subscribers through a `tokio::sync::watch` channel.
//!
//! # Resolution Order
//!
//! 1. User settings (written by `updateConfiguration`)
//! 2. Organization settings
//! 3. Site settings
//! 4. Built-in defaults
//! 5. The key's compile-time default
//!
//! A value of the wrong type is treated as absent and the key's default is
//! returned instead.

mod error;
pub mod keys;
mod settings;
mod store;

pub use error::{Result, SettingsError};
pub use keys::{FromSettingValue, TypedSettingKey};
pub use settings::{Settings, SettingsCascade, SettingsSubject, SubjectKind};
pub use store::{ConfigurationUpdate, SettingsStore};
