//! Error types for settings loading and updates.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or updating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The settings document is not valid JSON.
	#[error("JSON parse error: {0}")]
	Json(#[from] serde_json::Error),

	/// The settings document parsed, but its top level is not an object.
	#[error("settings document must be a JSON object, got {0}")]
	NotAnObject(&'static str),

	/// Error reading a settings file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The cascade failed to resolve and cannot accept updates.
	#[error("settings unavailable: {0}")]
	Unavailable(String),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
