use std::fmt;

use serde::{Deserialize, Serialize};

use crate::uri::{RepoUri, UriError};

/// LSP position in line/character coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LspPosition {
	/// Zero-based line index.
	pub line: u32,
	/// Zero-based character offset in the line.
	pub character: u32,
}

impl LspPosition {
	/// Creates a new LSP position.
	pub const fn new(line: u32, character: u32) -> Self {
		Self { line, character }
	}
}

/// LSP range with start and end positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LspRange {
	/// Start position (inclusive).
	pub start: LspPosition,
	/// End position (exclusive).
	pub end: LspPosition,
}

impl LspRange {
	/// Creates a new LSP range.
	pub const fn new(start: LspPosition, end: LspPosition) -> Self {
		Self { start, end }
	}

	/// Creates a range on a single line spanning `start..end` characters.
	pub const fn on_line(line: u32, start: u32, end: u32) -> Self {
		Self {
			start: LspPosition::new(line, start),
			end: LspPosition::new(line, end),
		}
	}

	/// Returns true if the range covers no characters.
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}
}

/// A reference to a resource and an optional range within it.
///
/// The URI string is the grouping key; two locations in the same file share an
/// identical `uri` regardless of their ranges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
	/// Resource identifier, e.g. `git://github.com/foo/bar?rev#dir/file.rs`.
	pub uri: String,
	/// Range within the resource, if known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub range: Option<LspRange>,
}

impl Location {
	/// Creates a location covering the whole resource.
	pub fn new(uri: impl Into<String>) -> Self {
		Self { uri: uri.into(), range: None }
	}

	/// Creates a location with a range.
	pub fn with_range(uri: impl Into<String>, range: LspRange) -> Self {
		Self {
			uri: uri.into(),
			range: Some(range),
		}
	}

	/// Returns the grouping key for this location.
	pub fn file_key(&self) -> &str {
		&self.uri
	}

	/// Parses the URI as a repository URI.
	pub fn repo_uri(&self) -> Result<RepoUri, UriError> {
		RepoUri::parse(&self.uri)
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.range {
			Some(range) => write!(f, "{}:{}:{}", self.uri, range.start.line + 1, range.start.character + 1),
			None => f.write_str(&self.uri),
		}
	}
}
