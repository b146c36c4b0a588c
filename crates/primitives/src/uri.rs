//! Repository URI parsing.
//!
//! Location URIs have the shape `scheme://repo[?rev][#path]`. The repository
//! name and file path are used to label file groups; grouping itself always
//! keys on the raw URI string.

use std::fmt;

/// Errors produced when a URI does not have the repository shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UriError {
	/// The URI has no `scheme://` prefix.
	#[error("missing scheme in uri: {0}")]
	MissingScheme(String),
	/// The URI has a scheme but no repository name.
	#[error("missing repository in uri: {0}")]
	MissingRepo(String),
}

/// A parsed repository URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUri {
	/// URI scheme, e.g. `git`.
	pub scheme: String,
	/// Repository name, e.g. `github.com/foo/bar`.
	pub repo: String,
	/// Revision from the query component, if any.
	pub rev: Option<String>,
	/// File path from the fragment component, if any.
	pub path: Option<String>,
}

impl RepoUri {
	/// Parses `scheme://repo[?rev][#path]`.
	pub fn parse(uri: &str) -> Result<Self, UriError> {
		let (scheme, rest) = uri.split_once("://").ok_or_else(|| UriError::MissingScheme(uri.to_string()))?;

		let (rest, path) = match rest.split_once('#') {
			Some((head, frag)) => (head, non_empty(frag)),
			None => (rest, None),
		};
		let (repo, rev) = match rest.split_once('?') {
			Some((repo, rev)) => (repo, non_empty(rev)),
			None => (rest, None),
		};
		if repo.is_empty() {
			return Err(UriError::MissingRepo(uri.to_string()));
		}

		Ok(Self {
			scheme: scheme.to_string(),
			repo: repo.to_string(),
			rev,
			path,
		})
	}

	/// Label used for a file group: the path when present, otherwise the repository.
	pub fn label(&self) -> &str {
		self.path.as_deref().unwrap_or(&self.repo)
	}
}

impl fmt::Display for RepoUri {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}://{}", self.scheme, self.repo)?;
		if let Some(rev) = &self.rev {
			write!(f, "?{rev}")?;
		}
		if let Some(path) = &self.path {
			write!(f, "#{path}")?;
		}
		Ok(())
	}
}

fn non_empty(s: &str) -> Option<String> {
	(!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("git://github.com/foo/bar", "github.com/foo/bar", None, None)]
	#[case("git://github.com/foo/bar#file1.txt", "github.com/foo/bar", None, Some("file1.txt"))]
	#[case("git://github.com/foo/bar?v1.2#src/a.rs", "github.com/foo/bar", Some("v1.2"), Some("src/a.rs"))]
	#[case("git://github.com/foo/bar?#", "github.com/foo/bar", None, None)]
	fn parses_repo_uris(#[case] uri: &str, #[case] repo: &str, #[case] rev: Option<&str>, #[case] path: Option<&str>) {
		let parsed = RepoUri::parse(uri).unwrap();
		assert_eq!(parsed.scheme, "git");
		assert_eq!(parsed.repo, repo);
		assert_eq!(parsed.rev.as_deref(), rev);
		assert_eq!(parsed.path.as_deref(), path);
	}

	#[test]
	fn display_round_trips_components() {
		let uri = "git://github.com/foo/bar?main#src/lib.rs";
		assert_eq!(RepoUri::parse(uri).unwrap().to_string(), uri);
	}

	#[test]
	fn label_prefers_path() {
		assert_eq!(RepoUri::parse("git://r#f1").unwrap().label(), "f1");
		assert_eq!(RepoUri::parse("git://r").unwrap().label(), "r");
	}

	#[test]
	fn rejects_malformed() {
		assert_eq!(RepoUri::parse("no-scheme"), Err(UriError::MissingScheme("no-scheme".into())));
		assert_eq!(RepoUri::parse("git://#f"), Err(UriError::MissingRepo("git://#f".into())));
	}
}
