use std::collections::HashMap;

use serde::Serialize;
use xref_primitives::{Location, RepoUri};

/// Locations sharing one resource URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileGroup {
	/// The shared URI.
	pub key: String,
	/// Display label: the file path when the URI has one, otherwise the URI's
	/// repository, otherwise the raw URI.
	pub label: String,
	/// Repository name parsed from the URI, if it parses.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub repo: Option<String>,
	/// Member locations in merge order.
	pub locations: Vec<Location>,
}

impl FileGroup {
	fn new(key: &str) -> Self {
		let parsed = RepoUri::parse(key).ok();
		Self {
			key: key.to_string(),
			label: parsed.as_ref().map_or_else(|| key.to_string(), |uri| uri.label().to_string()),
			repo: parsed.map(|uri| uri.repo),
			locations: Vec::new(),
		}
	}

	/// Number of member locations.
	pub fn len(&self) -> usize {
		self.locations.len()
	}

	/// Returns true if the group has no members.
	pub fn is_empty(&self) -> bool {
		self.locations.is_empty()
	}
}

/// Groups locations by URI in a single pass.
///
/// Groups appear in first-occurrence order and each keeps its members in input
/// order, so concatenating the groups yields a permutation of the input.
pub fn group_by_file(locations: &[Location]) -> Vec<FileGroup> {
	let mut index: HashMap<&str, usize> = HashMap::new();
	let mut groups: Vec<FileGroup> = Vec::new();
	for location in locations {
		let key = location.file_key();
		let slot = *index.entry(key).or_insert_with(|| {
			groups.push(FileGroup::new(key));
			groups.len() - 1
		});
		groups[slot].locations.push(location.clone());
	}
	groups
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;
	use xref_primitives::LspRange;

	use super::*;

	fn loc(file: &str, line: u32) -> Location {
		Location::with_range(format!("git://github.com/foo/bar#{file}"), LspRange::on_line(line, 0, 10))
	}

	#[test]
	fn empty_input_yields_no_groups() {
		assert!(group_by_file(&[]).is_empty());
	}

	#[test]
	fn groups_in_first_occurrence_order() {
		let input = [
			loc("file1.txt", 1),
			loc("file2.txt", 2),
			loc("file1.txt", 3),
			loc("file2.txt", 4),
			loc("file2.txt", 5),
		];
		let groups = group_by_file(&input);

		let keys: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
		assert_eq!(keys, vec!["file1.txt", "file2.txt"]);
		assert_eq!(groups[0].locations, vec![input[0].clone(), input[2].clone()]);
		assert_eq!(groups[1].locations, vec![input[1].clone(), input[3].clone(), input[4].clone()]);
		assert_eq!(groups[0].repo.as_deref(), Some("github.com/foo/bar"));
	}

	#[test]
	fn range_does_not_split_groups() {
		let input = [Location::new("git://r#f"), Location::with_range("git://r#f", LspRange::on_line(3, 0, 1))];
		let groups = group_by_file(&input);
		assert_eq!(groups.len(), 1);
		assert_eq!(groups[0].len(), 2);
	}

	#[test]
	fn unparsable_uris_still_group() {
		let input = [Location::new("not a uri"), Location::new("not a uri")];
		let groups = group_by_file(&input);
		assert_eq!(groups.len(), 1);
		assert_eq!(groups[0].label, "not a uri");
		assert_eq!(groups[0].repo, None);
	}

	fn arb_locations() -> impl Strategy<Value = Vec<Location>> {
		prop::collection::vec((0u8..6, 0u32..50), 0..64)
			.prop_map(|pairs| pairs.into_iter().map(|(file, line)| loc(&format!("f{file}"), line)).collect())
	}

	proptest! {
		#[test]
		fn grouping_partitions_input(input in arb_locations()) {
			let groups = group_by_file(&input);

			let total: usize = groups.iter().map(FileGroup::len).sum();
			prop_assert_eq!(total, input.len());

			for group in &groups {
				prop_assert!(!group.is_empty());
				prop_assert!(group.locations.iter().all(|l| l.uri == group.key));
				let expected: Vec<_> = input.iter().filter(|l| l.uri == group.key).cloned().collect();
				prop_assert_eq!(&group.locations, &expected);
			}

			let mut seen = Vec::new();
			for location in &input {
				if !seen.contains(&location.uri) {
					seen.push(location.uri.clone());
				}
			}
			let keys: Vec<_> = groups.iter().map(|g| g.key.clone()).collect();
			prop_assert_eq!(keys, seen);
		}
	}
}
