use serde::Serialize;
use xref_primitives::Location;
use xref_stream::LocationsState;

use crate::group::{FileGroup, group_by_file};
use crate::selection::{default_repo, select_group};

/// Render-ready shape of the panel body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "camelCase")]
pub enum LocationsView {
	/// Nothing to show yet: no locations and more may arrive.
	Loading,
	/// Locations in merge order.
	Flat(Vec<Location>),
	/// Locations grouped by file in first-occurrence order.
	Grouped(Vec<FileGroup>),
}

impl LocationsView {
	/// Derives the panel body from the merged locations and the grouping toggle.
	///
	/// An empty result renders as [`LocationsView::Loading`] until the sources
	/// complete; a complete empty result renders as an empty list.
	pub fn from_state(state: &LocationsState, group_by_file_enabled: bool) -> Self {
		if state.is_loading() {
			Self::Loading
		} else if group_by_file_enabled {
			Self::Grouped(group_by_file(&state.locations))
		} else {
			Self::Flat(state.locations.clone())
		}
	}

	/// Returns true for [`LocationsView::Loading`].
	pub fn is_loading(&self) -> bool {
		matches!(self, Self::Loading)
	}

	/// Total number of locations shown.
	pub fn location_count(&self) -> usize {
		match self {
			Self::Loading => 0,
			Self::Flat(locations) => locations.len(),
			Self::Grouped(groups) => groups.iter().map(FileGroup::len).sum(),
		}
	}

	/// File groups, when grouped.
	pub fn groups(&self) -> &[FileGroup] {
		match self {
			Self::Grouped(groups) => groups,
			_ => &[],
		}
	}
}

/// Everything the panel needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLocations {
	/// Panel body.
	pub view: LocationsView,
	/// False while sources may still report more results.
	pub is_complete: bool,
	/// Key of the expanded file group.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub selected_group: Option<String>,
	/// Number of locations in the default repository.
	pub default_group_count: usize,
}

impl RenderedLocations {
	/// Builds a frame from the merged state.
	///
	/// `previous_selection` is kept while its group still exists.
	pub fn build(state: &LocationsState, group_by_file_enabled: bool, default_group: &str, previous_selection: Option<&str>) -> Self {
		let view = LocationsView::from_state(state, group_by_file_enabled);
		let selected_group = select_group(view.groups(), previous_selection, default_group);
		let repo = default_repo(default_group);
		let default_group_count = state
			.locations
			.iter()
			.filter(|l| l.repo_uri().is_ok_and(|uri| uri.repo == repo))
			.count();
		Self {
			view,
			is_complete: state.is_complete,
			selected_group,
			default_group_count,
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use xref_primitives::LspRange;

	use super::*;

	fn loc(file: &str, line: u32) -> Location {
		Location::with_range(format!("git://github.com/foo/bar#{file}"), LspRange::on_line(line, 0, 10))
	}

	fn five() -> Vec<Location> {
		vec![loc("file1.txt", 1), loc("file2.txt", 2), loc("file1.txt", 3), loc("file2.txt", 4), loc("file2.txt", 5)]
	}

	#[rstest]
	#[case::loading(false)]
	#[case::loading_grouped(true)]
	fn empty_incomplete_is_loading(#[case] grouped: bool) {
		assert_eq!(LocationsView::from_state(&LocationsState::loading(), grouped), LocationsView::Loading);
	}

	#[rstest]
	#[case::flat(false)]
	#[case::grouped(true)]
	fn empty_complete_is_an_empty_list(#[case] grouped: bool) {
		let view = LocationsView::from_state(&LocationsState::new(vec![], true), grouped);
		assert!(!view.is_loading());
		assert_eq!(view.location_count(), 0);
	}

	#[test]
	fn partial_results_render_while_incomplete() {
		let view = LocationsView::from_state(&LocationsState::new(vec![loc("a", 1)], false), false);
		assert_eq!(view, LocationsView::Flat(vec![loc("a", 1)]));
	}

	#[test]
	fn toggle_regroups_the_same_state() {
		let state = LocationsState::new(five(), true);

		let flat = LocationsView::from_state(&state, false);
		assert_eq!(flat, LocationsView::Flat(five()));

		let grouped = LocationsView::from_state(&state, true);
		let labels: Vec<_> = grouped.groups().iter().map(|g| (g.label.as_str(), g.len())).collect();
		assert_eq!(labels, vec![("file1.txt", 2), ("file2.txt", 3)]);
		assert_eq!(grouped.location_count(), 5);
	}

	#[test]
	fn frame_carries_completion_and_selection() {
		let frame = RenderedLocations::build(&LocationsState::new(five(), false), true, "git://github.com/foo/bar", None);
		assert!(!frame.is_complete);
		assert_eq!(frame.selected_group.as_deref(), Some("git://github.com/foo/bar#file1.txt"));
		assert_eq!(frame.default_group_count, 5);

		let frame = RenderedLocations::build(&LocationsState::new(five(), true), false, "git://github.com/x/y", None);
		assert!(frame.is_complete);
		assert_eq!(frame.selected_group, None);
		assert_eq!(frame.default_group_count, 0);
	}

	#[test]
	fn frame_serializes_for_hosts() {
		let frame = RenderedLocations::build(&LocationsState::new(vec![loc("a", 0)], true), true, "github.com/foo/bar", None);
		let json = serde_json::to_value(&frame).unwrap();
		assert_eq!(json["view"]["kind"], "grouped");
		assert_eq!(json["view"]["items"][0]["label"], "a");
		assert_eq!(json["isComplete"], true);
		assert_eq!(json["defaultGroupCount"], 1);
	}
}
