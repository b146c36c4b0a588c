//! The "Group by file" toolbar toggle.

use std::collections::BTreeMap;

use serde_json::json;
use xref_config::keys::GROUP_BY_FILE;
use xref_registry::{ActionContribution, ContributionDescriptor, ContributionSink, Contributions, MenuId, MenuItemContribution, UPDATE_CONFIGURATION};

/// Id of the toggle action. Equal to the setting it flips.
pub const GROUP_BY_FILE_ACTION: &str = "panel.locations.groupByFile";

/// Descriptor for the toggle: one action writing the negated setting, placed
/// in the panel toolbar.
pub fn group_by_file_contributions() -> ContributionDescriptor {
	let action = ActionContribution {
		id: GROUP_BY_FILE_ACTION.to_string(),
		title: "Group by file".to_string(),
		category: Some("Locations (panel)".to_string()),
		command: UPDATE_CONFIGURATION.to_string(),
		command_arguments: vec![json!(GROUP_BY_FILE.path()), json!(format!("${{!config.{}}}", GROUP_BY_FILE.path()))],
	};
	ContributionDescriptor {
		actions: vec![action],
		menus: BTreeMap::from([(MenuId::PanelToolbar, vec![MenuItemContribution::new(GROUP_BY_FILE_ACTION)])]),
	}
}

/// Registers the toggle. It stays live until the guard is released.
pub fn register_group_by_file(sink: &dyn ContributionSink) -> Contributions {
	sink.register_contributions(group_by_file_contributions())
}
