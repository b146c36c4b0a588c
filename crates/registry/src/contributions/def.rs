//! Contribution descriptor types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Definition of an action that menus can place and users can invoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionContribution {
	/// Unique action identifier, e.g. `panel.locations.groupByFile`.
	pub id: String,
	/// Display title.
	pub title: String,
	/// Category shown before the title in command palettes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	/// Command to execute when invoked.
	pub command: String,
	/// Argument templates, evaluated at invocation time.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub command_arguments: Vec<Value>,
}

/// Where a menu item is placed.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display, strum::EnumString, strum::IntoStaticStr,
)]
pub enum MenuId {
	/// Toolbar of a panel view.
	#[serde(rename = "panel/toolbar")]
	#[strum(serialize = "panel/toolbar")]
	PanelToolbar,
}

/// Placement of one action inside a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemContribution {
	/// Action identifier (matches [`ActionContribution::id`]).
	pub action: String,
	/// Optional visibility expression, evaluated by the host.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub when: Option<String>,
}

impl MenuItemContribution {
	/// Creates a menu item placing the given action.
	pub fn new(action: impl Into<String>) -> Self {
		Self {
			action: action.into(),
			when: None,
		}
	}
}

/// A set of contributions registered together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionDescriptor {
	/// Declared actions.
	#[serde(default)]
	pub actions: Vec<ActionContribution>,
	/// Menu placements keyed by menu.
	#[serde(default)]
	pub menus: BTreeMap<MenuId, Vec<MenuItemContribution>>,
}

impl ContributionDescriptor {
	/// Returns the action with the given id.
	pub fn action(&self, id: &str) -> Option<&ActionContribution> {
		self.actions.iter().find(|a| a.id == id)
	}
}
