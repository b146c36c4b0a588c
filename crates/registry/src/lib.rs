//! Contribution registry for panel actions and menus.
//!
//! Components declare UI contributions (actions plus the menus that place
//! them) with [`ContributionSink::register_contributions`] and hold the
//! returned [`Contributions`] guard for as long as the declarations should be
//! live. Dropping the guard unregisters them exactly once.
//!
//! Invoking an action goes through [`CommandRegistry::execute_action`]: the
//! action's argument templates are evaluated against an [`EvalContext`] and the
//! result is dispatched to the named command.
//!
//! # Modules
//!
//! - [`contributions`] - Descriptors, the registry and its disposer guard
//! - [`commands`] - Command handlers and the `updateConfiguration` builtin
//! - [`expr`] - `${...}` argument template evaluation

pub mod commands;
pub mod contributions;
pub mod expr;

pub use commands::{CommandError, CommandHandler, CommandRegistry, UPDATE_CONFIGURATION};
pub use contributions::{
	ActionContribution, ContributionDescriptor, ContributionRegistry, ContributionSink, Contributions, MenuId, MenuItemContribution,
};
pub use expr::{CommandArgument, EvalContext, ExprError};
