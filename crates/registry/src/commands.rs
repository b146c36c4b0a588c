//! Command dispatch for invoked actions.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};
use xref_config::{ConfigurationUpdate, SettingsStore};

use crate::contributions::ContributionRegistry;
use crate::expr::{CommandArgument, EvalContext, ExprError};

/// Name of the builtin command that writes one settings value.
pub const UPDATE_CONFIGURATION: &str = "updateConfiguration";

/// Errors raised while dispatching a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
	/// No handler is registered under this name.
	#[error("command not found: {0}")]
	NotFound(String),
	/// No live action has this id.
	#[error("action not found: {0}")]
	ActionNotFound(String),
	/// Wrong number of arguments.
	#[error("{command}: expected {expected} arguments, got {got}")]
	Arity {
		/// Command name.
		command: &'static str,
		/// Expected argument count.
		expected: usize,
		/// Received argument count.
		got: usize,
	},
	/// An argument has the wrong shape.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	/// An argument template failed to parse.
	#[error(transparent)]
	Template(#[from] ExprError),
	/// The handler ran and failed.
	#[error("{0}")]
	Failed(String),
}

/// Function signature for command handlers.
pub type CommandHandler = Arc<dyn Fn(&[Value]) -> Result<Value, CommandError> + Send + Sync>;

/// Named command handlers.
#[derive(Clone, Default)]
pub struct CommandRegistry {
	handlers: Arc<RwLock<HashMap<String, CommandHandler>>>,
}

impl CommandRegistry {
	/// Creates an empty command registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry with the builtin commands bound to `store`.
	pub fn with_builtins(store: SettingsStore) -> Self {
		let registry = Self::new();
		registry.register(UPDATE_CONFIGURATION, update_configuration(store));
		registry
	}

	/// Registers or replaces a handler.
	pub fn register(&self, name: impl Into<String>, handler: CommandHandler) {
		self.handlers.write().insert(name.into(), handler);
	}

	/// Removes a handler.
	pub fn unregister(&self, name: &str) {
		self.handlers.write().remove(name);
	}

	/// Returns true if a handler is registered under `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.handlers.read().contains_key(name)
	}

	/// Runs a command with already-evaluated arguments.
	pub fn execute_command(&self, name: &str, args: &[Value]) -> Result<Value, CommandError> {
		let handler = self.handlers.read().get(name).cloned().ok_or_else(|| CommandError::NotFound(name.to_string()))?;
		debug!(domain = "commands", command = name, args = args.len(), "executing command");
		handler(args).inspect_err(|err| warn!(domain = "commands", command = name, error = %err, "command failed"))
	}

	/// Invokes a registered action: evaluates its argument templates against
	/// `ctx` and dispatches to its command.
	pub fn execute_action(&self, contributions: &ContributionRegistry, action_id: &str, ctx: &EvalContext) -> Result<Value, CommandError> {
		let action = contributions.action(action_id).ok_or_else(|| CommandError::ActionNotFound(action_id.to_string()))?;
		let args = action
			.command_arguments
			.iter()
			.map(|raw| CommandArgument::parse(raw).map(|arg| arg.evaluate(ctx)))
			.collect::<Result<Vec<_>, _>>()?;
		self.execute_command(&action.command, &args)
	}
}

impl std::fmt::Debug for CommandRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut names: Vec<_> = self.handlers.read().keys().cloned().collect();
		names.sort();
		f.debug_struct("CommandRegistry").field("commands", &names).finish()
	}
}

/// Builds the `updateConfiguration` handler: `[path, value]` writes one
/// settings value into the user layer of `store`.
pub fn update_configuration(store: SettingsStore) -> CommandHandler {
	Arc::new(move |args: &[Value]| {
		let [path, value] = args else {
			return Err(CommandError::Arity {
				command: "updateConfiguration",
				expected: 2,
				got: args.len(),
			});
		};
		let Value::String(path) = path else {
			return Err(CommandError::InvalidArgument(format!("settings path must be a string, got {path}")));
		};
		store
			.update(ConfigurationUpdate::new(path.clone(), value.clone()))
			.map_err(|err| CommandError::Failed(err.to_string()))?;
		Ok(Value::Null)
	})
}

#[cfg(test)]
mod tests;
