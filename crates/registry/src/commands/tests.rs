use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use serde_json::json;
use xref_config::keys::GROUP_BY_FILE;

use super::*;
use crate::contributions::{ActionContribution, ContributionDescriptor, ContributionSink};

fn toggle_descriptor() -> ContributionDescriptor {
	ContributionDescriptor {
		actions: vec![ActionContribution {
			id: "toggle".into(),
			title: "Toggle".into(),
			category: None,
			command: UPDATE_CONFIGURATION.into(),
			command_arguments: vec![json!(GROUP_BY_FILE.path()), json!("${!config.panel.locations.groupByFile}")],
		}],
		..Default::default()
	}
}

#[test]
fn update_configuration_writes_store() {
	let store = SettingsStore::default();
	let commands = CommandRegistry::with_builtins(store.clone());

	commands.execute_command(UPDATE_CONFIGURATION, &[json!("a.b"), json!(7)]).unwrap();

	assert_eq!(store.current().final_settings().unwrap().get("a.b"), Some(&json!(7)));
}

#[test]
fn update_configuration_validates_arguments() {
	let commands = CommandRegistry::with_builtins(SettingsStore::default());

	let err = commands.execute_command(UPDATE_CONFIGURATION, &[json!("a.b")]).unwrap_err();
	assert!(matches!(err, CommandError::Arity { expected: 2, got: 1, .. }));

	let err = commands.execute_command(UPDATE_CONFIGURATION, &[json!(1), json!(true)]).unwrap_err();
	assert!(matches!(err, CommandError::InvalidArgument(_)));
}

#[test]
fn unknown_command_is_not_found() {
	let err = CommandRegistry::new().execute_command("nope", &[]).unwrap_err();
	assert!(matches!(err, CommandError::NotFound(ref name) if name == "nope"));
}

#[test]
fn execute_action_flips_setting() {
	let store = SettingsStore::default();
	let commands = CommandRegistry::with_builtins(store.clone());
	let contributions = ContributionRegistry::new();
	let _guard = contributions.register_contributions(toggle_descriptor());

	for expected in [true, false, true] {
		let ctx = EvalContext::from_settings(&store.current());
		commands.execute_action(&contributions, "toggle", &ctx).unwrap();
		assert_eq!(store.resolve(&GROUP_BY_FILE), expected);
	}
}

#[test]
fn execute_action_dispatches_evaluated_arguments_once() {
	let calls = Arc::new(AtomicUsize::new(0));
	let seen = Arc::new(RwLock::new(Vec::new()));
	let commands = CommandRegistry::new();
	{
		let calls = calls.clone();
		let seen = seen.clone();
		commands.register(
			UPDATE_CONFIGURATION,
			Arc::new(move |args: &[Value]| {
				calls.fetch_add(1, Ordering::SeqCst);
				seen.write().extend_from_slice(args);
				Ok(Value::Null)
			}),
		);
	}
	let contributions = ContributionRegistry::new();
	let _guard = contributions.register_contributions(toggle_descriptor());

	commands.execute_action(&contributions, "toggle", &EvalContext::new()).unwrap();

	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert_eq!(*seen.read(), vec![json!("panel.locations.groupByFile"), json!(true)]);
}

#[test]
fn disposed_action_cannot_execute() {
	let commands = CommandRegistry::with_builtins(SettingsStore::default());
	let contributions = ContributionRegistry::new();
	contributions.register_contributions(toggle_descriptor()).dispose();

	let err = commands.execute_action(&contributions, "toggle", &EvalContext::new()).unwrap_err();
	assert!(matches!(err, CommandError::ActionNotFound(_)));
}

#[test]
fn update_on_errored_settings_fails() {
	let store = SettingsStore::new(xref_config::SettingsCascade::errored("offline"));
	let commands = CommandRegistry::with_builtins(store);
	let err = commands.execute_command(UPDATE_CONFIGURATION, &[json!("a"), json!(true)]).unwrap_err();
	assert!(matches!(err, CommandError::Failed(_)));
}
