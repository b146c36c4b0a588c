use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::keys::GROUP_BY_FILE;

#[test]
fn from_json_str_reads_flat_keys() {
	let settings = Settings::from_json_str(r#"{"panel.locations.groupByFile": true, "other": 1}"#).unwrap();
	assert_eq!(settings.len(), 2);
	assert_eq!(settings.get("panel.locations.groupByFile"), Some(&json!(true)));
}

#[test]
fn from_json_str_rejects_non_object() {
	let err = Settings::from_json_str("[1, 2]").unwrap_err();
	assert!(matches!(err, SettingsError::NotAnObject("array")));
}

#[test]
fn load_reads_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("settings.json");
	std::fs::write(&path, r#"{"panel.locations.groupByFile": true}"#).unwrap();

	let settings = Settings::load(&path).unwrap();
	assert_eq!(settings.get("panel.locations.groupByFile"), Some(&json!(true)));

	let missing = Settings::load(&dir.path().join("missing.json")).unwrap_err();
	assert!(matches!(missing, SettingsError::Io { .. }));
}

#[test]
fn empty_cascade_resolves_default() {
	assert!(!SettingsCascade::new().resolve(&GROUP_BY_FILE));
}

#[test]
fn errored_cascade_resolves_default() {
	let cascade = SettingsCascade::errored("boom").with_subject(SubjectKind::User, Settings::new().with(GROUP_BY_FILE.path(), json!(true)));
	assert!(cascade.is_error());
	assert_eq!(cascade.final_settings(), Err("boom"));
	assert!(!cascade.resolve(&GROUP_BY_FILE));
}

#[rstest]
#[case(json!(true), true)]
#[case(json!(false), false)]
#[case(json!("true"), false)]
#[case(json!(1), false)]
#[case(json!(null), false)]
#[case(json!({"nested": true}), false)]
fn malformed_values_fall_back_to_default(#[case] raw: serde_json::Value, #[case] expected: bool) {
	let cascade = SettingsCascade::new().with_subject(SubjectKind::User, Settings::new().with(GROUP_BY_FILE.path(), raw));
	assert_eq!(cascade.resolve(&GROUP_BY_FILE), expected);
}

#[test]
fn higher_subjects_override_lower() {
	let cascade = SettingsCascade::new()
		.with_subject(SubjectKind::User, Settings::new().with("a", json!("user")))
		.with_subject(SubjectKind::Site, Settings::new().with("a", json!("site")).with("b", json!("site")))
		.with_subject(SubjectKind::Default, Settings::new().with("c", json!("default")));

	let kinds: Vec<_> = cascade.subjects().iter().map(|s| s.kind).collect();
	assert_eq!(kinds, vec![SubjectKind::Default, SubjectKind::Site, SubjectKind::User]);

	let merged = cascade.final_settings().unwrap();
	assert_eq!(merged.get("a"), Some(&json!("user")));
	assert_eq!(merged.get("b"), Some(&json!("site")));
	assert_eq!(merged.get("c"), Some(&json!("default")));
}

#[test]
fn set_subject_replaces_existing_layer() {
	let mut cascade = SettingsCascade::new().with_subject(SubjectKind::User, Settings::new().with("a", json!(1)));
	cascade.set_subject(SubjectKind::User, Settings::new().with("b", json!(2)));

	assert_eq!(cascade.subjects().len(), 1);
	let merged = cascade.final_settings().unwrap();
	assert_eq!(merged.get("a"), None);
	assert_eq!(merged.get("b"), Some(&json!(2)));
}
