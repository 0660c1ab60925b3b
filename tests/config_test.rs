//! Integration tests for Settings loading with a local `.nodetree.toml`.
//!
//! Note: these run against temp directories only; no environment variables
//! are touched, so they are safe to run in parallel.

use std::fs;

use tempfile::TempDir;

use nodetree::config::{local_config_path, OutputFormat, Settings, SettingsError};

// ============================================================
// Settings::load() local overlay
// ============================================================

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".nodetree.toml"),
        r#"
path_separator = "."
format = "json"
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.path_separator, ".");
    assert_eq!(settings.format, OutputFormat::Json);
}

#[test]
fn given_partial_local_config_when_load_then_keeps_other_values() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "pretty = false\n").unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert!(!settings.pretty);
    assert!(!settings.path_separator.is_empty());
}

#[test]
fn given_directory_without_config_when_load_then_succeeds() {
    let dir = TempDir::new().unwrap();

    let result = Settings::load(Some(dir.path()));

    assert!(result.is_ok(), "load failed: {:?}", result.err());
}

#[test]
fn given_malformed_toml_when_load_then_returns_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "path_separator = [unclosed").unwrap();

    let result = Settings::load(Some(dir.path()));

    assert!(matches!(result, Err(SettingsError::Config { .. })));
}

#[test]
fn given_empty_separator_when_load_then_rejects_setting() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "path_separator = \"\"\n").unwrap();

    let result = Settings::load(Some(dir.path()));

    match result {
        Err(SettingsError::Invalid { key, .. }) => assert_eq!(key, "path_separator"),
        other => panic!("expected invalid setting, got {:?}", other),
    }
}

#[test]
fn given_unknown_format_when_load_then_returns_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "format = \"yaml\"\n").unwrap();

    assert!(matches!(
        Settings::load(Some(dir.path())),
        Err(SettingsError::Config { .. })
    ));
}

#[test]
fn given_local_path_when_computed_then_uses_hidden_file() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        local_config_path(dir.path()),
        dir.path().join(".nodetree.toml")
    );
}
