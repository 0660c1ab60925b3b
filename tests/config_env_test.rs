//! `NODETREE_*` environment overrides.
//!
//! Kept in its own test binary: the test mutates process environment, which
//! would race with the file-based settings tests in `config_test.rs`.

use std::env;

use tempfile::TempDir;

use nodetree::config::{local_config_path, OutputFormat, Settings};

#[test]
fn given_env_overrides_when_load_then_env_wins_over_local_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        local_config_path(dir.path()),
        "path_separator = \"::\"\nformat = \"tree\"\n",
    )
    .unwrap();

    env::set_var("NODETREE_FORMAT", "json");
    env::set_var("NODETREE_PATH_SEPARATOR", ".");
    let result = Settings::load(Some(dir.path()));
    env::remove_var("NODETREE_FORMAT");
    env::remove_var("NODETREE_PATH_SEPARATOR");

    let settings = result.expect("load settings");
    assert_eq!(settings.format, OutputFormat::Json);
    assert_eq!(settings.path_separator, ".");

    // without the variables the local file applies again
    let settings = Settings::load(Some(dir.path())).expect("load settings");
    assert_eq!(settings.format, OutputFormat::Tree);
    assert_eq!(settings.path_separator, "::");
}
