//! Integration tests for Settings config loading with layered precedence.
//!
//! Note: These tests run without a global config and without
//! `NESTED_SETS__*` variables (see config_env_test.rs), so the explicit
//! file is layered directly over the compiled defaults.

use std::fs;

use tempfile::TempDir;

use nested_sets::config::{Settings, SettingsError};

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("nested-sets.toml");
    fs::write(&path, content).unwrap();
    path
}

// ============================================================
// Settings::load() explicit file tests
// ============================================================

#[test]
fn given_no_config_file_when_load_then_defaults() {
    let settings = Settings::load(None).expect("load settings");
    assert_eq!(settings, Settings::default());
}

/// Keys present in the file replace defaults, absent keys keep them.
#[test]
fn given_partial_config_file_when_load_then_overrides_only_given_keys() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[generator]
fanout = 5
first_id = 100
"#,
    );

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.generator.fanout, 5);
    assert_eq!(settings.generator.first_id, 100);
    assert_eq!(settings.generator.depth, 3, "depth keeps its default");
    assert_eq!(settings.builder.initial_capacity, 64);
}

#[test]
fn given_builder_section_when_load_then_builder_uses_capacity() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[builder]\ninitial_capacity = 2\n");

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.nested_set_builder().initial_capacity(), 2);
}

#[test]
fn given_template_written_to_file_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &Settings::template());

    let settings = Settings::load(Some(&path)).expect("load settings");
    assert_eq!(settings, Settings::default());
}

// ============================================================
// Error tests
// ============================================================

#[test]
fn given_missing_explicit_file_when_load_then_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist.toml");

    let result = Settings::load(Some(&missing));

    assert!(matches!(result, Err(SettingsError::Load(_))));
}

#[test]
fn given_zero_fanout_in_file_when_load_then_invalid() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[generator]\nfanout = 0\n");

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(
        matches!(
            err,
            SettingsError::Invalid {
                key: "generator.fanout",
                ..
            }
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn given_wrong_value_type_when_load_then_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[generator]\ndepth = \"deep\"\n");

    let result = Settings::load(Some(&path));

    assert!(matches!(result, Err(SettingsError::Load(_))));
}

#[test]
fn given_loaded_settings_when_showing_then_toml_reflects_overrides() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[generator]\ndepth = 7\n");

    let text = Settings::load(Some(&path)).unwrap().to_toml().unwrap();

    assert!(text.contains("depth = 7"));
    assert!(text.contains("[builder]"));
}
