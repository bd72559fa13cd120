//! Configuration system tests
//!
//! Tests for config paths and application config loading.

use chordmark::config::{AppConfig, DEFAULT_PROFILE};
use chordmark::config_paths;
use chordmark::keymap::{KeyCode, Keystroke, Modifiers};

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_returns_some() {
    assert!(config_paths::config_dir().is_some());
}

#[test]
fn test_config_dir_contains_app_name() {
    let dir = config_paths::config_dir().unwrap();
    assert!(dir.to_string_lossy().contains("chordmark"));
}

#[test]
fn test_data_files_share_config_dir() {
    let dir = config_paths::config_dir().unwrap();
    for path in [
        config_paths::config_file().unwrap(),
        config_paths::profiles_file().unwrap(),
        config_paths::locations_file().unwrap(),
        config_paths::contexts_file().unwrap(),
    ] {
        assert_eq!(path.parent(), Some(dir.as_path()));
        assert!(path.to_string_lossy().ends_with(".yaml"));
    }
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    let config = config_paths::config_dir().unwrap();
    let logs = config_paths::logs_dir().unwrap();
    assert!(logs.starts_with(&config));
    assert!(logs.ends_with("logs"));
}

#[test]
fn test_log_file_lives_in_logs_dir() {
    let logs = config_paths::logs_dir().unwrap();
    let log = config_paths::log_file().unwrap();
    assert!(log.starts_with(&logs));
    let name = log.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with(config_paths::LOG_FILE_NAME));
}

// ========================================================================
// AppConfig Tests
// ========================================================================

#[test]
fn test_default_config() {
    let config = AppConfig::default();
    assert_eq!(config.default_profile, DEFAULT_PROFILE);
    assert_eq!(config.cancel_key, "escape");
    assert!(config.autosave);
}

#[test]
fn test_config_serialize_deserialize() {
    let config = AppConfig {
        default_profile: "desk".to_string(),
        cancel_key: "ctrl+g".to_string(),
        autosave: false,
    };
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_empty_document_is_defaults() {
    let parsed: AppConfig = serde_yaml::from_str("{}").unwrap();
    assert_eq!(parsed, AppConfig::default());
}

#[test]
fn test_missing_file_is_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_from(&dir.path().join("nope.yaml"));
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_cancel_key_aliases() {
    let mut config = AppConfig::default();
    config.cancel_key = "esc".to_string();
    assert_eq!(config.cancel_keystroke(), Keystroke::key(KeyCode::Escape));

    config.cancel_key = "Control+G".to_string();
    assert_eq!(
        config.cancel_keystroke(),
        Keystroke::new(KeyCode::Char('G'), Modifiers::CTRL)
    );
}
