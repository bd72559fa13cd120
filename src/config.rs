//! Application configuration persistence
//!
//! Stores user preferences in `~/.config/chordmark/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::keymap::{parse_key_string, KeyCode, Keystroke};

/// Profile name reserved for auto-load and auto-save
pub const DEFAULT_PROFILE: &str = "default";

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Profile loaded at startup and saved at shutdown
    #[serde(default = "default_profile")]
    pub default_profile: String,

    /// Key that aborts chord input (e.g., "escape", "ctrl+g")
    #[serde(default = "default_cancel_key")]
    pub cancel_key: String,

    /// Save the default profile on exit
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

fn default_cancel_key() -> String {
    "escape".to_string()
}

fn default_autosave() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_profile: default_profile(),
            cancel_key: default_cancel_key(),
            autosave: default_autosave(),
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`; any problem falls back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// The configured cancel key; an unparseable value falls back to escape
    pub fn cancel_keystroke(&self) -> Keystroke {
        match parse_key_string(&self.cancel_key) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Invalid cancel_key {:?}: {}; using escape", self.cancel_key, e);
                Keystroke::key(KeyCode::Escape)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::Modifiers;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = serde_yaml::from_str("autosave: false\n").unwrap();
        assert_eq!(config.default_profile, "default");
        assert_eq!(config.cancel_key, "escape");
        assert!(!config.autosave);
    }

    #[test]
    fn test_cancel_keystroke() {
        let mut config = AppConfig::default();
        assert_eq!(config.cancel_keystroke(), Keystroke::key(KeyCode::Escape));

        config.cancel_key = "ctrl+g".to_string();
        assert_eq!(
            config.cancel_keystroke(),
            Keystroke::char_with_mods('g', Modifiers::CTRL)
        );

        config.cancel_key = "ctrl+".to_string();
        assert_eq!(config.cancel_keystroke(), Keystroke::key(KeyCode::Escape));
    }

    #[test]
    fn test_load_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let config = AppConfig {
            default_profile: "laptop".to_string(),
            cancel_key: "ctrl+g".to_string(),
            autosave: false,
        };
        std::fs::write(&path, serde_yaml::to_string(&config).unwrap()).unwrap();
        assert_eq!(AppConfig::load_from(&path), config);
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "autosave: [").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }
}
