//! Command-line argument parsing
//!
//! Supports:
//! - The interactive shell (default)
//! - Listing bindings of a profile, as text or JSON
//! - Listing and deleting saved profiles

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;

/// Bind key chords to bookmarks and workspaces
#[derive(Parser, Debug)]
#[command(name = "chordmark", version, about = "Bind key chords to bookmarks and workspaces")]
pub struct CliArgs {
    /// Profile store file; locations and workspaces are kept next to it
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Profile to load at startup and save on exit
    #[arg(short = 'p', long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Do not save the profile on exit
    #[arg(long)]
    pub no_autosave: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Interactive shell (the default)
    Shell,
    /// Print the bindings of the profile
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the names of all saved profiles
    Profiles,
    /// Delete a saved profile
    DeleteProfile {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

/// What to do once started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupMode {
    Shell,
    List { json: bool },
    Profiles,
    DeleteProfile(String),
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub mode: StartupMode,
    pub store_path: PathBuf,
    pub locations_path: PathBuf,
    pub contexts_path: PathBuf,
    /// Overrides `default_profile` from the config file
    pub profile: Option<String>,
    pub no_autosave: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        let mode = match self.command.unwrap_or(CliCommand::Shell) {
            CliCommand::Shell => StartupMode::Shell,
            CliCommand::List { json } => StartupMode::List { json },
            CliCommand::Profiles => StartupMode::Profiles,
            CliCommand::DeleteProfile { name } => StartupMode::DeleteProfile(name),
        };

        if let Some(profile) = &self.profile {
            if profile.trim().is_empty() {
                return Err("Profile name cannot be empty".to_string());
            }
        }

        let (store_path, locations_path, contexts_path) = match self.store {
            Some(store) => {
                let dir = store
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_default();
                (store, dir.join("locations.yaml"), dir.join("contexts.yaml"))
            }
            None => {
                let missing = || "No config directory available; pass --store".to_string();
                (
                    crate::config_paths::profiles_file().ok_or_else(missing)?,
                    crate::config_paths::locations_file().ok_or_else(missing)?,
                    crate::config_paths::contexts_file().ok_or_else(missing)?,
                )
            }
        };

        Ok(StartupConfig {
            mode,
            store_path,
            locations_path,
            contexts_path,
            profile: self.profile,
            no_autosave: self.no_autosave,
        })
    }
}

impl StartupConfig {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(profile) = &self.profile {
            config.default_profile = profile.clone();
        }
        if self.no_autosave {
            config.autosave = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> StartupConfig {
        let mut argv = vec!["chordmark", "--store", "/tmp/cm/profiles.yaml"];
        argv.extend_from_slice(args);
        CliArgs::try_parse_from(argv).unwrap().into_config().unwrap()
    }

    #[test]
    fn test_no_subcommand_is_shell() {
        let config = parse(&[]);
        assert_eq!(config.mode, StartupMode::Shell);
        assert!(!config.no_autosave);
    }

    #[test]
    fn test_store_siblings() {
        let config = parse(&[]);
        assert_eq!(config.store_path, PathBuf::from("/tmp/cm/profiles.yaml"));
        assert_eq!(config.locations_path, PathBuf::from("/tmp/cm/locations.yaml"));
        assert_eq!(config.contexts_path, PathBuf::from("/tmp/cm/contexts.yaml"));
    }

    #[test]
    fn test_list_json() {
        assert_eq!(parse(&["list", "--json"]).mode, StartupMode::List { json: true });
        assert_eq!(parse(&["list"]).mode, StartupMode::List { json: false });
    }

    #[test]
    fn test_delete_profile() {
        assert_eq!(
            parse(&["delete-profile", "old"]).mode,
            StartupMode::DeleteProfile("old".to_string())
        );
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let startup = parse(&["--profile", "laptop", "--no-autosave"]);
        let mut config = AppConfig::default();
        startup.apply_to(&mut config);
        assert_eq!(config.default_profile, "laptop");
        assert!(!config.autosave);
    }

    #[test]
    fn test_empty_profile_name_rejected() {
        let args = CliArgs::try_parse_from(["chordmark", "--store", "p.yaml", "-p", " "]).unwrap();
        assert!(args.into_config().is_err());
    }
}
