//! chordmark - incremental key-chord bindings with saved profiles
//!
//! This crate provides a binding tree addressed by multi-key chords, a reader
//! that builds chords one keystroke at a time with live completion, a
//! registry of action kinds (prefix, bookmark, tab), and a YAML profile
//! store that round-trips the whole tree.

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod host;
pub mod keymap;
pub mod persist;
pub mod terminal;
pub mod tracing;

// Re-export commonly used types
pub use actions::{ActionDescriptor, ActionError, ActionRegistry};
pub use app::{App, AppError, Prompter};
pub use config::AppConfig;
pub use keymap::{BindingNode, BindingTree, IncrementalKeyReader, KeyChord, Keystroke};
pub use persist::{BindingRecord, ProfileStore};
