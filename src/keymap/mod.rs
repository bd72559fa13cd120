//! Key chords and the binding tree they address
//!
//! This module provides:
//! - Keystroke and chord types with a canonical, round-trippable text form
//! - The binding tree of prefixes (sub-menus) and leaves (actions)
//! - An incremental reader that turns live key input into a finished chord
//!
//! # Architecture
//!
//! ```text
//! crossterm::KeyEvent → Keystroke → IncrementalKeyReader ─lookup→ BindingTree
//!                                          │
//!                                          └→ KeyChord
//! ```
//!
//! # Parsing Chords
//!
//! ```ignore
//! let chord = parse_chord("ctrl+x g h")?;
//! assert_eq!(chord.len(), 3);
//! ```

mod chord;
mod crossterm_adapter;
mod parse;
mod reader;
mod tree;
mod types;

pub use chord::KeyChord;
pub use crossterm_adapter::keystroke_from_crossterm;
pub use parse::{parse_chord, parse_key_string, KeyParseError};
pub use reader::{
    CandidateDisplay, IncrementalKeyReader, InputSource, LookupSource, ReadError,
};
pub use tree::{
    BindingNode, BindingTree, Candidate, ConflictError, Leaf, LeafData, Lookup, Prefix,
    PREFIX_KIND,
};
pub use types::{KeyCode, Keystroke, Modifiers};

#[cfg(test)]
mod tests;
