//! KeyChord: a non-empty keystroke sequence addressing a node in a binding tree

use std::fmt;

use super::types::Keystroke;

/// Prefix for identifiers derived from a chord (e.g. generated bookmark names)
const IDENTIFIER_PREFIX: &str = "chord:";

/// An ordered, non-empty sequence of keystrokes
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyChord(Vec<Keystroke>);

impl KeyChord {
    /// Returns `None` for an empty sequence
    pub fn new(keys: Vec<Keystroke>) -> Option<Self> {
        if keys.is_empty() {
            None
        } else {
            Some(Self(keys))
        }
    }

    /// For callers that have just pushed at least one key
    pub(crate) fn from_nonempty(keys: Vec<Keystroke>) -> Self {
        debug_assert!(!keys.is_empty());
        Self(keys)
    }

    pub fn single(key: Keystroke) -> Self {
        Self(vec![key])
    }

    pub fn keys(&self) -> &[Keystroke] {
        &self.0
    }

    pub fn first(&self) -> &Keystroke {
        &self.0[0]
    }

    pub fn last(&self) -> &Keystroke {
        &self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        false
    }

    /// New chord with `key` appended
    pub fn child(&self, key: Keystroke) -> Self {
        let mut keys = self.0.clone();
        keys.push(key);
        Self(keys)
    }

    /// Stable identifier for external stores. Distinct chords always map to
    /// distinct identifiers: keys render without whitespace and are joined
    /// by single spaces.
    pub fn identifier(&self) -> String {
        format!("{}{}", IDENTIFIER_PREFIX, self)
    }

    /// Human-facing rendering with platform modifier symbols
    pub fn display_string(&self) -> String {
        self.0
            .iter()
            .map(|k| k.display_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Canonical key strings, as written to profile records
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|k| k.to_string()).collect()
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

impl AsRef<[Keystroke]> for KeyChord {
    fn as_ref(&self) -> &[Keystroke] {
        &self.0
    }
}

impl From<Keystroke> for KeyChord {
    fn from(key: Keystroke) -> Self {
        Self::single(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::{KeyCode, Modifiers};

    #[test]
    fn test_empty_chord_is_rejected() {
        assert!(KeyChord::new(vec![]).is_none());
    }

    #[test]
    fn test_display_joins_with_spaces() {
        let chord = KeyChord::new(vec![
            Keystroke::new(KeyCode::Char('x'), Modifiers::CTRL),
            Keystroke::char('g'),
        ])
        .unwrap();
        assert_eq!(chord.to_string(), "ctrl+x g");
        assert_eq!(chord.identifier(), "chord:ctrl+x g");
    }

    #[test]
    fn test_identifiers_do_not_collide_on_space_and_plus() {
        let a = KeyChord::new(vec![Keystroke::char('a'), Keystroke::char('b')]).unwrap();
        let b = KeyChord::single(Keystroke::char(' '));
        let c = KeyChord::new(vec![Keystroke::char(' '), Keystroke::char(' ')]).unwrap();
        let d = KeyChord::single(Keystroke::char('+'));
        let e = KeyChord::single(Keystroke::key(KeyCode::Space));
        let ids = [a, b, c, d, e].map(|chord| chord.identifier());
        for (i, x) in ids.iter().enumerate() {
            for y in &ids[i + 1..] {
                assert_ne!(x, y);
            }
        }
    }

    #[test]
    fn test_child_appends_key() {
        let root = KeyChord::single(Keystroke::char('g'));
        let child = root.child(Keystroke::char('h'));
        assert_eq!(child.len(), 2);
        assert_eq!(child.last(), &Keystroke::char('h'));
        assert_eq!(&child.keys()[..1], root.keys());
    }
}
