//! Incremental chord reader with live completion feedback
//!
//! Reads one keystroke at a time, walks a [`LookupSource`], and keeps a
//! [`CandidateDisplay`] showing the continuations of the path typed so far.
//! Reading stops on a leaf or an unbound path; the cancel key aborts.
//!
//! ```text
//! show(root) → read_one → lookup(path) ─ Prefix → show(children) → read_one …
//!                                      └ Leaf | NotFound → hide → Ok(chord)
//! ```

use thiserror::Error;

use crate::host::HostError;

use super::chord::KeyChord;
use super::tree::{BindingTree, Candidate, Lookup};
use super::types::{KeyCode, Keystroke};

/// Source of raw keystrokes
pub trait InputSource {
    /// Block until the next keystroke arrives
    fn read_one(&mut self, prompt: &str) -> Result<Keystroke, HostError>;
}

/// Completion popup collaborator
pub trait CandidateDisplay {
    fn show(&mut self, prefix: &[Keystroke], candidates: &[Candidate]);
    fn hide(&mut self);
}

/// What the reader walks while deciding whether to continue
pub trait LookupSource {
    fn lookup(&self, path: &[Keystroke]) -> Lookup<'_>;
    fn candidates(&self, path: &[Keystroke]) -> Vec<Candidate>;
}

impl LookupSource for BindingTree {
    fn lookup(&self, path: &[Keystroke]) -> Lookup<'_> {
        BindingTree::lookup(self, path)
    }

    fn candidates(&self, path: &[Keystroke]) -> Vec<Candidate> {
        BindingTree::candidates(self, path)
    }
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("input cancelled")]
    Cancelled,
    #[error("failed to read input: {0}")]
    Input(#[from] HostError),
}

/// Open candidate popup; hidden again when dropped
struct CandidatePopup<'a> {
    display: &'a mut dyn CandidateDisplay,
}

impl<'a> CandidatePopup<'a> {
    fn open(display: &'a mut dyn CandidateDisplay) -> Self {
        Self { display }
    }

    fn show(&mut self, prefix: &[Keystroke], candidates: &[Candidate]) {
        self.display.show(prefix, candidates);
    }
}

impl Drop for CandidatePopup<'_> {
    fn drop(&mut self) {
        self.display.hide();
    }
}

/// Turns a stream of keystrokes into a finished chord
#[derive(Debug, Clone, Copy)]
pub struct IncrementalKeyReader {
    cancel: Keystroke,
}

impl Default for IncrementalKeyReader {
    fn default() -> Self {
        Self::new(Keystroke::key(KeyCode::Escape))
    }
}

impl IncrementalKeyReader {
    pub fn new(cancel: Keystroke) -> Self {
        Self { cancel }
    }

    pub fn cancel_key(&self) -> Keystroke {
        self.cancel
    }

    /// Read keys until the path stops being a prefix in `source`.
    ///
    /// An unbound first key still yields a one-key chord; whether the chord
    /// is useful is the caller's decision. The display is hidden on every
    /// exit path.
    pub fn read(
        &self,
        prompt: &str,
        source: &dyn LookupSource,
        input: &mut dyn InputSource,
        display: &mut dyn CandidateDisplay,
    ) -> Result<KeyChord, ReadError> {
        let mut popup = CandidatePopup::open(display);
        popup.show(&[], &source.candidates(&[]));

        let mut path: Vec<Keystroke> = Vec::new();
        loop {
            let key = input.read_one(&Self::prompt_for(prompt, &path))?;
            if key == self.cancel {
                tracing::debug!("Chord input cancelled after {} key(s)", path.len());
                return Err(ReadError::Cancelled);
            }
            path.push(key);

            match source.lookup(&path) {
                Lookup::Prefix(prefix) => {
                    tracing::trace!("Prefix {:?} at depth {}, reading on", prefix.label, path.len());
                    popup.show(&path, &source.candidates(&path));
                }
                Lookup::Leaf(_) | Lookup::NotFound => {
                    let chord = KeyChord::from_nonempty(path);
                    tracing::debug!("Chord complete: {}", chord);
                    return Ok(chord);
                }
            }
        }
    }

    fn prompt_for(prompt: &str, path: &[Keystroke]) -> String {
        if path.is_empty() {
            return prompt.to_string();
        }
        let typed = path
            .iter()
            .map(|k| k.display_string())
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {}-", prompt, typed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::keymap::parse::{parse_chord, parse_key_string};
    use crate::keymap::tree::{BindingNode, Leaf};

    struct Script(VecDeque<Keystroke>);

    impl InputSource for Script {
        fn read_one(&mut self, _prompt: &str) -> Result<Keystroke, HostError> {
            self.0
                .pop_front()
                .ok_or_else(|| HostError::Unavailable("script exhausted".into()))
        }
    }

    fn script(keys: &[&str]) -> Script {
        Script(keys.iter().map(|k| parse_key_string(k).unwrap()).collect())
    }

    #[derive(Default)]
    struct Popup {
        shown: Vec<(usize, usize)>,
        hidden: usize,
    }

    impl CandidateDisplay for Popup {
        fn show(&mut self, prefix: &[Keystroke], candidates: &[Candidate]) {
            self.shown.push((prefix.len(), candidates.len()));
        }

        fn hide(&mut self) {
            self.hidden += 1;
        }
    }

    fn tree() -> BindingTree {
        let mut tree = BindingTree::new();
        tree.insert(&parse_chord("a").unwrap(), BindingNode::Leaf(Leaf::new("tab", "a")))
            .unwrap();
        tree.insert(&parse_chord("b c").unwrap(), BindingNode::Leaf(Leaf::new("tab", "bc")))
            .unwrap();
        tree
    }

    #[test]
    fn test_input_error_still_hides_popup() {
        let tree = tree();
        let mut input = script(&["b"]);
        let mut popup = Popup::default();

        let result = IncrementalKeyReader::default().read("bind", &tree, &mut input, &mut popup);

        assert!(matches!(result, Err(ReadError::Input(_))));
        assert_eq!(popup.hidden, 1);
        assert_eq!(popup.shown, vec![(0, 2), (1, 1)]);
    }

    #[test]
    fn test_custom_cancel_key() {
        let tree = tree();
        let reader = IncrementalKeyReader::new(parse_key_string("ctrl+g").unwrap());
        let mut popup = Popup::default();

        let result = reader.read("bind", &tree, &mut script(&["ctrl+g"]), &mut popup);
        assert!(matches!(result, Err(ReadError::Cancelled)));

        // Escape is an ordinary key now
        let chord = reader
            .read("bind", &tree, &mut script(&["escape"]), &mut popup)
            .unwrap();
        assert_eq!(chord.to_string(), "escape");
        assert_eq!(popup.hidden, 2);
    }

    #[test]
    fn test_prompt_shows_typed_keys() {
        let path = [Keystroke::char('g')];
        assert_eq!(IncrementalKeyReader::prompt_for("bind", &[]), "bind");
        assert_eq!(IncrementalKeyReader::prompt_for("bind", &path), "bind g-");
    }
}
