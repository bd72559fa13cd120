//! Cross-module tests for the keymap system: parse → tree → reader

use std::collections::VecDeque;

use super::*;
use crate::host::HostError;

/// Keystrokes fed from a fixed list
struct Scripted {
    keys: VecDeque<Keystroke>,
    prompts: Vec<String>,
}

impl Scripted {
    fn new(keys: &[&str]) -> Self {
        Self {
            keys: keys
                .iter()
                .map(|k| parse_key_string(k).expect("valid test key"))
                .collect(),
            prompts: Vec::new(),
        }
    }
}

impl InputSource for Scripted {
    fn read_one(&mut self, prompt: &str) -> Result<Keystroke, HostError> {
        self.prompts.push(prompt.to_string());
        self.keys
            .pop_front()
            .ok_or_else(|| HostError::Unavailable("no more input".into()))
    }
}

/// Records every show/hide call
#[derive(Default)]
struct Recorder {
    shown: Vec<(String, Vec<String>)>,
    visible: bool,
    hides: usize,
}

impl CandidateDisplay for Recorder {
    fn show(&mut self, prefix: &[Keystroke], candidates: &[Candidate]) {
        let prefix = prefix.iter().map(|k| k.to_string()).collect::<Vec<_>>().join(" ");
        let keys = candidates.iter().map(|c| c.key.to_string()).collect();
        self.shown.push((prefix, keys));
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.hides += 1;
    }
}

/// `a` is a leaf, `b` a prefix holding leaf `b c`
fn sample_tree() -> BindingTree {
    let mut tree = BindingTree::new();
    tree.insert(&parse_chord("a").unwrap(), BindingNode::Leaf(Leaf::new("tab", "a")))
        .unwrap();
    tree.insert(&parse_chord("b").unwrap(), BindingNode::prefix("b menu"))
        .unwrap();
    tree.insert(&parse_chord("b c").unwrap(), BindingNode::Leaf(Leaf::new("tab", "bc")))
        .unwrap();
    tree
}

fn read(tree: &BindingTree, keys: &[&str]) -> (Result<KeyChord, ReadError>, Scripted, Recorder) {
    let mut input = Scripted::new(keys);
    let mut display = Recorder::default();
    let result = IncrementalKeyReader::default().read("bind", tree, &mut input, &mut display);
    (result, input, display)
}

#[test]
fn test_leaf_stops_after_one_key() {
    let tree = sample_tree();
    let (result, input, display) = read(&tree, &["a", "b"]);

    assert_eq!(result.unwrap(), parse_chord("a").unwrap());
    // The second key was never consumed
    assert_eq!(input.keys.len(), 1);
    assert!(!display.visible);
    assert_eq!(display.hides, 1);
}

#[test]
fn test_prefix_continues_to_leaf() {
    let tree = sample_tree();
    let (result, input, display) = read(&tree, &["b", "c"]);

    assert_eq!(result.unwrap(), parse_chord("b c").unwrap());
    assert_eq!(input.prompts, vec!["bind".to_string(), "bind b-".to_string()]);
    assert_eq!(
        display.shown,
        vec![
            (String::new(), vec!["a".to_string(), "b".to_string()]),
            ("b".to_string(), vec!["c".to_string()]),
        ]
    );
    assert!(!display.visible);
}

#[test]
fn test_cancel_after_prefix() {
    let tree = sample_tree();
    let (result, _, display) = read(&tree, &["b", "escape"]);

    assert!(matches!(result, Err(ReadError::Cancelled)));
    assert!(!display.visible);
    assert_eq!(display.hides, 1);
}

#[test]
fn test_unbound_first_key_is_a_chord() {
    let tree = sample_tree();
    let (result, _, display) = read(&tree, &["z"]);

    assert_eq!(result.unwrap(), parse_chord("z").unwrap());
    assert!(!display.visible);
}

#[test]
fn test_unbound_key_under_prefix_stops() {
    let tree = sample_tree();
    let (result, _, _) = read(&tree, &["b", "q", "c"]);
    assert_eq!(result.unwrap(), parse_chord("b q").unwrap());
}

#[test]
fn test_reader_walks_alternate_source() {
    let live = sample_tree();
    let mut other = BindingTree::new();
    other
        .insert(&parse_chord("a x").unwrap(), BindingNode::Leaf(Leaf::new("tab", "ax")))
        .unwrap();

    // `a` is a leaf in the live tree but a prefix in the other one
    let (result, _, _) = read(&other, &["a", "x"]);
    assert_eq!(result.unwrap(), parse_chord("a x").unwrap());
    let (result, _, _) = read(&live, &["a", "x"]);
    assert_eq!(result.unwrap(), parse_chord("a").unwrap());
}

#[test]
fn test_lookup_is_deterministic() {
    let tree = sample_tree();
    let paths = ["a", "b", "b c", "c", "b c d"];
    let first: Vec<_> = paths
        .iter()
        .map(|p| format!("{:?}", tree.lookup(parse_chord(p).unwrap().keys())))
        .collect();
    let again: Vec<_> = paths
        .iter()
        .rev()
        .map(|p| format!("{:?}", tree.lookup(parse_chord(p).unwrap().keys())))
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    assert_eq!(first, again);
}

#[test]
fn test_modified_keys_survive_tree_and_reader() {
    let mut tree = BindingTree::new();
    tree.insert(&parse_chord("ctrl+x").unwrap(), BindingNode::prefix("C-x"))
        .unwrap();
    tree.insert(
        &parse_chord("ctrl+x G").unwrap(),
        BindingNode::Leaf(Leaf::new("tab", "big g")),
    )
    .unwrap();

    let (result, _, _) = read(&tree, &["control+x", "G"]);
    let chord = result.unwrap();
    assert_eq!(chord.to_string(), "ctrl+x G");
    assert!(matches!(tree.lookup(chord.keys()), Lookup::Leaf(l) if l.name == "big g"));
    // Case matters
    assert_eq!(tree.lookup(parse_chord("ctrl+x g").unwrap().keys()), Lookup::NotFound);
}
