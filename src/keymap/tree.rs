//! BindingTree: key-chord paths mapped to prefix sub-menus or leaf actions
//!
//! Every node is owned by exactly one parent map, so each node is reachable by
//! exactly one path. Children keep insertion order; `enumerate()` walks the
//! tree pre-order in that order, and both completion listings and the profile
//! serializer go through it.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use thiserror::Error;

use super::chord::KeyChord;
use super::types::Keystroke;

/// Kind tag reported for prefix nodes
pub const PREFIX_KIND: &str = "prefix";

/// Kind-specific leaf fields, interpreted only by the kind's descriptor
pub type LeafData = BTreeMap<String, serde_yaml::Value>;

/// A terminal, executable binding
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub kind: String,
    pub name: String,
    pub data: LeafData,
}

impl Leaf {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            data: LeafData::new(),
        }
    }

    /// Attach a string field (builder pattern)
    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data
            .insert(key.to_string(), serde_yaml::Value::String(value.into()));
        self
    }

    /// Read a string field
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }
}

/// A named sub-menu
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prefix {
    pub label: String,
    pub children: BindingTree,
}

impl Prefix {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: BindingTree::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BindingNode {
    Prefix(Prefix),
    Leaf(Leaf),
}

impl BindingNode {
    /// An empty, labelled prefix node
    pub fn prefix(label: impl Into<String>) -> Self {
        BindingNode::Prefix(Prefix::new(label))
    }

    /// The kind tag governing this node
    pub fn kind(&self) -> &str {
        match self {
            BindingNode::Prefix(_) => PREFIX_KIND,
            BindingNode::Leaf(leaf) => &leaf.kind,
        }
    }

    /// Prefix label or leaf display name
    pub fn name(&self) -> &str {
        match self {
            BindingNode::Prefix(prefix) => &prefix.label,
            BindingNode::Leaf(leaf) => &leaf.name,
        }
    }

    pub fn is_prefix(&self) -> bool {
        matches!(self, BindingNode::Prefix(_))
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            BindingNode::Leaf(leaf) => Some(leaf),
            BindingNode::Prefix(_) => None,
        }
    }

    /// Leaves at and below this node, with their chords relative to `at`
    pub fn leaves_under(&self, at: &KeyChord) -> Vec<(KeyChord, &Leaf)> {
        match self {
            BindingNode::Leaf(leaf) => vec![(at.clone(), leaf)],
            BindingNode::Prefix(prefix) => {
                let mut out = Vec::new();
                prefix.children.collect_entries(at.keys(), &mut |chord, node| {
                    if let BindingNode::Leaf(leaf) = node {
                        out.push((chord, leaf));
                    }
                });
                out
            }
        }
    }
}

/// Result of walking a path through the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    NotFound,
    Prefix(&'a Prefix),
    Leaf(&'a Leaf),
}

/// One possible continuation of a partial path, for completion display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub key: Keystroke,
    pub description: String,
    pub is_prefix: bool,
}

/// Inserting would destroy existing bindings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("{path} is a prefix with {children} binding(s) below it; unbind those first")]
    PrefixNotEmpty { path: KeyChord, children: usize },
    #[error("{blocked_at} is bound to an action, so nothing can be bound under it ({path})")]
    BlockedByLeaf { path: KeyChord, blocked_at: KeyChord },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingTree {
    children: IndexMap<Keystroke, BindingNode>,
}

impl BindingTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when there are no root-level bindings
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes, prefixes included
    pub fn len(&self) -> usize {
        self.children
            .values()
            .map(|node| match node {
                BindingNode::Prefix(prefix) => 1 + prefix.children.len(),
                BindingNode::Leaf(_) => 1,
            })
            .sum()
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Direct children in insertion order
    pub fn children(&self) -> impl Iterator<Item = (&Keystroke, &BindingNode)> {
        self.children.iter()
    }

    /// Walk `path` one keystroke at a time. An empty path is `NotFound`.
    pub fn lookup(&self, path: &[Keystroke]) -> Lookup<'_> {
        match self.get(path) {
            Some(BindingNode::Prefix(prefix)) => Lookup::Prefix(prefix),
            Some(BindingNode::Leaf(leaf)) => Lookup::Leaf(leaf),
            None => Lookup::NotFound,
        }
    }

    pub fn get(&self, path: &[Keystroke]) -> Option<&BindingNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get(first)?;
        for key in rest {
            node = match node {
                BindingNode::Prefix(prefix) => prefix.children.children.get(key)?,
                BindingNode::Leaf(_) => return None,
            };
        }
        Some(node)
    }

    /// The tree of continuations below `path` (the root itself for an empty path)
    pub fn subtree(&self, path: &[Keystroke]) -> Option<&BindingTree> {
        if path.is_empty() {
            return Some(self);
        }
        match self.get(path)? {
            BindingNode::Prefix(prefix) => Some(&prefix.children),
            BindingNode::Leaf(_) => None,
        }
    }

    /// Completion candidates below `path`, in declared order
    pub fn candidates(&self, path: &[Keystroke]) -> Vec<Candidate> {
        let Some(tree) = self.subtree(path) else {
            return Vec::new();
        };
        tree.children
            .iter()
            .map(|(key, node)| Candidate {
                key: *key,
                description: node.name().to_string(),
                is_prefix: node.is_prefix(),
            })
            .collect()
    }

    /// Read-only pre-flight for `insert`.
    ///
    /// `leaf` is false only for an empty prefix, which may land on an existing
    /// prefix (relabelling it) without losing its children.
    pub fn check_insert(&self, path: &KeyChord, leaf: bool) -> Result<(), ConflictError> {
        let keys = path.keys();
        let mut tree = self;
        for (depth, key) in keys.iter().enumerate() {
            let is_last = depth + 1 == keys.len();
            match tree.children.get(key) {
                None => return Ok(()),
                Some(BindingNode::Leaf(_)) if !is_last => {
                    return Err(ConflictError::BlockedByLeaf {
                        path: path.clone(),
                        blocked_at: chord_prefix(keys, depth + 1),
                    });
                }
                Some(BindingNode::Leaf(_)) => return Ok(()),
                Some(BindingNode::Prefix(prefix)) if is_last => {
                    if leaf && !prefix.children.is_empty() {
                        return Err(ConflictError::PrefixNotEmpty {
                            path: path.clone(),
                            children: prefix.children.children.len(),
                        });
                    }
                    return Ok(());
                }
                Some(BindingNode::Prefix(prefix)) => tree = &prefix.children,
            }
        }
        Ok(())
    }

    /// Bind `node` at `path`, creating empty intermediate prefixes as needed.
    ///
    /// Last write wins for leaves; the replaced node is returned. An empty
    /// prefix inserted over an existing prefix only replaces its label.
    /// On error the tree is left untouched.
    pub fn insert(
        &mut self,
        path: &KeyChord,
        node: BindingNode,
    ) -> Result<Option<BindingNode>, ConflictError> {
        let relabel_only = matches!(&node, BindingNode::Prefix(p) if p.children.is_empty());
        self.check_insert(path, !relabel_only)?;

        let keys = path.keys();
        let Some((last, parents)) = keys.split_last() else {
            return Ok(None);
        };

        let mut tree = self;
        for (depth, key) in parents.iter().enumerate() {
            let entry = tree
                .children
                .entry(*key)
                .or_insert_with(|| BindingNode::prefix(""));
            tree = match entry {
                BindingNode::Prefix(prefix) => &mut prefix.children,
                // check_insert rules this out
                BindingNode::Leaf(_) => {
                    return Err(ConflictError::BlockedByLeaf {
                        path: path.clone(),
                        blocked_at: chord_prefix(keys, depth + 1),
                    });
                }
            };
        }

        if let (Some(BindingNode::Prefix(existing)), BindingNode::Prefix(incoming)) =
            (tree.children.get_mut(last), &node)
        {
            if incoming.children.is_empty() {
                existing.label = incoming.label.clone();
                return Ok(None);
            }
        }

        Ok(tree.children.insert(*last, node))
    }

    /// Delete the node at exactly `path`. Ancestor prefixes are kept even when
    /// they become empty.
    pub fn remove(&mut self, path: &KeyChord) -> Option<BindingNode> {
        let keys = path.keys();
        let (last, parents) = keys.split_last()?;
        let mut tree = self;
        for key in parents {
            tree = match tree.children.get_mut(key)? {
                BindingNode::Prefix(prefix) => &mut prefix.children,
                BindingNode::Leaf(_) => return None,
            };
        }
        tree.children.shift_remove(last)
    }

    /// Pre-order traversal: parent before children, children in declared order
    pub fn enumerate(&self) -> Vec<(KeyChord, &BindingNode)> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_entries(&[], &mut |chord, node| out.push((chord, node)));
        out
    }

    /// All leaves, in enumeration order
    pub fn leaves(&self) -> Vec<(KeyChord, &Leaf)> {
        self.enumerate()
            .into_iter()
            .filter_map(|(chord, node)| node.as_leaf().map(|leaf| (chord, leaf)))
            .collect()
    }

    fn collect_entries<'a>(
        &'a self,
        base: &[Keystroke],
        visit: &mut dyn FnMut(KeyChord, &'a BindingNode),
    ) {
        for (key, node) in &self.children {
            let mut keys = base.to_vec();
            keys.push(*key);
            if let BindingNode::Prefix(prefix) = node {
                visit(KeyChord::from_nonempty(keys.clone()), node);
                prefix.children.collect_entries(&keys, visit);
            } else {
                visit(KeyChord::from_nonempty(keys), node);
            }
        }
    }
}

fn chord_prefix(keys: &[Keystroke], len: usize) -> KeyChord {
    KeyChord::from_nonempty(keys[..len].to_vec())
}
