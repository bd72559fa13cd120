//! Action kinds: what a leaf does when visited, and how it is persisted
//!
//! Each kind tag maps to one [`ActionDescriptor`]. The tag is what profile
//! records carry in their `type` field, so renaming a kind orphans every
//! saved binding of that kind.
//!
//! ```text
//! bind:   create(chord, name, host) → BindingNode → tree.insert
//! visit:  tree.get(chord) → execute(node, host)
//! unbind: tree.remove(chord) → on_remove(leaf, host) for each leaf below
//! save:   serialize(node) → BindingRecord;  load: deserialize(record) → node
//! ```

mod bookmark;
mod prefix;
mod tab;

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::host::{Host, HostError};
use crate::keymap::{BindingNode, KeyChord, Leaf, LeafData};
use crate::persist::BindingRecord;

pub use bookmark::BookmarkAction;
pub use prefix::PrefixAction;
pub use tab::TabAction;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("unknown action kind {0:?}")]
    UnknownKind(String),
    #[error("saved location {0:?} no longer exists")]
    LocationNotFound(String),
    #[error("workspace {0:?} no longer exists")]
    ContextNotFound(String),
    #[error("{kind} binding is missing its {field:?} field")]
    MissingField { kind: String, field: &'static str },
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Behavior and persistence for one kind of binding
pub trait ActionDescriptor {
    /// Stable tag written to profile records
    fn kind(&self) -> &str;

    /// One-line description for the kind chooser
    fn describe(&self) -> &str {
        self.kind()
    }

    /// Build a fresh node for `chord`, capturing whatever host state the
    /// kind needs
    fn create(
        &self,
        chord: &KeyChord,
        name: &str,
        host: &mut Host<'_>,
    ) -> Result<BindingNode, ActionError>;

    /// Kind-specific record fields, or `None` if the node cannot be saved
    fn serialize(&self, node: &BindingNode) -> Option<LeafData> {
        node.as_leaf().map(|leaf| leaf.data.clone())
    }

    fn deserialize(&self, record: &BindingRecord) -> Result<BindingNode, ActionError>;

    fn execute(&self, node: &BindingNode, host: &mut Host<'_>) -> Result<(), ActionError>;

    /// Called after the node left the tree
    fn on_remove(&self, _node: &BindingNode, _host: &mut Host<'_>) -> Result<(), ActionError> {
        Ok(())
    }
}

/// Kind tag to descriptor, in registration order
#[derive(Default)]
pub struct ActionRegistry {
    descriptors: IndexMap<String, Box<dyn ActionDescriptor>>,
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl ActionRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `prefix`, `bookmark` and `tab`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(PrefixAction);
        registry.register(BookmarkAction);
        registry.register(TabAction);
        registry
    }

    /// Add a descriptor, replacing any existing one for the same kind
    pub fn register(&mut self, descriptor: impl ActionDescriptor + 'static) {
        let kind = descriptor.kind().to_string();
        if self.descriptors.contains_key(&kind) {
            tracing::debug!("Replacing action kind {:?}", kind);
        }
        self.descriptors.insert(kind, Box::new(descriptor));
    }

    pub fn get(&self, kind: &str) -> Option<&dyn ActionDescriptor> {
        self.descriptors.get(kind).map(|d| d.as_ref())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.descriptors.contains_key(kind)
    }

    pub fn kinds(&self) -> Vec<&str> {
        self.descriptors.keys().map(String::as_str).collect()
    }

    /// `(kind, description)` pairs for interactive selection
    pub fn describe_kinds(&self) -> Vec<(&str, &str)> {
        self.descriptors
            .iter()
            .map(|(kind, d)| (kind.as_str(), d.describe()))
            .collect()
    }

    fn require(&self, kind: &str) -> Result<&dyn ActionDescriptor, ActionError> {
        self.get(kind)
            .ok_or_else(|| ActionError::UnknownKind(kind.to_string()))
    }

    pub fn create(
        &self,
        kind: &str,
        chord: &KeyChord,
        name: &str,
        host: &mut Host<'_>,
    ) -> Result<BindingNode, ActionError> {
        self.require(kind)?.create(chord, name, host)
    }

    /// Run the node's action. Unregistered kinds are an error, never skipped.
    pub fn execute(&self, node: &BindingNode, host: &mut Host<'_>) -> Result<(), ActionError> {
        let descriptor = self.require(node.kind())?;
        tracing::debug!("Executing {} binding {:?}", node.kind(), node.name());
        descriptor.execute(node, host)
    }

    pub fn on_remove(&self, node: &BindingNode, host: &mut Host<'_>) -> Result<(), ActionError> {
        self.require(node.kind())?.on_remove(node, host)
    }

    /// Run the removal hook for every leaf at and below `node`.
    ///
    /// All leaves are visited even if one hook fails; the first failure is
    /// returned.
    pub fn on_remove_all(
        &self,
        chord: &KeyChord,
        node: &BindingNode,
        host: &mut Host<'_>,
    ) -> Result<(), ActionError> {
        let mut first_err = None;
        for (leaf_chord, leaf) in node.leaves_under(chord) {
            let leaf_node = BindingNode::Leaf(leaf.clone());
            if let Err(e) = self.on_remove(&leaf_node, host) {
                tracing::warn!("Cleanup for {} failed: {}", leaf_chord, e);
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    pub fn deserialize(&self, record: &BindingRecord) -> Result<BindingNode, ActionError> {
        self.require(&record.kind)?.deserialize(record)
    }

    /// Flat record for `node` at `chord`; `None` when its kind is not
    /// registered or refuses to serialize
    pub fn record_for(&self, chord: &KeyChord, node: &BindingNode) -> Option<BindingRecord> {
        let fields = self.get(node.kind())?.serialize(node)?;
        let mut record = BindingRecord::new(node.kind(), chord, node.name());
        record.fields = fields;
        Some(record)
    }
}

/// Leaf of `kind` rebuilt from a record, keeping its extra fields
pub(crate) fn leaf_from_record(kind: &str, record: &BindingRecord) -> BindingNode {
    BindingNode::Leaf(Leaf {
        kind: kind.to_string(),
        name: record.name.clone(),
        data: record.fields.clone(),
    })
}

/// String field `field` of a leaf node of `kind`
pub(crate) fn required_field<'a>(
    kind: &str,
    node: &'a BindingNode,
    field: &'static str,
) -> Result<&'a str, ActionError> {
    node.as_leaf()
        .and_then(|leaf| leaf.field_str(field))
        .ok_or_else(|| ActionError::MissingField {
            kind: kind.to_string(),
            field,
        })
}
