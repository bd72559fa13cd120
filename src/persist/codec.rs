//! Tree ⇄ record list conversion

use thiserror::Error;

use super::record::BindingRecord;
use crate::actions::{ActionError, ActionRegistry};
use crate::keymap::{BindingTree, ConflictError, KeyParseError};

/// Why a record was left out of a loaded tree
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("bad keys: {0}")]
    Key(#[from] KeyParseError),
    #[error(transparent)]
    Conflict(#[from] ConflictError),
}

#[derive(Debug)]
pub struct SkippedRecord {
    /// Position in the profile's record list
    pub index: usize,
    pub keys: Vec<String>,
    pub reason: DecodeError,
}

/// A loaded tree and the records that did not make it in
#[derive(Debug, Default)]
pub struct Decoded {
    pub tree: BindingTree,
    pub skipped: Vec<SkippedRecord>,
}

impl Decoded {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Flatten `tree` in pre-order. Nodes whose kind is not registered, or
/// whose descriptor declines, are left out.
pub fn serialize_tree(tree: &BindingTree, registry: &ActionRegistry) -> Vec<BindingRecord> {
    tree.enumerate()
        .into_iter()
        .filter_map(|(chord, node)| {
            let record = registry.record_for(&chord, node);
            if record.is_none() {
                tracing::debug!("Not saving {} binding at {}", node.kind(), chord);
            }
            record
        })
        .collect()
}

/// Rebuild a tree from records in order. A bad record is skipped and
/// reported; the rest still load.
pub fn deserialize_tree(records: &[BindingRecord], registry: &ActionRegistry) -> Decoded {
    let mut decoded = Decoded::default();

    for (index, record) in records.iter().enumerate() {
        match decode_into(&mut decoded.tree, record, registry) {
            Ok(()) => {}
            Err(reason) => {
                tracing::warn!(
                    "Skipping binding #{} ({} {:?}): {}",
                    index,
                    record.kind,
                    record.keys.join(" "),
                    reason
                );
                decoded.skipped.push(SkippedRecord {
                    index,
                    keys: record.keys.clone(),
                    reason,
                });
            }
        }
    }

    decoded
}

fn decode_into(
    tree: &mut BindingTree,
    record: &BindingRecord,
    registry: &ActionRegistry,
) -> Result<(), DecodeError> {
    let chord = record.chord()?;
    let node = registry.deserialize(record)?;
    if let Some(replaced) = tree.insert(&chord, node)? {
        tracing::debug!("Duplicate record for {} replaced {:?}", chord, replaced.name());
    }
    Ok(())
}
