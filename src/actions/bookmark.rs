//! `bookmark`: jump to a location captured when the binding was made

use super::{leaf_from_record, required_field, ActionDescriptor, ActionError};
use crate::host::Host;
use crate::keymap::{BindingNode, KeyChord, Leaf};
use crate::persist::BindingRecord;

const KIND: &str = "bookmark";
const LOCATION_FIELD: &str = "location";

pub struct BookmarkAction;

impl ActionDescriptor for BookmarkAction {
    fn kind(&self) -> &str {
        KIND
    }

    fn describe(&self) -> &str {
        "bookmark: jump back to the current location"
    }

    /// Saves the current location under the chord's identifier, so each
    /// chord owns exactly one location entry
    fn create(
        &self,
        chord: &KeyChord,
        name: &str,
        host: &mut Host<'_>,
    ) -> Result<BindingNode, ActionError> {
        let id = host.locations.set(&chord.identifier())?;
        let name = if name.is_empty() {
            chord.display_string()
        } else {
            name.to_string()
        };
        tracing::debug!("Bookmarked location {:?} as {:?}", id, name);
        Ok(BindingNode::Leaf(
            Leaf::new(KIND, name).with_field(LOCATION_FIELD, id),
        ))
    }

    fn deserialize(&self, record: &BindingRecord) -> Result<BindingNode, ActionError> {
        if record.field_str(LOCATION_FIELD).is_none() {
            return Err(ActionError::MissingField {
                kind: KIND.to_string(),
                field: LOCATION_FIELD,
            });
        }
        Ok(leaf_from_record(KIND, record))
    }

    fn execute(&self, node: &BindingNode, host: &mut Host<'_>) -> Result<(), ActionError> {
        let id = required_field(KIND, node, LOCATION_FIELD)?;
        if !host.locations.exists(id) {
            return Err(ActionError::LocationNotFound(id.to_string()));
        }
        host.locations.jump(id)?;
        Ok(())
    }

    fn on_remove(&self, node: &BindingNode, host: &mut Host<'_>) -> Result<(), ActionError> {
        let id = required_field(KIND, node, LOCATION_FIELD)?;
        if host.locations.exists(id) {
            host.locations.delete(id)?;
            tracing::debug!("Deleted location {:?}", id);
        }
        Ok(())
    }
}
