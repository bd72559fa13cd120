//! `prefix`: a named sub-menu; navigated, never executed

use super::{ActionDescriptor, ActionError};
use crate::host::Host;
use crate::keymap::{BindingNode, KeyChord, LeafData, PREFIX_KIND};
use crate::persist::BindingRecord;

pub struct PrefixAction;

impl ActionDescriptor for PrefixAction {
    fn kind(&self) -> &str {
        PREFIX_KIND
    }

    fn describe(&self) -> &str {
        "prefix: a named group of further bindings"
    }

    fn create(
        &self,
        _chord: &KeyChord,
        name: &str,
        _host: &mut Host<'_>,
    ) -> Result<BindingNode, ActionError> {
        Ok(BindingNode::prefix(name))
    }

    /// Children are written as records of their own
    fn serialize(&self, node: &BindingNode) -> Option<LeafData> {
        node.is_prefix().then(LeafData::new)
    }

    fn deserialize(&self, record: &BindingRecord) -> Result<BindingNode, ActionError> {
        Ok(BindingNode::prefix(record.name.clone()))
    }

    fn execute(&self, _node: &BindingNode, _host: &mut Host<'_>) -> Result<(), ActionError> {
        Ok(())
    }
}
