//! `tab`: switch to a named workspace context

use super::{leaf_from_record, required_field, ActionDescriptor, ActionError};
use crate::host::Host;
use crate::keymap::{BindingNode, KeyChord, Leaf};
use crate::persist::BindingRecord;

const KIND: &str = "tab";
const CONTEXT_FIELD: &str = "context";

pub struct TabAction;

impl ActionDescriptor for TabAction {
    fn kind(&self) -> &str {
        KIND
    }

    fn describe(&self) -> &str {
        "tab: name the current workspace and switch back to it"
    }

    /// Renames the current context to `name` (or the chord's display string)
    fn create(
        &self,
        chord: &KeyChord,
        name: &str,
        host: &mut Host<'_>,
    ) -> Result<BindingNode, ActionError> {
        let name = if name.is_empty() {
            chord.display_string()
        } else {
            name.to_string()
        };
        host.contexts.rename(&name)?;
        tracing::debug!("Current workspace renamed to {:?}", name);
        Ok(BindingNode::Leaf(
            Leaf::new(KIND, name.clone()).with_field(CONTEXT_FIELD, name),
        ))
    }

    fn deserialize(&self, record: &BindingRecord) -> Result<BindingNode, ActionError> {
        let mut node = leaf_from_record(KIND, record);
        // Hand-written records may omit the context; it defaults to the name
        if record.field_str(CONTEXT_FIELD).is_none() {
            if record.name.is_empty() {
                return Err(ActionError::MissingField {
                    kind: KIND.to_string(),
                    field: CONTEXT_FIELD,
                });
            }
            if let BindingNode::Leaf(leaf) = &mut node {
                leaf.data.insert(
                    CONTEXT_FIELD.to_string(),
                    serde_yaml::Value::String(record.name.clone()),
                );
            }
        }
        Ok(node)
    }

    fn execute(&self, node: &BindingNode, host: &mut Host<'_>) -> Result<(), ActionError> {
        let context = required_field(KIND, node, CONTEXT_FIELD)?;
        if !host.contexts.exists(context) {
            return Err(ActionError::ContextNotFound(context.to_string()));
        }
        host.contexts.switch_to(context)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ContextStore, MemoryContextStore, MemoryLocationStore};
    use crate::keymap::parse_chord;

    #[test]
    fn test_create_renames_current_context() {
        let mut locations = MemoryLocationStore::new();
        let mut contexts = MemoryContextStore::new(["main", "scratch"]);
        let chord = parse_chord("w").unwrap();

        let node = {
            let mut host = Host::new(&mut locations, &mut contexts);
            TabAction.create(&chord, "work", &mut host).unwrap()
        };
        assert!(contexts.exists("work"));
        assert!(!contexts.exists("main"));

        contexts.switch_to("scratch").unwrap();
        {
            let mut host = Host::new(&mut locations, &mut contexts);
            TabAction.execute(&node, &mut host).unwrap();
        }
        assert_eq!(contexts.current(), Some("work"));
    }

    #[test]
    fn test_missing_context_is_reported() {
        let mut locations = MemoryLocationStore::new();
        let mut contexts = MemoryContextStore::new(["main"]);
        let mut host = Host::new(&mut locations, &mut contexts);

        let node = BindingNode::Leaf(Leaf::new(KIND, "closed").with_field(CONTEXT_FIELD, "closed"));
        assert!(matches!(
            TabAction.execute(&node, &mut host),
            Err(ActionError::ContextNotFound(name)) if name == "closed"
        ));
    }

    #[test]
    fn test_deserialize_defaults_context_to_name() {
        let record = BindingRecord::new(KIND, &parse_chord("w").unwrap(), "work");
        let node = TabAction.deserialize(&record).unwrap();
        assert_eq!(node.as_leaf().unwrap().field_str("context"), Some("work"));
    }
}
