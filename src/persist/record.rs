//! Flat, serializable form of one binding

use serde::{Deserialize, Serialize};

use crate::keymap::{parse_key_string, KeyChord, KeyParseError, LeafData};

/// One node of a profile. Kind-specific fields are flattened next to the
/// common ones; unknown fields are carried through untouched.
///
/// Every field defaults so that a malformed entry surfaces as a per-record
/// decode error instead of failing the whole file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingRecord {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub fields: LeafData,
}

impl BindingRecord {
    pub fn new(kind: impl Into<String>, chord: &KeyChord, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            keys: chord.to_strings(),
            name: name.into(),
            fields: LeafData::new(),
        }
    }

    /// Parse `keys` back into a chord
    pub fn chord(&self) -> Result<KeyChord, KeyParseError> {
        let keys = self
            .keys
            .iter()
            .map(|k| parse_key_string(k))
            .collect::<Result<Vec<_>, _>>()?;
        KeyChord::new(keys).ok_or(KeyParseError::EmptyChord)
    }

    /// Read a string field
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }
}
