//! Profile persistence
//!
//! A binding tree is flattened into an ordered list of [`BindingRecord`]s
//! (pre-order, so every prefix precedes its children) and stored, together
//! with other named profiles, in a single human-editable YAML file.
//!
//! ```yaml
//! version: 1
//! profiles:
//!   default:
//!   - type: prefix
//!     keys: [g]
//!     name: goto
//!   - type: bookmark
//!     keys: [g, h]
//!     name: home
//!     location: chord:g h
//! ```

mod codec;
mod record;
mod store;

pub use codec::{deserialize_tree, serialize_tree, DecodeError, Decoded, SkippedRecord};
pub use record::BindingRecord;
pub use store::{atomic_write, Profile, ProfileStore, StoreDocument, StoreError, STORE_VERSION};
