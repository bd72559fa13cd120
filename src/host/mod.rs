//! Collaborators owned by the host: saved locations and workspace contexts
//!
//! The binding core only talks to these traits. `memory` holds plain
//! in-process implementations; `file` wraps them with YAML persistence for
//! the standalone binary.

mod file;
mod memory;

use thiserror::Error;

pub use file::{YamlContextStore, YamlLocationStore};
pub use memory::{MemoryContextStore, MemoryLocationStore};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("no location saved under {0:?}")]
    UnknownLocation(String),
    #[error("no workspace named {0:?}")]
    UnknownContext(String),
    #[error("a workspace named {0:?} already exists")]
    ContextNameTaken(String),
    #[error("there is no current workspace")]
    NoCurrentContext,
    #[error("{0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Format(#[from] serde_yaml::Error),
}

/// Named saved locations
pub trait LocationStore {
    /// Capture the current location under `name`, returning its id
    fn set(&mut self, name: &str) -> Result<String, HostError>;
    fn jump(&mut self, id: &str) -> Result<(), HostError>;
    fn delete(&mut self, id: &str) -> Result<(), HostError>;
    fn exists(&self, id: &str) -> bool;
}

/// Named workspace contexts, one of which is current
pub trait ContextStore {
    /// Rename the current context
    fn rename(&mut self, new_name: &str) -> Result<(), HostError>;
    fn switch_to(&mut self, name: &str) -> Result<(), HostError>;
    fn exists(&self, name: &str) -> bool;
}

/// Mutable access to both stores, handed to action hooks
pub struct Host<'a> {
    pub locations: &'a mut dyn LocationStore,
    pub contexts: &'a mut dyn ContextStore,
}

impl<'a> Host<'a> {
    pub fn new(locations: &'a mut dyn LocationStore, contexts: &'a mut dyn ContextStore) -> Self {
        Self {
            locations,
            contexts,
        }
    }
}
