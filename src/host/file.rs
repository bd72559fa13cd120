//! YAML-backed stores for the standalone binary
//!
//! Locations are directories: `set` records the process working directory
//! and `jump` changes it. Contexts are named workspaces with one current.
//! Every mutation is written straight back to disk.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::memory::{MemoryContextStore, MemoryLocationStore};
use super::{ContextStore, HostError, LocationStore};
use crate::persist::atomic_write;

/// Context created when the store file is empty
const INITIAL_CONTEXT: &str = "main";

fn read_yaml<T: DeserializeOwned + Default>(path: &Path) -> Result<T, HostError> {
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(T::default()),
        Ok(content) => Ok(serde_yaml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), HostError> {
    let content = serde_yaml::to_string(value)?;
    atomic_write(path, &content)?;
    Ok(())
}

#[derive(Debug)]
pub struct YamlLocationStore {
    path: PathBuf,
    inner: MemoryLocationStore,
}

impl YamlLocationStore {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, HostError> {
        let path = path.into();
        let mut inner: MemoryLocationStore = read_yaml(&path)?;
        inner.set_current(current_dir_string()?);
        tracing::debug!("Loaded {} locations from {}", inner.len(), path.display());
        Ok(Self { path, inner })
    }

    /// Saved directory for `id`
    pub fn get(&self, id: &str) -> Option<&str> {
        self.inner.get(id)
    }

    fn save(&self) -> Result<(), HostError> {
        write_yaml(&self.path, &self.inner)
    }
}

fn current_dir_string() -> Result<String, HostError> {
    Ok(std::env::current_dir()?.to_string_lossy().into_owned())
}

impl LocationStore for YamlLocationStore {
    fn set(&mut self, name: &str) -> Result<String, HostError> {
        self.inner.set_current(current_dir_string()?);
        let id = self.inner.set(name)?;
        self.save()?;
        Ok(id)
    }

    fn jump(&mut self, id: &str) -> Result<(), HostError> {
        let target = self
            .inner
            .get(id)
            .ok_or_else(|| HostError::UnknownLocation(id.to_string()))?
            .to_string();
        std::env::set_current_dir(&target)?;
        self.inner.jump(id)?;
        tracing::info!("Jumped to {}", target);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), HostError> {
        self.inner.delete(id)?;
        self.save()
    }

    fn exists(&self, id: &str) -> bool {
        self.inner.exists(id)
    }
}

#[derive(Debug)]
pub struct YamlContextStore {
    path: PathBuf,
    inner: MemoryContextStore,
}

impl YamlContextStore {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, HostError> {
        let path = path.into();
        let mut inner: MemoryContextStore = read_yaml(&path)?;
        if inner.names().is_empty() {
            inner = MemoryContextStore::new([INITIAL_CONTEXT]);
        }
        Ok(Self { path, inner })
    }

    pub fn current(&self) -> Option<&str> {
        self.inner.current()
    }

    pub fn names(&self) -> &[String] {
        self.inner.names()
    }

    /// Start a new workspace and make it current
    pub fn open(&mut self, name: &str) -> Result<(), HostError> {
        self.inner.open(name)?;
        self.save()
    }

    /// Forget a workspace; closing the current one leaves none current
    pub fn close(&mut self, name: &str) -> Result<(), HostError> {
        if !self.inner.exists(name) {
            return Err(HostError::UnknownContext(name.to_string()));
        }
        self.inner.close(name);
        self.save()
    }

    fn save(&self) -> Result<(), HostError> {
        write_yaml(&self.path, &self.inner)
    }
}

impl ContextStore for YamlContextStore {
    fn rename(&mut self, new_name: &str) -> Result<(), HostError> {
        self.inner.rename(new_name)?;
        self.save()
    }

    fn switch_to(&mut self, name: &str) -> Result<(), HostError> {
        self.inner.switch_to(name)?;
        self.save()
    }

    fn exists(&self, name: &str) -> bool {
        self.inner.exists(name)
    }
}
