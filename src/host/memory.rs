//! In-process location and context stores

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ContextStore, HostError, LocationStore};

/// Locations keyed by id; the id is the name they were saved under
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryLocationStore {
    #[serde(default)]
    locations: BTreeMap<String, String>,
    #[serde(skip)]
    current: String,
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where `set` captures from and `jump` moves to
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn set_current(&mut self, location: impl Into<String>) {
        self.current = location.into();
    }

    /// Saved location for `id`
    pub fn get(&self, id: &str) -> Option<&str> {
        self.locations.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl LocationStore for MemoryLocationStore {
    fn set(&mut self, name: &str) -> Result<String, HostError> {
        self.locations.insert(name.to_string(), self.current.clone());
        Ok(name.to_string())
    }

    fn jump(&mut self, id: &str) -> Result<(), HostError> {
        let target = self
            .locations
            .get(id)
            .ok_or_else(|| HostError::UnknownLocation(id.to_string()))?;
        self.current = target.clone();
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), HostError> {
        self.locations.remove(id);
        Ok(())
    }

    fn exists(&self, id: &str) -> bool {
        self.locations.contains_key(id)
    }
}

/// Ordered workspace names with an optional current one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryContextStore {
    #[serde(default)]
    contexts: Vec<String>,
    #[serde(default)]
    current: Option<String>,
}

impl MemoryContextStore {
    /// Contexts named `names`; the first one is current
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let contexts: Vec<String> = names.into_iter().map(Into::into).collect();
        let current = contexts.first().cloned();
        Self { contexts, current }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn names(&self) -> &[String] {
        &self.contexts
    }

    /// Add a context and make it current
    pub fn open(&mut self, name: &str) -> Result<(), HostError> {
        if self.exists(name) {
            return Err(HostError::ContextNameTaken(name.to_string()));
        }
        self.contexts.push(name.to_string());
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Drop a context; the current one becomes unset if it was removed
    pub fn close(&mut self, name: &str) {
        self.contexts.retain(|c| c != name);
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
    }
}

impl ContextStore for MemoryContextStore {
    fn rename(&mut self, new_name: &str) -> Result<(), HostError> {
        let current = self.current.clone().ok_or(HostError::NoCurrentContext)?;
        if current == new_name {
            return Ok(());
        }
        if self.exists(new_name) {
            return Err(HostError::ContextNameTaken(new_name.to_string()));
        }
        for name in &mut self.contexts {
            if *name == current {
                *name = new_name.to_string();
            }
        }
        self.current = Some(new_name.to_string());
        Ok(())
    }

    fn switch_to(&mut self, name: &str) -> Result<(), HostError> {
        if !self.exists(name) {
            return Err(HostError::UnknownContext(name.to_string()));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.contexts.iter().any(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_set_and_jump() {
        let mut store = MemoryLocationStore::new();
        store.set_current("/src");
        let id = store.set("chord:g s").unwrap();
        store.set_current("/elsewhere");

        store.jump(&id).unwrap();
        assert_eq!(store.current(), "/src");
    }

    #[test]
    fn test_location_delete() {
        let mut store = MemoryLocationStore::new();
        let id = store.set("x").unwrap();
        assert!(store.exists(&id));

        store.delete(&id).unwrap();
        assert!(!store.exists(&id));
        assert!(matches!(store.jump(&id), Err(HostError::UnknownLocation(_))));
    }

    #[test]
    fn test_context_rename_current() {
        let mut store = MemoryContextStore::new(["main", "notes"]);
        store.rename("work").unwrap();

        assert_eq!(store.current(), Some("work"));
        assert!(!store.exists("main"));
        assert_eq!(store.names(), &["work".to_string(), "notes".to_string()]);
    }

    #[test]
    fn test_context_rename_rejects_taken_name() {
        let mut store = MemoryContextStore::new(["main", "notes"]);
        assert!(matches!(
            store.rename("notes"),
            Err(HostError::ContextNameTaken(_))
        ));
    }

    #[test]
    fn test_context_switch() {
        let mut store = MemoryContextStore::new(["main", "notes"]);
        store.switch_to("notes").unwrap();
        assert_eq!(store.current(), Some("notes"));
        assert!(matches!(
            store.switch_to("gone"),
            Err(HostError::UnknownContext(_))
        ));
    }

    #[test]
    fn test_context_open_and_close() {
        let mut store = MemoryContextStore::default();
        assert!(matches!(store.rename("x"), Err(HostError::NoCurrentContext)));

        store.open("scratch").unwrap();
        assert_eq!(store.current(), Some("scratch"));
        store.close("scratch");
        assert_eq!(store.current(), None);
        assert!(!store.exists("scratch"));
    }
}
