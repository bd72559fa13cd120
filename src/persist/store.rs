//! Single-file store of named profiles

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::BindingRecord;

/// Schema version written to new store files
pub const STORE_VERSION: u32 = 1;

/// On-disk document: profile name to its ordered records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Schema version for forward compatibility
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub profiles: BTreeMap<String, Vec<BindingRecord>>,
}

/// A named, complete binding tree in flattened form
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub records: Vec<BindingRecord>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no profile named {0:?}")]
    ProfileNotFound(String),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to serialize profiles: {0}")]
    Serialize(#[source] serde_yaml::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Profiles persisted in one YAML file
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document; a missing file reads as empty
    pub fn read_document(&self) -> Result<StoreDocument, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Profile store {} not found, starting empty", self.path.display());
                return Ok(StoreDocument::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(StoreDocument::default());
        }

        let document: StoreDocument =
            serde_yaml::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        if document.version > STORE_VERSION {
            tracing::warn!(
                "Profile store {} has version {}, newer than {}; unknown data may be dropped on save",
                self.path.display(),
                document.version,
                STORE_VERSION
            );
        }
        Ok(document)
    }

    fn write_document(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let content = serde_yaml::to_string(document).map_err(StoreError::Serialize)?;
        atomic_write(&self.path, &content).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace or insert the profile `name`
    pub fn save(&self, name: &str, records: Vec<BindingRecord>) -> Result<(), StoreError> {
        let mut document = self.read_document()?;
        document.version = STORE_VERSION;
        let count = records.len();
        document.profiles.insert(name.to_string(), records);
        self.write_document(&document)?;
        tracing::info!("Saved profile {:?} ({} records) to {}", name, count, self.path.display());
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<Profile, StoreError> {
        let mut document = self.read_document()?;
        let records = document
            .profiles
            .remove(name)
            .ok_or_else(|| StoreError::ProfileNotFound(name.to_string()))?;
        tracing::debug!("Loaded profile {:?} ({} records)", name, records.len());
        Ok(Profile {
            name: name.to_string(),
            records,
        })
    }

    /// Profile names in sorted order
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read_document()?.profiles.into_keys().collect())
    }

    pub fn exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.read_document()?.profiles.contains_key(name))
    }

    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let mut document = self.read_document()?;
        if document.profiles.remove(name).is_none() {
            return Err(StoreError::ProfileNotFound(name.to_string()));
        }
        self.write_document(&document)?;
        tracing::info!("Deleted profile {:?} from {}", name, self.path.display());
        Ok(())
    }
}

/// Write `contents` to `path` via a synced temp file in the same directory,
/// so readers see either the old file or the new one
pub fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
