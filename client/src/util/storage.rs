//! Durable client-local key/value storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! Stands in for browser `localStorage`: each key maps to one JSON document
//! under a directory. Stores that must survive a restart (session, theme)
//! persist through these helpers instead of touching the filesystem directly.
//!
//! TRADE-OFFS
//! ==========
//! Writes go to a temporary sibling and are renamed into place, so a crash
//! leaves either the old or the new document, never a truncated one. Every
//! write is synced before returning, which costs latency on each mutation.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("storage i/o failed for {key}: {source}")]
    Io { key: String, source: io::Error },
    #[error("stored value for {key} is not valid JSON: {source}")]
    Json { key: String, source: serde_json::Error },
}

/// Versioned envelope written around every persisted store state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persisted<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

impl<T> Persisted<T> {
    pub fn new(state: T) -> Self {
        Self { state, version: 0 }
    }
}

/// Directory-backed JSON document store.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    /// Open (creating if needed) the storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io { key: dir.display().to_string(), source })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load a JSON value for `key`. Returns `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid, the file cannot be read, or
    /// its contents do not deserialize into `T`.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.path_for(key)?;
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { key: key.to_owned(), source }),
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| StorageError::Json { key: key.to_owned(), source })
    }

    /// Save a JSON value for `key`, replacing any previous document.
    ///
    /// The write is complete (synced and renamed into place) when this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid, serialization fails, or the
    /// file cannot be written.
    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let raw = serde_json::to_vec(value).map_err(|source| StorageError::Json { key: key.to_owned(), source })?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        write_synced(&tmp, &raw)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|source| {
                let _ = fs::remove_file(&tmp);
                StorageError::Io { key: key.to_owned(), source }
            })
    }

    /// Delete the document for `key`. Missing documents are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the file cannot be removed.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { key: key.to_owned(), source }),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_key(key) {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

pub(crate) fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
