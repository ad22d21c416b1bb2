//! Dark mode preference.
//!
//! Reads the persisted preference at startup and writes every change back
//! before reporting it. Independent of the auth session.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::util::storage::{LocalStorage, Persisted};

pub const THEME_STORAGE_KEY: &str = "theme-storage";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTheme {
    #[serde(default)]
    dark_mode: bool,
}

#[derive(Clone)]
pub struct ThemeStore {
    storage: LocalStorage,
    dark_mode: Arc<Mutex<bool>>,
}

impl ThemeStore {
    /// Open the store. A missing or unreadable preference means light mode.
    #[must_use]
    pub fn open(storage: LocalStorage) -> Self {
        let dark_mode = match storage.load_json::<Persisted<StoredTheme>>(THEME_STORAGE_KEY) {
            Ok(stored) => stored.is_some_and(|p| p.state.dark_mode),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read theme preference");
                false
            }
        };
        Self { storage, dark_mode: Arc::new(Mutex::new(dark_mode)) }
    }

    #[must_use]
    pub fn read(&self) -> bool {
        *self
            .dark_mode
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Flip the preference and return the new value.
    ///
    /// # Errors
    ///
    /// [`ClientError::Transport`] if the preference cannot be persisted.
    pub fn toggle(&self) -> Result<bool, ClientError> {
        let mut current = self
            .dark_mode
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let next = !*current;
        self.persist(next)?;
        *current = next;
        Ok(next)
    }

    /// Set the preference explicitly.
    ///
    /// # Errors
    ///
    /// [`ClientError::Transport`] if the preference cannot be persisted.
    pub fn set(&self, enabled: bool) -> Result<(), ClientError> {
        let mut current = self
            .dark_mode
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.persist(enabled)?;
        *current = enabled;
        Ok(())
    }

    fn persist(&self, dark_mode: bool) -> Result<(), ClientError> {
        self.storage
            .save_json(THEME_STORAGE_KEY, &Persisted::new(StoredTheme { dark_mode }))?;
        Ok(())
    }
}
