//! Key-value persistence seam for search history.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, anyhow};

/// Minimal string key-value store.
///
/// Implemented by the `SQLite`-backed store in `cinedeck-db` and by
/// [`MemoryStore`] for tests and ephemeral sessions.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(String::from(key), String::from(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        // Arrange
        let store = MemoryStore::new();

        // Act
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        let stored = store.get("k").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();

        // Assert
        assert_eq!(stored.as_deref(), Some("v2"));
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        // Arrange
        let store = MemoryStore::new();
        let other = store.clone();

        // Act
        store.set("k", "shared").unwrap();

        // Assert
        assert_eq!(other.get("k").unwrap().as_deref(), Some("shared"));
    }
}
