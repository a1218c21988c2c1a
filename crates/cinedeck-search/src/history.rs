//! Recent-search history persisted through a [`KeyValueStore`].

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::store::KeyValueStore;

/// Storage key holding the JSON array of recent queries.
pub const HISTORY_KEY: &str = "movieSearchHistory";

/// Maximum number of remembered queries.
pub const HISTORY_LIMIT: usize = 5;

/// Most-recent-first list of distinct, trimmed, non-empty queries.
///
/// Storage failures never surface to the caller: the in-memory list stays
/// authoritative for the session and the failure is logged.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchHistory<S> {
    store: S,
    entries: Vec<String>,
}

impl<S: KeyValueStore> SearchHistory<S> {
    /// Loads the history from `store`.
    ///
    /// Missing or corrupt data yields an empty history. Stored entries are
    /// trimmed, de-duplicated and capped at [`HISTORY_LIMIT`].
    pub fn load(store: S) -> Self {
        let entries = match read_entries(&store) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Failed to load search history, starting empty");
                Vec::new()
            }
        };
        debug!(count = entries.len(), "Loaded search history");
        Self { store, entries }
    }

    /// Entries, most recent first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entry at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Whether no queries are remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves `query` (trimmed) to the front, dropping older duplicates.
    ///
    /// Blank queries are ignored.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.entries.retain(|e| e != query);
        self.entries.insert(0, String::from(query));
        self.entries.truncate(HISTORY_LIMIT);
        self.persist();
    }

    /// Forgets every entry and removes the stored key.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            warn!(error = %e, "Failed to clear stored search history");
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.entries)
            .context("Failed to encode search history")
            .and_then(|json| self.store.set(HISTORY_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist search history");
        }
    }
}

fn read_entries(store: &impl KeyValueStore) -> Result<Vec<String>> {
    let Some(raw) = store.get(HISTORY_KEY)? else {
        return Ok(Vec::new());
    };
    let stored: Vec<String> =
        serde_json::from_str(&raw).context("Stored search history is not a JSON string array")?;

    let mut entries: Vec<String> = Vec::with_capacity(HISTORY_LIMIT);
    for entry in stored {
        let entry = entry.trim();
        if entry.is_empty() || entries.iter().any(|e| e == entry) {
            continue;
        }
        entries.push(String::from(entry));
        if entries.len() == HISTORY_LIMIT {
            break;
        }
    }
    Ok(entries)
}
