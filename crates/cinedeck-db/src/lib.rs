//! Local persistence for cinedeck.
//!
//! Uses `rusqlite` (bundled `SQLite`) to keep small string values such
//! as the recent-search history across runs.

mod connection;
/// Key-value table backing [`cinedeck_search::KeyValueStore`].
pub mod kv;
mod migrations;

#[allow(clippy::module_name_repetitions)]
pub use connection::{DB_FILE_NAME, open_db, resolve_db_path};
pub use kv::SqliteStore;
