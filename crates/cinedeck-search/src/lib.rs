//! Search coordinator for cinedeck.
//!
//! [`SearchSession`] is the state machine: it owns the query text, the
//! debounce ticket, the active request identity, the visible
//! [`SearchState`] and the persisted history, and answers every input
//! with a list of [`SearchEffect`]s. [`SearchDriver`] carries those
//! effects out on a single tokio task (sleeping for the debounce and
//! polling in-flight catalog calls).
//!
//! Responses are applied in request order, not arrival order: only the
//! most recently dispatched request may change the visible state.

mod config;
mod driver;
mod history;
mod session;
mod store;

pub use config::{DEFAULT_DEBOUNCE, SearchConfig};
pub use driver::SearchDriver;
pub use history::{HISTORY_KEY, HISTORY_LIMIT, SearchHistory};
pub use session::{DebounceTicket, RequestId, SearchEffect, SearchSession, SearchState};
pub use store::{KeyValueStore, MemoryStore};
