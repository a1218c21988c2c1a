//! Search coordinator settings.

use std::time::Duration;

use cinedeck_api::catalog::DEFAULT_SUGGESTION_LIMIT;

/// Quiet period before a typed query is dispatched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Settings handed to [`crate::SearchSession`] at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchConfig {
    /// Debounce duration for typed queries.
    pub debounce: Duration,
    /// Maximum number of suggestions requested per search.
    pub suggestion_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}
