//! Search state machine.
//!
//! The session never performs I/O. Each input returns the effects the
//! caller must carry out: start or cancel the debounce timer, dispatch a
//! catalog request, or report a chosen result.

use std::fmt;
use std::time::Duration;

use cinedeck_api::catalog::{CatalogResponse, MovieSummary};
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::history::SearchHistory;
use crate::store::KeyValueStore;

/// Queries of this many characters or fewer (after trimming) do not search.
const MIN_QUERY_CHARS: usize = 1;

/// Message shown when a failed response carries no error text.
const FALLBACK_ERROR: &str = "Search failed";

/// Identity of a dispatched catalog request. Strictly increasing per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of an armed debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceTicket(u64);

/// Visible state of the search box.
#[derive(Debug, Clone, PartialEq, Default)]
#[allow(clippy::module_name_repetitions)]
pub enum SearchState {
    /// Nothing to show.
    #[default]
    Idle,
    /// Waiting for typing to pause.
    Debouncing,
    /// A request is in flight.
    Searching,
    /// Latest request returned results.
    Success(Vec<MovieSummary>),
    /// Latest request returned no results.
    Empty,
    /// Latest request failed.
    Failed(String),
}

impl SearchState {
    /// Results of the latest successful request; empty otherwise.
    #[must_use]
    pub fn results(&self) -> &[MovieSummary] {
        match self {
            Self::Success(items) => items,
            _ => &[],
        }
    }

    /// Error text of the latest failed request.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Whether a search is pending (debouncing or in flight).
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Debouncing | Self::Searching)
    }

    /// Short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Debouncing => "debouncing",
            Self::Searching => "searching",
            Self::Success(_) => "success",
            Self::Empty => "empty",
            Self::Failed(_) => "failed",
        }
    }
}

/// Work the session asks its driver to perform.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub enum SearchEffect {
    /// Arm the debounce timer, replacing any armed one.
    StartTimer {
        /// Ticket to hand back to [`SearchSession::debounce_elapsed`].
        ticket: DebounceTicket,
        /// How long to wait.
        delay: Duration,
        /// Trimmed query to search when the timer fires.
        query: String,
    },
    /// Disarm the debounce timer.
    CancelTimer,
    /// Call `suggestions(query, limit)` and hand the response back with `request`.
    Dispatch {
        /// Identity to pass to [`SearchSession::apply_response`].
        request: RequestId,
        /// Trimmed query.
        query: String,
        /// Maximum number of suggestions.
        limit: usize,
    },
    /// The user picked a result.
    ResultChosen(MovieSummary),
}

/// Debounced search with stale-response suppression and history.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchSession<S> {
    config: SearchConfig,
    query: String,
    state: SearchState,
    history: SearchHistory<S>,
    next_ticket: u64,
    armed_ticket: Option<DebounceTicket>,
    next_request: u64,
    active_request: Option<RequestId>,
    last_dispatched: Option<String>,
}

impl<S: KeyValueStore> SearchSession<S> {
    /// Creates a session, loading history from `store`.
    pub fn new(config: SearchConfig, store: S) -> Self {
        Self {
            config,
            query: String::new(),
            state: SearchState::Idle,
            history: SearchHistory::load(store),
            next_ticket: 0,
            armed_ticket: None,
            next_request: 0,
            active_request: None,
            last_dispatched: None,
        }
    }

    /// Current query text, untrimmed.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current visible state.
    #[must_use]
    pub const fn state(&self) -> &SearchState {
        &self.state
    }

    /// Recent searches, most recent first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    /// Request whose response may still change the state.
    #[must_use]
    pub const fn active_request(&self) -> Option<RequestId> {
        self.active_request
    }

    /// Whether a debounce timer is armed.
    #[must_use]
    pub const fn is_timer_armed(&self) -> bool {
        self.armed_ticket.is_some()
    }

    /// Settings this session was built with.
    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replaces the query text.
    ///
    /// Queries of one character or fewer go idle and invalidate any
    /// pending work; longer ones (re)arm the debounce timer.
    #[must_use]
    pub fn set_query(&mut self, text: &str) -> Vec<SearchEffect> {
        self.query = String::from(text);
        let trimmed = text.trim();
        let mut effects = Vec::new();

        if trimmed.chars().count() <= MIN_QUERY_CHARS {
            self.go_idle(&mut effects);
            return effects;
        }

        let ticket = DebounceTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.armed_ticket = Some(ticket);
        self.transition(SearchState::Debouncing);
        effects.push(SearchEffect::StartTimer {
            ticket,
            delay: self.config.debounce,
            query: String::from(trimmed),
        });
        effects
    }

    /// Debounce timer fired for `ticket` with the query captured when armed.
    ///
    /// Tickets replaced or cancelled since arming are ignored.
    #[must_use]
    pub fn debounce_elapsed(&mut self, ticket: DebounceTicket, query: &str) -> Vec<SearchEffect> {
        if self.armed_ticket != Some(ticket) {
            debug!(?ticket, "Ignoring superseded debounce timer");
            return Vec::new();
        }
        self.armed_ticket = None;

        let query = query.trim();
        if query.chars().count() <= MIN_QUERY_CHARS {
            self.transition(SearchState::Idle);
            return Vec::new();
        }
        vec![self.dispatch(query)]
    }

    /// Applies the response for `request`.
    ///
    /// Returns `false` (leaving the state untouched) when `request` is no
    /// longer the active one.
    pub fn apply_response(
        &mut self,
        request: RequestId,
        response: CatalogResponse<Vec<MovieSummary>>,
    ) -> bool {
        if self.active_request != Some(request) {
            debug!(%request, "Discarding stale search response");
            return false;
        }
        self.active_request = None;

        let next = match response.error {
            Some(message) if message.trim().is_empty() => {
                SearchState::Failed(String::from(FALLBACK_ERROR))
            }
            Some(message) => SearchState::Failed(message),
            None if response.data.is_empty() => SearchState::Empty,
            None => SearchState::Success(response.data),
        };
        self.transition(next);
        true
    }

    /// Explicit submit: skips the debounce and records the query in history.
    ///
    /// A blank query is a no-op.
    #[must_use]
    pub fn submit(&mut self) -> Vec<SearchEffect> {
        let trimmed = String::from(self.query.trim());
        if trimmed.is_empty() {
            return Vec::new();
        }
        let mut effects = Vec::new();
        self.cancel_timer(&mut effects);
        self.history.record(&trimmed);
        effects.push(self.dispatch(&trimmed));
        effects
    }

    /// Re-runs the history entry at `index` immediately.
    ///
    /// History order is unchanged.
    #[must_use]
    pub fn select_history(&mut self, index: usize) -> Vec<SearchEffect> {
        let Some(entry) = self.history.get(index).map(String::from) else {
            return Vec::new();
        };
        self.query.clone_from(&entry);
        let mut effects = Vec::new();
        self.cancel_timer(&mut effects);
        effects.push(self.dispatch(&entry));
        effects
    }

    /// Re-dispatches the last query after a failure.
    #[must_use]
    pub fn retry(&mut self) -> Vec<SearchEffect> {
        if !matches!(self.state, SearchState::Failed(_)) {
            return Vec::new();
        }
        let Some(query) = self.last_dispatched.clone() else {
            return Vec::new();
        };
        info!(query = %query, "Retrying search");
        vec![self.dispatch(&query)]
    }

    /// Empties the query and goes idle. History is untouched.
    #[must_use]
    pub fn clear_input(&mut self) -> Vec<SearchEffect> {
        self.query.clear();
        let mut effects = Vec::new();
        self.go_idle(&mut effects);
        effects
    }

    /// Closes the dropdown: same as [`Self::clear_input`].
    #[must_use]
    pub fn dismiss(&mut self) -> Vec<SearchEffect> {
        self.clear_input()
    }

    /// Forgets all history entries.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Picks the result at `index` from the current success list.
    ///
    /// Clears the input and returns [`SearchEffect::ResultChosen`] first.
    #[must_use]
    pub fn select_result(&mut self, index: usize) -> Vec<SearchEffect> {
        let Some(item) = self.state.results().get(index).cloned() else {
            return Vec::new();
        };
        info!(movie_id = item.id, title = %item.title, "Search result selected");
        let mut effects = vec![SearchEffect::ResultChosen(item)];
        effects.extend(self.clear_input());
        effects
    }

    /// Stops all pending work; later timers and responses are ignored.
    #[must_use]
    pub fn shutdown(&mut self) -> Vec<SearchEffect> {
        let mut effects = Vec::new();
        self.cancel_timer(&mut effects);
        self.active_request = None;
        effects
    }

    fn dispatch(&mut self, query: &str) -> SearchEffect {
        let request = RequestId(self.next_request);
        self.next_request = self.next_request.wrapping_add(1);
        self.active_request = Some(request);
        self.last_dispatched = Some(String::from(query));
        self.transition(SearchState::Searching);
        debug!(%request, query, "Dispatching search");
        SearchEffect::Dispatch {
            request,
            query: String::from(query),
            limit: self.config.suggestion_limit,
        }
    }

    fn go_idle(&mut self, effects: &mut Vec<SearchEffect>) {
        self.cancel_timer(effects);
        self.active_request = None;
        self.transition(SearchState::Idle);
    }

    fn cancel_timer(&mut self, effects: &mut Vec<SearchEffect>) {
        if self.armed_ticket.take().is_some() {
            effects.push(SearchEffect::CancelTimer);
        }
    }

    fn transition(&mut self, next: SearchState) {
        if self.state != next {
            debug!(from = self.state.label(), to = next.label(), "Search state changed");
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]

    use cinedeck_api::catalog::CatalogError;

    use super::*;
    use crate::history::HISTORY_KEY;
    use crate::store::MemoryStore;

    fn session() -> SearchSession<MemoryStore> {
        SearchSession::new(SearchConfig::default(), MemoryStore::new())
    }

    fn movie(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: String::from(title),
            ..MovieSummary::default()
        }
    }

    fn timer(effects: &[SearchEffect]) -> (DebounceTicket, String) {
        match effects.last() {
            Some(SearchEffect::StartTimer { ticket, query, .. }) => (*ticket, query.clone()),
            other => panic!("expected StartTimer, got {other:?}"),
        }
    }

    fn dispatched(effects: &[SearchEffect]) -> (RequestId, String) {
        match effects.last() {
            Some(SearchEffect::Dispatch { request, query, .. }) => (*request, query.clone()),
            other => panic!("expected Dispatch, got {other:?}"),
        }
    }

    #[test]
    fn test_short_query_stays_idle() {
        // Arrange
        let mut session = session();

        // Act
        let effects = session.set_query(" a ");

        // Assert
        assert!(effects.is_empty());
        assert_eq!(*session.state(), SearchState::Idle);
        assert!(!session.is_timer_armed());
    }

    #[test]
    fn test_typing_rearms_timer_with_trimmed_query() {
        // Arrange
        let mut session = session();

        // Act
        let first = timer(&session.set_query("in"));
        let second = timer(&session.set_query(" inc "));

        // Assert
        assert_ne!(first.0, second.0);
        assert_eq!(second.1, "inc");
        assert_eq!(session.query(), " inc ");
        assert_eq!(*session.state(), SearchState::Debouncing);
    }

    #[test]
    fn test_superseded_ticket_is_ignored() {
        // Arrange
        let mut session = session();
        let (old, old_query) = timer(&session.set_query("in"));
        let (current, query) = timer(&session.set_query("inc"));

        // Act
        let stale = session.debounce_elapsed(old, &old_query);
        let fresh = session.debounce_elapsed(current, &query);

        // Assert
        assert!(stale.is_empty());
        let (_, sent) = dispatched(&fresh);
        assert_eq!(sent, "inc");
        assert_eq!(*session.state(), SearchState::Searching);
    }

    #[test]
    fn test_shortening_query_cancels_timer() {
        // Arrange
        let mut session = session();
        let (ticket, query) = timer(&session.set_query("in"));

        // Act
        let effects = session.set_query("i");
        let late = session.debounce_elapsed(ticket, &query);

        // Assert
        assert_eq!(effects, vec![SearchEffect::CancelTimer]);
        assert!(late.is_empty());
        assert_eq!(*session.state(), SearchState::Idle);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        // Arrange
        let mut session = session();
        let _ = session.set_query("alpha");
        let (a, _) = dispatched(&session.submit());
        let _ = session.set_query("beta");
        let (b, _) = dispatched(&session.submit());

        // Act
        let applied_b = session.apply_response(b, CatalogResponse::ok(vec![movie(2, "Beta")]));
        let applied_a = session.apply_response(a, CatalogResponse::ok(vec![movie(1, "Alpha")]));

        // Assert
        assert!(applied_b);
        assert!(!applied_a);
        assert_eq!(session.state().results()[0].title, "Beta");
    }

    #[test]
    fn test_early_stale_response_does_not_flash() {
        // Arrange
        let mut session = session();
        let _ = session.set_query("alpha");
        let (a, _) = dispatched(&session.submit());
        let _ = session.set_query("beta");
        let (b, _) = dispatched(&session.submit());

        // Act
        let applied_a = session.apply_response(a, CatalogResponse::ok(vec![movie(1, "Alpha")]));

        // Assert
        assert!(!applied_a);
        assert_eq!(*session.state(), SearchState::Searching);
        assert_eq!(session.active_request(), Some(b));
    }

    #[test]
    fn test_response_states() {
        // Arrange
        let mut session = session();
        let _ = session.set_query("matrix");

        // Act & Assert
        let (r, _) = dispatched(&session.submit());
        session.apply_response(r, CatalogResponse::ok(Vec::new()));
        assert_eq!(*session.state(), SearchState::Empty);

        let (r, _) = dispatched(&session.submit());
        let failure = CatalogError::Network(String::from("offline"));
        session.apply_response(r, CatalogResponse::failed(&failure));
        assert_eq!(session.state().error(), Some("Network Error: offline"));

        let (r, _) = dispatched(&session.submit());
        let mut blank = CatalogResponse::<Vec<MovieSummary>>::ok(Vec::new());
        blank.error = Some(String::new());
        session.apply_response(r, blank);
        assert_eq!(session.state().error(), Some("Search failed"));
    }

    #[test]
    fn test_is_loading_while_debouncing_or_searching() {
        // Arrange
        let mut session = session();

        // Act & Assert
        assert!(!session.state().is_loading());
        let (ticket, query) = timer(&session.set_query("dune"));
        assert!(session.state().is_loading());
        let (r, _) = dispatched(&session.debounce_elapsed(ticket, &query));
        assert!(session.state().is_loading());
        session.apply_response(r, CatalogResponse::ok(vec![movie(1, "Dune")]));
        assert!(!session.state().is_loading());
    }

    #[test]
    fn test_submit_records_history_and_skips_debounce() {
        // Arrange
        let mut session = session();
        let _ = session.set_query("  matrix ");

        // Act
        let effects = session.submit();

        // Assert
        assert_eq!(effects[0], SearchEffect::CancelTimer);
        let (_, query) = dispatched(&effects);
        assert_eq!(query, "matrix");
        assert_eq!(session.history(), ["matrix"]);
        assert!(!session.is_timer_armed());
    }

    #[test]
    fn test_submit_blank_is_noop() {
        // Arrange
        let mut session = session();
        let _ = session.set_query("   ");

        // Act
        let effects = session.submit();

        // Assert
        assert!(effects.is_empty());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_select_history_dispatches_without_reordering() {
        // Arrange
        let mut session = session();
        for query in ["dune", "alien"] {
            let _ = session.set_query(query);
            let _ = session.submit();
        }

        // Act
        let effects = session.select_history(1);

        // Assert
        let (_, query) = dispatched(&effects);
        assert_eq!(query, "dune");
        assert_eq!(session.query(), "dune");
        assert_eq!(session.history(), ["alien", "dune"]);
        assert!(session.select_history(9).is_empty());
    }

    #[test]
    fn test_retry_only_after_failure() {
        // Arrange
        let mut session = session();
        let _ = session.set_query("matrix");
        let (r, _) = dispatched(&session.submit());

        // Act
        let before = session.retry();
        session.apply_response(
            r,
            CatalogResponse::failed(&CatalogError::Status {
                status: 500,
                detail: None,
            }),
        );
        let after = session.retry();

        // Assert
        assert!(before.is_empty());
        let (retried, query) = dispatched(&after);
        assert_ne!(retried, r);
        assert_eq!(query, "matrix");
        assert_eq!(*session.state(), SearchState::Searching);
    }

    #[test]
    fn test_clear_input_invalidates_in_flight_request() {
        // Arrange
        let mut session = session();
        let _ = session.set_query("matrix");
        let (r, _) = dispatched(&session.submit());

        // Act
        let _ = session.clear_input();
        let applied = session.apply_response(r, CatalogResponse::ok(vec![movie(603, "The Matrix")]));

        // Assert
        assert!(!applied);
        assert_eq!(session.query(), "");
        assert_eq!(*session.state(), SearchState::Idle);
        assert_eq!(session.history(), ["matrix"]);
    }

    #[test]
    fn test_select_result_reports_and_clears() {
        // Arrange
        let mut session = session();
        let _ = session.set_query("matrix");
        let (r, _) = dispatched(&session.submit());
        session.apply_response(r, CatalogResponse::ok(vec![movie(603, "The Matrix")]));

        // Act
        let effects = session.select_result(0);

        // Assert
        assert_eq!(effects, vec![SearchEffect::ResultChosen(movie(603, "The Matrix"))]);
        assert_eq!(*session.state(), SearchState::Idle);
        assert_eq!(session.query(), "");
        assert!(session.select_result(0).is_empty());
    }

    #[test]
    fn test_clear_history_keeps_query() {
        // Arrange
        let store = MemoryStore::new();
        let mut session = SearchSession::new(SearchConfig::default(), store.clone());
        let _ = session.set_query("matrix");
        let _ = session.submit();

        // Act
        session.clear_history();

        // Assert
        assert!(session.history().is_empty());
        assert_eq!(session.query(), "matrix");
        assert!(store.get(HISTORY_KEY).unwrap().is_none());
    }

    #[test]
    fn test_history_survives_new_session() {
        // Arrange
        let store = MemoryStore::new();
        let mut first = SearchSession::new(SearchConfig::default(), store.clone());
        for query in ["dune", "alien", "dune"] {
            let _ = first.set_query(query);
            let _ = first.submit();
        }

        // Act
        let second = SearchSession::new(SearchConfig::default(), store);

        // Assert
        assert_eq!(second.history(), ["dune", "alien"]);
    }

    #[test]
    fn test_shutdown_ignores_late_work() {
        // Arrange
        let mut session = session();
        let (ticket, query) = timer(&session.set_query("matrix"));

        // Act
        let effects = session.shutdown();
        let late = session.debounce_elapsed(ticket, &query);

        // Assert
        assert_eq!(effects, vec![SearchEffect::CancelTimer]);
        assert!(late.is_empty());
        assert!(session.active_request().is_none());
    }
}
