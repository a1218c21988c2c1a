//! Runs a [`SearchSession`] against a catalog on the current task.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use cinedeck_api::catalog::{CatalogApi, CatalogResponse, MovieSummary};
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tokio::time::Sleep;
use tracing::{debug, instrument};

use crate::session::{DebounceTicket, RequestId, SearchEffect, SearchSession, SearchState};
use crate::store::KeyValueStore;

type Completed = (RequestId, CatalogResponse<Vec<MovieSummary>>);

type SelectCallback = Box<dyn FnMut(&MovieSummary) + Send>;

struct ArmedTimer {
    ticket: DebounceTicket,
    query: String,
    sleep: Pin<Box<Sleep>>,
}

enum Wake {
    Timer,
    Response(Completed),
}

/// Drives a [`SearchSession`]: owns the debounce timer and the in-flight
/// catalog calls, and feeds their outcomes back in.
///
/// Inputs (`set_query`, `submit`, ...) apply immediately. Call
/// [`Self::next_event`] to wait for the next visible state change.
/// Dropping the driver drops its timer and pending calls, so nothing is
/// applied after teardown.
pub struct SearchDriver<C, S> {
    catalog: Arc<C>,
    session: SearchSession<S>,
    timer: Option<ArmedTimer>,
    in_flight: FuturesUnordered<BoxFuture<'static, Completed>>,
    on_select: Option<SelectCallback>,
}

impl<C, S> fmt::Debug for SearchDriver<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchDriver")
            .field("timer_armed", &self.timer.is_some())
            .field("in_flight", &self.in_flight.len())
            .field("has_select_callback", &self.on_select.is_some())
            .finish_non_exhaustive()
    }
}

impl<C, S> SearchDriver<C, S>
where
    C: CatalogApi + Sync + 'static,
    S: KeyValueStore,
{
    /// Wraps `session`, dispatching its requests to `catalog`.
    pub fn new(catalog: Arc<C>, session: SearchSession<S>) -> Self {
        Self {
            catalog,
            session,
            timer: None,
            in_flight: FuturesUnordered::new(),
            on_select: None,
        }
    }

    /// Registers the callback invoked when a result is selected.
    pub fn on_result_selected(&mut self, callback: impl FnMut(&MovieSummary) + Send + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    /// Underlying session.
    pub const fn session(&self) -> &SearchSession<S> {
        &self.session
    }

    /// Current visible state.
    pub const fn state(&self) -> &SearchState {
        self.session.state()
    }

    /// Current query text.
    pub fn query(&self) -> &str {
        self.session.query()
    }

    /// Recent searches, most recent first.
    pub fn history(&self) -> &[String] {
        self.session.history()
    }

    /// Whether there is neither an armed timer nor a pending call.
    pub fn is_settled(&self) -> bool {
        self.timer.is_none() && self.in_flight.is_empty()
    }

    /// See [`SearchSession::set_query`].
    pub fn set_query(&mut self, text: &str) {
        let effects = self.session.set_query(text);
        self.run(effects);
    }

    /// See [`SearchSession::submit`].
    pub fn submit(&mut self) {
        let effects = self.session.submit();
        self.run(effects);
    }

    /// See [`SearchSession::select_history`].
    pub fn select_history(&mut self, index: usize) {
        let effects = self.session.select_history(index);
        self.run(effects);
    }

    /// See [`SearchSession::retry`].
    pub fn retry(&mut self) {
        let effects = self.session.retry();
        self.run(effects);
    }

    /// See [`SearchSession::clear_input`].
    pub fn clear_input(&mut self) {
        let effects = self.session.clear_input();
        self.run(effects);
    }

    /// See [`SearchSession::dismiss`].
    pub fn dismiss(&mut self) {
        let effects = self.session.dismiss();
        self.run(effects);
    }

    /// See [`SearchSession::clear_history`].
    pub fn clear_history(&mut self) {
        self.session.clear_history();
    }

    /// Selects the result at `index`, invoking the registered callback.
    ///
    /// Returns the chosen item, or `None` if there was nothing to select.
    pub fn select_result(&mut self, index: usize) -> Option<MovieSummary> {
        let effects = self.session.select_result(index);
        self.run(effects)
    }

    /// Drops the armed timer and every pending call.
    pub fn shutdown(&mut self) {
        let effects = self.session.shutdown();
        self.run(effects);
        self.in_flight = FuturesUnordered::new();
        debug!("Search driver shut down");
    }

    /// Waits for the next visible state change.
    ///
    /// Returns `None` once nothing is pending. Stale responses are
    /// consumed silently and do not produce an event.
    pub async fn next_event(&mut self) -> Option<SearchState> {
        loop {
            if self.is_settled() {
                return None;
            }

            let wake = tokio::select! {
                () = wait_timer(&mut self.timer) => Wake::Timer,
                Some(done) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    Wake::Response(done)
                }
            };

            match wake {
                Wake::Timer => {
                    let Some(timer) = self.timer.take() else {
                        continue;
                    };
                    let effects = self.session.debounce_elapsed(timer.ticket, &timer.query);
                    self.run(effects);
                    return Some(self.session.state().clone());
                }
                Wake::Response((request, response)) => {
                    if self.session.apply_response(request, response) {
                        return Some(self.session.state().clone());
                    }
                }
            }
        }
    }

    /// Drives until nothing is pending and returns the final state.
    #[instrument(skip_all)]
    pub async fn settle(&mut self) -> &SearchState {
        while let Some(state) = self.next_event().await {
            debug!(state = state.label(), "Search event");
        }
        self.session.state()
    }

    fn run(&mut self, effects: Vec<SearchEffect>) -> Option<MovieSummary> {
        let mut chosen = None;
        for effect in effects {
            match effect {
                SearchEffect::StartTimer {
                    ticket,
                    delay,
                    query,
                } => {
                    self.timer = Some(ArmedTimer {
                        ticket,
                        query,
                        sleep: Box::pin(tokio::time::sleep(delay)),
                    });
                }
                SearchEffect::CancelTimer => self.timer = None,
                SearchEffect::Dispatch {
                    request,
                    query,
                    limit,
                } => {
                    let catalog = Arc::clone(&self.catalog);
                    self.in_flight.push(
                        async move {
                            let response = catalog.suggestions(&query, limit).await;
                            (request, response)
                        }
                        .boxed(),
                    );
                }
                SearchEffect::ResultChosen(item) => {
                    if let Some(callback) = self.on_select.as_mut() {
                        callback(&item);
                    }
                    chosen = Some(item);
                }
            }
        }
        chosen
    }
}

async fn wait_timer(timer: &mut Option<ArmedTimer>) {
    match timer {
        Some(armed) => armed.sleep.as_mut().await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use cinedeck_api::catalog::{
        CatalogError, Credits, MovieCategory, MovieDetails, Review, TimeWindow, Video,
    };

    use super::*;
    use crate::config::SearchConfig;
    use crate::store::MemoryStore;

    /// Catalog that answers `suggestions` from a script, after a per-query delay.
    #[derive(Debug, Default)]
    struct ScriptedCatalog {
        replies: HashMap<String, (Duration, CatalogResponse<Vec<MovieSummary>>)>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedCatalog {
        fn reply(mut self, query: &str, delay_ms: u64, titles: &[&str]) -> Self {
            let items = titles
                .iter()
                .zip(1_u64..)
                .map(|(title, id)| MovieSummary {
                    id,
                    title: String::from(*title),
                    ..MovieSummary::default()
                })
                .collect();
            self.replies.insert(
                String::from(query),
                (
                    Duration::from_millis(delay_ms),
                    CatalogResponse::ok(items).with_query(query),
                ),
            );
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CatalogApi for ScriptedCatalog {
        async fn by_category(&self, _: MovieCategory, _: u32) -> CatalogResponse<Vec<MovieSummary>> {
            CatalogResponse::ok(Vec::new())
        }

        async fn trending(&self, _: TimeWindow) -> CatalogResponse<Vec<MovieSummary>> {
            CatalogResponse::ok(Vec::new())
        }

        async fn details(&self, _: u64) -> CatalogResponse<Option<MovieDetails>> {
            CatalogResponse::ok(None)
        }

        async fn search(&self, query: &str, _: u32, _: bool) -> CatalogResponse<Vec<MovieSummary>> {
            self.suggestions(query, usize::MAX).await
        }

        async fn suggestions(&self, query: &str, _: usize) -> CatalogResponse<Vec<MovieSummary>> {
            self.calls.lock().unwrap().push(String::from(query));
            let (delay, response) = self.replies.get(query).cloned().unwrap_or_else(|| {
                (
                    Duration::ZERO,
                    CatalogResponse::failed(&CatalogError::Status {
                        status: 404,
                        detail: None,
                    }),
                )
            });
            tokio::time::sleep(delay).await;
            response
        }

        async fn videos(&self, _: u64) -> CatalogResponse<Vec<Video>> {
            CatalogResponse::ok(Vec::new())
        }

        async fn similar(&self, _: u64, _: u32) -> CatalogResponse<Vec<MovieSummary>> {
            CatalogResponse::ok(Vec::new())
        }

        async fn credits(&self, _: u64) -> CatalogResponse<Credits> {
            CatalogResponse::ok(Credits::default())
        }

        async fn reviews(&self, _: u64, _: u32) -> CatalogResponse<Vec<Review>> {
            CatalogResponse::ok(Vec::new())
        }
    }

    type TestDriver = SearchDriver<ScriptedCatalog, MemoryStore>;

    fn driver(catalog: ScriptedCatalog) -> (Arc<ScriptedCatalog>, TestDriver) {
        let catalog = Arc::new(catalog);
        let session = SearchSession::new(SearchConfig::default(), MemoryStore::new());
        (Arc::clone(&catalog), SearchDriver::new(catalog, session))
    }

    fn titles(state: &SearchState) -> Vec<&str> {
        state.results().iter().map(|m| m.title.as_str()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_coalesces_keystrokes() {
        // Arrange
        let script = ScriptedCatalog::default().reply("inc", 20, &["Incendies"]);
        let (catalog, mut driver) = driver(script);

        // Act
        driver.set_query("i");
        let after_one_char = driver.state().clone();
        driver.set_query("in");
        tokio::time::advance(Duration::from_millis(100)).await;
        driver.set_query("inc");
        let fired = driver.next_event().await;
        let done = driver.next_event().await;

        // Assert
        assert_eq!(after_one_char, SearchState::Idle);
        assert_eq!(fired, Some(SearchState::Searching));
        assert_eq!(titles(done.as_ref().unwrap()), ["Incendies"]);
        assert_eq!(catalog.calls(), ["inc"]);
        assert!(driver.next_event().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_char_query_never_dispatches() {
        // Arrange
        let (catalog, mut driver) = driver(ScriptedCatalog::default());

        // Act
        driver.set_query("x");
        tokio::time::advance(Duration::from_secs(1)).await;
        let event = driver.next_event().await;

        // Assert
        assert!(event.is_none());
        assert!(catalog.calls().is_empty());
        assert_eq!(*driver.state(), SearchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_stale_response_is_suppressed() {
        // Arrange
        let script = ScriptedCatalog::default()
            .reply("alpha", 500, &["Alpha"])
            .reply("beta", 10, &["Beta"]);
        let (catalog, mut driver) = driver(script);

        // Act
        driver.set_query("alpha");
        driver.submit();
        driver.set_query("beta");
        driver.submit();
        let first = driver.next_event().await;
        let second = driver.next_event().await;

        // Assert
        assert_eq!(titles(first.as_ref().unwrap()), ["Beta"]);
        assert!(second.is_none());
        assert_eq!(titles(driver.state()), ["Beta"]);
        let mut calls = catalog.calls();
        calls.sort();
        assert_eq!(calls, ["alpha", "beta"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_stale_response_is_suppressed() {
        // Arrange
        let script = ScriptedCatalog::default()
            .reply("alpha", 10, &["Alpha"])
            .reply("beta", 500, &["Beta"]);
        let (_catalog, mut driver) = driver(script);

        // Act
        driver.set_query("alpha");
        driver.submit();
        driver.set_query("beta");
        driver.submit();
        let only = driver.next_event().await;

        // Assert
        assert_eq!(titles(only.as_ref().unwrap()), ["Beta"]);
        assert!(driver.is_settled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_result_invokes_callback() {
        // Arrange
        let script = ScriptedCatalog::default().reply("matrix", 5, &["The Matrix"]);
        let (_catalog, mut driver) = driver(script);
        let chosen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&chosen);
        driver.on_result_selected(move |item| sink.lock().unwrap().push(item.title.clone()));
        driver.set_query("matrix");
        driver.settle().await;

        // Act
        let picked = driver.select_result(0);

        // Assert
        assert_eq!(picked.unwrap().title, "The Matrix");
        assert_eq!(*chosen.lock().unwrap(), ["The Matrix"]);
        assert_eq!(*driver.state(), SearchState::Idle);
        assert_eq!(driver.query(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_pending_work() {
        // Arrange
        let script = ScriptedCatalog::default().reply("matrix", 5, &["The Matrix"]);
        let (catalog, mut driver) = driver(script);
        driver.set_query("matrix");

        // Act
        driver.shutdown();
        tokio::time::advance(Duration::from_secs(1)).await;
        let event = driver.next_event().await;

        // Assert
        assert!(event.is_none());
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_discards_in_flight_response() {
        // Arrange
        let script = ScriptedCatalog::default().reply("matrix", 50, &["The Matrix"]);
        let (_catalog, mut driver) = driver(script);
        driver.set_query("matrix");
        driver.submit();
        assert!(!driver.is_settled());

        // Act
        driver.shutdown();
        tokio::time::advance(Duration::from_secs(1)).await;
        let event = driver.next_event().await;

        // Assert
        assert!(event.is_none());
        assert!(driver.is_settled());
        assert_eq!(*driver.state(), SearchState::Searching);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_before_timer_fires_dispatches_nothing() {
        // Arrange
        let script = ScriptedCatalog::default().reply("matrix", 5, &["The Matrix"]);
        let (catalog, mut driver) = driver(script);
        driver.set_query("matrix");

        // Act
        drop(driver);
        tokio::time::advance(Duration::from_secs(1)).await;

        // Assert
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_query_fails_then_retry_redispatches() {
        // Arrange
        let (catalog, mut driver) = driver(ScriptedCatalog::default());
        driver.set_query("nothing");
        driver.submit();
        driver.settle().await;

        // Act
        let failed = driver.state().clone();
        driver.retry();
        driver.settle().await;

        // Assert
        assert_eq!(failed.error(), Some("Request failed with status code 404"));
        assert_eq!(catalog.calls(), ["nothing", "nothing"]);
    }
}
