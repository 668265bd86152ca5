use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::fetch_list;
use crate::api::RestService;
use crate::resource::Resource;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A resource with a server-side search endpoint.
pub trait Searchable: Resource {
    const SEARCH_PATH: &'static str;
    /// Query-string parameter carrying the term.
    const SEARCH_PARAM: &'static str;
    const SEARCH_ERROR: &'static str;
}

#[derive(Debug, Clone)]
pub struct SearchState<R> {
    pub term: String,
    pub results: Vec<R>,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl<R> Default for SearchState<R> {
    fn default() -> Self {
        Self {
            term: String::new(),
            results: Vec::new(),
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl<R> SearchState<R> {
    /// Bumped on every query change; a response is applied only if it was
    /// issued for the current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Trailing-edge debounce in front of a search endpoint.
///
/// Each keystroke cancels the previously scheduled fetch. The fetch task
/// only holds a weak handle on the state, so dropping the debouncer (the
/// screen going away) discards whatever the task would have written.
pub struct SearchDebouncer<R: Searchable> {
    api: Arc<dyn RestService>,
    delay: Duration,
    state: Arc<Mutex<SearchState<R>>>,
    pending: Option<JoinHandle<()>>,
}

impl<R: Searchable> SearchDebouncer<R> {
    pub fn new(api: Arc<dyn RestService>) -> Self {
        Self::with_delay(api, DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(api: Arc<dyn RestService>, delay: Duration) -> Self {
        Self {
            api,
            delay,
            state: Arc::new(Mutex::new(SearchState::default())),
            pending: None,
        }
    }

    pub async fn on_query_change(&mut self, term: &str) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }

        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.term = term.to_string();
            state.loading = false;
            if term.trim().is_empty() {
                state.results.clear();
                state.error = None;
                return;
            }
            state.generation
        };

        let task = run_search::<R>(
            Arc::clone(&self.api),
            Arc::downgrade(&self.state),
            self.delay,
            term.to_string(),
            generation,
        );
        self.pending = Some(tokio::spawn(task));
    }

    /// Wait for the currently scheduled fetch, if any, to finish.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    warn!(?err, "search task failed");
                }
            }
        }
    }

    pub async fn snapshot(&self) -> SearchState<R> {
        self.state.lock().await.clone()
    }

    pub async fn results(&self) -> Vec<R> {
        self.state.lock().await.results.clone()
    }
}

impl<R: Searchable> Drop for SearchDebouncer<R> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

async fn run_search<R: Searchable>(
    api: Arc<dyn RestService>,
    state: Weak<Mutex<SearchState<R>>>,
    delay: Duration,
    term: String,
    generation: u64,
) {
    tokio::time::sleep(delay).await;

    {
        let Some(state) = state.upgrade() else { return };
        let mut state = state.lock().await;
        if state.generation != generation {
            return;
        }
        state.loading = true;
        state.error = None;
    }

    let query = [(R::SEARCH_PARAM, term.as_str())];
    let result = fetch_list::<R>(api.as_ref(), R::SEARCH_PATH, &query, true).await;

    let Some(state) = state.upgrade() else {
        debug!(%term, "search view is gone; dropping response");
        return;
    };
    let mut state = state.lock().await;
    if state.generation != generation {
        debug!(%term, "discarding stale search response");
        return;
    }
    state.loading = false;
    match result {
        Ok(results) => {
            info!(%term, count = results.len(), "search finished");
            state.results = results;
        }
        Err(err) => {
            warn!(?err, %term, "search failed");
            state.error = Some(R::SEARCH_ERROR.to_string());
        }
    }
}
