use std::mem;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{fetch_list, RequestOutcome, SyncError};
use crate::api::RestService;
use crate::resource::Resource;

/// Owns the displayed list of one resource.
///
/// Every successful fetch replaces the list wholesale in backend order; a
/// failed fetch keeps the previous list and records the error. Fetches take
/// `&mut self`, so they are serialized and the last one to resolve is also
/// the last one issued.
pub struct ResourceListController<R: Resource> {
    api: Arc<dyn RestService>,
    items: Vec<R>,
    outcome: RequestOutcome,
    fetches: u64,
}

impl<R: Resource> ResourceListController<R> {
    /// Starts in `Loading`: a screen fetches as soon as it is mounted.
    pub fn new(api: Arc<dyn RestService>) -> Self {
        Self {
            api,
            items: Vec::new(),
            outcome: RequestOutcome::Loading,
            fetches: 0,
        }
    }

    #[instrument(skip_all, fields(resource = R::PATH))]
    pub async fn fetch_all(&mut self) -> Result<&[R], SyncError> {
        let loading = LoadingGuard::begin(&mut self.outcome, R::MESSAGES.fetch);
        self.fetches += 1;
        let result = fetch_list::<R>(
            self.api.as_ref(),
            &R::list_path(),
            &[],
            R::LIST_REQUIRES_AUTH,
        )
        .await;

        match result {
            Ok(items) => {
                info!(count = items.len(), "list refreshed");
                self.items = items;
                loading.resolve(RequestOutcome::Success);
                Ok(&self.items)
            }
            Err(err) => {
                warn!(?err, kept = self.items.len(), "list fetch failed");
                let message = R::MESSAGES.fetch.to_string();
                loading.resolve(RequestOutcome::Error(message.clone()));
                Err(SyncError::Fetch(message))
            }
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn find(&self, id: &R::Id) -> Option<&R> {
        self.items.iter().find(|item| item.id() == *id)
    }

    pub fn outcome(&self) -> &RequestOutcome {
        &self.outcome
    }

    pub fn is_loading(&self) -> bool {
        self.outcome == RequestOutcome::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            RequestOutcome::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Number of fetches issued so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches
    }
}

/// Holds a controller in `Loading` for the duration of one fetch.
///
/// If the fetch future is dropped before it resolves, the outcome goes back
/// to what it was before the fetch, or to the fetch error when there was
/// nothing to go back to.
struct LoadingGuard<'a> {
    outcome: &'a mut RequestOutcome,
    previous: RequestOutcome,
    fallback: &'static str,
}

impl<'a> LoadingGuard<'a> {
    fn begin(outcome: &'a mut RequestOutcome, fallback: &'static str) -> Self {
        let previous = mem::replace(outcome, RequestOutcome::Loading);
        Self {
            outcome,
            previous,
            fallback,
        }
    }

    fn resolve(self, next: RequestOutcome) {
        *self.outcome = next;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if *self.outcome != RequestOutcome::Loading {
            return;
        }
        debug!("fetch abandoned before it resolved");
        *self.outcome = match mem::replace(&mut self.previous, RequestOutcome::Loading) {
            RequestOutcome::Loading => RequestOutcome::Error(self.fallback.to_string()),
            previous => previous,
        };
    }
}
