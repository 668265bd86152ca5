//! The CRUD synchronization state machine shared by every screen.
//!
//! - `list`: [`ResourceListController`] keeps the displayed list in sync.
//! - `form`: [`ResourceFormSession`] drives the create/edit modal.
//! - `delete`: [`DeletionConfirmer`] gates DELETE behind a confirmation.
//! - `search`: [`SearchDebouncer`] debounces query-triggered fetches.
//! - `screen`: [`ResourceScreen`] wires the first three for one resource.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::api::{ApiError, RestService};

pub mod delete;
pub mod form;
pub mod list;
pub mod screen;
pub mod search;

pub use delete::{DeletionConfirmer, PendingDeletion};
pub use form::{FormMode, ResourceFormSession};
pub use list::ResourceListController;
pub use screen::ResourceScreen;
pub use search::{SearchDebouncer, SearchState, Searchable};

/// Failure of one screen operation; the payload is the inline message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// List load failed; the previous list is kept.
    #[error("{0}")]
    Fetch(String),
    /// Create or update failed; the form stays open with its draft.
    #[error("{0}")]
    Save(String),
    /// Delete failed; the confirmation is closed anyway.
    #[error("{0}")]
    Delete(String),
    /// Client-side check failed; nothing was sent.
    #[error("{0}")]
    Validation(String),
}

impl SyncError {
    pub fn message(&self) -> &str {
        match self {
            SyncError::Fetch(m)
            | SyncError::Save(m)
            | SyncError::Delete(m)
            | SyncError::Validation(m) => m,
        }
    }
}

/// State of the last list-affecting request of a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Loading,
    Success,
    Error(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope<R> {
    Bare(Vec<R>),
    Wrapped { data: Vec<R> },
}

/// GET a collection and decode either a bare array or `{"data": [...]}`.
pub(crate) async fn fetch_list<R>(
    api: &dyn RestService,
    path: &str,
    query: &[(&str, &str)],
    auth: bool,
) -> Result<Vec<R>, ApiError>
where
    R: serde::de::DeserializeOwned,
{
    let value = api.get(path, query, auth).await?;
    decode_list(value)
}

pub(crate) fn decode_list<R>(value: Value) -> Result<Vec<R>, ApiError>
where
    R: serde::de::DeserializeOwned,
{
    match serde_json::from_value::<ListEnvelope<R>>(value) {
        Ok(ListEnvelope::Bare(items)) | Ok(ListEnvelope::Wrapped { data: items }) => Ok(items),
        Err(err) => Err(ApiError::Decode(err.to_string())),
    }
}
