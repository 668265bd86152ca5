use reqwest::Method;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{ResourceListController, SyncError};
use crate::api::RestService;
use crate::resource::Resource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion<Id> {
    pub id: Id,
    pub display_name: String,
}

/// Confirmation gate in front of DELETE.
///
/// `confirm` closes the confirmation whatever the outcome; a failed delete
/// surfaces its error but the target has to be picked again to retry.
pub struct DeletionConfirmer<R: Resource> {
    api: Arc<dyn RestService>,
    pending: Option<PendingDeletion<R::Id>>,
    error: Option<String>,
}

impl<R: Resource> DeletionConfirmer<R> {
    pub fn new(api: Arc<dyn RestService>) -> Self {
        Self {
            api,
            pending: None,
            error: None,
        }
    }

    pub fn request_delete(&mut self, id: R::Id, display_name: impl Into<String>) {
        self.error = None;
        self.pending = Some(PendingDeletion {
            id,
            display_name: display_name.into(),
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&PendingDeletion<R::Id>> {
        self.pending.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn can_confirm(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[instrument(skip_all, fields(resource = R::PATH))]
    pub async fn confirm(&mut self, list: &mut ResourceListController<R>) -> Result<(), SyncError> {
        let Some(target) = self.pending.take() else {
            debug!("confirm without a pending target");
            return Ok(());
        };
        self.error = None;

        let path = R::item_path(&target.id);
        match self.api.send(Method::DELETE, &path, None).await {
            Ok(_) => {
                info!(id = %target.id, name = %target.display_name, "deleted");
                // A failed refresh is recorded on the list and shown by the screen.
                if let Err(err) = list.fetch_all().await {
                    debug!(?err, "refresh after delete failed");
                }
                Ok(())
            }
            Err(err) => {
                warn!(?err, id = %target.id, "delete failed");
                let message = R::MESSAGES.delete.to_string();
                self.error = Some(message.clone());
                Err(SyncError::Delete(message))
            }
        }
    }
}
