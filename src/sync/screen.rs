use std::sync::Arc;

use super::{DeletionConfirmer, ResourceFormSession, ResourceListController, SyncError};
use crate::api::RestService;
use crate::resource::Editable;

/// One CRUD screen: list, form and delete confirmation over a single
/// resource, plus the inline banner showing the latest failure.
///
/// The banner is cleared when an operation starts and set when it fails.
pub struct ResourceScreen<R: Editable> {
    pub list: ResourceListController<R>,
    pub form: ResourceFormSession<R>,
    pub deletion: DeletionConfirmer<R>,
    banner: Option<String>,
}

impl<R: Editable> ResourceScreen<R> {
    pub fn new(api: Arc<dyn RestService>) -> Self {
        Self {
            list: ResourceListController::new(Arc::clone(&api)),
            form: ResourceFormSession::new(Arc::clone(&api)),
            deletion: DeletionConfirmer::new(api),
            banner: None,
        }
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub async fn mount(&mut self) -> Result<&[R], SyncError> {
        self.banner = None;
        let fetched = self.list.fetch_all().await.map(|_| ());
        match fetched {
            Ok(()) => Ok(self.list.items()),
            Err(err) => self.fail(err),
        }
    }

    pub fn open_create(&mut self) {
        self.form.open_for_create();
    }

    pub fn open_edit(&mut self, id: &R::Id) -> Result<(), SyncError> {
        match self.list.find(id) {
            Some(entity) => {
                self.form.open_for_edit(entity);
                Ok(())
            }
            None => self.fail(SyncError::Validation(format!("Data {} tidak ditemukan", id))),
        }
    }

    pub fn update_field(&mut self, name: &str, raw: &str) -> Option<&str> {
        self.form.update_field(name, raw)
    }

    pub async fn submit(&mut self) -> Result<(), SyncError> {
        self.banner = None;
        match self.form.submit(&mut self.list).await {
            Ok(()) => {
                self.banner = self.list.error().map(str::to_string);
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Open the confirmation for a listed entity; returns false if it is not listed.
    pub fn request_delete(&mut self, id: &R::Id) -> bool {
        match self.list.find(id) {
            Some(entity) => {
                let name = entity.display_name();
                self.deletion.request_delete(id.clone(), name);
                true
            }
            None => false,
        }
    }

    pub async fn confirm_delete(&mut self) -> Result<(), SyncError> {
        self.banner = None;
        match self.deletion.confirm(&mut self.list).await {
            Ok(()) => {
                self.banner = self.list.error().map(str::to_string);
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    pub fn cancel_delete(&mut self) {
        self.deletion.cancel();
    }

    /// Record `err` in the banner and hand it back.
    pub fn fail<T>(&mut self, err: SyncError) -> Result<T, SyncError> {
        self.banner = Some(err.message().to_string());
        Err(err)
    }
}
