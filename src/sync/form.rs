use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{ResourceListController, SyncError};
use crate::api::{Attachment, MultipartBody, RequestBody, RestService};
use crate::resource::{Editable, FormDraft};
use reqwest::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<Id> {
    Create,
    Edit(Id),
}

/// The create/edit modal of one resource.
///
/// The draft only exists while the form is open. A failed submit leaves the
/// form open with the draft intact so the user can retry.
pub struct ResourceFormSession<R: Editable> {
    api: Arc<dyn RestService>,
    mode: Option<FormMode<R::Id>>,
    draft: FormDraft,
    attachment: Option<Attachment>,
    error: Option<String>,
}

impl<R: Editable> ResourceFormSession<R> {
    pub fn new(api: Arc<dyn RestService>) -> Self {
        Self {
            api,
            mode: None,
            draft: FormDraft::default(),
            attachment: None,
            error: None,
        }
    }

    pub fn open_for_create(&mut self) {
        self.draft = R::blank_draft();
        self.attachment = None;
        self.error = None;
        self.mode = Some(FormMode::Create);
    }

    pub fn open_for_edit(&mut self, entity: &R) {
        let mut draft = R::blank_draft();
        for (name, value) in entity.to_draft().iter() {
            match R::field(name) {
                Some(rule) if !rule.secret => draft.set(name, value),
                _ => {}
            }
        }
        self.draft = draft;
        self.attachment = None;
        self.error = None;
        self.mode = Some(FormMode::Edit(entity.id()));
    }

    pub fn cancel(&mut self) {
        self.close();
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    pub fn mode(&self) -> Option<&FormMode<R::Id>> {
        self.mode.as_ref()
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sanitize `raw` with the field's rule and store it. Returns the stored
    /// value, or `None` when the form is closed or the field is unknown.
    pub fn update_field(&mut self, name: &str, raw: &str) -> Option<&str> {
        if !self.is_open() {
            debug!(field = name, "ignoring input while form is closed");
            return None;
        }
        let Some(rule) = R::field(name) else {
            warn!(field = name, resource = R::PATH, "unknown form field");
            return None;
        };
        self.draft.set(name, rule.apply(raw));
        Some(self.draft.get(name))
    }

    pub fn attach(&mut self, attachment: Attachment) -> Result<(), SyncError> {
        if !self.is_open() {
            return Err(SyncError::Validation("Form belum dibuka".into()));
        }
        if R::ATTACHMENT_FIELD.is_none() {
            return Err(SyncError::Validation(
                "Data ini tidak menerima lampiran".into(),
            ));
        }
        self.attachment = Some(attachment);
        Ok(())
    }

    pub async fn attach_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SyncError> {
        let path = path.as_ref();
        let attachment = Attachment::from_path(path).await.map_err(|err| {
            warn!(?err, path = %path.display(), "failed to read attachment");
            SyncError::Validation(format!("Gagal membaca file {}", path.display()))
        })?;
        self.attach(attachment)
    }

    /// Validate, send, and on success close the form and refresh `list`.
    #[instrument(skip_all, fields(resource = R::PATH))]
    pub async fn submit(&mut self, list: &mut ResourceListController<R>) -> Result<(), SyncError> {
        let Some(mode) = self.mode.clone() else {
            return Err(SyncError::Validation("Form belum dibuka".into()));
        };
        self.error = None;

        let creating = mode == FormMode::Create;
        let body = match R::validate(&self.draft, creating).and_then(|_| self.encode()) {
            Ok(body) => body,
            Err(message) => {
                debug!(reason = message, "form rejected before sending");
                self.error = Some(message.to_string());
                return Err(SyncError::Validation(message.to_string()));
            }
        };

        let (method, path, default_message) = match &mode {
            FormMode::Create => (Method::POST, R::create_path(), R::MESSAGES.create),
            FormMode::Edit(id) => (
                R::UPDATE_VERB.method(),
                R::item_path(id),
                R::MESSAGES.update,
            ),
        };

        match self.api.send(method, &path, Some(body)).await {
            Ok(_) => {
                info!(?mode, "saved");
                self.close();
                // A failed refresh is recorded on the list and shown by the screen.
                if let Err(err) = list.fetch_all().await {
                    debug!(?err, "refresh after save failed");
                }
                Ok(())
            }
            Err(err) => {
                warn!(?err, ?mode, "save failed");
                let message = err
                    .server_message()
                    .unwrap_or(default_message)
                    .to_string();
                self.error = Some(message.clone());
                Err(SyncError::Save(message))
            }
        }
    }

    fn encode(&self) -> Result<RequestBody, &'static str> {
        let payload = R::to_payload(&self.draft)?;
        Ok(match R::ATTACHMENT_FIELD {
            Some(field) => RequestBody::Multipart(
                MultipartBody::from_object(payload).with_file(field, self.attachment.clone()),
            ),
            None => RequestBody::Json(Value::Object(payload)),
        })
    }

    fn close(&mut self) {
        self.mode = None;
        self.draft.clear();
        self.attachment = None;
    }
}
