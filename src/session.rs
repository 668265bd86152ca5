//! Login session: the bearer token every write request carries.
//!
//! The session is an explicit value handed to [`crate::api::RestClient`] at
//! construction. The CLI persists it as JSON in the data directory through
//! [`SessionStore`].
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, RequestBody, RestService};
use crate::resources::Admin;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    Rejected(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Session {
    token: Option<String>,
    #[serde(default)]
    admin: Option<Admin>,
    #[serde(default)]
    logged_in_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.token.is_some())
            .field("admin", &self.admin)
            .field("logged_in_at", &self.logged_in_at)
            .finish()
    }
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Replace the cached profile, e.g. after `admin/me`.
    pub fn with_admin(mut self, admin: Admin) -> Self {
        self.admin = Some(admin);
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn admin(&self) -> Option<&Admin> {
        self.admin.as_ref()
    }

    pub fn logged_in_at(&self) -> Option<DateTime<Utc>> {
        self.logged_in_at
    }
}

/// File-backed session persistence.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an anonymous session.
    pub fn load(&self) -> Result<Session, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Session::anonymous()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    admin: Option<Admin>,
}

/// Exchange credentials for a session via `POST admin/login`.
#[instrument(skip_all, fields(username = %username.trim()))]
pub async fn login(
    api: &dyn RestService,
    username: &str,
    password: &str,
) -> Result<Session, SessionError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(SessionError::Validation(
            "Username dan password wajib diisi",
        ));
    }

    let body = RequestBody::Json(json!({ "username": username, "password": password }));
    let value = api
        .send(Method::POST, "admin/login", Some(body))
        .await
        .map_err(|err| {
            warn!(?err, "login rejected");
            match err {
                ApiError::Status {
                    message: Some(m), ..
                } => SessionError::Rejected(m),
                ApiError::Status { .. } => SessionError::Rejected("Login gagal".into()),
                _ => SessionError::Rejected("Terjadi kesalahan saat login".into()),
            }
        })?;

    let payload: LoginResponse = serde_json::from_value(value)
        .map_err(|_| SessionError::Rejected("Login gagal".into()))?;
    info!("logged in");
    Ok(Session {
        token: Some(payload.token),
        admin: payload.admin,
        logged_in_at: Some(Utc::now()),
    })
}
