use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, ConfigError};
use crate::session::Session;

pub mod body;

pub use body::{Attachment, MultipartBody, RequestBody};

const DEFAULT_USER_AGENT: &str = "kepayang-admin/0.1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Request(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status}")]
    Status { status: u16, message: Option<String> },
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message the backend put in a failure body (`message` or `error`), if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } => Some(m.as_str()),
            _ => None,
        }
    }
}

/// The remote collection backend. Reads may be anonymous; writes always carry
/// the session token when one is present.
#[async_trait]
pub trait RestService: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, &str)], auth: bool)
        -> Result<Value, ApiError>;

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<Value, ApiError>;
}

#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_url: Url,
    session: Session,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    pub fn new(base_url: Url, session: Session) -> Result<Self, ApiError> {
        Self::with_options(base_url, session, DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }

    pub fn with_options(
        base_url: Url,
        session: Session,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn from_config(cfg: &Config, session: Session) -> Result<Self, ConfigError> {
        let base_url = cfg.base_url()?;
        Self::with_options(
            base_url,
            session,
            &cfg.api.user_agent,
            cfg.request_timeout(),
        )
        .map_err(|_| ConfigError::Invalid("api settings do not yield a usable HTTP client"))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Request(format!("invalid path '{}': {}", path, e)))
    }

    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<RequestBody>,
        auth: bool,
    ) -> Result<reqwest::Request, ApiError> {
        let endpoint = self.endpoint(path)?;
        let mut builder = self.http.request(method, endpoint);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        // The token is read once here, per request.
        if auth {
            if let Some(token) = self.session.token() {
                builder = builder.header("Authorization", format!("Bearer {}", token));
            }
        }
        builder = match body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Multipart(multipart)) => builder.multipart(
                multipart
                    .into_form()
                    .map_err(|e| ApiError::Request(e.to_string()))?,
            ),
            None => builder,
        };
        builder
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))
    }

    async fn execute(&self, request: reqwest::Request) -> Result<Value, ApiError> {
        debug!(method=%request.method(), url=%request.url(), "sending request");
        for (name, value) in request.headers() {
            if name.as_str().eq_ignore_ascii_case("authorization") {
                debug!("  {}: Bearer [REDACTED]", name);
            } else {
                debug!("  {}: {}", name, value.to_str().unwrap_or("[invalid]"));
            }
        }

        let res = self.http.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Network(format!("request timed out: {}", e))
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = res.status();
        debug!(%status, "received response");
        let text = res
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                warn!("backend rejected the session token");
            } else {
                warn!(%status, body=%text, "backend returned an error");
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: server_message(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RestService for RestClient {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
        auth: bool,
    ) -> Result<Value, ApiError> {
        let request = self.build_request(Method::GET, path, query, None, auth)?;
        self.execute(request).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<Value, ApiError> {
        let request = self.build_request(method, path, &[], body, true)?;
        self.execute(request).await
    }
}

fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
