#![allow(dead_code)]

use async_trait::async_trait;
use kepayang_admin::api::{ApiError, RequestBody, RestService};
use reqwest::Method;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub auth: bool,
    pub body: Option<RequestBody>,
}

struct Scripted {
    delay: Duration,
    result: Result<Value, ApiError>,
}

/// In-memory backend: records every call and answers from a script. An
/// exhausted script answers `[]`.
#[derive(Clone, Default)]
pub struct RecordingRest {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingRest {
    pub fn with_responses(responses: Vec<Result<Value, ApiError>>) -> Self {
        let fake = Self::default();
        {
            let mut script = fake.responses.try_lock().unwrap();
            script.extend(responses.into_iter().map(|result| Scripted {
                delay: Duration::ZERO,
                result,
            }));
        }
        fake
    }

    /// Queue a response that takes `delay` to arrive.
    pub async fn push_delayed(&self, delay: Duration, result: Result<Value, ApiError>) {
        self.responses
            .lock()
            .await
            .push_back(Scripted { delay, result });
    }

    pub fn shared(&self) -> Arc<dyn RestService> {
        Arc::new(self.clone())
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    /// `"GET jumlahkk/"`-style summaries, in call order.
    pub async fn trace(&self) -> Vec<String> {
        self.calls
            .lock()
            .await
            .iter()
            .map(|c| format!("{} {}", c.method, c.path))
            .collect()
    }

    async fn answer(&self, call: Call) -> Result<Value, ApiError> {
        self.calls.lock().await.push(call);
        let next = self.responses.lock().await.pop_front();
        match next {
            Some(Scripted { delay, result }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Ok(json!([])),
        }
    }
}

#[async_trait]
impl RestService for RecordingRest {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
        auth: bool,
    ) -> Result<Value, ApiError> {
        self.answer(Call {
            method: Method::GET,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            auth,
            body: None,
        })
        .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<Value, ApiError> {
        self.answer(Call {
            method,
            path: path.to_string(),
            query: Vec::new(),
            auth: true,
            body,
        })
        .await
    }
}

pub fn status(code: u16, message: Option<&str>) -> ApiError {
    ApiError::Status {
        status: code,
        message: message.map(str::to_string),
    }
}

pub fn kk(id: i64, count: i64) -> Value {
    json!({ "IDJumlahKK": id, "JumlahKK": count })
}
