//! Shared scripted-transport infrastructure for unit tests.
//!
//! Responses are consumed in order; running past the script panics so a
//! test fails loudly when the client issues an unexpected request.

use crate::client::{ApiRequest, ApiResponse, HttpTransport};
use crate::error::ApiError;
use crate::tokens::TokenPair;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub(crate) struct ScriptedTransport {
    inner: Arc<Inner>,
}

struct Inner {
    responses: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<Result<ApiResponse, ApiError>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
            }),
        }
    }

    pub(crate) async fn seen(&self) -> Vec<ApiRequest> {
        self.inner.seen.lock().await.clone()
    }
}

impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.inner.seen.lock().await.push(request.clone());
        self.inner
            .responses
            .lock()
            .await
            .pop_front()
            .expect("no scripted response left for request")
    }
}

pub(crate) fn json_response(status: u16, body: serde_json::Value) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse {
        status,
        body: serde_json::to_vec(&body).expect("fixture serializes"),
    })
}

pub(crate) fn empty_response(status: u16) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse {
        status,
        body: Vec::new(),
    })
}

pub(crate) fn detail_response(status: u16, detail: &str) -> Result<ApiResponse, ApiError> {
    json_response(status, serde_json::json!({ "detail": detail }))
}

pub(crate) fn pair(access: &str, refresh: &str) -> TokenPair {
    TokenPair {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    }
}
