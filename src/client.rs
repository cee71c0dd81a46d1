use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::redact::redact_credentials;
use crate::tokens::{TokenPair, TokenStore};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde_json::Value;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

const REFRESH_PATH: &str = "/auth/refresh";

/// One outgoing HTTP exchange, fully described. The bearer credential is
/// carried here explicitly so a refreshed token can be re-attached without
/// mutating any shared state.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Form(Vec<(&'static str, String)>),
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Seam between the client core and the wire. Production uses
/// [`ReqwestTransport`]; tests script responses through this trait.
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// [`HttpTransport`] backed by a pooled `reqwest` client.
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(40))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()?,
        })
    }
}

fn build_headers(bearer: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(token) = bearer {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
            headers.insert(AUTHORIZATION, value);
        }
    }
    headers
}

impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .headers(build_headers(request.bearer.as_deref()));
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(ApiResponse { status, body })
    }
}

/// FastAPI error bodies carry a `detail` field; pull it out when it is a
/// plain string so callers see the server's own message.
fn extract_detail(body: &[u8]) -> Option<String> {
    let json: Value = serde_json::from_slice(body).ok()?;
    let detail = json.get("detail")?.as_str()?.trim();
    if detail.is_empty() {
        None
    } else {
        Some(detail.to_string())
    }
}

fn error_for_status(status: u16, body: &[u8]) -> ApiError {
    let detail = extract_detail(body);
    match status {
        401 | 403 => ApiError::Auth {
            status,
            message: detail.unwrap_or_else(|| "authentication required".to_string()),
        },
        400..=499 => ApiError::Validation {
            status,
            message: detail.unwrap_or_else(|| format!("request rejected (status {status})")),
        },
        _ => ApiError::Server {
            status,
            message: detail.unwrap_or_else(|| format!("server error (status {status})")),
        },
    }
}

enum RefreshOutcome {
    /// A fresh access token is available, either from our own refresh call
    /// or from one that completed while we waited on the gate.
    Rotated(String),
    MissingRefreshToken,
    Failed(ApiError),
}

/// HTTP client core.
///
/// Attaches the stored bearer token to outgoing requests and recovers from
/// a 401 exactly once per original request: refresh the pair, resend with
/// the new access token, and return the resend's outcome as-is. All other
/// failures propagate unchanged. Token-refresh logic lives only here;
/// resource services never see 401 handling.
pub struct ApiClient<T, S> {
    transport: T,
    tokens: S,
    config: ApiConfig,
    /// Serializes refresh calls so concurrent 401s trigger one exchange.
    refresh_gate: Mutex<()>,
    invalid_tx: watch::Sender<bool>,
}

impl<T: HttpTransport, S: TokenStore> ApiClient<T, S> {
    pub fn new(config: ApiConfig, transport: T, tokens: S) -> Self {
        let (invalid_tx, _) = watch::channel(false);
        Self {
            transport,
            tokens,
            config,
            refresh_gate: Mutex::new(()),
            invalid_tx,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    /// Observe the session-invalid flag. It flips to `true` when a token
    /// refresh fails and the stored pair is cleared; the owner decides how
    /// to route the user back to login.
    pub fn session_invalid(&self) -> watch::Receiver<bool> {
        self.invalid_tx.subscribe()
    }

    fn mark_session_invalid(&self) {
        self.invalid_tx.send_replace(true);
    }

    pub(crate) fn mark_session_valid(&self) {
        self.invalid_tx.send_replace(false);
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::GET, path, RequestBody::Empty).await
    }

    pub async fn post(&self, path: &str, body: RequestBody) -> Result<Value, ApiError> {
        self.request(Method::POST, path, body).await
    }

    pub async fn put(&self, path: &str, body: RequestBody) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, RequestBody::Empty).await
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<Value, ApiError> {
        let mut request = ApiRequest {
            method,
            url: self.config.endpoint(path),
            bearer: self.tokens.access_token().await,
            body,
        };

        // At most one refresh-and-resend per original request; the flag is
        // local to this call, never shared request state.
        let mut already_retried = false;
        loop {
            let response = match self.transport.execute(&request).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(path, "request failed: {}", redact_credentials(&err.to_string()));
                    return Err(err);
                }
            };

            if response.status == 401 && !already_retried {
                already_retried = true;
                match self.refresh_access(request.bearer.as_deref()).await {
                    RefreshOutcome::Rotated(access_token) => {
                        debug!(path, "retrying with refreshed access token");
                        request.bearer = Some(access_token);
                        continue;
                    }
                    RefreshOutcome::MissingRefreshToken => {
                        return Err(self.fail(path, response));
                    }
                    RefreshOutcome::Failed(err) => {
                        warn!(path, "token refresh failed: {}", redact_credentials(&err.to_string()));
                        return Err(err);
                    }
                }
            }

            return self.finish(path, response);
        }
    }

    fn finish(&self, path: &str, response: ApiResponse) -> Result<Value, ApiError> {
        if !response.is_success() {
            return Err(self.fail(path, response));
        }
        if response.body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    fn fail(&self, path: &str, response: ApiResponse) -> ApiError {
        let err = error_for_status(response.status, &response.body);
        warn!(
            path,
            status = response.status,
            "request failed: {}",
            redact_credentials(&err.to_string())
        );
        err
    }

    /// Exchange the stored refresh token for a new pair, at most one
    /// exchange in flight per client. A task that waited on the gate while
    /// another finished rotating reuses the fresh token instead of issuing
    /// a duplicate refresh call.
    async fn refresh_access(&self, stale_bearer: Option<&str>) -> RefreshOutcome {
        let _gate = self.refresh_gate.lock().await;

        let Some(pair) = self.tokens.pair().await else {
            self.tokens.clear().await;
            return RefreshOutcome::MissingRefreshToken;
        };

        if stale_bearer.is_some() && stale_bearer != Some(pair.access_token.as_str()) {
            return RefreshOutcome::Rotated(pair.access_token);
        }

        match self.exchange_refresh_token(&pair.refresh_token).await {
            Ok(new_pair) => {
                let access_token = new_pair.access_token.clone();
                self.tokens.store(new_pair).await;
                RefreshOutcome::Rotated(access_token)
            }
            Err(err) => {
                self.tokens.clear().await;
                self.mark_session_invalid();
                RefreshOutcome::Failed(err)
            }
        }
    }

    /// Dedicated refresh call: goes straight to the transport so it never
    /// re-enters the 401 handling above, and carries no bearer header.
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let request = ApiRequest {
            method: Method::POST,
            url: self.config.endpoint(REFRESH_PATH),
            bearer: None,
            body: RequestBody::Json(serde_json::json!({ "refresh_token": refresh_token })),
        };
        let response = self.transport.execute(&request).await?;
        if !response.is_success() {
            return Err(error_for_status(response.status, &response.body));
        }
        Ok(serde_json::from_slice(&response.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{detail_response, empty_response, json_response, pair, ScriptedTransport};
    use crate::tokens::MemoryTokenStore;

    fn client(
        transport: ScriptedTransport,
        tokens: MemoryTokenStore,
    ) -> ApiClient<ScriptedTransport, MemoryTokenStore> {
        ApiClient::new(ApiConfig::new("http://api.test"), transport, tokens)
    }

    #[tokio::test]
    async fn attaches_bearer_when_access_token_present() {
        let transport = ScriptedTransport::new(vec![json_response(200, serde_json::json!([]))]);
        let api = client(transport.clone(), MemoryTokenStore::with_pair(pair("A1", "R1")));

        api.get("/agents").await.unwrap();

        let seen = transport.seen().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].bearer.as_deref(), Some("A1"));
        assert_eq!(seen[0].url, "http://api.test/agents");
    }

    #[tokio::test]
    async fn sends_no_bearer_when_store_empty() {
        let transport = ScriptedTransport::new(vec![json_response(200, serde_json::json!([]))]);
        let api = client(transport.clone(), MemoryTokenStore::new());

        api.get("/agents").await.unwrap();

        assert_eq!(transport.seen().await[0].bearer, None);
    }

    #[tokio::test]
    async fn refreshes_once_and_resends_with_new_token() {
        let transport = ScriptedTransport::new(vec![
            empty_response(401),
            json_response(
                200,
                serde_json::json!({"access_token": "A2", "refresh_token": "R2", "token_type": "bearer"}),
            ),
            json_response(200, serde_json::json!({"ok": true})),
        ]);
        let tokens = MemoryTokenStore::with_pair(pair("A1", "R1"));
        let api = client(transport.clone(), tokens);

        let value = api.get("/agents").await.unwrap();
        assert_eq!(value, serde_json::json!({"ok": true}));

        let seen = transport.seen().await;
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].bearer.as_deref(), Some("A1"));
        assert_eq!(seen[1].url, "http://api.test/auth/refresh");
        assert_eq!(seen[1].bearer, None);
        assert_eq!(seen[2].bearer.as_deref(), Some("A2"));

        let stored = api.tokens().pair().await.unwrap();
        assert_eq!(stored, pair("A2", "R2"));
    }

    #[tokio::test]
    async fn resend_is_never_retried_even_if_it_fails_again() {
        let transport = ScriptedTransport::new(vec![
            empty_response(401),
            json_response(
                200,
                serde_json::json!({"access_token": "A2", "refresh_token": "R2"}),
            ),
            detail_response(401, "still unauthorized"),
        ]);
        let api = client(transport.clone(), MemoryTokenStore::with_pair(pair("A1", "R1")));

        let err = api.get("/agents").await.unwrap_err();
        assert!(err.is_auth());
        // Original, refresh, resend. No second refresh, no third attempt.
        assert_eq!(transport.seen().await.len(), 3);
    }

    #[tokio::test]
    async fn failed_refresh_clears_store_and_surfaces_error() {
        let transport = ScriptedTransport::new(vec![
            empty_response(401),
            detail_response(401, "Could not validate credentials"),
        ]);
        let api = client(transport.clone(), MemoryTokenStore::with_pair(pair("A1", "R1")));
        let invalid = api.session_invalid();

        let err = api.get("/agents").await.unwrap_err();
        assert_eq!(err.detail(), Some("Could not validate credentials"));
        assert!(api.tokens().pair().await.is_none());
        assert!(*invalid.borrow());
        // No resend after a failed refresh.
        assert_eq!(transport.seen().await.len(), 2);
    }

    #[tokio::test]
    async fn empty_store_401_fails_without_refresh_attempt() {
        let transport = ScriptedTransport::new(vec![empty_response(401)]);
        let api = client(transport.clone(), MemoryTokenStore::new());

        let err = api.get("/agents").await.unwrap_err();
        assert!(err.is_auth());
        assert_eq!(transport.seen().await.len(), 1);
    }

    #[tokio::test]
    async fn waiting_request_reuses_concurrently_rotated_pair() {
        // The transport would panic if a refresh call were issued; the
        // stale bearer differs from the stored pair, so the gate re-read
        // must hand back the rotated token without touching the wire.
        let transport = ScriptedTransport::new(vec![]);
        let api = client(transport.clone(), MemoryTokenStore::with_pair(pair("A2", "R2")));

        match api.refresh_access(Some("A1")).await {
            RefreshOutcome::Rotated(token) => assert_eq!(token, "A2"),
            _ => panic!("expected rotated token"),
        }
        assert!(transport.seen().await.is_empty());
    }

    #[tokio::test]
    async fn maps_status_taxonomy() {
        let transport = ScriptedTransport::new(vec![
            detail_response(404, "Agent with ID 9 not found"),
            empty_response(500),
        ]);
        let api = client(transport, MemoryTokenStore::new());

        let err = api.get("/agents/9").await.unwrap_err();
        match err {
            ApiError::Validation { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Agent with ID 9 not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = api.get("/agents").await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn empty_success_body_parses_as_null() {
        let transport = ScriptedTransport::new(vec![empty_response(204)]);
        let api = client(transport, MemoryTokenStore::new());

        assert_eq!(api.delete("/agents/3").await.unwrap(), Value::Null);
    }

    #[test]
    fn extract_detail_ignores_non_string_payloads() {
        assert_eq!(
            extract_detail(br#"{"detail": "nope"}"#).as_deref(),
            Some("nope")
        );
        assert_eq!(extract_detail(br#"{"detail": [{"loc": []}]}"#), None);
        assert_eq!(extract_detail(b"not json"), None);
    }
}
