use crate::client::{ApiClient, HttpTransport};
use crate::error::ApiError;
use crate::tokens::TokenStore;
use crate::types::{NewUser, User};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Authentication component of the session state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    Uninitialized,
    Loading,
    Authenticated(User),
    Anonymous,
}

/// Snapshot of the session: phase plus an independent error message that
/// survives until [`Session::clear_error`] or the next transition sets it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match &self.phase {
            SessionPhase::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }
}

/// Owns the logged-in state for one running client.
///
/// Created once at startup, reset on logout. All transitions happen here;
/// views and the CLI only read snapshots. Bootstrap/login/register are
/// mutually exclusive by convention - concurrent invocations are caller
/// misuse and the last transition wins.
pub struct Session<T, S> {
    client: Arc<ApiClient<T, S>>,
    state: Mutex<SessionState>,
}

impl<T: HttpTransport, S: TokenStore> Session<T, S> {
    pub fn new(client: Arc<ApiClient<T, S>>) -> Self {
        Self {
            client,
            state: Mutex::new(SessionState {
                phase: SessionPhase::Uninitialized,
                last_error: None,
            }),
        }
    }

    pub fn client(&self) -> &ApiClient<T, S> {
        &self.client
    }

    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.lock().await.user().cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(self.state.lock().await.phase, SessionPhase::Authenticated(_))
    }

    async fn transition(&self, phase: SessionPhase, last_error: Option<String>) {
        let mut guard = self.state.lock().await;
        guard.phase = phase;
        guard.last_error = last_error;
    }

    /// Decide whether a session exists. With no stored access token the
    /// answer is immediately anonymous - no network call. With one, fetch
    /// the profile; an unreadable profile means an invalid or expired
    /// session, not a fatal error, so the failure surfaces only as a
    /// diagnostic message on an anonymous session.
    pub async fn bootstrap(&self) {
        if self.client.tokens().pair().await.is_none() {
            self.transition(SessionPhase::Anonymous, None).await;
            return;
        }

        self.transition(SessionPhase::Loading, None).await;
        match self.client.auth().me().await {
            Ok(user) => {
                debug!(username = %user.username, "session restored");
                self.transition(SessionPhase::Authenticated(user), None).await;
            }
            Err(err) => {
                warn!("stored session is not usable: {err}");
                self.transition(
                    SessionPhase::Anonymous,
                    Some("Failed to load user data".to_string()),
                )
                .await;
            }
        }
    }

    /// Exchange credentials for a token pair, persist it, then fetch the
    /// profile. Any failure leaves the session anonymous with an error
    /// message attached and is re-raised so the caller can react.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        self.transition(SessionPhase::Loading, None).await;

        let result = async {
            let pair = self.client.auth().login(username, password).await?;
            self.client.tokens().store(pair).await;
            self.client.auth().me().await
        }
        .await;

        match result {
            Ok(user) => {
                self.client.mark_session_valid();
                self.transition(SessionPhase::Authenticated(user.clone()), None)
                    .await;
                Ok(user)
            }
            Err(err) => {
                let message = err
                    .detail()
                    .unwrap_or("Login failed")
                    .to_string();
                self.transition(SessionPhase::Anonymous, Some(message)).await;
                Err(err)
            }
        }
    }

    /// Registration does not authenticate by itself; a successful register
    /// chains straight into [`Session::login`] with the same credentials,
    /// and the overall result fails if either leg fails.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<User, ApiError> {
        self.transition(SessionPhase::Loading, None).await;

        let user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.map(str::to_string),
        };
        if let Err(err) = self.client.auth().register(&user).await {
            let message = err
                .detail()
                .unwrap_or("Registration failed")
                .to_string();
            self.transition(SessionPhase::Anonymous, Some(message)).await;
            return Err(err);
        }

        self.login(username, password).await
    }

    /// Clear the token store and reset the session. No backend call is
    /// involved; logout cannot fail.
    pub async fn logout(&self) {
        self.client.tokens().clear().await;
        self.transition(SessionPhase::Anonymous, None).await;
    }

    pub async fn clear_error(&self) {
        self.state.lock().await.last_error = None;
    }
}
