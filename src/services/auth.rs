use super::decode;
use crate::client::{ApiClient, HttpTransport, RequestBody};
use crate::error::ApiError;
use crate::tokens::{TokenPair, TokenStore};
use crate::types::{NewUser, User};

/// Account endpoints. Token persistence and session transitions belong to
/// [`crate::session::Session`]; this type only shapes the requests.
pub struct AuthApi<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T: HttpTransport, S: TokenStore> AuthApi<'a, T, S> {
    pub(super) fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }

    pub async fn register(&self, user: &NewUser) -> Result<User, ApiError> {
        let body = RequestBody::Json(serde_json::to_value(user)?);
        decode(self.client.post("/auth/register", body).await?)
    }

    /// Exchange credentials for a token pair. The login endpoint follows
    /// the OAuth2 password grant and expects form-encoded fields.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let body = RequestBody::Form(vec![
            ("username", username.to_string()),
            ("password", password.to_string()),
        ]);
        decode(self.client.post("/auth/login", body).await?)
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        decode(self.client.get("/auth/me").await?)
    }
}
