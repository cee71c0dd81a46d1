//! Typed facades over the HTTP client core.
//!
//! Pure request shaping: no caching, no validation, no status-code
//! interpretation. Errors pass through unchanged for the caller to
//! present.

mod agents;
mod auth;
mod marketplace;

pub use agents::AgentsApi;
pub use auth::AuthApi;
pub use marketplace::MarketplaceApi;

use crate::client::{ApiClient, HttpTransport};
use crate::error::ApiError;
use crate::tokens::TokenStore;
use serde::de::DeserializeOwned;

fn decode<D: DeserializeOwned>(value: serde_json::Value) -> Result<D, ApiError> {
    Ok(serde_json::from_value(value)?)
}

impl<T: HttpTransport, S: TokenStore> ApiClient<T, S> {
    pub fn auth(&self) -> AuthApi<'_, T, S> {
        AuthApi::new(self)
    }

    pub fn agents(&self) -> AgentsApi<'_, T, S> {
        AgentsApi::new(self)
    }

    pub fn marketplace(&self) -> MarketplaceApi<'_, T, S> {
        MarketplaceApi::new(self)
    }
}
