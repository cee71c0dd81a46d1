use super::decode;
use crate::client::{ApiClient, HttpTransport, RequestBody};
use crate::error::ApiError;
use crate::tokens::TokenStore;
use crate::types::{InstallOutcome, Listing, ListingPatch, NewListing};

/// Marketplace listing CRUD plus install-as-agent.
pub struct MarketplaceApi<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T: HttpTransport, S: TokenStore> MarketplaceApi<'a, T, S> {
    pub(super) fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }

    pub async fn listings(&self) -> Result<Vec<Listing>, ApiError> {
        decode(self.client.get("/marketplace/listings").await?)
    }

    pub async fn listing(&self, id: i64) -> Result<Listing, ApiError> {
        decode(self.client.get(&format!("/marketplace/listings/{id}")).await?)
    }

    pub async fn create(&self, listing: &NewListing) -> Result<Listing, ApiError> {
        let body = RequestBody::Json(serde_json::to_value(listing)?);
        decode(self.client.post("/marketplace/listings", body).await?)
    }

    pub async fn update(&self, id: i64, patch: &ListingPatch) -> Result<Listing, ApiError> {
        let body = RequestBody::Json(serde_json::to_value(patch)?);
        decode(
            self.client
                .put(&format!("/marketplace/listings/{id}"), body)
                .await?,
        )
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/marketplace/listings/{id}"))
            .await?;
        Ok(())
    }

    /// Install a published listing as an agent owned by the caller.
    pub async fn install(&self, id: i64) -> Result<InstallOutcome, ApiError> {
        decode(
            self.client
                .post(
                    &format!("/marketplace/listings/{id}/install"),
                    RequestBody::Empty,
                )
                .await?,
        )
    }
}
