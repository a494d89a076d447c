//! Pass-through client for the price-increase prediction endpoint.

use reqwest::Client;

use crate::client::{ensure_success, read_json};
use crate::error::FeedError;

#[derive(Debug, Clone)]
pub struct IncreasesClient {
    client: Client,
    url: String,
}

impl IncreasesClient {
    #[must_use]
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_owned(),
        }
    }

    /// Returns the endpoint's JSON untouched.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] on network failure, non-2xx status, or a body
    /// that is not JSON.
    pub async fn fetch(&self) -> Result<serde_json::Value, FeedError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let response = ensure_success(response)?;
        read_json(response, "increases").await
    }
}
