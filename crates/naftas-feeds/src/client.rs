//! Shared `reqwest` client construction and response checks.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::FeedError;

/// Builds the HTTP client every upstream call goes through.
///
/// # Errors
///
/// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
/// cannot be constructed (e.g., invalid TLS config).
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, FeedError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Rejects any non-2xx response with [`FeedError::UnexpectedStatus`].
pub(crate) fn ensure_success(response: Response) -> Result<Response, FeedError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(FeedError::UnexpectedStatus {
        status: status.as_u16(),
        url: response.url().to_string(),
    })
}

/// Reads the body as text and parses it as JSON, naming `context` on failure.
pub(crate) async fn read_json<T>(response: Response, context: &str) -> Result<T, FeedError>
where
    T: serde::de::DeserializeOwned,
{
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| FeedError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}
