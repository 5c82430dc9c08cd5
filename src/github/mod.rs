pub mod client;
#[cfg(test)]
pub mod fake;
pub mod types;

pub use client::HttpClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Media type GitHub uses for its structured JSON responses.
pub const GITHUB_JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Public github.com API root. Enterprise instances use `{host}/api/v3`.
pub const PUBLIC_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GitHub API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Unexpected response shape from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
}

/// A single-attempt, authenticated GET against the GitHub REST API.
///
/// Implementations never panic on a bad response; every failure is returned
/// as an [`ApiError`]. `url` is always absolute by the time it reaches
/// `get_json` (see [`fetch`]).
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// API root every relative route is joined onto.
    fn base_url(&self) -> &str;

    async fn get_json(&self, url: &str) -> Result<Value, ApiError>;
}

/// Join `route` onto the client's API root unless it is already an absolute
/// URL (GitHub hands out absolute locators such as `commits_url`).
pub fn resolve_url(base_url: &str, route: &str) -> String {
    if route.starts_with("https://") || route.starts_with("http://") {
        return route.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        route.trim_start_matches('/')
    )
}

/// GET `route` and decode the body into `T`.
///
/// A body that is valid JSON but does not match `T` is reported as
/// [`ApiError::MalformedResponse`].
pub async fn fetch<T: DeserializeOwned>(
    client: &dyn ApiClient,
    route: &str,
) -> Result<T, ApiError> {
    let url = resolve_url(client.base_url(), route);
    let value = client.get_json(&url).await?;
    serde_json::from_value(value).map_err(|e| ApiError::MalformedResponse {
        url,
        reason: e.to_string(),
    })
}
