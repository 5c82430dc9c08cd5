use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{ApiClient, ApiError, GITHUB_JSON_MEDIA_TYPE};
use crate::config::Credentials;

const USER_AGENT: &str = concat!("contrib-report/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// reqwest-backed GitHub client. One instance per run; all settings,
/// including TLS verification, are scoped to this instance.
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpClient {
    pub fn new(credentials: &Credentials) -> Result<Self, ApiError> {
        if !credentials.verify_tls {
            warn!(
                base_url = %credentials.base_url,
                "TLS certificate verification disabled for this client"
            );
        }

        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!credentials.verify_tls)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            inner,
            base_url: credentials.base_url.clone(),
            token: credentials.token.clone(),
        })
    }
}

#[async_trait]
impl ApiClient for HttpClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self))]
    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let response = self
            .inner
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_JSON_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), body_bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                message: error_message(&body, status),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Pull the `message` field out of a GitHub error body, falling back to the
/// status' canonical reason.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}
