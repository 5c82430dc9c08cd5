//! In-memory [`ApiClient`] used by unit tests: canned JSON per URL, a 404 for
//! anything else.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{resolve_url, ApiClient, ApiError};

pub const FAKE_BASE_URL: &str = "https://api.test";

#[derive(Default)]
pub struct FakeApi {
    responses: HashMap<String, Value>,
    failures: HashMap<String, u16>,
    requests: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `route` (relative routes are joined onto the fake root).
    pub fn with(mut self, route: &str, body: Value) -> Self {
        self.responses.insert(resolve_url(FAKE_BASE_URL, route), body);
        self
    }

    /// Answer `route` with the given HTTP status.
    pub fn failing(mut self, route: &str, status: u16) -> Self {
        self.failures.insert(resolve_url(FAKE_BASE_URL, route), status);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn was_requested(&self, route: &str) -> bool {
        let url = resolve_url(FAKE_BASE_URL, route);
        self.requests().iter().any(|r| *r == url)
    }
}

#[async_trait]
impl ApiClient for FakeApi {
    fn base_url(&self) -> &str {
        FAKE_BASE_URL
    }

    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        self.requests.lock().unwrap().push(url.to_string());
        if let Some(status) = self.failures.get(url) {
            return Err(ApiError::Status {
                status: *status,
                url: url.to_string(),
                message: "Server Error".to_string(),
            });
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                url: url.to_string(),
                message: "Not Found".to_string(),
            })
    }
}
