//! Transport seam for the GitHub Contents API.
//!
//! The store issues requests through the [`ApiTransport`] trait so that the
//! protocol logic can be exercised against an in-memory remote in tests.
//! [`ReqwestTransport`] is the production implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, StoreError};

pub const USER_AGENT: &str = "siteforge-store/0.1.0";
pub const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single request against the Contents API.
///
/// `path` is relative to the repository root; the transport is responsible
/// for expanding it into the full `/repos/{owner}/{repo}/contents/{path}`
/// URL and attaching authentication headers.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::Get,
            path: path.to_string(),
            body: None,
        }
    }

    pub fn put(path: &str, body: serde_json::Value) -> Self {
        Self {
            method: Method::Put,
            path: path.to_string(),
            body: Some(body),
        }
    }

    pub fn delete(path: &str, body: serde_json::Value) -> Self {
        Self {
            method: Method::Delete,
            path: path.to_string(),
            body: Some(body),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes Contents API requests.
///
/// Implementations must not retry: every response, success or failure,
/// is returned to the store exactly once. Transport-level failures
/// (connect, timeout, malformed body) surface as `RemoteUnavailable`.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Production transport backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport for `owner/repo` with the given credential and
    /// per-request timeout.
    pub fn new(owner: &str, repo: &str, token: &str, timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let auth_value = format!("token {}", token);
        let auth_header = reqwest::header::HeaderValue::from_str(&auth_value)
            .map_err(|_| StoreError::Unauthorized("credential contains invalid bytes".into()))?;
        headers.insert(reqwest::header::AUTHORIZATION, auth_header);
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT_HEADER),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                StoreError::RemoteUnavailable(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: format!("https://api.github.com/repos/{}/{}/contents", owner, repo),
        })
    }

    fn url_for(&self, path: &str) -> String {
        let clean_path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, clean_path)
    }
}

#[async_trait]
impl ApiTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);
        debug!("{} {}", request.method, url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                StoreError::RemoteUnavailable(format!("request to {} timed out", url))
            } else {
                StoreError::RemoteUnavailable(format!("request to {} failed: {}", url, e))
            }
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            StoreError::RemoteUnavailable(format!("failed to read response from {}: {}", url, e))
        })?;

        // Error bodies are JSON too; an empty or non-JSON body becomes Null
        // and the store maps the status code on its own.
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_construction() {
        let transport = ReqwestTransport::new(
            "owner",
            "repo",
            "ghp_test",
            Duration::from_secs(30),
        )
        .unwrap();

        assert_eq!(
            transport.url_for("docs/a.txt"),
            "https://api.github.com/repos/owner/repo/contents/docs/a.txt"
        );
        assert_eq!(
            transport.url_for("/docs/a.txt"),
            "https://api.github.com/repos/owner/repo/contents/docs/a.txt"
        );
    }

    #[test]
    fn test_rejects_invalid_credential_bytes() {
        let result = ReqwestTransport::new("o", "r", "bad\ntoken", Duration::from_secs(1));
        assert!(matches!(result, Err(StoreError::Unauthorized(_))));
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Put.to_string(), "PUT");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
