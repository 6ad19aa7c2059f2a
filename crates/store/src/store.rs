//! Path-addressed file store over the GitHub Contents API.
//!
//! Every mutation of an existing path must present the version token (the
//! content sha) most recently observed for that path; the remote rejects
//! writes carrying a stale or absent token. Consistency is delegated
//! entirely to that check: the store holds no local state between calls
//! and never retries.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::http::{ApiRequest, ApiTransport, ReqwestTransport};
use crate::models::{
    render_text, Commit, ContentPayload, EntryType, FileRecord, RemoteEntry, RenderedFile,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Identity and credential for one remote repository.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub owner: String,
    pub repo: String,
    pub token: String,
    pub timeout: Duration,
}

impl StoreConfig {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for a single `owner/repo` remote.
pub struct ContentStore {
    owner: String,
    repo: String,
    transport: Arc<dyn ApiTransport>,
}

impl ContentStore {
    /// Create a store backed by the real GitHub API.
    ///
    /// Fails with `Unauthorized` if the credential is absent, before any
    /// request is built.
    pub fn new(config: StoreConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(StoreError::Unauthorized(
                "no GitHub token configured".into(),
            ));
        }

        let transport = ReqwestTransport::new(
            &config.owner,
            &config.repo,
            &config.token,
            config.timeout,
        )?;

        Ok(Self {
            owner: config.owner,
            repo: config.repo,
            transport: Arc::new(transport),
        })
    }

    /// Create a store over a custom transport.
    pub fn with_transport(
        owner: impl Into<String>,
        repo: impl Into<String>,
        transport: Arc<dyn ApiTransport>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            transport,
        }
    }

    pub fn repo_info(&self) -> (&str, &str) {
        (&self.owner, &self.repo)
    }

    /// Fetch the file at `path` and decode its content.
    pub async fn get(&self, path: &str) -> Result<FileRecord> {
        debug!("Fetching {} from {}/{}", path, self.owner, self.repo);

        let response = self.transport.execute(ApiRequest::get(path)).await?;
        if !response.is_success() {
            return Err(self.status_error(path, response.status, &response.body, false));
        }

        // The contents endpoint answers with an array when the path names a
        // directory; there is no file to return in that case.
        if response.body.is_array() {
            return Err(StoreError::NotFound(path.to_string()));
        }

        let encoding = str_field(&response.body, "encoding")?;
        if encoding != "base64" {
            return Err(StoreError::DecodeUnsupported {
                path: path.to_string(),
                encoding,
            });
        }

        let sha = str_field(&response.body, "sha")?;
        let size = response
            .body
            .get("size")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let wrapped = str_field(&response.body, "content")?;

        // GitHub line-wraps the base64 payload.
        let compact: String = wrapped.chars().filter(|c| !c.is_whitespace()).collect();
        let content = BASE64.decode(compact.as_bytes()).map_err(|e| {
            StoreError::RemoteUnavailable(format!(
                "invalid base64 content for '{}': {}",
                path, e
            ))
        })?;

        Ok(FileRecord {
            path: path.to_string(),
            content,
            sha,
            size,
        })
    }

    /// Fetch `path` as text prepared for display.
    ///
    /// JSON files are pretty-printed when they parse; everything else comes
    /// back as plain text.
    pub async fn get_rendered(&self, path: &str) -> Result<RenderedFile> {
        let record = self.get(path).await?;
        let text = String::from_utf8_lossy(&record.content).into_owned();
        Ok(render_text(path, text))
    }

    /// Create or update the file at `path`.
    ///
    /// `expected_sha` must be the current version token when `path` already
    /// exists, and `None` for first-time creation. An existing path written
    /// without a token, or with a stale one, fails with `VersionConflict`.
    pub async fn put(
        &self,
        path: &str,
        payload: &ContentPayload,
        message: &str,
        expected_sha: Option<&str>,
    ) -> Result<Commit> {
        debug!(
            "Writing {} to {}/{} ({} bytes, token: {})",
            path,
            self.owner,
            self.repo,
            payload.len(),
            expected_sha.unwrap_or("none")
        );

        let encoded = match payload {
            ContentPayload::Text(text) => BASE64.encode(text.as_bytes()),
            ContentPayload::Bytes(bytes) => BASE64.encode(bytes),
            ContentPayload::PreEncoded(encoded) => encoded.clone(),
        };

        let mut body = json!({
            "message": message,
            "content": encoded,
        });
        if let Some(sha) = expected_sha {
            body["sha"] = Value::String(sha.to_string());
        }

        let response = self.transport.execute(ApiRequest::put(path, body)).await?;
        if !response.is_success() {
            return Err(self.status_error(path, response.status, &response.body, true));
        }

        Ok(Commit {
            message: message.to_string(),
            sha: commit_sha(&response.body)?,
        })
    }

    /// Delete the file at `path`, which must currently carry `sha`.
    pub async fn delete(&self, path: &str, sha: &str, message: &str) -> Result<Commit> {
        debug!("Deleting {} from {}/{}", path, self.owner, self.repo);

        let body = json!({
            "message": message,
            "sha": sha,
        });

        let response = self
            .transport
            .execute(ApiRequest::delete(path, body))
            .await?;
        if !response.is_success() {
            return Err(self.status_error(path, response.status, &response.body, true));
        }

        Ok(Commit {
            message: message.to_string(),
            sha: commit_sha(&response.body)?,
        })
    }

    /// List the entries of the directory at `path`, sorted by name.
    pub async fn list(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        debug!("Listing {} in {}/{}", path, self.owner, self.repo);

        let response = self.transport.execute(ApiRequest::get(path)).await?;
        if !response.is_success() {
            return Err(self.status_error(path, response.status, &response.body, false));
        }

        let items = match &response.body {
            Value::Array(items) => items.as_slice(),
            // A file path answers with a single object.
            single => std::slice::from_ref(single),
        };

        let mut entries = Vec::new();
        for item in items {
            if let (Some(name), Some(item_path), Some(sha), Some(type_str)) = (
                item.get("name").and_then(|v| v.as_str()),
                item.get("path").and_then(|v| v.as_str()),
                item.get("sha").and_then(|v| v.as_str()),
                item.get("type").and_then(|v| v.as_str()),
            ) {
                entries.push(RemoteEntry {
                    name: name.to_string(),
                    path: item_path.to_string(),
                    entry_type: EntryType::from_str(type_str),
                    sha: sha.to_string(),
                    size: item.get("size").and_then(|v| v.as_u64()),
                });
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Re-read `path` for its current token, then overwrite it.
    ///
    /// The read and the write are two requests; a concurrent writer landing
    /// between them makes the write fail with `VersionConflict` instead of
    /// silently clobbering their change.
    pub async fn update_existing(
        &self,
        path: &str,
        payload: &ContentPayload,
        message: &str,
    ) -> Result<Commit> {
        let current = self.get(path).await?;
        self.put(path, payload, message, Some(&current.sha)).await
    }

    /// Re-read `path` for its current token, then delete it.
    ///
    /// Same two-request caveat as [`ContentStore::update_existing`].
    pub async fn delete_by_path(&self, path: &str, message: &str) -> Result<Commit> {
        let current = self.get(path).await?;
        self.delete(path, &current.sha, message).await
    }

    fn status_error(&self, path: &str, status: u16, body: &Value, mutating: bool) -> StoreError {
        let detail = body
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("no detail");

        match status {
            404 => StoreError::NotFound(path.to_string()),
            401 | 403 => StoreError::Unauthorized(format!(
                "GitHub rejected the credential for {}/{}: {} ({})",
                self.owner, self.repo, detail, status
            )),
            409 | 422 if mutating => StoreError::VersionConflict {
                path: path.to_string(),
                reason: detail.to_string(),
            },
            _ => StoreError::RemoteUnavailable(format!(
                "GitHub API request for '{}' failed with status {}: {} (repo: {}/{})",
                path, status, detail, self.owner, self.repo
            )),
        }
    }
}

fn str_field(body: &Value, name: &str) -> Result<String> {
    body.get(name)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            StoreError::RemoteUnavailable(format!(
                "field '{}' missing from GitHub API response",
                name
            ))
        })
}

fn commit_sha(body: &Value) -> Result<String> {
    body.get("commit")
        .and_then(|c| c.get("sha"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            StoreError::RemoteUnavailable(
                "commit sha missing from GitHub API response".to_string(),
            )
        })
}
