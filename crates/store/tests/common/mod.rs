//! In-memory stand-in for the GitHub Contents API.
//!
//! Implements the same request/response contract the store speaks over the
//! wire: base64 payloads, version-token checks on mutation, JSON error
//! bodies with a `message` field.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use siteforge_store::{ApiRequest, ApiResponse, ApiTransport, Method, Result};

#[derive(Clone)]
struct StoredFile {
    content: Vec<u8>,
    sha: String,
    encoding: String,
}

#[derive(Default)]
struct RemoteState {
    files: BTreeMap<String, StoredFile>,
    writes: u64,
    force_status: Option<u16>,
}

#[derive(Default)]
pub struct FakeRemote {
    state: Mutex<RemoteState>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent request answer with `status` and an empty
    /// error body.
    pub fn force_status(&self, status: u16) {
        self.state.lock().unwrap().force_status = Some(status);
    }

    /// Override the stored encoding reported for `path` on reads.
    pub fn set_encoding(&self, path: &str, encoding: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(file) = state.files.get_mut(path) {
            file.encoding = encoding.to_string();
        }
    }

    pub fn current_sha(&self, path: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.files.get(path).map(|f| f.sha.clone())
    }

    fn token_for(content: &[u8], writes: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content);
        hasher.update(writes.to_be_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn not_found() -> ApiResponse {
        ApiResponse {
            status: 404,
            body: json!({ "message": "Not Found" }),
        }
    }

    fn handle_get(&self, path: &str) -> ApiResponse {
        let state = self.state.lock().unwrap();

        if let Some(file) = state.files.get(path) {
            // GitHub line-wraps the base64 payload at 60 columns.
            let encoded = BASE64.encode(&file.content);
            let wrapped = encoded
                .as_bytes()
                .chunks(60)
                .map(|chunk| std::str::from_utf8(chunk).unwrap())
                .collect::<Vec<_>>()
                .join("\n");

            let name = path.rsplit('/').next().unwrap_or(path);
            return ApiResponse {
                status: 200,
                body: json!({
                    "name": name,
                    "path": path,
                    "sha": file.sha,
                    "size": file.content.len(),
                    "type": "file",
                    "encoding": file.encoding,
                    "content": wrapped,
                }),
            };
        }

        // Directory listing: direct children of `path`.
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let mut rows = Vec::new();
        let mut seen_dirs = BTreeSet::new();
        for (stored_path, file) in &state.files {
            let Some(rest) = stored_path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                None => rows.push(json!({
                    "name": rest,
                    "path": stored_path,
                    "sha": file.sha,
                    "size": file.content.len(),
                    "type": "file",
                })),
                Some((dir_name, _)) => {
                    if seen_dirs.insert(dir_name.to_string()) {
                        rows.push(json!({
                            "name": dir_name,
                            "path": format!("{}{}", prefix, dir_name),
                            "sha": Self::token_for(dir_name.as_bytes(), 0),
                            "size": 0,
                            "type": "dir",
                        }));
                    }
                }
            }
        }

        if rows.is_empty() {
            return Self::not_found();
        }

        ApiResponse {
            status: 200,
            body: Value::Array(rows),
        }
    }

    fn handle_put(&self, path: &str, body: &Value) -> ApiResponse {
        let mut state = self.state.lock().unwrap();

        let Some(encoded) = body.get("content").and_then(|v| v.as_str()) else {
            return ApiResponse {
                status: 422,
                body: json!({ "message": "Invalid request.\n\n\"content\" wasn't supplied." }),
            };
        };
        let Ok(content) = BASE64.decode(encoded.as_bytes()) else {
            return ApiResponse {
                status: 422,
                body: json!({ "message": "content is not valid Base64" }),
            };
        };
        let supplied_sha = body.get("sha").and_then(|v| v.as_str());

        if let Some(existing) = state.files.get(path) {
            match supplied_sha {
                None => {
                    return ApiResponse {
                        status: 422,
                        body: json!({ "message": "Invalid request.\n\n\"sha\" wasn't supplied." }),
                    };
                }
                Some(sha) if sha != existing.sha => {
                    return ApiResponse {
                        status: 409,
                        body: json!({ "message": format!("{} does not match {}", sha, existing.sha) }),
                    };
                }
                Some(_) => {}
            }
        }

        let created = !state.files.contains_key(path);
        state.writes += 1;
        let sha = Self::token_for(&content, state.writes);
        let commit = Self::token_for(path.as_bytes(), state.writes);
        state.files.insert(
            path.to_string(),
            StoredFile {
                content,
                sha: sha.clone(),
                encoding: "base64".to_string(),
            },
        );

        ApiResponse {
            status: if created { 201 } else { 200 },
            body: json!({
                "content": { "sha": sha, "path": path },
                "commit": { "sha": commit },
            }),
        }
    }

    fn handle_delete(&self, path: &str, body: &Value) -> ApiResponse {
        let mut state = self.state.lock().unwrap();

        let Some(existing) = state.files.get(path) else {
            return Self::not_found();
        };
        let supplied_sha = body.get("sha").and_then(|v| v.as_str());
        match supplied_sha {
            None => {
                return ApiResponse {
                    status: 422,
                    body: json!({ "message": "Invalid request.\n\n\"sha\" wasn't supplied." }),
                };
            }
            Some(sha) if sha != existing.sha => {
                return ApiResponse {
                    status: 409,
                    body: json!({ "message": format!("{} does not match {}", sha, existing.sha) }),
                };
            }
            Some(_) => {}
        }

        state.files.remove(path);
        state.writes += 1;
        let commit = Self::token_for(path.as_bytes(), state.writes);

        ApiResponse {
            status: 200,
            body: json!({
                "content": Value::Null,
                "commit": { "sha": commit },
            }),
        }
    }
}

#[async_trait]
impl ApiTransport for FakeRemote {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        if let Some(status) = self.state.lock().unwrap().force_status {
            return Ok(ApiResponse {
                status,
                body: json!({ "message": "forced by test" }),
            });
        }

        let empty = Value::Null;
        let body = request.body.as_ref().unwrap_or(&empty);
        Ok(match request.method {
            Method::Get => self.handle_get(&request.path),
            Method::Put => self.handle_put(&request.path, body),
            Method::Delete => self.handle_delete(&request.path, body),
        })
    }
}
