//! GitHub Contents API client.
//!
//! One GET and one PUT per file write: the GET captures the current blob
//! SHA (the revision token), the PUT replaces the content and must echo
//! that SHA whenever the path already exists. A stale SHA makes GitHub
//! reject the PUT, which is surfaced as a write error, never retried.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use folio_store_core::{FileBackend, FileRevision, RemoteFile, StoreError};

use crate::config::GitHubConfig;

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

/// File backend committing to a GitHub repository over its REST API.
pub struct GitHubBackend {
    http: Client,
    config: GitHubConfig,
}

/// GET /contents response, file variant.
#[derive(serde::Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

/// PUT /contents request body. `sha` is present iff the path already
/// existed and we observed its revision.
#[derive(serde::Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(serde::Deserialize)]
struct PutResponse {
    content: PutContent,
    commit: PutCommit,
}

#[derive(serde::Deserialize)]
struct PutContent {
    sha: String,
}

#[derive(serde::Deserialize)]
struct PutCommit {
    sha: String,
    #[serde(default)]
    committer: Option<PutCommitter>,
}

#[derive(serde::Deserialize)]
struct PutCommitter {
    #[serde(default)]
    date: Option<String>,
}

impl GitHubBackend {
    pub fn new(config: GitHubConfig) -> Result<Self, StoreError> {
        let http = Client::builder()
            .user_agent(concat!("folio-store/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| StoreError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Contents URL for a repository path. Segments are escaped
    /// individually so the `/` separators survive.
    fn contents_url(&self, path: &str) -> String {
        let escaped = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            escaped
        )
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, path: &str) -> Result<Option<RemoteFile>, StoreError> {
        let response = self
            .http
            .get(self.contents_url(path))
            .bearer_auth(&self.config.token)
            .header(reqwest::header::ACCEPT, ACCEPT_GITHUB_JSON)
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await
            .map_err(|e| StoreError::BackendRead {
                path: path.to_string(),
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(path, "not found upstream");
            return Ok(None);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StoreError::BackendRead {
                path: path.to_string(),
                status: Some(status.as_u16()),
                detail,
            });
        }

        let body: ContentsResponse =
            response.json().await.map_err(|e| StoreError::BackendRead {
                path: path.to_string(),
                status: None,
                detail: format!("unexpected response shape: {e}"),
            })?;
        let content = decode_content(path, body.content.as_deref(), body.encoding.as_deref())?;
        debug!(path, sha = %body.sha, bytes = content.len(), "fetched");
        Ok(Some(RemoteFile {
            sha: body.sha,
            content,
        }))
    }

    #[instrument(skip(self, content), level = "debug", fields(content_len = content.len()))]
    async fn commit(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        prior: Option<&str>,
    ) -> Result<FileRevision, StoreError> {
        let body = PutRequest {
            message,
            content: BASE64.encode(content),
            branch: &self.config.branch,
            sha: prior,
        };

        let response = self
            .http
            .put(self.contents_url(path))
            .bearer_auth(&self.config.token)
            .header(reqwest::header::ACCEPT, ACCEPT_GITHUB_JSON)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::BackendWrite {
                path: path.to_string(),
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StoreError::BackendWrite {
                path: path.to_string(),
                status: Some(status.as_u16()),
                detail,
            });
        }

        let body: PutResponse =
            response.json().await.map_err(|e| StoreError::BackendWrite {
                path: path.to_string(),
                status: None,
                detail: format!("unexpected response shape: {e}"),
            })?;
        let committed_at = body
            .commit
            .committer
            .and_then(|c| c.date)
            .and_then(|date| DateTime::parse_from_rfc3339(&date).ok())
            .map(|date| date.with_timezone(&Utc));
        debug!(path, commit = %body.commit.sha, "committed");
        Ok(FileRevision {
            sha: body.content.sha,
            commit: body.commit.sha,
            committed_at,
        })
    }
}

/// Decode the base64 content GitHub returns (it embeds newlines every 60
/// characters).
fn decode_content(
    path: &str,
    content: Option<&str>,
    encoding: Option<&str>,
) -> Result<Vec<u8>, StoreError> {
    let Some(content) = content else {
        return Ok(Vec::new());
    };
    match encoding {
        Some("base64") | None => {
            let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
            BASE64
                .decode(compact.as_bytes())
                .map_err(|e| StoreError::BackendRead {
                    path: path.to_string(),
                    status: None,
                    detail: format!("content is not valid base64: {e}"),
                })
        }
        Some(other) => Err(StoreError::BackendRead {
            path: path.to_string(),
            status: None,
            detail: format!("unsupported content encoding {other:?}"),
        }),
    }
}

#[async_trait]
impl FileBackend for GitHubBackend {
    async fn get_file(&self, path: &str) -> Result<Option<RemoteFile>, StoreError> {
        self.fetch(path).await
    }

    async fn put_file(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        prior: Option<&str>,
    ) -> Result<FileRevision, StoreError> {
        self.commit(path, content, message, prior).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> GitHubBackend {
        GitHubBackend::new(GitHubConfig::new("owner", "repo", "main", "token")).unwrap()
    }

    #[test]
    fn contents_url_escapes_segments_but_keeps_separators() {
        let url = backend().contents_url("assets/cv/My CV 2024.pdf");
        assert_eq!(
            url,
            "https://api.github.com/repos/owner/repo/contents/assets/cv/My%20CV%202024.pdf"
        );
    }

    #[test]
    fn decode_content_strips_embedded_newlines() {
        let decoded =
            decode_content("p", Some("aGVs\nbG8g\nd29ybGQ=\n"), Some("base64")).unwrap();
        assert_eq!(decoded, b"hello world");
    }

    #[test]
    fn decode_content_rejects_unknown_encodings() {
        let err = decode_content("p", Some("abc"), Some("none")).unwrap_err();
        assert!(matches!(err, StoreError::BackendRead { .. }));
    }

    #[test]
    fn put_request_omits_sha_on_create() {
        let with = serde_json::to_value(PutRequest {
            message: "m",
            content: "YQ==".into(),
            branch: "main",
            sha: Some("abc"),
        })
        .unwrap();
        let without = serde_json::to_value(PutRequest {
            message: "m",
            content: "YQ==".into(),
            branch: "main",
            sha: None,
        })
        .unwrap();
        assert_eq!(with["sha"], "abc");
        assert!(without.get("sha").is_none());
    }
}
