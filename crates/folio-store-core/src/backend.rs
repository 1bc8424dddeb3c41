//! Backend abstraction: a remote version-controlled file host addressed by
//! path, plus the create-or-update primitive built on top of it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::StoreError;

/// A file as currently committed on the backend.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    /// Revision token of the committed content.
    pub sha: String,
    /// Decoded content bytes.
    pub content: Vec<u8>,
}

/// The revision produced by a successful write.
#[derive(Debug, Clone)]
pub struct FileRevision {
    /// Revision token of the new content.
    pub sha: String,
    /// Commit that introduced it.
    pub commit: String,
    /// Commit timestamp, when the backend reports one.
    pub committed_at: Option<DateTime<Utc>>,
}

/// Remote file host exposing get-by-path and put-by-path.
///
/// An update to an existing path must carry the revision token observed
/// immediately before the write; the backend rejects stale tokens, which is
/// the only concurrency control in this design.
#[async_trait]
pub trait FileBackend: Send + Sync {
    /// Fetch the current revision of `path`. `None` when the path has never
    /// been created.
    async fn get_file(&self, path: &str) -> Result<Option<RemoteFile>, StoreError>;

    /// Commit `content` to `path`. `prior` is the token of the content being
    /// replaced; omitted when creating the path.
    async fn put_file(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        prior: Option<&str>,
    ) -> Result<FileRevision, StoreError>;
}

/// What a write did to its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Created,
    Updated,
}

impl std::fmt::Display for WriteAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteAction::Created => f.write_str("created"),
            WriteAction::Updated => f.write_str("updated"),
        }
    }
}

/// Outcome of one successful file write.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub path: String,
    pub action: WriteAction,
    pub revision: FileRevision,
}

impl WriteOutcome {
    /// Short human note, e.g. `siteData.json updated`.
    pub fn note(&self) -> String {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        format!("{} {}", name, self.action)
    }
}

/// Ensure `path` contains `content`, creating or updating as needed.
///
/// Reads the current revision token first; a path that does not exist yet
/// degrades to a create rather than an error. The write carries the observed
/// token, so a concurrent change surfaces as a write rejection instead of
/// being overwritten. Exactly one commit per successful call, attributed to
/// `message`. Nothing is retried.
pub async fn ensure_file(
    backend: &dyn FileBackend,
    path: &str,
    content: &[u8],
    message: &str,
) -> Result<WriteOutcome, StoreError> {
    let prior = backend.get_file(path).await?.map(|file| file.sha);
    let action = match prior {
        Some(_) => WriteAction::Updated,
        None => {
            debug!(path, "not found upstream, creating");
            WriteAction::Created
        }
    };

    let revision = backend
        .put_file(path, content, message, prior.as_deref())
        .await?;
    debug!(path, commit = %revision.commit, "file {action}");

    Ok(WriteOutcome {
        path: path.to_string(),
        action,
        revision,
    })
}
