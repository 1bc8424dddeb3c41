//! Save orchestration: one editor request becomes one or two file commits.

use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::{ensure_file, FileBackend, WriteOutcome};
use crate::content::{Attachment, SavePayload};
use crate::error::StoreError;
use crate::sections;

/// Commit message for document writes.
const DOCUMENT_MESSAGE: &str = "Update site data via admin dashboard";

/// Sequences save and load operations against a remote file backend.
///
/// Stateless between calls: all state lives upstream, the store only orders
/// the writes within one invocation. Concurrent saves from different clients
/// are not serialized here; the backend's per-path revision token is the
/// only race detector.
pub struct ContentStore {
    backend: Arc<dyn FileBackend>,
    document_path: String,
    attachment_dir: String,
}

/// Per-file outcomes of a fully successful save, in write order.
#[derive(Debug)]
pub struct SaveReport {
    pub outcomes: Vec<WriteOutcome>,
}

impl SaveReport {
    pub fn notes(&self) -> Vec<String> {
        self.outcomes.iter().map(WriteOutcome::note).collect()
    }
}

/// A failed save.
///
/// Writes committed before the failure stay committed (there is no
/// cross-file transaction); they are listed so the caller can see the
/// partial result instead of assuming all-or-nothing.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct SaveError {
    pub completed: Vec<WriteOutcome>,
    #[source]
    pub source: StoreError,
}

impl SaveError {
    fn before_any_write(source: StoreError) -> Self {
        Self {
            completed: Vec::new(),
            source,
        }
    }
}

/// The document re-read from the backend.
#[derive(Debug)]
pub struct LoadedDocument {
    pub document: serde_json::Value,
    /// Revision token the content was read at.
    pub revision: String,
}

impl ContentStore {
    pub fn new(
        backend: Arc<dyn FileBackend>,
        document_path: impl Into<String>,
        attachment_dir: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            document_path: document_path.into(),
            attachment_dir: attachment_dir.into().trim_end_matches('/').to_string(),
        }
    }

    /// Save the document, then the attachment if one was supplied.
    ///
    /// Input validation happens up front, before any backend call. The
    /// document write always goes first; the first failing write aborts the
    /// rest. No rollback: an attachment failure leaves the document commit
    /// in place.
    pub async fn save(&self, payload: SavePayload) -> Result<SaveReport, SaveError> {
        let Some(document) = payload.document else {
            return Err(SaveError::before_any_write(StoreError::Validation(
                "missing required 'document' field".into(),
            )));
        };
        let attachment = match payload.attachment {
            Some(raw) => Some(raw.decode().map_err(SaveError::before_any_write)?),
            None => None,
        };

        for issue in sections::audit(&document) {
            warn!(section = %issue.section, "document shape: {}", issue.detail);
        }

        let bytes = serde_json::to_vec_pretty(&document)
            .map_err(|e| SaveError::before_any_write(StoreError::Internal(e.to_string())))?;

        let mut completed = Vec::new();

        match ensure_file(
            self.backend.as_ref(),
            &self.document_path,
            &bytes,
            DOCUMENT_MESSAGE,
        )
        .await
        {
            Ok(outcome) => {
                info!(path = %outcome.path, "document {}", outcome.action);
                completed.push(outcome);
            }
            Err(source) => return Err(SaveError { completed, source }),
        }

        if let Some(Attachment { filename, bytes }) = attachment {
            let path = format!("{}/{}", self.attachment_dir, filename);
            let message = format!("Update CV: {filename}");
            match ensure_file(self.backend.as_ref(), &path, &bytes, &message).await {
                Ok(outcome) => {
                    info!(path = %outcome.path, "attachment {}", outcome.action);
                    completed.push(outcome);
                }
                Err(source) => return Err(SaveError { completed, source }),
            }
        }

        Ok(SaveReport {
            outcomes: completed,
        })
    }

    /// Fetch and parse the committed document. `None` before the first save.
    pub async fn load(&self) -> Result<Option<LoadedDocument>, StoreError> {
        let Some(file) = self.backend.get_file(&self.document_path).await? else {
            return Ok(None);
        };
        let document = serde_json::from_slice(&file.content).map_err(|e| {
            StoreError::Internal(format!("committed document is not valid JSON: {e}"))
        })?;
        Ok(Some(LoadedDocument {
            document,
            revision: file.sha,
        }))
    }

    pub fn document_path(&self) -> &str {
        &self.document_path
    }
}
