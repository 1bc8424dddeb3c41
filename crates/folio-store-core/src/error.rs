//! Error taxonomy for the content store.

use thiserror::Error;

/// Application-level errors.
///
/// Backend variants carry the failing path and the upstream HTTP status when
/// one exists; transport-level failures (connection refused, timeout) have
/// no status.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("authentication required")]
    Unauthorized,

    #[error("method not allowed, use POST")]
    MethodNotAllowed,

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("backend read failed for {path}: {detail}")]
    BackendRead {
        path: String,
        status: Option<u16>,
        detail: String,
    },

    #[error("backend write failed for {path}: {detail}")]
    BackendWrite {
        path: String,
        status: Option<u16>,
        detail: String,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether this is a write rejected over a stale revision token.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::BackendWrite {
                status: Some(409 | 422),
                ..
            }
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
