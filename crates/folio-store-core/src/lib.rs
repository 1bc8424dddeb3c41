//! Core types and traits for the folio content store.
//!
//! This crate defines everything shared between backends and the HTTP
//! boundary:
//! - `FileBackend`: get/put-by-path against a version-controlled file host
//! - `ensure_file`: the read-token-then-write create-or-update primitive
//! - `ContentStore`: save/load orchestration over one document plus an
//!   optional attachment
//! - `StoreError`: the error taxonomy mapped to responses at the boundary
//! - `sections`: typed records for the document's content sections

mod backend;
mod content;
mod error;
pub mod sections;
mod store;

pub use backend::{ensure_file, FileBackend, FileRevision, RemoteFile, WriteAction, WriteOutcome};
pub use content::{Attachment, AttachmentPayload, SavePayload};
pub use error::{Result, StoreError};
pub use store::{ContentStore, LoadedDocument, SaveError, SaveReport};
