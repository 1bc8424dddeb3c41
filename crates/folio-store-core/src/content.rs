//! Wire types for the editor's save request.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Body of a save request: the full document plus an optional binary
/// attachment. Both replace whatever is committed upstream; there is no
/// field-level update.
#[derive(Debug, Clone, Deserialize)]
pub struct SavePayload {
    /// The entire editable content tree. Opaque to the store.
    #[serde(default)]
    pub document: Option<serde_json::Value>,
    /// Optional binary file saved alongside the document.
    #[serde(default)]
    pub attachment: Option<AttachmentPayload>,
}

/// A named binary blob, base64-encoded in transit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentPayload {
    pub filename: String,
    /// Base64-encoded bytes.
    pub content: String,
}

/// A decoded attachment ready to be written.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl AttachmentPayload {
    /// Validate the filename and decode the content.
    ///
    /// The filename becomes the final path segment under the attachment
    /// directory, so anything that could escape that directory is rejected.
    pub fn decode(self) -> Result<Attachment, StoreError> {
        if self.filename.is_empty() {
            return Err(StoreError::Validation(
                "attachment filename is empty".into(),
            ));
        }
        if self.filename.contains(['/', '\\']) || self.filename.contains("..") {
            return Err(StoreError::Validation(format!(
                "attachment filename {:?} must be a bare file name",
                self.filename
            )));
        }
        let bytes = BASE64.decode(self.content.as_bytes()).map_err(|e| {
            StoreError::Validation(format!("attachment content is not valid base64: {e}"))
        })?;
        Ok(Attachment {
            filename: self.filename,
            bytes,
        })
    }
}
