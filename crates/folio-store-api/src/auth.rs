//! Identity verification for the editor boundary.
//!
//! The save endpoint trusts no ambient session: callers present a bearer
//! credential and an injected verifier decides. The production verifier
//! stores only the SHA-256 digest of the accepted credential, so the raw
//! value never appears in configuration or logs.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use folio_store_core::StoreError;

/// An authenticated editor.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject: String,
}

/// Decides whether a presented credential identifies a known editor.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, StoreError>;
}

/// Verifier comparing the digest of the presented credential against a
/// configured SHA-256 hex digest.
pub struct Sha256TokenVerifier {
    digest: String,
    subject: String,
}

impl Sha256TokenVerifier {
    pub fn new(digest: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            digest: digest.into().to_lowercase(),
            subject: subject.into(),
        }
    }

    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl IdentityVerifier for Sha256TokenVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, StoreError> {
        if Sha256TokenVerifier::hash_token(token) == self.digest {
            Ok(Identity {
                subject: self.subject.clone(),
            })
        } else {
            Err(StoreError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_DIGEST: &str = "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b";

    #[test]
    fn hash_token_is_hex_sha256() {
        assert_eq!(Sha256TokenVerifier::hash_token("secret"), SECRET_DIGEST);
    }

    #[tokio::test]
    async fn accepts_the_configured_credential() {
        let verifier = Sha256TokenVerifier::new(SECRET_DIGEST, "admin");
        let identity = verifier.verify("secret").await.unwrap();
        assert_eq!(identity.subject, "admin");
    }

    #[tokio::test]
    async fn accepts_uppercase_digest_configuration() {
        let verifier = Sha256TokenVerifier::new(SECRET_DIGEST.to_uppercase(), "admin");
        assert!(verifier.verify("secret").await.is_ok());
    }

    #[tokio::test]
    async fn rejects_anything_else() {
        let verifier = Sha256TokenVerifier::new(SECRET_DIGEST, "admin");
        let err = verifier.verify("Secret").await.unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));
    }
}
