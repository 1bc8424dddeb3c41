//! HTTP handlers for the content API.
//!
//! Implements:
//! - GET/POST /api/content - load or save the site content document
//! - GET /health - health check endpoint

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, info};

use folio_store_core::{ContentStore, SavePayload, StoreError};

use crate::auth::IdentityVerifier;
use crate::error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn IdentityVerifier>,
    pub store: Arc<ContentStore>,
    pub max_body_bytes: usize,
    pub repository: String,
}

/// Routes for the content API. Layers (CORS, tracing) are added in `main`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/content", any(content_handler))
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    pub repository: String,
}

/// GET /health - Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        repository: state.repository,
    })
}

/// Extract Bearer token from Authorization header.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[derive(Serialize)]
pub struct SaveResponse {
    pub message: &'static str,
    /// One note per file written, in write order.
    pub details: Vec<String>,
}

#[derive(Serialize)]
pub struct LoadResponse {
    /// `null` when nothing has been committed yet.
    pub document: Option<serde_json::Value>,
    pub revision: Option<String>,
}

/// Save (POST) and load (GET) for the site content document.
///
/// Checks run in a fixed order: identity, then method, then body shape,
/// then the backend writes. An unauthenticated request never reaches the
/// backend and never has its body read.
pub async fn content_handler(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(req.headers()).ok_or(StoreError::Unauthorized)?;
    let identity = state.verifier.verify(token).await?;
    debug!(subject = %identity.subject, "authenticated");

    let method = req.method().clone();
    if method == Method::POST {
        save_content(&state, req).await
    } else if method == Method::GET {
        load_content(&state).await
    } else {
        Err(StoreError::MethodNotAllowed.into())
    }
}

async fn save_content(state: &AppState, req: Request) -> Result<Response, ApiError> {
    let body = axum::body::to_bytes(req.into_body(), state.max_body_bytes)
        .await
        .map_err(|e| StoreError::Validation(format!("failed to read request body: {e}")))?;
    let payload: SavePayload = serde_json::from_slice(&body)
        .map_err(|e| StoreError::Validation(format!("body is not a valid save request: {e}")))?;

    let report = state.store.save(payload).await?;
    info!(files = report.outcomes.len(), "content saved");
    Ok(Json(SaveResponse {
        message: "Content updated",
        details: report.notes(),
    })
    .into_response())
}

async fn load_content(state: &AppState) -> Result<Response, ApiError> {
    let loaded = state.store.load().await?;
    let (document, revision) = match loaded {
        Some(loaded) => (Some(loaded.document), Some(loaded.revision)),
        None => (None, None),
    };
    Ok(Json(LoadResponse { document, revision }).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use folio_store_core::{FileBackend, FileRevision, RemoteFile};

    use super::*;
    use crate::auth::Identity;

    struct StubVerifier;

    #[async_trait]
    impl IdentityVerifier for StubVerifier {
        async fn verify(&self, token: &str) -> Result<Identity, StoreError> {
            if token == "good-token" {
                Ok(Identity {
                    subject: "admin".into(),
                })
            } else {
                Err(StoreError::Unauthorized)
            }
        }
    }

    /// Backend counting its calls; optionally seeded with an existing
    /// document or scripted to reject the attachment write.
    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
        existing: Option<RemoteFile>,
        reject_attachment: bool,
    }

    #[async_trait]
    impl FileBackend for CountingBackend {
        async fn get_file(&self, _path: &str) -> Result<Option<RemoteFile>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.existing.clone())
        }

        async fn put_file(
            &self,
            path: &str,
            _content: &[u8],
            _message: &str,
            _prior: Option<&str>,
        ) -> Result<FileRevision, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject_attachment && path.starts_with("assets/") {
                return Err(StoreError::BackendWrite {
                    path: path.to_string(),
                    status: Some(409),
                    detail: "is at a different revision".into(),
                });
            }
            Ok(FileRevision {
                sha: "blob".into(),
                commit: "commit".into(),
                committed_at: None,
            })
        }
    }

    fn state(backend: Arc<CountingBackend>) -> AppState {
        AppState {
            verifier: Arc::new(StubVerifier),
            store: Arc::new(ContentStore::new(
                backend,
                "data/siteData.json",
                "assets/cv",
            )),
            max_body_bytes: 1024 * 1024,
            repository: "hackura/portfolio".into(),
        }
    }

    async fn call(state: AppState, req: HttpRequest<Body>) -> (StatusCode, Value) {
        let response = router(state).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn save_request(auth: Option<&str>, body: Value) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder()
            .method("POST")
            .uri("/api/content")
            .header("content-type", "application/json");
        if let Some(token) = auth {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn save_without_identity_makes_zero_backend_calls() {
        let backend = Arc::new(CountingBackend::default());
        let (status, body) = call(
            state(backend.clone()),
            save_request(None, json!({"document": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn save_with_wrong_credential_makes_zero_backend_calls() {
        let backend = Arc::new(CountingBackend::default());
        let (status, _) = call(
            state(backend.clone()),
            save_request(Some("bad-token"), json!({"document": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn other_methods_are_rejected_after_auth() {
        let backend = Arc::new(CountingBackend::default());
        let req = HttpRequest::builder()
            .method("DELETE")
            .uri("/api/content")
            .header("authorization", "Bearer good-token")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(state(backend.clone()), req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unparseable_body_is_a_validation_error() {
        let backend = Arc::new(CountingBackend::default());
        let req = HttpRequest::builder()
            .method("POST")
            .uri("/api/content")
            .header("authorization", "Bearer good-token")
            .body(Body::from("not json"))
            .unwrap();
        let (status, body) = call(state(backend.clone()), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_document_is_a_validation_error() {
        let backend = Arc::new(CountingBackend::default());
        let (status, body) = call(
            state(backend.clone()),
            save_request(Some("good-token"), json!({"attachment": null})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn saving_a_document_reports_one_outcome() {
        let backend = Arc::new(CountingBackend::default());
        let (status, body) = call(
            state(backend.clone()),
            save_request(
                Some("good-token"),
                json!({"document": {"hero": {"title": "A"}}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Content updated");
        assert_eq!(body["details"], json!(["siteData.json created"]));
        // One read plus one write, document path only.
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn saving_with_an_attachment_reports_two_outcomes_in_order() {
        let backend = Arc::new(CountingBackend::default());
        let (status, body) = call(
            state(backend.clone()),
            save_request(
                Some("good-token"),
                json!({
                    "document": {"hero": {"title": "A"}},
                    "attachment": {"filename": "cv.pdf", "content": "JVBERi0xLjQ="}
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["details"],
            json!(["siteData.json created", "cv.pdf created"])
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn attachment_conflict_still_reports_the_committed_document() {
        let backend = Arc::new(CountingBackend {
            reject_attachment: true,
            ..Default::default()
        });
        let (status, body) = call(
            state(backend.clone()),
            save_request(
                Some("good-token"),
                json!({
                    "document": {"hero": {"title": "A"}},
                    "attachment": {"filename": "cv.pdf", "content": "JVBERi0xLjQ="}
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "WRITE_CONFLICT");
        assert_eq!(body["completed"], json!(["siteData.json created"]));
    }

    #[tokio::test]
    async fn load_returns_the_committed_document() {
        let backend = Arc::new(CountingBackend {
            existing: Some(RemoteFile {
                sha: "abc123".into(),
                content: br#"{"hero":{"title":"A"}}"#.to_vec(),
            }),
            ..Default::default()
        });
        let req = HttpRequest::builder()
            .method("GET")
            .uri("/api/content")
            .header("authorization", "Bearer good-token")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(state(backend), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["revision"], "abc123");
        assert_eq!(body["document"]["hero"]["title"], "A");
    }

    #[tokio::test]
    async fn load_before_first_save_returns_null() {
        let backend = Arc::new(CountingBackend::default());
        let req = HttpRequest::builder()
            .method("GET")
            .uri("/api/content")
            .header("authorization", "Bearer good-token")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(state(backend), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["document"], Value::Null);
        assert_eq!(body["revision"], Value::Null);
    }

    #[tokio::test]
    async fn health_reports_the_repository() {
        let backend = Arc::new(CountingBackend::default());
        let req = HttpRequest::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(state(backend), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["healthy"], true);
        assert_eq!(body["repository"], "hackura/portfolio");
    }
}
