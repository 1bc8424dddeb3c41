//! Content API for the folio site.
//!
//! Receives the admin dashboard's full content document (plus an optional
//! CV attachment), authenticates the editor, and commits each file to a
//! GitHub repository through the store in `folio-store-core` /
//! `folio-store-github`.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod error;
mod handlers;

use folio_store_core::ContentStore;
use folio_store_github::{GitHubBackend, GitHubConfig};

use auth::Sha256TokenVerifier;
use config::Config;
use handlers::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    info!("Starting folio-store-api v{}", env!("CARGO_PKG_VERSION"));
    info!("  Host: {}", config.host);
    info!("  Port: {}", config.port);
    info!(
        "  Repository: {}/{} (branch {})",
        config.repo_owner, config.repo_name, config.branch
    );
    info!("  Document path: {}", config.document_path);
    info!("  Attachment dir: {}", config.attachment_dir);

    let github = GitHubBackend::new(GitHubConfig {
        owner: config.repo_owner.clone(),
        repo: config.repo_name.clone(),
        branch: config.branch.clone(),
        token: config.github_token.clone(),
        api_base: config.github_api_base.clone(),
    })
    .context("failed to initialize the GitHub backend")?;

    let state = AppState {
        verifier: Arc::new(Sha256TokenVerifier::new(
            config.admin_token_sha256.clone(),
            "admin",
        )),
        store: Arc::new(ContentStore::new(
            Arc::new(github),
            config.document_path.clone(),
            config.attachment_dir.clone(),
        )),
        max_body_bytes: config.max_body_bytes,
        repository: format!("{}/{}", config.repo_owner, config.repo_name),
    };

    // The dashboard may be served from a different origin than the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = handlers::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, initiating shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
        info!("Received SIGTERM, initiating shutdown");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
