use clap::Parser;

/// Configuration for the folio content API.
#[derive(Parser, Debug, Clone)]
#[command(name = "folio-store-api")]
#[command(about = "Save/load API committing site content to a GitHub repository")]
pub struct Config {
    /// TCP host to bind to
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// TCP port to bind to
    #[arg(long, default_value = "8787", env = "HTTP_PORT")]
    pub port: u16,

    /// GitHub account owning the content repository
    #[arg(long, env = "REPO_OWNER")]
    pub repo_owner: String,

    /// Content repository name
    #[arg(long, env = "REPO_NAME")]
    pub repo_name: String,

    /// Branch all content is committed to
    #[arg(long, default_value = "master", env = "CONTENT_BRANCH")]
    pub branch: String,

    /// Personal access token with `repo` scope
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// GitHub API base URL (overridable for tests)
    #[arg(long, default_value = folio_store_github::DEFAULT_API_BASE, env = "GITHUB_API_BASE")]
    pub github_api_base: String,

    /// Repository path of the content document
    #[arg(long, default_value = "data/siteData.json", env = "DOCUMENT_PATH")]
    pub document_path: String,

    /// Repository directory attachments are saved under
    #[arg(long, default_value = "assets/cv", env = "ATTACHMENT_DIR")]
    pub attachment_dir: String,

    /// SHA-256 hex digest of the accepted editor credential
    #[arg(long, env = "ADMIN_TOKEN_SHA256", hide_env_values = true)]
    pub admin_token_sha256: String,

    /// Maximum accepted request body size in bytes
    #[arg(long, default_value = "10485760", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,
}
