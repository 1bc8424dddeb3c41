//! Connection settings for one GitHub repository.

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Identifies the repository and branch all content is committed to.
///
/// `api_base` is injectable so the test suite can point the client at a
/// local mock server.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Personal access token with `repo` scope.
    pub token: String,
    pub api_base: String,
}

impl GitHubConfig {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}
