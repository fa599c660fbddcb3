use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::Deserialize;
use std::path::Path;

use crate::error::{ReleasePublishError, Result};
use crate::host::{ReleaseDraft, ReleaseHost, ReleaseId};

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_UPLOAD_URL: &str = "https://uploads.github.com";

/// Configuration for the GitHub release host.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Repository owner (e.g., "acme")
    pub owner: String,
    /// Repository name (e.g., "widget")
    pub repo: String,
    /// Token for authentication
    pub token: String,
    /// REST API base URL
    pub api_url: String,
    /// Asset upload base URL
    pub upload_url: String,
}

impl GitHubConfig {
    /// Creates a configuration against github.com.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        GitHubConfig {
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
        }
    }

    /// Overrides the REST API base URL (GitHub Enterprise).
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Overrides the asset upload base URL.
    #[must_use]
    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into();
        self
    }
}

/// Parse a GitHub remote URL into (owner, repo).
///
/// Understands the SSH form `git@github.com:owner/repo.git` and the HTTPS
/// form `https://github.com/owner/repo.git`, with or without the `.git`
/// suffix.
pub fn parse_github_remote(url: &str) -> Option<(String, String)> {
    let path = url
        .strip_prefix("git@github.com:")
        .or_else(|| url.strip_prefix("https://github.com/"))?;
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path.split_once('/')?;
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

#[derive(Deserialize)]
struct ReleaseResponse {
    id: u64,
    html_url: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: String,
}

/// True when a 422 response body carries GitHub's `already_exists` error
/// code for the release tag.
fn is_already_exists(body: &str) -> bool {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.errors.iter().any(|e| e.code == "already_exists"))
        .unwrap_or(false)
}

/// GitHub REST implementation of [ReleaseHost].
pub struct GitHubReleaseHost {
    config: GitHubConfig,
    client: Client,
}

impl GitHubReleaseHost {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ReleasePublishError::host(format!("Failed to build HTTP client: {}", e)))?;
        Ok(GitHubReleaseHost { config, client })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Accept", "application/vnd.github+json")
            .header(
                "User-Agent",
                concat!("release-publish/", env!("CARGO_PKG_VERSION")),
            )
    }

    fn repo_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.config.api_url, self.config.owner, self.config.repo, suffix
        )
    }

    fn transport(error: reqwest::Error) -> ReleasePublishError {
        ReleasePublishError::host(format!("GitHub request failed: {}", error))
    }
}

impl ReleaseHost for GitHubReleaseHost {
    fn create_release(&self, draft: &ReleaseDraft) -> Result<ReleaseId> {
        let body = serde_json::json!({
            "tag_name": draft.tag,
            "body": draft.notes,
            "prerelease": draft.prerelease,
        });

        let response = self
            .authorized(self.client.post(self.repo_url("releases")))
            .json(&body)
            .send()
            .map_err(Self::transport)?;

        let status = response.status();
        if status.is_success() {
            let release: ReleaseResponse = response.json().map_err(Self::transport)?;
            return Ok(ReleaseId::new(release.id));
        }

        let text = response.text().unwrap_or_default();
        if status == StatusCode::UNPROCESSABLE_ENTITY && is_already_exists(&text) {
            return Err(ReleasePublishError::ReleaseExists {
                version: draft.tag.clone(),
            });
        }

        Err(ReleasePublishError::host(format!(
            "Failed to create release: HTTP {}: {}",
            status, text
        )))
    }

    fn upload_asset(&self, release: ReleaseId, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ReleasePublishError::host(format!("Invalid asset file name: {}", path.display()))
            })?;

        let url = format!(
            "{}/repos/{}/{}/releases/{}/assets",
            self.config.upload_url, self.config.owner, self.config.repo, release
        );

        let response = self
            .authorized(self.client.post(&url))
            .query(&[("name", name)])
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .map_err(Self::transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(ReleasePublishError::host(format!(
                "Failed to upload asset '{}': HTTP {}: {}",
                name, status, text
            )));
        }

        Ok(())
    }

    fn release_url(&self, release: ReleaseId) -> Result<String> {
        let url = self.repo_url(&format!("releases/{}", release));
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .map_err(Self::transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(ReleasePublishError::host(format!(
                "Failed to fetch release {}: HTTP {}: {}",
                release, status, text
            )));
        }

        let release: ReleaseResponse = response.json().map_err(Self::transport)?;
        Ok(release.html_url)
    }
}
