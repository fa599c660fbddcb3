use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Committer name used for version bump commits when no override is given.
pub const DEFAULT_COMMITTER_NAME: &str = "github-actions";
/// Committer email used for version bump commits when no override is given.
pub const DEFAULT_COMMITTER_EMAIL: &str = "github-actions@github.com";

/// Describes a single release to publish.
///
/// Immutable for the lifetime of the orchestration; built once from CLI
/// input and handed to [crate::release::ReleasePublisher].
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseSpec {
    /// Version string, expected to be semantic; may be malformed.
    pub version: String,
    /// Free-form release notes body.
    pub release_notes: String,
    /// Artifacts to attach, uploaded in this order.
    pub artifact_paths: Vec<PathBuf>,
    /// Whether to record the version bump as a commit before releasing.
    pub commit_version_bump: bool,
    /// File whose edit constitutes the version bump. Required (and
    /// non-empty) only when `commit_version_bump` is set.
    pub versioned_file_path: Option<PathBuf>,
}

impl ReleaseSpec {
    /// Creates a spec with no artifacts and no version bump commit.
    pub fn new(version: impl Into<String>, release_notes: impl Into<String>) -> Self {
        ReleaseSpec {
            version: version.into(),
            release_notes: release_notes.into(),
            artifact_paths: Vec::new(),
            commit_version_bump: false,
            versioned_file_path: None,
        }
    }

    /// Sets the artifact list from a comma separated string.
    #[must_use]
    pub fn with_artifact_list(mut self, list: &str) -> Self {
        self.artifact_paths = parse_artifact_list(list);
        self
    }

    /// Requests a version bump commit staging the given file.
    #[must_use]
    pub fn with_version_bump(mut self, versioned_file_path: impl Into<PathBuf>) -> Self {
        self.commit_version_bump = true;
        self.versioned_file_path = Some(versioned_file_path.into());
        self
    }
}

/// Splits a comma separated artifact list into paths.
///
/// Entries are trimmed and empty entries discarded. Input order is
/// preserved; the upload order later on is exactly this order.
pub fn parse_artifact_list(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Authoring identity for the version bump commit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CommitterIdentity {
    pub name: String,
    pub email: String,
}

impl Default for CommitterIdentity {
    fn default() -> Self {
        CommitterIdentity {
            name: DEFAULT_COMMITTER_NAME.to_string(),
            email: DEFAULT_COMMITTER_EMAIL.to_string(),
        }
    }
}

impl CommitterIdentity {
    /// Resolves the identity from optional overrides.
    ///
    /// Name and email are independently overridable; an empty override
    /// counts as unset and falls back to the bot identity.
    pub fn resolve(name: Option<&str>, email: Option<&str>) -> Self {
        CommitterIdentity {
            name: name
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_COMMITTER_NAME.to_string()),
            email: email
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_COMMITTER_EMAIL.to_string()),
        }
    }
}

/// Resolves the GitHub token from an explicit flag or the `GITHUB_TOKEN`
/// environment variable. Empty values count as unset.
pub fn resolve_token(flag: Option<&str>) -> Option<String> {
    flag.map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var("GITHUB_TOKEN")
                .ok()
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty())
        })
}

/// File-based configuration for release-publish.
///
/// Holds defaults that rarely change between releases: the committer
/// identity, the git remote to push to, and the release host endpoints.
/// Everything release-specific arrives on the command line.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub committer: CommitterSection,

    #[serde(default)]
    pub git: GitSection,

    #[serde(default)]
    pub host: HostSection,
}

/// Committer identity defaults, overridable per run from the CLI.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct CommitterSection {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Git-side settings.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct GitSection {
    /// Remote to push to; defaults to "origin" when unset.
    pub remote: Option<String>,
}

/// Release host endpoint overrides, mainly for GitHub Enterprise setups.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct HostSection {
    pub api_url: Option<String>,
    pub upload_url: Option<String>,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releasepublish.toml` in current directory
/// 3. `.releasepublish.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./releasepublish.toml").exists() {
        fs::read_to_string("./releasepublish.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".releasepublish.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_artifact_list_preserves_order() {
        let paths = parse_artifact_list("dist/a.zip,dist/b.zip,dist/c.zip");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("dist/a.zip"),
                PathBuf::from("dist/b.zip"),
                PathBuf::from("dist/c.zip"),
            ]
        );
    }

    #[test]
    fn test_parse_artifact_list_discards_empty_entries() {
        let paths = parse_artifact_list("dist/a.zip, ,dist/b.zip,");
        assert_eq!(
            paths,
            vec![PathBuf::from("dist/a.zip"), PathBuf::from("dist/b.zip")]
        );
    }

    #[test]
    fn test_parse_artifact_list_empty_input() {
        assert!(parse_artifact_list("").is_empty());
        assert!(parse_artifact_list(" , ,").is_empty());
    }

    #[test]
    fn test_committer_identity_defaults() {
        let identity = CommitterIdentity::resolve(None, None);
        assert_eq!(identity.name, "github-actions");
        assert_eq!(identity.email, "github-actions@github.com");
    }

    #[test]
    fn test_committer_identity_custom_name_only() {
        let identity = CommitterIdentity::resolve(Some("my-custom-bot[bot]"), None);
        assert_eq!(identity.name, "my-custom-bot[bot]");
        assert_eq!(identity.email, "github-actions@github.com");
    }

    #[test]
    fn test_committer_identity_custom_email_only() {
        let identity =
            CommitterIdentity::resolve(None, Some("12345+my-bot[bot]@users.noreply.github.com"));
        assert_eq!(identity.name, "github-actions");
        assert_eq!(identity.email, "12345+my-bot[bot]@users.noreply.github.com");
    }

    #[test]
    fn test_committer_identity_both_custom() {
        let identity = CommitterIdentity::resolve(
            Some("deploy[bot]"),
            Some("2744991+deploy[bot]@users.noreply.github.com"),
        );
        assert_eq!(identity.name, "deploy[bot]");
        assert_eq!(identity.email, "2744991+deploy[bot]@users.noreply.github.com");
    }

    #[test]
    fn test_committer_identity_empty_override_falls_back() {
        let identity = CommitterIdentity::resolve(Some(""), Some("  "));
        assert_eq!(identity, CommitterIdentity::default());
    }

    #[test]
    fn test_release_spec_builders() {
        let spec = ReleaseSpec::new("1.2.3", "Notes")
            .with_artifact_list("dist/plugin.zip")
            .with_version_bump("plugin.php");

        assert_eq!(spec.version, "1.2.3");
        assert_eq!(spec.artifact_paths, vec![PathBuf::from("dist/plugin.zip")]);
        assert!(spec.commit_version_bump);
        assert_eq!(spec.versioned_file_path, Some(PathBuf::from("plugin.php")));
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("releasepublish.toml");
        fs::write(
            &path,
            r#"
[committer]
name = "release-bot"

[git]
remote = "upstream"

[host]
api_url = "https://github.example.com/api/v3"
"#,
        )
        .unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.committer.name.as_deref(), Some("release-bot"));
        assert_eq!(config.committer.email, None);
        assert_eq!(config.git.remote.as_deref(), Some("upstream"));
        assert_eq!(
            config.host.api_url.as_deref(),
            Some("https://github.example.com/api/v3")
        );
    }

    #[test]
    fn test_load_config_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "committer = not valid toml").unwrap();

        assert!(load_config(path.to_str()).is_err());
    }

    #[test]
    fn test_load_config_missing_explicit_path() {
        assert!(load_config(Some("/nonexistent/releasepublish.toml")).is_err());
    }

    #[test]
    #[serial]
    fn test_resolve_token_prefers_flag() {
        std::env::set_var("GITHUB_TOKEN", "env-token");
        assert_eq!(
            resolve_token(Some("flag-token")),
            Some("flag-token".to_string())
        );
        std::env::remove_var("GITHUB_TOKEN");
    }

    #[test]
    #[serial]
    fn test_resolve_token_falls_back_to_env() {
        std::env::set_var("GITHUB_TOKEN", "env-token");
        assert_eq!(resolve_token(None), Some("env-token".to_string()));
        std::env::remove_var("GITHUB_TOKEN");
    }

    #[test]
    #[serial]
    fn test_resolve_token_empty_everywhere() {
        std::env::remove_var("GITHUB_TOKEN");
        assert_eq!(resolve_token(None), None);
        assert_eq!(resolve_token(Some("")), None);
    }
}
