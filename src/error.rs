use thiserror::Error;

/// Unified error type for release-publish operations
#[derive(Error, Debug)]
pub enum ReleasePublishError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    /// Release host failures carry the host's own message unprefixed so the
    /// operator sees exactly what the API reported.
    #[error("{0}")]
    Host(String),

    /// The host already has a release under the requested tag. Kept as its
    /// own variant so callers can rewrite it into remediation guidance
    /// instead of sniffing message text.
    #[error("a release for version {version} already exists")]
    ReleaseExists { version: String },

    #[error("Release asset not found: {0}")]
    AssetMissing(String),

    /// Reverting the version bump commit failed after an earlier error.
    /// Both causes are reported; a branch left in a broken state is the
    /// more urgent one to surface.
    #[error("Failed to revert the version bump commit: {revert_error} (original failure: {original})")]
    Rollback {
        revert_error: String,
        original: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-publish
pub type Result<T> = std::result::Result<T, ReleasePublishError>;

impl ReleasePublishError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleasePublishError::Config(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleasePublishError::Remote(msg.into())
    }

    /// Create a release host error with context
    pub fn host(msg: impl Into<String>) -> Self {
        ReleasePublishError::Host(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleasePublishError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_host_error_is_unprefixed() {
        let err = ReleasePublishError::host("Release failed");
        assert_eq!(err.to_string(), "Release failed");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleasePublishError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_asset_missing_names_the_path() {
        let err = ReleasePublishError::AssetMissing("dist/plugin.zip".to_string());
        assert_eq!(err.to_string(), "Release asset not found: dist/plugin.zip");
    }

    #[test]
    fn test_release_exists_names_the_version() {
        let err = ReleasePublishError::ReleaseExists {
            version: "2.1.0".to_string(),
        };
        assert!(err.to_string().contains("2.1.0"));
    }

    #[test]
    fn test_rollback_reports_both_causes() {
        let err = ReleasePublishError::Rollback {
            revert_error: "push rejected".to_string(),
            original: "Release failed".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("push rejected"));
        assert!(msg.contains("Release failed"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleasePublishError::config("x"), "Configuration error"),
            (ReleasePublishError::remote("x"), "Remote operation failed"),
            (
                ReleasePublishError::AssetMissing("x".to_string()),
                "Release asset not found",
            ),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
