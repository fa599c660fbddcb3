//! Release orchestration.
//!
//! Drives a release end to end: optional version bump commit and push,
//! release creation on the host, asset uploads in order, and URL
//! resolution. If anything fails after a version bump commit was actually
//! recorded, that commit is reverted so a failed release never leaves a
//! dangling version bump on the branch.
//!
//! ```
//! use release_publish::config::ReleaseSpec;
//! use release_publish::host::MockReleaseHost;
//! use release_publish::release::{ReleaseOutcome, ReleasePublisher};
//! use release_publish::vcs::MockVersionControl;
//!
//! let spec = ReleaseSpec::new("1.2.3", "Notes");
//! let vcs = MockVersionControl::new();
//! let host = MockReleaseHost::new().with_release(7, "https://github.com/acme/widget/releases/tag/1.2.3");
//! let publisher = ReleasePublisher::new(&spec, &vcs, &host);
//! assert!(matches!(publisher.run(), ReleaseOutcome::Published { .. }));
//! ```

use std::fs;

use crate::config::ReleaseSpec;
use crate::error::{ReleasePublishError, Result};
use crate::host::{ReleaseDraft, ReleaseHost};
use crate::ui;
use crate::vcs::{CommitId, VersionControl};
use crate::version;

/// Final result of one release run. Exactly one is produced per
/// invocation, never a partial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Published { url: String },
    Failed { error: String },
}

impl ReleaseOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, ReleaseOutcome::Published { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ReleaseOutcome::Published { url } => Some(url),
            ReleaseOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ReleaseOutcome::Published { .. } => None,
            ReleaseOutcome::Failed { error } => Some(error),
        }
    }
}

/// Orchestrates one release against injected capability interfaces.
///
/// Not reused across invocations; construct a fresh one per release.
pub struct ReleasePublisher<'a> {
    spec: &'a ReleaseSpec,
    vcs: &'a dyn VersionControl,
    host: &'a dyn ReleaseHost,
}

impl<'a> ReleasePublisher<'a> {
    pub fn new(
        spec: &'a ReleaseSpec,
        vcs: &'a dyn VersionControl,
        host: &'a dyn ReleaseHost,
    ) -> Self {
        ReleasePublisher { spec, vcs, host }
    }

    /// Runs the release to completion.
    ///
    /// Stages run strictly in order: artifact precondition check, spec
    /// validation, version bump commit and push (when requested), release
    /// creation, asset uploads, URL resolution. The first two stages run
    /// before any mutating action so a doomed release never leaves
    /// partial state behind.
    pub fn run(&self) -> ReleaseOutcome {
        if let Err(error) = self.verify_artifacts() {
            return self.fail(error);
        }
        if let Err(error) = self.validate_spec() {
            return self.fail(error);
        }

        // Rollback state threaded through the mutating stages: a revert
        // happens only when a commit identifier was actually captured.
        let mut bump_commit: Option<CommitId> = None;
        match self.publish(&mut bump_commit) {
            Ok(url) => ReleaseOutcome::Published { url },
            Err(error) => {
                if let Some(commit) = bump_commit {
                    ui::display_status(&format!("Reverting version bump commit {}", commit));
                    if let Err(revert_error) = self.vcs.revert(&commit) {
                        return self.fail(ReleasePublishError::Rollback {
                            revert_error: revert_error.to_string(),
                            original: self.describe(&error),
                        });
                    }
                }
                self.fail(error)
            }
        }
    }

    /// Every artifact must exist and be a readable file before any
    /// mutating stage starts.
    fn verify_artifacts(&self) -> Result<()> {
        for path in &self.spec.artifact_paths {
            let readable = fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false);
            if !readable {
                return Err(ReleasePublishError::AssetMissing(
                    path.display().to_string(),
                ));
            }
        }
        Ok(())
    }

    fn validate_spec(&self) -> Result<()> {
        if self.spec.commit_version_bump {
            let missing = self
                .spec
                .versioned_file_path
                .as_ref()
                .map_or(true, |path| path.as_os_str().is_empty());
            if missing {
                return Err(ReleasePublishError::config(
                    "versioned_file_path is required when commit_version_bump is true",
                ));
            }
        }
        Ok(())
    }

    fn publish(&self, bump_commit: &mut Option<CommitId>) -> Result<String> {
        if self.spec.commit_version_bump {
            ui::display_status(&format!(
                "Committing version bump to {}",
                self.spec.version
            ));
            *bump_commit = self.vcs.commit_version_bump()?;
            if bump_commit.is_none() {
                ui::display_status("No version bump changes to commit");
            }
            self.vcs.push()?;
        }

        let draft = ReleaseDraft {
            tag: self.spec.version.clone(),
            notes: self.spec.release_notes.clone(),
            prerelease: version::is_prerelease(&self.spec.version),
        };
        ui::display_status(&format!("Creating release {}", draft.tag));
        let release = self.host.create_release(&draft)?;

        for path in &self.spec.artifact_paths {
            ui::display_status(&format!("Uploading {}", path.display()));
            self.host.upload_asset(release, path)?;
        }

        self.host.release_url(release)
    }

    fn fail(&self, error: ReleasePublishError) -> ReleaseOutcome {
        ReleaseOutcome::Failed {
            error: self.describe(&error),
        }
    }

    /// Renders an error for the operator. A tag collision is rewritten
    /// into remediation guidance naming the version and both ways out.
    fn describe(&self, error: &ReleasePublishError) -> String {
        match error {
            ReleasePublishError::ReleaseExists { version } => format!(
                "A release for version {} already exists. If that version was never \
                 distributed, delete the existing release and its tag, then publish \
                 again. Otherwise cut a new release with a higher version number.",
                version
            ),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let published = ReleaseOutcome::Published {
            url: "https://host/releases/1.0.0".to_string(),
        };
        assert!(published.is_published());
        assert_eq!(published.url(), Some("https://host/releases/1.0.0"));
        assert_eq!(published.error(), None);

        let failed = ReleaseOutcome::Failed {
            error: "boom".to_string(),
        };
        assert!(!failed.is_published());
        assert_eq!(failed.url(), None);
        assert_eq!(failed.error(), Some("boom"));
    }
}
