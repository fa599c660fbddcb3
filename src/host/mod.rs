//! Release host abstraction layer
//!
//! A release host stores release metadata, tags, and uploaded artifacts,
//! and exposes a public URL per release. The orchestration depends on the
//! [ReleaseHost] trait; [github::GitHubReleaseHost] talks to the GitHub
//! REST API and [mock::MockReleaseHost] is a scripted test double.

pub mod github;
pub mod mock;

pub use github::GitHubReleaseHost;
pub use mock::MockReleaseHost;

use crate::error::Result;
use std::fmt;
use std::path::Path;

/// What to create on the host: the tag, the notes body, and whether the
/// release is marked as a prerelease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDraft {
    pub tag: String,
    pub notes: String,
    pub prerelease: bool,
}

/// Host-assigned release identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseId(u64);

impl ReleaseId {
    pub fn new(id: u64) -> Self {
        ReleaseId(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operations against the remote release host.
///
/// All methods may fail on the underlying transport; none retry.
pub trait ReleaseHost: Send + Sync {
    /// Creates a tagged release.
    ///
    /// A tag collision surfaces as
    /// [crate::error::ReleasePublishError::ReleaseExists] so callers can
    /// turn it into remediation guidance.
    fn create_release(&self, draft: &ReleaseDraft) -> Result<ReleaseId>;

    /// Reads the file's bytes and attaches them to the release under the
    /// file's base name.
    fn upload_asset(&self, release: ReleaseId, path: &Path) -> Result<()>;

    /// Returns the public URL of a previously created release.
    fn release_url(&self, release: ReleaseId) -> Result<String>;
}
