//! Version control abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations a
//! release needs, allowing for a real git2-backed implementation and a mock
//! implementation for testing.
//!
//! The orchestration code depends on the [VersionControl] trait rather than
//! concrete implementations; that seam is where test doubles plug in.

pub mod git;
pub mod mock;

pub use git::Git2VersionControl;
pub use mock::{MockVersionControl, VcsCall};

use crate::error::Result;
use std::fmt;

/// Identifier of a version bump commit.
///
/// "No commit was made" is expressed as `Option<CommitId>`, never as an
/// empty string, so a revert can only ever be asked for a commit that
/// actually exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(hash: impl Into<String>) -> Self {
        CommitId(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Git operations required to record and undo a version bump.
///
/// All methods may fail on the underlying transport; none retry.
///
/// ## Implementations
///
/// - [Git2VersionControl]: real implementation using the `git2` crate
/// - [MockVersionControl]: scripted implementation for testing
pub trait VersionControl: Send + Sync {
    /// Configures the authoring identity, stages the versioned file, and
    /// commits with a message embedding the release version.
    ///
    /// # Returns
    /// * `Ok(Some(id))` - A commit was created
    /// * `Ok(None)` - Staging produced no changes; nothing to commit is not
    ///   an error
    /// * `Err` - Staging or committing failed
    fn commit_version_bump(&self) -> Result<Option<CommitId>>;

    /// Pushes the current branch to its remote counterpart.
    fn push(&self) -> Result<()>;

    /// Creates a commit reversing `commit` without interactive editing,
    /// then pushes it. Callers must only pass identifiers previously
    /// returned by [VersionControl::commit_version_bump].
    fn revert(&self, commit: &CommitId) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_id_display() {
        let id = CommitId::new("abc123");
        assert_eq!(id.to_string(), "abc123");
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn test_commit_id_equality() {
        assert_eq!(CommitId::new("abc123"), CommitId::new("abc123"));
        assert_ne!(CommitId::new("abc123"), CommitId::new("def456"));
    }
}
