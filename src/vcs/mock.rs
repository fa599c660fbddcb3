use std::sync::Mutex;

use crate::error::{ReleasePublishError, Result};
use crate::vcs::{CommitId, VersionControl};

/// A recorded call against [MockVersionControl].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Commit,
    Push,
    Revert(CommitId),
}

/// Mock version control for testing without a real repository.
///
/// Outcomes are scripted up front with the builder methods; every call is
/// recorded so tests can assert on what the orchestration actually did.
/// The default instance commits nothing ("nothing to commit") and succeeds
/// at everything else.
#[derive(Default)]
pub struct MockVersionControl {
    commit_id: Option<CommitId>,
    commit_error: Option<String>,
    push_error: Option<String>,
    revert_error: Option<String>,
    calls: Mutex<Vec<VcsCall>>,
}

impl MockVersionControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the commit to return the given hash.
    #[must_use]
    pub fn with_commit(mut self, hash: &str) -> Self {
        self.commit_id = Some(CommitId::new(hash));
        self
    }

    /// Scripts the commit call to fail.
    #[must_use]
    pub fn with_commit_error(mut self, message: &str) -> Self {
        self.commit_error = Some(message.to_string());
        self
    }

    /// Scripts the push call to fail.
    #[must_use]
    pub fn with_push_error(mut self, message: &str) -> Self {
        self.push_error = Some(message.to_string());
        self
    }

    /// Scripts the revert call to fail.
    #[must_use]
    pub fn with_revert_error(mut self, message: &str) -> Self {
        self.revert_error = Some(message.to_string());
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    /// The commit a revert was asked for, if any.
    pub fn reverted(&self) -> Option<CommitId> {
        self.calls().into_iter().find_map(|call| match call {
            VcsCall::Revert(id) => Some(id),
            _ => None,
        })
    }

    fn record(&self, call: VcsCall) {
        self.calls.lock().expect("mock call log poisoned").push(call);
    }
}

impl VersionControl for MockVersionControl {
    fn commit_version_bump(&self) -> Result<Option<CommitId>> {
        self.record(VcsCall::Commit);
        if let Some(message) = &self.commit_error {
            return Err(ReleasePublishError::remote(message));
        }
        Ok(self.commit_id.clone())
    }

    fn push(&self) -> Result<()> {
        self.record(VcsCall::Push);
        match &self.push_error {
            Some(message) => Err(ReleasePublishError::remote(message)),
            None => Ok(()),
        }
    }

    fn revert(&self, commit: &CommitId) -> Result<()> {
        self.record(VcsCall::Revert(commit.clone()));
        match &self.revert_error {
            Some(message) => Err(ReleasePublishError::remote(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mock_has_nothing_to_commit() {
        let vcs = MockVersionControl::new();
        assert_eq!(vcs.commit_version_bump().unwrap(), None);
        assert_eq!(vcs.calls(), vec![VcsCall::Commit]);
    }

    #[test]
    fn test_scripted_commit_hash() {
        let vcs = MockVersionControl::new().with_commit("abc123");
        assert_eq!(
            vcs.commit_version_bump().unwrap(),
            Some(CommitId::new("abc123"))
        );
    }

    #[test]
    fn test_scripted_push_error() {
        let vcs = MockVersionControl::new().with_push_error("connection reset");
        assert!(vcs.push().is_err());
        assert_eq!(vcs.calls(), vec![VcsCall::Push]);
    }

    #[test]
    fn test_revert_is_recorded_with_its_commit() {
        let vcs = MockVersionControl::new();
        vcs.revert(&CommitId::new("abc123")).unwrap();
        assert_eq!(vcs.reverted(), Some(CommitId::new("abc123")));
    }

    #[test]
    fn test_call_order_is_preserved() {
        let vcs = MockVersionControl::new().with_commit("abc123");
        vcs.commit_version_bump().unwrap();
        vcs.push().unwrap();
        assert_eq!(vcs.calls(), vec![VcsCall::Commit, VcsCall::Push]);
    }
}
