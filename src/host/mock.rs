use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ReleasePublishError, Result};
use crate::host::{ReleaseDraft, ReleaseHost, ReleaseId};

/// A recorded call against [MockReleaseHost].
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Create(ReleaseDraft),
    Upload(ReleaseId, PathBuf),
    Url(ReleaseId),
}

/// Mock release host for testing without network access.
///
/// Outcomes are scripted with the builder methods and every call is
/// recorded. The default instance hands out release id 1 with a
/// placeholder URL and succeeds at everything.
pub struct MockReleaseHost {
    release_id: u64,
    url: String,
    create_error: Option<String>,
    create_conflict: bool,
    upload_error: Option<(usize, String)>,
    url_error: Option<String>,
    calls: Mutex<Vec<HostCall>>,
}

impl Default for MockReleaseHost {
    fn default() -> Self {
        MockReleaseHost {
            release_id: 1,
            url: "https://releases.example/1".to_string(),
            create_error: None,
            create_conflict: false,
            upload_error: None,
            url_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockReleaseHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the release id and public URL the host hands out.
    #[must_use]
    pub fn with_release(mut self, id: u64, url: &str) -> Self {
        self.release_id = id;
        self.url = url.to_string();
        self
    }

    /// Scripts release creation to fail with the given message.
    #[must_use]
    pub fn with_create_error(mut self, message: &str) -> Self {
        self.create_error = Some(message.to_string());
        self
    }

    /// Scripts release creation to fail with a tag collision.
    #[must_use]
    pub fn with_existing_release(mut self) -> Self {
        self.create_conflict = true;
        self
    }

    /// Scripts the first upload to fail.
    #[must_use]
    pub fn with_upload_error(self, message: &str) -> Self {
        self.with_upload_error_at(0, message)
    }

    /// Scripts the upload at `index` (0-based) to fail; earlier uploads
    /// succeed.
    #[must_use]
    pub fn with_upload_error_at(mut self, index: usize, message: &str) -> Self {
        self.upload_error = Some((index, message.to_string()));
        self
    }

    /// Scripts the URL fetch to fail.
    #[must_use]
    pub fn with_url_error(mut self, message: &str) -> Self {
        self.url_error = Some(message.to_string());
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    /// The draft passed to release creation, if it was called.
    pub fn created_draft(&self) -> Option<ReleaseDraft> {
        self.calls().into_iter().find_map(|call| match call {
            HostCall::Create(draft) => Some(draft),
            _ => None,
        })
    }

    /// Paths of all upload attempts, in order.
    pub fn uploaded_paths(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Upload(_, path) => Some(path),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().expect("mock call log poisoned").push(call);
    }

    fn upload_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, HostCall::Upload(..)))
            .count()
    }
}

impl ReleaseHost for MockReleaseHost {
    fn create_release(&self, draft: &ReleaseDraft) -> Result<ReleaseId> {
        self.record(HostCall::Create(draft.clone()));
        if self.create_conflict {
            return Err(ReleasePublishError::ReleaseExists {
                version: draft.tag.clone(),
            });
        }
        if let Some(message) = &self.create_error {
            return Err(ReleasePublishError::host(message));
        }
        Ok(ReleaseId::new(self.release_id))
    }

    fn upload_asset(&self, release: ReleaseId, path: &Path) -> Result<()> {
        let index = self.upload_count();
        self.record(HostCall::Upload(release, path.to_path_buf()));
        if let Some((failing_index, message)) = &self.upload_error {
            if index == *failing_index {
                return Err(ReleasePublishError::host(message));
            }
        }
        Ok(())
    }

    fn release_url(&self, release: ReleaseId) -> Result<String> {
        self.record(HostCall::Url(release));
        match &self.url_error {
            Some(message) => Err(ReleasePublishError::host(message)),
            None => Ok(self.url.clone()),
        }
    }
}
