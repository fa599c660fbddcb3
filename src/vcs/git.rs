use git2::{PushOptions, RemoteCallbacks, Repository, Signature};
use std::path::PathBuf;

use crate::config::CommitterIdentity;
use crate::error::{ReleasePublishError, Result};
use crate::vcs::{CommitId, VersionControl};

/// git2-backed implementation of [VersionControl].
///
/// Holds plain configuration and discovers the repository per operation.
/// The version bump commit stages a single configured file and commits it
/// as the configured identity; the revert creates the inverse commit and
/// pushes it, restoring the branch to its pre-bump state.
pub struct Git2VersionControl {
    identity: CommitterIdentity,
    versioned_file: PathBuf,
    remote_name: String,
    version: String,
    token: Option<String>,
}

impl Git2VersionControl {
    /// Creates a new instance.
    ///
    /// # Arguments
    /// * `version` - Release version embedded in the commit message
    /// * `versioned_file` - File to stage, relative to the repository root
    /// * `identity` - Authoring identity for created commits
    /// * `remote_name` - Remote to push to (e.g., "origin")
    /// * `token` - Optional token for HTTPS remote authentication
    pub fn new(
        version: impl Into<String>,
        versioned_file: impl Into<PathBuf>,
        identity: CommitterIdentity,
        remote_name: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Git2VersionControl {
            identity,
            versioned_file: versioned_file.into(),
            remote_name: remote_name.into(),
            version: version.into(),
            token,
        }
    }

    fn open(&self) -> Result<Repository> {
        Ok(Repository::discover(".")?)
    }

    fn signature(&self) -> Result<Signature<'static>> {
        Ok(Signature::now(&self.identity.name, &self.identity.email)?)
    }

    fn commit_message(&self) -> String {
        format!("Bump version to {}", self.version)
    }

    /// Credential callbacks for remote operations.
    ///
    /// HTTPS remotes authenticate with the configured token; SSH remotes
    /// try the usual key files and then the agent.
    fn remote_callbacks(&self) -> RemoteCallbacks<'static> {
        let token = self.token.clone();
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(token) = token.as_deref() {
                    return git2::Cred::userpass_plaintext("x-access-token", token);
                }
            }

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                for key_name in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let key_path = PathBuf::from(&home).join(".ssh").join(key_name);
                    if key_path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(
                            username_from_url.unwrap_or("git"),
                            None,
                            &key_path,
                            None,
                        ) {
                            return Ok(cred);
                        }
                    }
                }

                if let Ok(cred) =
                    git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });
        callbacks
    }

    fn push_head(&self, repo: &Repository) -> Result<()> {
        let head = repo.head()?;
        let branch_ref = head
            .name()
            .ok_or_else(|| ReleasePublishError::remote("HEAD is not a valid branch reference"))?
            .to_string();

        let mut remote = repo.find_remote(&self.remote_name).map_err(|_| {
            ReleasePublishError::remote(format!("No remote named '{}' found", self.remote_name))
        })?;

        let mut push_options = PushOptions::new();
        let mut callbacks = self.remote_callbacks();
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                Err(git2::Error::from_str(&format!(
                    "Push rejected for {}: {}",
                    refname, status
                )))
            } else {
                Ok(())
            }
        });
        push_options.remote_callbacks(callbacks);

        let refspec = format!("{}:{}", branch_ref, branch_ref);
        match remote.push(&[&refspec], Some(&mut push_options)) {
            Ok(_) => Ok(()),
            Err(e) if e.class() == git2::ErrorClass::Net => Err(ReleasePublishError::remote(
                format!("Network error during push: {}", e),
            )),
            Err(e) => Err(ReleasePublishError::remote(format!(
                "Failed to push branch: {}",
                e
            ))),
        }
    }
}

impl VersionControl for Git2VersionControl {
    fn commit_version_bump(&self) -> Result<Option<CommitId>> {
        let repo = self.open()?;
        let signature = self.signature()?;

        let mut index = repo.index()?;
        index.add_path(&self.versioned_file)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let head = repo.head()?.peel_to_commit()?;

        // Staging changed nothing: the tree matches HEAD, so there is no
        // version bump to record.
        if tree_id == head.tree_id() {
            return Ok(None);
        }

        let tree = repo.find_tree(tree_id)?;
        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &self.commit_message(),
            &tree,
            &[&head],
        )?;

        Ok(Some(CommitId::new(oid.to_string())))
    }

    fn push(&self) -> Result<()> {
        let repo = self.open()?;
        self.push_head(&repo)
    }

    fn revert(&self, commit: &CommitId) -> Result<()> {
        let repo = self.open()?;
        let oid = git2::Oid::from_str(commit.as_str())?;
        let target = repo.find_commit(oid)?;

        repo.revert(&target, None)?;

        let signature = self.signature()?;
        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let head = repo.head()?.peel_to_commit()?;

        let summary = target.summary().unwrap_or("version bump").to_string();
        let message = format!("Revert \"{}\"\n\nThis reverts commit {}.", summary, oid);
        repo.commit(Some("HEAD"), &signature, &signature, &message, &tree, &[&head])?;
        repo.cleanup_state()?;

        self.push_head(&repo)
    }
}
