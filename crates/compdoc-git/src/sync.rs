//! Keeping the local mirror current
//!
//! [`RepositorySynchronizer`] owns the write side of a [`RepositoryHandle`].
//! Network work (fetch, clone) runs without any lock held; only the step
//! that changes files under the handle's root takes the write guard, so
//! readers see either the old tree or the new one.

use std::fs;
use std::path::{Path, PathBuf};

use compdoc_fs::RepositoryHandle;
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{Oid, Repository, ResetType, Signature};
use serde::Serialize;

use crate::helpers::{current_branch, fetch, head_oid, remote_tip};
use crate::{Error, Result};

/// Author used for merge commits created by a pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: "MCPServer".to_string(),
            email: "mcpserver@example.com".to_string(),
        }
    }
}

/// What to mirror and how.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub remote_url: String,
    pub remote_name: String,
    /// Branch to track. `None` tracks whatever HEAD is on (the remote's
    /// default branch after a clone).
    pub branch: Option<String>,
    pub identity: Identity,
}

impl SyncOptions {
    pub fn new(remote_url: impl Into<String>) -> Self {
        Self {
            remote_url: remote_url.into(),
            remote_name: "origin".to_string(),
            branch: None,
            identity: Identity::default(),
        }
    }
}

/// Result of a successful [`RepositorySynchronizer::update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateOutcome {
    Cloned { head: String },
    FastForwarded { from: String, to: String },
    Merged { head: String },
    AlreadyUpToDate { head: String },
}

impl UpdateOutcome {
    /// Commit the local branch points at after the update.
    pub fn head(&self) -> &str {
        match self {
            Self::Cloned { head } | Self::Merged { head } | Self::AlreadyUpToDate { head } => head,
            Self::FastForwarded { to, .. } => to,
        }
    }
}

/// Mirrors one remote into the root of a [`RepositoryHandle`].
#[derive(Debug, Clone)]
pub struct RepositorySynchronizer {
    handle: RepositoryHandle,
    options: SyncOptions,
}

impl RepositorySynchronizer {
    pub fn new(handle: RepositoryHandle, options: SyncOptions) -> Self {
        Self { handle, options }
    }

    pub fn handle(&self) -> &RepositoryHandle {
        &self.handle
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Local root of the mirror. Safe to call while a sync is running.
    pub fn local_path(&self) -> PathBuf {
        self.handle.root()
    }

    /// Fetch and compare the local tip with the remote tip.
    ///
    /// Fails closed: any problem (no repository, unreachable remote, missing
    /// remote branch) yields `false`. Only identical commit ids count as up
    /// to date, so a local branch that is ahead or has diverged is stale.
    pub fn is_up_to_date(&self) -> bool {
        match self.compare_tips() {
            Ok(up_to_date) => up_to_date,
            Err(e) => {
                tracing::warn!(
                    path = %self.local_path().display(),
                    error = %e,
                    "Could not determine whether the mirror is up to date"
                );
                false
            }
        }
    }

    fn compare_tips(&self) -> Result<bool> {
        let root = self.local_path();
        let repo = match Repository::open(&root) {
            Ok(repo) => repo,
            Err(e) => {
                tracing::debug!(path = %root.display(), error = %e, "Local path is not a repository");
                return Ok(false);
            }
        };

        let branch = self.tracked_branch(&repo)?;
        fetch(&repo, &self.options.remote_name)?;

        let local = head_oid(&repo)?;
        let remote = remote_tip(&repo, &self.options.remote_name, &branch)?;
        tracing::debug!(%local, %remote, branch = %branch, "Compared tips");
        Ok(local == remote)
    }

    /// Pull into an existing clone, or clone from scratch.
    ///
    /// Records the transition in the handle's sync state. Failures are
    /// logged and returned; the tree on disk is left as it was.
    pub fn update(&self) -> Result<UpdateOutcome> {
        self.handle.mark_syncing();
        let root = self.local_path();

        let result = match Repository::open(&root) {
            Ok(repo) => self.pull(&repo),
            Err(e) => {
                tracing::info!(
                    path = %root.display(),
                    reason = %e.message(),
                    "No valid repository at local path, cloning"
                );
                self.clone_fresh()
            }
        };

        match &result {
            Ok(outcome) => {
                tracing::info!(?outcome, "Repository synchronized");
                self.handle.mark_synced(outcome.head());
            }
            Err(e) => {
                tracing::error!(
                    url = %self.options.remote_url,
                    path = %root.display(),
                    error = %e,
                    "Repository synchronization failed"
                );
                self.handle.mark_failed(e.to_string());
            }
        }

        result
    }

    /// Check, then update only when stale.
    pub fn sync_once(&self) -> Result<UpdateOutcome> {
        if self.is_up_to_date() {
            let repo = Repository::open(self.local_path())?;
            let head = head_oid(&repo)?.to_string();
            tracing::info!(%head, "Repository already up to date");
            self.handle.mark_synced(head.clone());
            return Ok(UpdateOutcome::AlreadyUpToDate { head });
        }
        self.update()
    }

    fn tracked_branch(&self, repo: &Repository) -> Result<String> {
        match &self.options.branch {
            Some(branch) => Ok(branch.clone()),
            None => current_branch(repo)?.ok_or(Error::DetachedHead),
        }
    }

    fn pull(&self, repo: &Repository) -> Result<UpdateOutcome> {
        let branch = self.tracked_branch(repo)?;
        let remote_name = &self.options.remote_name;

        fetch(repo, remote_name)?;
        let fetched = remote_tip(repo, remote_name, &branch)?;
        let annotated = repo.find_annotated_commit(fetched)?;
        let (analysis, _) = repo.merge_analysis(&[&annotated])?;

        let head = head_oid(repo)?;
        if analysis.is_up_to_date() {
            return Ok(UpdateOutcome::AlreadyUpToDate {
                head: head.to_string(),
            });
        }

        let _guard = self.handle.write();

        if analysis.is_fast_forward() {
            let mut reference = repo.head()?;
            reference.set_target(fetched, &format!("pull: fast-forward to {}", fetched))?;
            repo.checkout_head(Some(CheckoutBuilder::default().force()))?;
            return Ok(UpdateOutcome::FastForwarded {
                from: head.to_string(),
                to: fetched.to_string(),
            });
        }

        let merged = self.merge_commit(repo, head, fetched, &format!("{}/{}", remote_name, branch))?;
        Ok(UpdateOutcome::Merged {
            head: merged.to_string(),
        })
    }

    fn merge_commit(&self, repo: &Repository, head: Oid, fetched: Oid, source: &str) -> Result<Oid> {
        let annotated = repo.find_annotated_commit(fetched)?;
        repo.merge(&[&annotated], None, None)?;

        let mut index = repo.index()?;
        if index.has_conflicts() {
            let head_commit = repo.find_commit(head)?;
            repo.reset(head_commit.as_object(), ResetType::Hard, None)?;
            repo.cleanup_state()?;
            return Err(Error::MergeConflict {
                message: format!("Merge of '{}' resulted in conflicts", source),
            });
        }

        let identity = &self.options.identity;
        let signature = Signature::now(&identity.name, &identity.email)?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let head_commit = repo.find_commit(head)?;
        let fetched_commit = repo.find_commit(fetched)?;

        let merged = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &format!("Merge remote-tracking branch '{}'", source),
            &tree,
            &[&head_commit, &fetched_commit],
        )?;

        repo.cleanup_state()?;
        Ok(merged)
    }

    /// Clone into a sibling staging directory, then swap it into place.
    fn clone_fresh(&self) -> Result<UpdateOutcome> {
        let root = self.local_path();
        let staging = staging_path(&root)?;
        remove_if_present(&staging)?;
        if let Some(parent) = staging.parent() {
            fs::create_dir_all(parent).map_err(|e| compdoc_fs::Error::io(parent, e))?;
        }

        let head = match self.clone_into(&staging) {
            Ok(head) => head,
            Err(e) => {
                if let Err(cleanup) = remove_if_present(&staging) {
                    tracing::warn!(path = %staging.display(), error = %cleanup, "Failed to remove staging directory");
                }
                return Err(e);
            }
        };

        let guard = self.handle.write();
        let target = guard.path();
        swap_into_place(&staging, target)?;
        tracing::debug!(path = %target.display(), "Swapped fresh clone into place");

        Ok(UpdateOutcome::Cloned {
            head: head.to_string(),
        })
    }

    fn clone_into(&self, staging: &Path) -> Result<Oid> {
        let url = &self.options.remote_url;
        let remote_name = self.options.remote_name.clone();

        let mut builder = RepoBuilder::new();
        if let Some(branch) = &self.options.branch {
            builder.branch(branch);
        }
        builder.remote_create(move |repo, _name, url| repo.remote(&remote_name, url));

        tracing::info!(%url, path = %staging.display(), "Cloning repository");
        let repo = builder.clone(url, staging).map_err(|e| Error::CloneFailed {
            url: url.clone(),
            message: e.message().to_string(),
        })?;

        head_oid(&repo)
    }
}

/// `<local_path>.staging`, next to the local path.
fn staging_path(root: &Path) -> Result<PathBuf> {
    sibling_path(root, ".staging")
}

fn sibling_path(root: &Path, suffix: &str) -> Result<PathBuf> {
    let name = root.file_name().ok_or_else(|| Error::InvalidLocalPath {
        path: root.to_path_buf(),
    })?;
    let mut sibling = name.to_os_string();
    sibling.push(suffix);
    Ok(root.with_file_name(sibling))
}

/// Replace `target` with `staging`.
///
/// The old tree is moved to `<target>.previous` first and deleted only once
/// the new one is in place. If the rename fails the old tree is restored.
fn swap_into_place(staging: &Path, target: &Path) -> Result<()> {
    let previous = sibling_path(target, ".previous")?;
    remove_if_present(&previous)?;

    let had_tree = match fs::rename(target, &previous) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(compdoc_fs::Error::io(target, e).into()),
    };

    if let Err(e) = fs::rename(staging, target) {
        if had_tree {
            if let Err(restore) = fs::rename(&previous, target) {
                tracing::error!(path = %target.display(), error = %restore, "Failed to restore previous tree");
            }
        }
        return Err(compdoc_fs::Error::io(target, e).into());
    }

    if had_tree {
        if let Err(e) = remove_if_present(&previous) {
            tracing::warn!(path = %previous.display(), error = %e, "Failed to remove previous tree");
        }
    }
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(compdoc_fs::Error::io(path, e).into()),
    }
}
