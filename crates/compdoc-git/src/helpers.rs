//! Shared git2 helper functions for the synchronizer

use git2::{BranchType, Oid, Repository};

use crate::{Error, Result};

/// Get the current branch name from a repository.
///
/// Returns the branch name if HEAD points to a branch, or `None` if HEAD is detached.
pub fn current_branch(repo: &Repository) -> Result<Option<String>> {
    let head = repo.head()?;

    if head.is_branch() {
        Ok(head.shorthand().map(str::to_string))
    } else {
        Ok(None)
    }
}

/// Commit id HEAD currently points at.
pub fn head_oid(repo: &Repository) -> Result<Oid> {
    Ok(repo.head()?.peel_to_commit()?.id())
}

/// Fetch `remote_name` using its configured refspecs.
///
/// The configured refspecs keep `refs/remotes/<remote>/*` current, which is
/// what the tip comparison reads.
pub fn fetch(repo: &Repository, remote_name: &str) -> Result<()> {
    let mut remote = repo
        .find_remote(remote_name)
        .map_err(|_| Error::RemoteNotFound {
            name: remote_name.to_string(),
        })?;

    remote
        .fetch(&[] as &[&str], None, None)
        .map_err(|e| Error::FetchFailed {
            message: e.message().to_string(),
        })?;

    Ok(())
}

/// Tip of the remote-tracking branch `<remote>/<branch>`.
pub fn remote_tip(repo: &Repository, remote_name: &str, branch: &str) -> Result<Oid> {
    let name = format!("{}/{}", remote_name, branch);
    let remote_branch = repo
        .find_branch(&name, BranchType::Remote)
        .map_err(|_| Error::RemoteBranchNotFound { name: name.clone() })?;

    remote_branch
        .get()
        .target()
        .ok_or(Error::RemoteBranchNotFound { name })
}
