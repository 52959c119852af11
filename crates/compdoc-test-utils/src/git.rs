//! Git repository fixtures built with `git2`.
//!
//! No `git` CLI or user config is needed: every commit is signed by a fixed
//! test identity and the initial branch is always `main`.

use std::fs;
use std::path::Path;

use git2::{Oid, Repository, RepositoryInitOptions, Signature};

/// Initialises a repository on `main` with `README.md` committed.
///
/// Use as the upstream a synchronizer clones from; its path works directly
/// as a remote URL.
///
/// # Panics
/// Panics if any git operation fails.
pub fn upstream_with_commit(path: &Path) -> Repository {
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Repository::init_opts(path, &opts).unwrap_or_else(|e| {
        panic!(
            "upstream_with_commit: failed to init repository at {}: {e}",
            path.display()
        )
    });

    commit_file(&repo, "README.md", "# Upstream\n", "Initial commit");
    repo
}

/// Writes `relative` into the work tree and commits it on HEAD.
///
/// # Panics
/// Panics if the write or any git operation fails.
pub fn commit_file(repo: &Repository, relative: &str, content: &str, message: &str) -> Oid {
    let workdir = repo
        .workdir()
        .unwrap_or_else(|| panic!("commit_file: repository has no work tree"));
    let target = workdir.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("commit_file: failed to create {}: {e}", parent.display()));
    }
    fs::write(&target, content)
        .unwrap_or_else(|e| panic!("commit_file: failed to write {relative}: {e}"));

    let mut index = repo
        .index()
        .unwrap_or_else(|e| panic!("commit_file: failed to open index: {e}"));
    index
        .add_path(Path::new(relative))
        .unwrap_or_else(|e| panic!("commit_file: failed to stage {relative}: {e}"));
    index
        .write()
        .unwrap_or_else(|e| panic!("commit_file: failed to write index: {e}"));
    let tree_id = index
        .write_tree()
        .unwrap_or_else(|e| panic!("commit_file: failed to write tree: {e}"));
    let tree = repo
        .find_tree(tree_id)
        .unwrap_or_else(|e| panic!("commit_file: failed to find tree: {e}"));

    let sig = test_signature();
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap_or_else(|e| panic!("commit_file: failed to commit {relative}: {e}"))
}

/// Commit id HEAD points at.
///
/// # Panics
/// Panics if HEAD cannot be resolved to a commit.
pub fn head_id(repo: &Repository) -> Oid {
    repo.head()
        .and_then(|head| head.peel_to_commit())
        .map(|commit| commit.id())
        .unwrap_or_else(|e| panic!("head_id: failed to resolve HEAD: {e}"))
}

/// Fixed identity for fixture commits.
pub fn test_signature() -> Signature<'static> {
    Signature::now("Test User", "test@example.com")
        .unwrap_or_else(|e| panic!("test_signature: {e}"))
}
