//! Error types for compdoc-git

use std::path::PathBuf;

/// Result type for compdoc-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in compdoc-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] compdoc_fs::Error),

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Remote branch '{name}' not found")]
    RemoteBranchNotFound { name: String },

    #[error("HEAD is detached; cannot determine the branch to track")]
    DetachedHead,

    #[error("Fetch failed: {message}")]
    FetchFailed { message: String },

    #[error("Clone of {url} failed: {message}")]
    CloneFailed { url: String, message: String },

    #[error("Merge conflict: {message}")]
    MergeConflict { message: String },

    #[error("Invalid local path: {path}")]
    InvalidLocalPath { path: PathBuf },
}
