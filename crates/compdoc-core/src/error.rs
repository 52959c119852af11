//! Error types for compdoc-core

use std::path::PathBuf;

/// Result type for compdoc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in compdoc-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Explicitly requested configuration file does not exist
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// A configuration value failed validation
    #[error("Invalid configuration for `{field}`: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// The mirror has never been synchronized, so there is nothing to read
    #[error("Repository has not been synchronized yet (expected {path})")]
    NotSynchronized { path: PathBuf },

    /// A caller-supplied component or file name was rejected
    #[error("Invalid name '{value}': {reason}")]
    InvalidName { value: String, reason: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from compdoc-fs
    #[error(transparent)]
    Fs(#[from] compdoc_fs::Error),

    /// Git error from compdoc-git
    #[error(transparent)]
    Git(#[from] compdoc_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    /// Map identifier validation failures onto [`Error::InvalidName`].
    pub(crate) fn from_identifier(err: compdoc_fs::Error) -> Self {
        match err {
            compdoc_fs::Error::InvalidIdentifier { value, reason } => {
                Self::InvalidName { value, reason }
            }
            other => Self::Fs(other),
        }
    }
}
