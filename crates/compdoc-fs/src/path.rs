//! Normalized path handling for cross-platform compatibility

use std::path::Path;

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Paths reported to callers (for example the relative path of a component
/// file) always use this form, regardless of the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Express `path` relative to `root`.
    ///
    /// Leading separators are trimmed from the result. A `path` outside
    /// `root` is kept whole (minus leading separators) rather than rejected.
    pub fn relative_to(root: &Path, path: &Path) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let normalized = Self::new(relative);
        Self {
            inner: normalized.inner.trim_start_matches('/').to_string(),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Validate a caller-supplied name that will be joined onto a trusted root.
///
/// Component and file names arrive from the protocol layer and must name a
/// single entry: no separators, no `.`/`..`, no NUL bytes.
pub fn validate_path_identifier(value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        Some("must not be empty")
    } else if value == "." || value == ".." {
        Some("must not be a relative directory marker")
    } else if value.contains('/') || value.contains('\\') {
        Some("must not contain path separators")
    } else if value.contains('\0') {
        Some("must not contain NUL bytes")
    } else if value.contains(':') && cfg!(windows) {
        Some("must not contain a drive or stream separator")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidIdentifier {
            value: value.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
