//! Filesystem primitives for compdoc
//!
//! Provides normalized relative paths, bounded text reads, flat directory
//! listings, and the [`RepositoryHandle`] shared between the synchronizer
//! and the resolver.

pub mod error;
pub mod handle;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use handle::{RepositoryHandle, RootGuard, RootWriteGuard, SyncState};
pub use path::{NormalizedPath, validate_path_identifier};
