//! Repository synchronization for compdoc
//!
//! Keeps exactly one local clone of one remote current. Staleness is a
//! fetch followed by a tip comparison; updating is a pull (fetch + merge)
//! on a valid clone, or a fresh clone otherwise.

pub mod error;
pub mod helpers;
pub mod sync;

pub use error::{Error, Result};
pub use sync::{Identity, RepositorySynchronizer, SyncOptions, UpdateOutcome};
