//! Shared handle to the local mirror
//!
//! One [`RepositoryHandle`] is created at startup and cloned into both the
//! synchronizer and the resolver. It owns two pieces of state:
//!
//! - the current root path, behind a `RwLock`. Resolver operations hold a
//!   read guard for their whole duration; the synchronizer takes the write
//!   guard only while it mutates the local tree (renaming a fresh clone into
//!   place, checking out a fetched commit). Network I/O happens outside the
//!   lock, so a slow clone never blocks readers.
//! - the [`SyncState`], so "never synchronized" is observable instead of
//!   looking like an empty repository.

use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Error, Result};

/// Synchronization status of the local mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncState {
    /// No sync has completed during this process lifetime.
    NeverSynced,

    /// A sync is running.
    Syncing {
        since: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous_head: Option<String>,
    },

    /// The last sync succeeded.
    Synced { head: String, at: DateTime<Utc> },

    /// The last sync failed; the tree on disk is whatever was there before.
    Failed {
        message: String,
        at: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous_head: Option<String>,
    },
}

impl SyncState {
    /// Head commit of the most recent successful sync, if any.
    pub fn last_head(&self) -> Option<&str> {
        match self {
            Self::NeverSynced => None,
            Self::Synced { head, .. } => Some(head),
            Self::Syncing { previous_head, .. } | Self::Failed { previous_head, .. } => {
                previous_head.as_deref()
            }
        }
    }

    /// Whether a sync has succeeded at least once.
    pub fn has_succeeded(&self) -> bool {
        self.last_head().is_some()
    }
}

#[derive(Debug)]
struct Inner {
    root: RwLock<PathBuf>,
    state: RwLock<SyncState>,
}

/// Cheaply clonable handle to the mirrored repository root.
#[derive(Debug, Clone)]
pub struct RepositoryHandle {
    inner: Arc<Inner>,
}

impl RepositoryHandle {
    /// Create a handle for `root`. Nothing is touched on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                root: RwLock::new(root.into()),
                state: RwLock::new(SyncState::NeverSynced),
            }),
        }
    }

    /// Create the root directory if it does not exist yet.
    pub fn ensure_exists(&self) -> Result<()> {
        let root = self.root();
        fs::create_dir_all(&root).map_err(|e| Error::io(&root, e))
    }

    /// Current root path. Never blocks on a writer for longer than a rename.
    pub fn root(&self) -> PathBuf {
        self.read().to_path_buf()
    }

    /// Hold the root for the duration of a read operation.
    pub fn read(&self) -> RootGuard<'_> {
        RootGuard {
            guard: self
                .inner
                .root
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Exclusive access for mutating the tree on disk.
    pub fn write(&self) -> RootWriteGuard<'_> {
        RootWriteGuard {
            guard: self
                .inner
                .root
                .write()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Snapshot of the current sync state.
    pub fn sync_state(&self) -> SyncState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_sync_state(&self, state: SyncState) {
        *self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Mark a sync as started, remembering the last good head.
    pub fn mark_syncing(&self) {
        let previous_head = self.sync_state().last_head().map(str::to_string);
        self.set_sync_state(SyncState::Syncing {
            since: Utc::now(),
            previous_head,
        });
    }

    pub fn mark_synced(&self, head: impl Into<String>) {
        self.set_sync_state(SyncState::Synced {
            head: head.into(),
            at: Utc::now(),
        });
    }

    pub fn mark_failed(&self, message: impl Into<String>) {
        let previous_head = self.sync_state().last_head().map(str::to_string);
        self.set_sync_state(SyncState::Failed {
            message: message.into(),
            at: Utc::now(),
            previous_head,
        });
    }
}

/// Read access to the root path.
pub struct RootGuard<'a> {
    guard: RwLockReadGuard<'a, PathBuf>,
}

impl Deref for RootGuard<'_> {
    type Target = Path;

    fn deref(&self) -> &Path {
        self.guard.as_path()
    }
}

/// Write access to the root path.
pub struct RootWriteGuard<'a> {
    guard: RwLockWriteGuard<'a, PathBuf>,
}

impl RootWriteGuard<'_> {
    pub fn path(&self) -> &Path {
        self.guard.as_path()
    }

    /// Point the handle at a different directory, returning the old root.
    pub fn replace(&mut self, root: PathBuf) -> PathBuf {
        std::mem::replace(&mut *self.guard, root)
    }
}
