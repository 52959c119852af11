//! Background synchronization of the local mirror
//!
//! Runs once at startup and then on a fixed interval. Git work happens on
//! the blocking pool so the request loop never waits on the network. A run
//! that is still in flight when the next one is due is not doubled up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use compdoc_core::config::SyncConfig;
use compdoc_git::{RepositorySynchronizer, UpdateOutcome};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{Error, Result};

/// Drives a [`RepositorySynchronizer`] from a tokio task.
#[derive(Debug, Clone)]
pub struct SyncService {
    synchronizer: RepositorySynchronizer,
    config: SyncConfig,
    running: Arc<AtomicBool>,
}

/// Clears the in-flight flag when a run ends, however it ends.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncService {
    pub fn new(synchronizer: RepositorySynchronizer, config: SyncConfig) -> Self {
        Self {
            synchronizer,
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn synchronizer(&self) -> &RepositorySynchronizer {
        &self.synchronizer
    }

    /// Whether a run is in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Check and, if stale, update the mirror.
    ///
    /// Returns `Ok(None)` without doing anything when a run is already in
    /// flight.
    pub async fn sync_now(&self) -> Result<Option<UpdateOutcome>> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Sync already in progress, skipping");
            return Ok(None);
        }
        let _guard = RunningGuard(Arc::clone(&self.running));

        let synchronizer = self.synchronizer.clone();
        let outcome = tokio::task::spawn_blocking(move || synchronizer.sync_once())
            .await
            .map_err(|e| Error::SyncTask {
                message: e.to_string(),
            })??;

        Ok(Some(outcome))
    }

    /// Start the schedule. Returns `None` when neither startup nor periodic
    /// sync is configured.
    pub fn spawn(self) -> Option<JoinHandle<()>> {
        if !self.config.on_startup && self.config.interval_secs == 0 {
            tracing::info!("Background sync disabled");
            return None;
        }

        Some(tokio::spawn(async move {
            if self.config.on_startup {
                self.run_logged().await;
            }
            if self.config.interval_secs == 0 {
                return;
            }

            let period = Duration::from_secs(self.config.interval_secs);
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(interval_secs = self.config.interval_secs, "Periodic sync scheduled");
            loop {
                ticker.tick().await;
                self.run_logged().await;
            }
        }))
    }

    /// Failures are already recorded in the handle's sync state.
    async fn run_logged(&self) {
        match self.sync_now().await {
            Ok(Some(outcome)) => tracing::debug!(?outcome, "Background sync finished"),
            Ok(None) => {}
            Err(e) => tracing::error!(error = %e, "Background sync failed, serving existing copy"),
        }
    }
}
