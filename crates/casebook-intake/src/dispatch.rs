// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fire-and-forget dispatch of intake runs.
//!
//! Each accepted event runs on its own task. The caller gets no handle and no
//! result; outcomes are visible only in logs and metrics.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::event::InboundEvent;
use crate::orchestrator::IntakeOrchestrator;

/// Spawns intake runs and waits for them on shutdown.
#[derive(Clone)]
pub struct IntakeDispatcher {
    orchestrator: Arc<IntakeOrchestrator>,
    tracker: TaskTracker,
}

impl IntakeDispatcher {
    pub fn new(orchestrator: Arc<IntakeOrchestrator>) -> Self {
        Self {
            orchestrator,
            tracker: TaskTracker::new(),
        }
    }

    /// Starts a background run for `event` and returns immediately.
    ///
    /// Runs started after [`drain`](Self::drain) has begun are still tracked,
    /// so a pending drain also waits for them.
    pub fn dispatch(&self, event: InboundEvent) {
        let orchestrator = Arc::clone(&self.orchestrator);
        self.tracker.spawn(async move {
            // Failures are logged and counted inside `process`.
            if let Ok(outcome) = orchestrator.process(&event).await {
                debug!(outcome = outcome.label(), "intake run finished");
            }
        });
    }

    /// Number of runs still in flight.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Closes the tracker and waits up to `timeout` for every tracked run.
    ///
    /// Returns true when every run finished in time. Runs that outlive the
    /// timeout are not cancelled.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending == 0 {
            info!("no intake runs to drain");
            return true;
        }

        info!(count = pending, "waiting for intake runs to complete");
        match tokio::time::timeout(timeout, self.tracker.wait()).await {
            Ok(()) => {
                info!("all intake runs drained");
                true
            }
            Err(_) => {
                warn!(
                    remaining = self.tracker.len(),
                    "drain timeout reached, exiting with runs in flight"
                );
                false
            }
        }
    }
}
