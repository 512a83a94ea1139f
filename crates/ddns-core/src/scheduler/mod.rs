//! Restartable periodic trigger
//!
//! The [`Scheduler`] runs a supplied action once immediately on [`start`](Scheduler::start)
//! and then once per interval on a background task, until [`stop`](Scheduler::stop).
//! It knows nothing about DNS; the engine hands it the reconciliation cycle.
//!
//! ## State machine
//!
//! ```text
//!            start(action)
//!   Idle  ─────────────────▶  Running
//!    ▲                           │
//!    └───────────── stop() ──────┘
//! ```
//!
//! - `start` while running is a no-op (never two tick sources)
//! - `stop` while idle is a no-op
//! - The state lock is held only around transitions, never while the action runs
//! - `stop` waits for a cycle already in flight instead of cancelling it

use crate::error::{Error, Result};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Handle on the background ticking task
struct RunningTask {
    /// Dropping or sending on this ends the task after the current cycle
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Periodic trigger with idempotent start/stop
///
/// Each instance owns at most one background task, so independent schedulers
/// can coexist (e.g. in tests).
pub struct Scheduler {
    interval: Duration,
    running: Mutex<Option<RunningTask>>,
}

impl Scheduler {
    /// Create an idle scheduler firing every `interval`
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: Mutex::new(None),
        }
    }

    /// The configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a background task is currently registered
    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .map(|state| state.is_some())
            .unwrap_or(false)
    }

    /// Start ticking with `action`
    ///
    /// The action fires immediately and then once per interval. Ticks and action
    /// execution share one task, so a cycle longer than the interval delays the
    /// next tick instead of overlapping it. A failing action is logged and does
    /// not affect later ticks.
    ///
    /// Returns `Ok(())` without doing anything if already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(&self, action: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        if self.interval.is_zero() {
            return Err(Error::lifecycle("Scheduler interval must be > 0"));
        }

        let mut state = self
            .running
            .lock()
            .map_err(|_| Error::lifecycle("Scheduler state lock poisoned"))?;

        if state.is_some() {
            debug!("Scheduler already running, ignoring start");
            return Ok(());
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(tick_loop(self.interval, action, shutdown_rx));

        *state = Some(RunningTask {
            shutdown_tx,
            handle,
        });

        info!(interval = ?self.interval, "Scheduler started");
        Ok(())
    }

    /// Stop ticking
    ///
    /// Signals the background task and waits for it to exit. A cycle already in
    /// flight completes first. Returns `Ok(())` without doing anything if idle.
    ///
    /// # Errors
    ///
    /// `Error::Lifecycle` if the state lock is poisoned or the background task
    /// panicked.
    pub async fn stop(&self) -> Result<()> {
        let task = self
            .running
            .lock()
            .map_err(|_| Error::lifecycle("Scheduler state lock poisoned"))?
            .take();

        let Some(RunningTask {
            shutdown_tx,
            handle,
        }) = task
        else {
            debug!("Scheduler not running, ignoring stop");
            return Ok(());
        };

        // The task may already be gone (e.g. it panicked); a failed send is fine.
        let _ = shutdown_tx.send(());

        handle
            .await
            .map_err(|e| Error::lifecycle(format!("Scheduler task failed: {}", e)))?;

        info!("Scheduler stopped");
        Ok(())
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .finish()
    }
}

async fn tick_loop<F, Fut>(interval: Duration, action: F, mut shutdown_rx: oneshot::Receiver<()>)
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    // First tick completes immediately.
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut tick: u64 = 0;
    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown_rx => break,
            _ = ticker.tick() => {}
        }

        tick += 1;
        // Outside the select: shutdown never cancels a running action.
        if let Err(e) = action().await {
            warn!(tick, error = %e, "Scheduled action failed");
        }
    }

    debug!(ticks = tick, "Scheduler task exiting");
}
