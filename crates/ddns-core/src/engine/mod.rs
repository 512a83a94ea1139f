//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Running reconciliation cycles (IpLocator → compare → DnsProvider)
//! - Driving its [`Scheduler`] with that cycle
//! - Owning the service lifecycle (start, wait for termination, stop)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   tick    ┌──────────────┐
//! │  Scheduler  │──────────▶│ run_cycle()  │
//! └─────────────┘           └──────────────┘
//!                                  │
//!                 ┌────────────────┴────────────────┐
//!                 ▼                                 ▼
//!          ┌─────────────┐                  ┌──────────────┐
//!          │  IpLocator  │                  │ DnsProvider  │
//!          │ (observe)   │                  │ (compare +   │
//!          └─────────────┘                  │  update)     │
//!                                           └──────────────┘
//! ```
//!
//! ## Cycle Flow
//!
//! 1. Ask the IpLocator for the current public IP
//! 2. Hand it to `DnsProvider::update_record()`, which reads the record and
//!    writes only if the value differs
//! 3. Log updated / unchanged / failed
//!
//! A failed cycle never stops the engine; the next tick is the retry.

mod signal;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::scheduler::Scheduler;
use crate::traits::{DnsProvider, IpLocator, UpdateResult};
use signal::ShutdownSignals;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

/// Successful outcome of one reconciliation cycle
///
/// A failed cycle is the `Err` side of [`DdnsEngine::run_cycle`].
pub type CycleOutcome = UpdateResult;

/// Core DDNS engine
///
/// The engine exclusively owns its IP locator, DNS provider and scheduler.
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Start with [`DdnsEngine::run()`] (or [`DdnsEngine::run_with_shutdown()`])
/// 3. One cycle runs immediately, then the scheduler takes over
/// 4. On termination the scheduler is stopped and `run` returns
///
/// ## Failure semantics
///
/// Cycle failures are logged and swallowed. Only scheduler start/stop failures
/// (and failing to install signal handlers) are returned from `run`.
pub struct DdnsEngine {
    /// IP locator for discovering the public address
    ip_locator: Arc<dyn IpLocator>,

    /// DNS provider for the managed record
    provider: Arc<dyn DnsProvider>,

    /// Periodic trigger for cycles
    scheduler: Scheduler,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_locator`: IP locator implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: Engine configuration
    pub fn new(
        ip_locator: Box<dyn IpLocator>,
        provider: Box<dyn DnsProvider>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_locator: Arc::from(ip_locator),
            provider: Arc::from(provider),
            scheduler: Scheduler::new(config.check_interval),
        })
    }

    /// Interval between scheduled cycles
    pub fn check_interval(&self) -> Duration {
        self.scheduler.interval()
    }

    /// Perform a single reconciliation cycle
    ///
    /// # Returns
    ///
    /// - `Ok(CycleOutcome::Updated)`: the record was rewritten
    /// - `Ok(CycleOutcome::Unchanged)`: the record already matched
    /// - `Err(Error)`: the locator or provider failed (already logged)
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        reconcile(self.ip_locator.as_ref(), self.provider.as_ref()).await
    }

    /// Run the engine until SIGINT/SIGTERM
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown
    /// - `Err(Error::Lifecycle)`: scheduler or signal handling failed
    pub async fn run(&self) -> Result<()> {
        let mut signals = ShutdownSignals::install()?;
        self.run_until(async move { signals.recv().await }).await
    }

    /// Run the engine until `shutdown_rx` fires (or its sender is dropped)
    ///
    /// Same lifecycle as [`run`](DdnsEngine::run), with the termination request
    /// delivered over a channel instead of OS signals. Used when embedding the
    /// engine and in tests.
    pub async fn run_with_shutdown(&self, shutdown_rx: oneshot::Receiver<()>) -> Result<()> {
        self.run_until(async move {
            let _ = shutdown_rx.await;
            "shutdown channel"
        })
        .await
    }

    async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = &'static str>,
    {
        info!(
            record = self.provider.record_name(),
            provider = self.provider.provider_name(),
            locator = self.ip_locator.locator_name(),
            interval = %humantime::format_duration(self.check_interval()),
            "Starting dynamic DNS engine"
        );

        // First cycle runs before the schedule engages.
        if let Err(e) = self.run_cycle().await {
            debug!(error = %e, "Initial DNS check failed");
        }

        let ip_locator = Arc::clone(&self.ip_locator);
        let provider = Arc::clone(&self.provider);
        self.scheduler.start(move || {
            let ip_locator = Arc::clone(&ip_locator);
            let provider = Arc::clone(&provider);
            async move {
                reconcile(ip_locator.as_ref(), provider.as_ref())
                    .await
                    .map(|_| ())
            }
        })?;

        info!("DNS update service running");

        let reason = shutdown.await;
        info!(reason, "Shutdown signal received, stopping service");

        if let Err(e) = self.scheduler.stop().await {
            error!(error = %e, "Failed to stop scheduler");
            return Err(e);
        }

        info!("Service stopped");
        Ok(())
    }
}

impl std::fmt::Debug for DdnsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DdnsEngine")
            .field("record", &self.provider.record_name())
            .field("provider", &self.provider.provider_name())
            .field("locator", &self.ip_locator.locator_name())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

/// One observe-compare-update pass
async fn reconcile(
    ip_locator: &dyn IpLocator,
    provider: &dyn DnsProvider,
) -> Result<CycleOutcome> {
    let ip = match ip_locator.current_ip().await {
        Ok(ip) => ip,
        Err(e) => {
            error!(
                locator = ip_locator.locator_name(),
                error = %e,
                "Failed to get current IP"
            );
            return Err(e);
        }
    };

    match provider.update_record(ip).await {
        Ok(outcome) => {
            match &outcome {
                UpdateResult::Updated {
                    previous_ip,
                    new_ip,
                } => info!(
                    record = provider.record_name(),
                    previous = %previous_ip,
                    ip = %new_ip,
                    "DNS record updated"
                ),
                UpdateResult::Unchanged { current_ip } => info!(
                    record = provider.record_name(),
                    ip = %current_ip,
                    "DNS record is up to date"
                ),
            }
            Ok(outcome)
        }
        Err(e) => {
            error!(
                record = provider.record_name(),
                provider = provider.provider_name(),
                ip = %ip,
                error = %e,
                "Failed to update DNS record"
            );
            Err(e)
        }
    }
}
