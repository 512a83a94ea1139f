//! OS termination signals for production runs

use crate::error::{Error, Result};

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// SIGTERM/SIGINT listeners, installed up front so an early signal is not lost
#[cfg(unix)]
pub(crate) struct ShutdownSignals {
    sigterm: Signal,
    sigint: Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    pub(crate) fn install() -> Result<Self> {
        let sigterm = signal(SignalKind::terminate())
            .map_err(|e| Error::lifecycle(format!("Failed to setup SIGTERM handler: {}", e)))?;
        let sigint = signal(SignalKind::interrupt())
            .map_err(|e| Error::lifecycle(format!("Failed to setup SIGINT handler: {}", e)))?;

        Ok(Self { sigterm, sigint })
    }

    /// Wait for either signal and return its name
    pub(crate) async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        }
    }
}

/// Ctrl-C only on non-Unix platforms
#[cfg(not(unix))]
pub(crate) struct ShutdownSignals;

#[cfg(not(unix))]
impl ShutdownSignals {
    pub(crate) fn install() -> Result<Self> {
        Ok(Self)
    }

    pub(crate) async fn recv(&mut self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to wait for CTRL-C, shutting down");
        }
        "SIGINT"
    }
}
