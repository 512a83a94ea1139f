//! Error types for the DDNS system
//!
//! This module defines all error types used throughout the crate.
//!
//! Errors raised inside a reconciliation cycle (`Transport`, `NotFound`,
//! `MalformedResponse`, ...) are logged by the engine and never stop the
//! daemon. Only `Lifecycle` errors are fatal to a run.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// Network/transport failure talking to the IP locator or DNS provider
    #[error("Transport error: {0}")]
    Transport(String),

    /// Expected DNS record is absent, has the wrong type, or has no value
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Address-echo (or provider) response could not be parsed, or was empty
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Scheduler failed to start or stop
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a lifecycle error
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error must end the run instead of being logged per cycle
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Lifecycle(_))
    }
}
