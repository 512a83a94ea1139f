//! Configuration types for the DDNS system
//!
//! This module defines all configuration structures used throughout the crate.
//! Loading them (from the environment) is the daemon's job; the types here only
//! hold and validate values.

use std::time::Duration;

/// Default interval between reconciliation cycles (5 minutes)
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// TTL used by providers when the configured TTL is zero
pub const DEFAULT_TTL: u32 = 60;

/// Identity of the single DNS record kept in sync
///
/// Configured once when the provider is built and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordConfig {
    /// Hosted zone identifier
    pub zone_id: String,

    /// DNS record name (e.g., "home.example.com")
    pub name: String,

    /// Time-to-live for the record, in seconds (0 = provider default)
    pub ttl: u32,
}

impl RecordConfig {
    /// Create a new record configuration
    pub fn new(zone_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            name: name.into(),
            ttl: 0,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Fully-qualified record name: lower-case, with exactly one trailing dot
    ///
    /// Route 53 reports names in lower case, so this is the form compared
    /// against lookups.
    pub fn fqdn(&self) -> String {
        let name = self.name.trim().to_ascii_lowercase();
        if name.ends_with('.') {
            name
        } else {
            format!("{}.", name)
        }
    }

    /// TTL with the zero value mapped to [`DEFAULT_TTL`]
    pub fn effective_ttl(&self) -> u32 {
        if self.ttl == 0 { DEFAULT_TTL } else { self.ttl }
    }

    /// Validate the record configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zone_id.trim().is_empty() {
            return Err(crate::Error::config("Hosted zone ID cannot be empty"));
        }
        if self.name.trim_end_matches('.').is_empty() {
            return Err(crate::Error::config("Record name cannot be empty"));
        }
        Ok(())
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Interval between reconciliation cycles
    pub check_interval: Duration,
}

impl EngineConfig {
    /// Create a configuration with the given interval
    pub fn with_interval(check_interval: Duration) -> Self {
        Self { check_interval }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.check_interval.is_zero() {
            return Err(crate::Error::config("Check interval must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

/// Parse a check interval such as `30s`, `5m` or `1h30m`
///
/// An empty (or all-whitespace) value means "use the default".
pub fn parse_interval(value: &str) -> Result<Duration, crate::Error> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(DEFAULT_CHECK_INTERVAL);
    }

    let interval = humantime::parse_duration(value)
        .map_err(|e| crate::Error::config(format!("Invalid check interval '{}': {}", value, e)))?;

    if interval.is_zero() {
        return Err(crate::Error::config("Check interval must be > 0"));
    }

    Ok(interval)
}
