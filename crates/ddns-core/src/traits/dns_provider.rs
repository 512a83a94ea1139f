// # DNS Provider Trait
//
// Defines the interface for reading and rewriting the managed DNS record.
//
// ## Implementations
//
// - AWS Route 53: `ddns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let result = provider
//         .update_record(std::net::IpAddr::from([203, 0, 113, 5]))
//         .await?;
//     println!("updated: {}", result.is_updated());
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// Result of a DNS update operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResult {
    /// Record was rewritten
    Updated {
        /// The value the record held before the write
        previous_ip: IpAddr,
        /// The new IP address
        new_ip: IpAddr,
    },
    /// Record already had the correct IP (no write issued)
    Unchanged {
        /// The current IP address
        current_ip: IpAddr,
    },
}

impl UpdateResult {
    /// Whether a write was issued
    pub fn is_updated(&self) -> bool {
        matches!(self, UpdateResult::Updated { .. })
    }

    /// The address the record holds after the operation
    pub fn ip(&self) -> IpAddr {
        match self {
            UpdateResult::Updated { new_ip, .. } => *new_ip,
            UpdateResult::Unchanged { current_ip } => *current_ip,
        }
    }
}

/// Trait for DNS provider implementations
///
/// A provider is bound to exactly one record identity (zone, name, type A, TTL)
/// at construction time. Implementations supply the two primitive calls,
/// [`current_record`](DnsProvider::current_record) and
/// [`write_record`](DnsProvider::write_record); the compare-and-write logic in
/// [`update_record`](DnsProvider::update_record) is shared.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Single writer
///
/// The read-then-write in `update_record` is not atomic against another actor
/// editing the same record. The daemon is assumed to be the only writer, so
/// last-writer-wins is accepted.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Get the record's current value
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The first value of the record
    /// - `Err(Error::NotFound)`: No record with this exact name and type, or it has no value
    /// - `Err(Error)`: Transport failure
    async fn current_record(&self) -> Result<IpAddr, crate::Error>;

    /// Upsert the record with a single value and the configured TTL
    ///
    /// Always writes; callers wanting the idempotent behavior use
    /// [`update_record`](DnsProvider::update_record).
    async fn write_record(&self, ip: IpAddr) -> Result<(), crate::Error>;

    /// Update the record if its value differs from `new_ip`
    ///
    /// Reads the current value first. When it already equals `new_ip` no write
    /// is issued and `UpdateResult::Unchanged` is returned. A failed read is
    /// returned as-is and no write is attempted.
    async fn update_record(&self, new_ip: IpAddr) -> Result<UpdateResult, crate::Error> {
        let current_ip = self.current_record().await?;

        if current_ip == new_ip {
            tracing::debug!(
                record = self.record_name(),
                ip = %new_ip,
                "Record already up to date, skipping write"
            );
            return Ok(UpdateResult::Unchanged { current_ip });
        }

        self.write_record(new_ip).await?;

        Ok(UpdateResult::Updated {
            previous_ip: current_ip,
            new_ip,
        })
    }

    /// Fully-qualified name of the managed record (for logging)
    fn record_name(&self) -> &str;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "route53")
    fn provider_name(&self) -> &'static str;
}
