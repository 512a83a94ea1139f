//! Core traits for the DDNS system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpLocator`]: Discover the current public IP address
//! - [`DnsProvider`]: Read and rewrite the managed DNS record

pub mod ip_locator;
pub mod dns_provider;

pub use ip_locator::IpLocator;
pub use dns_provider::{DnsProvider, UpdateResult};
