// # IP Locator Trait
//
// Defines the interface for discovering the caller's current public IP address.
//
// ## Implementations
//
// - HTTP address-echo services (ipify and friends): `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpLocator;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let locator = /* IpLocator implementation */;
//
//     let current_ip = locator.current_ip().await?;
//     println!("public address: {}", current_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for IP locator implementations
///
/// A locator answers one question on demand: "what is my public address right
/// now?". It is polled by the engine once per reconciliation cycle.
///
/// # Contract
///
/// - One attempt per call, no retry (the next scheduled cycle is the retry)
/// - No caching between calls
/// - Bounded by a request timeout
/// - An empty or unparsable answer is `Error::MalformedResponse`
#[async_trait]
pub trait IpLocator: Send + Sync {
    /// Get the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current IP address
    /// - `Err(Error)`: If the address could not be determined
    async fn current_ip(&self) -> Result<IpAddr, crate::Error>;

    /// Get the locator name (for logging/debugging)
    fn locator_name(&self) -> &'static str;
}
