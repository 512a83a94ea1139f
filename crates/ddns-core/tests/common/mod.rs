//! Test doubles and common utilities for engine contract tests
//!
//! In-memory stand-ins for the IP locator and DNS provider. Both are `Clone`;
//! clones share state, so a test keeps one handle and gives the other to the
//! engine.

#![allow(dead_code)]

use ddns_core::config::EngineConfig;
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, IpLocator};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fake locator answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorAnswer {
    /// A valid address
    Ip(IpAddr),
    /// The echo service answered with an empty address
    Empty,
    /// The request never completed
    TransportFailure,
}

/// An IpLocator whose answer the test controls
#[derive(Clone)]
pub struct MockIpLocator {
    answer: Arc<Mutex<LocatorAnswer>>,
    call_count: Arc<AtomicUsize>,
}

impl MockIpLocator {
    pub fn new(ip: IpAddr) -> Self {
        Self::answering(LocatorAnswer::Ip(ip))
    }

    pub fn answering(answer: LocatorAnswer) -> Self {
        Self {
            answer: Arc::new(Mutex::new(answer)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Change the answer for subsequent calls
    pub fn set_answer(&self, answer: LocatorAnswer) {
        *self.answer.lock().unwrap() = answer;
    }

    /// Get the number of times current_ip() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpLocator for MockIpLocator {
    async fn current_ip(&self) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match *self.answer.lock().unwrap() {
            LocatorAnswer::Ip(ip) => Ok(ip),
            LocatorAnswer::Empty => Err(Error::malformed("empty IP address received")),
            LocatorAnswer::TransportFailure => Err(Error::transport("connection refused")),
        }
    }

    fn locator_name(&self) -> &'static str {
        "mock"
    }
}

/// A DnsProvider holding the record value in memory and counting calls
#[derive(Clone)]
pub struct InMemoryDnsProvider {
    record: Arc<Mutex<Option<IpAddr>>>,
    read_count: Arc<AtomicUsize>,
    write_count: Arc<AtomicUsize>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryDnsProvider {
    /// Provider whose record currently holds `ip`
    pub fn with_record(ip: IpAddr) -> Self {
        Self::new(Some(ip))
    }

    /// Provider whose zone has no matching record
    pub fn without_record() -> Self {
        Self::new(None)
    }

    fn new(record: Option<IpAddr>) -> Self {
        Self {
            record: Arc::new(Mutex::new(record)),
            read_count: Arc::new(AtomicUsize::new(0)),
            write_count: Arc::new(AtomicUsize::new(0)),
            fail_reads: Arc::new(AtomicBool::new(false)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current value of the record
    pub fn record(&self) -> Option<IpAddr> {
        *self.record.lock().unwrap()
    }

    /// Get the number of times current_record() was called
    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    /// Get the number of times write_record() was called
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Make reads fail with a transport error
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make writes fail with a transport error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl DnsProvider for InMemoryDnsProvider {
    async fn current_record(&self) -> Result<IpAddr> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::transport("list request timed out"));
        }
        self.record()
            .ok_or_else(|| Error::not_found("record 'home.example.com.' not found"))
    }

    async fn write_record(&self, ip: IpAddr) -> Result<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::transport("change request timed out"));
        }
        *self.record.lock().unwrap() = Some(ip);
        Ok(())
    }

    fn record_name(&self) -> &str {
        "home.example.com."
    }

    fn provider_name(&self) -> &'static str {
        "in-memory"
    }
}

/// Engine configuration with the given interval in seconds
pub fn config_with_interval_secs(secs: u64) -> EngineConfig {
    EngineConfig::with_interval(Duration::from_secs(secs))
}

pub fn ip(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
    IpAddr::from([a, b, c, d])
}
