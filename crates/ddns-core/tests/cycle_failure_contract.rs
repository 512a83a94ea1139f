//! Contract Test: Cycle Failure Isolation
//!
//! Constraints verified:
//! - A failing locator short-circuits the cycle before the provider is touched
//! - A failing record read never leads to a write
//! - Cycle failures are returned, never fatal, and do not stop the scheduler
//!
//! If this test fails, a transient error can cause spurious writes or kill
//! the daemon.

mod common;

use common::*;
use ddns_core::{DdnsEngine, Error};
use std::time::Duration;
use tokio_test::assert_ok;

#[tokio::test]
async fn locator_failure_skips_provider() {
    let locator = MockIpLocator::answering(LocatorAnswer::TransportFailure);
    let provider = InMemoryDnsProvider::with_record(ip(203, 0, 113, 1));

    let engine = DdnsEngine::new(
        Box::new(locator.clone()),
        Box::new(provider.clone()),
        config_with_interval_secs(300),
    )
    .expect("engine construction succeeds");

    let err = engine.run_cycle().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(!err.is_fatal());
    assert_eq!(locator.call_count(), 1);
    assert_eq!(provider.read_count(), 0);
    assert_eq!(provider.write_count(), 0);
}

#[tokio::test]
async fn empty_address_is_malformed_and_skips_provider() {
    let locator = MockIpLocator::answering(LocatorAnswer::Empty);
    let provider = InMemoryDnsProvider::with_record(ip(203, 0, 113, 1));

    let engine = DdnsEngine::new(
        Box::new(locator),
        Box::new(provider.clone()),
        config_with_interval_secs(300),
    )
    .expect("engine construction succeeds");

    let err = engine.run_cycle().await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
    assert_eq!(provider.read_count(), 0);
}

#[tokio::test]
async fn read_failure_skips_write() {
    let locator = MockIpLocator::new(ip(203, 0, 113, 5));
    let provider = InMemoryDnsProvider::with_record(ip(203, 0, 113, 1));
    provider.set_fail_reads(true);

    let engine = DdnsEngine::new(
        Box::new(locator),
        Box::new(provider.clone()),
        config_with_interval_secs(300),
    )
    .expect("engine construction succeeds");

    let err = engine.run_cycle().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(provider.read_count(), 1);
    assert_eq!(provider.write_count(), 0);
    assert_eq!(provider.record(), Some(ip(203, 0, 113, 1)));
}

#[tokio::test]
async fn missing_record_is_not_found_and_skips_write() {
    let locator = MockIpLocator::new(ip(203, 0, 113, 5));
    let provider = InMemoryDnsProvider::without_record();

    let engine = DdnsEngine::new(
        Box::new(locator),
        Box::new(provider.clone()),
        config_with_interval_secs(300),
    )
    .expect("engine construction succeeds");

    let err = engine.run_cycle().await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(provider.write_count(), 0);
}

#[tokio::test]
async fn write_failure_leaves_record_untouched() {
    let locator = MockIpLocator::new(ip(203, 0, 113, 5));
    let provider = InMemoryDnsProvider::with_record(ip(203, 0, 113, 1));
    provider.set_fail_writes(true);

    let engine = DdnsEngine::new(
        Box::new(locator),
        Box::new(provider.clone()),
        config_with_interval_secs(300),
    )
    .expect("engine construction succeeds");

    assert!(engine.run_cycle().await.is_err());
    assert_eq!(provider.write_count(), 1);
    assert_eq!(provider.record(), Some(ip(203, 0, 113, 1)));
}

#[tokio::test(start_paused = true)]
async fn failing_cycles_keep_the_schedule_alive() {
    let locator = MockIpLocator::answering(LocatorAnswer::Empty);
    let provider = InMemoryDnsProvider::with_record(ip(203, 0, 113, 1));

    let engine = DdnsEngine::new(
        Box::new(locator.clone()),
        Box::new(provider.clone()),
        config_with_interval_secs(30),
    )
    .expect("engine construction succeeds");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let engine_handle = tokio::spawn(async move { engine.run_with_shutdown(shutdown_rx).await });

    // Initial cycle + immediate tick, then ticks at 30s and 60s; all fail.
    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(locator.call_count(), 4);
    assert_eq!(provider.read_count(), 0);

    // The address comes back: the very next tick repairs the record.
    locator.set_answer(LocatorAnswer::Ip(ip(203, 0, 113, 5)));
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(provider.record(), Some(ip(203, 0, 113, 5)));
    assert_eq!(provider.write_count(), 1);

    shutdown_tx.send(()).unwrap();
    let result = engine_handle.await.expect("engine task completes");
    assert_ok!(result);
}
