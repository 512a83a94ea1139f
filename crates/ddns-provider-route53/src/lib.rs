// # Route 53 DNS Provider
//
// This crate provides an AWS Route 53 DNS provider implementation for the DDNS system.
//
// ## Behavior
//
// - Bound to one record identity (hosted zone, fully-qualified name, type A, TTL)
// - One API call per primitive: a list to read, a change batch to write
// - Writes are a single `UPSERT`, so the record is created if it is missing
//   at write time
// - NO retry, NO backoff (the next scheduled cycle is the retry)
// - NO caching: every read goes to Route 53
// - Dry-run mode performs reads and logs the write instead of sending it
//
// ## Credentials
//
// Resolved by the AWS default provider chain (environment, profile, IMDS, ...).
// The provider itself never holds or logs secrets.
//
// ## API Reference
//
// - ListResourceRecordSets: `GET /2013-04-01/hostedzone/{Id}/rrset?name=...&type=A&maxitems=1`
// - ChangeResourceRecordSets: `POST /2013-04-01/hostedzone/{Id}/rrset/` with one UPSERT change

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_route53::Client;
use aws_sdk_route53::error::DisplayErrorContext;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use ddns_core::config::RecordConfig;
use ddns_core::traits::DnsProvider;
use ddns_core::{Error, Result};
use std::net::IpAddr;
use std::time::Duration;

/// Upper bound for a single Route 53 API operation, including SDK-internal attempts
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// AWS Route 53 DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform the list request (record lookup)
/// - Log the intended change batch
/// - **NOT** actually modify DNS records
pub struct Route53Provider {
    /// Route 53 API client
    client: Client,

    /// Hosted zone ID
    zone_id: String,

    /// Fully-qualified record name (trailing dot)
    record_name: String,

    /// TTL written with every upsert
    ttl: i64,

    /// Dry-run mode: if true, perform reads but skip writes
    dry_run: bool,
}

impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("zone_id", &self.zone_id)
            .field("record_name", &self.record_name)
            .field("ttl", &self.ttl)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Route53Provider {
    /// Create a provider from an existing Route 53 client
    ///
    /// The record name is canonicalized to its fully-qualified form here, once.
    /// A zero TTL falls back to [`ddns_core::config::DEFAULT_TTL`].
    pub fn new(client: Client, record: &RecordConfig, dry_run: bool) -> Result<Self> {
        record.validate()?;

        Ok(Self {
            client,
            zone_id: record.zone_id.clone(),
            record_name: record.fqdn(),
            ttl: i64::from(record.effective_ttl()),
            dry_run,
        })
    }

    /// Create a provider using the AWS default credential and region chain
    pub async fn from_env(record: &RecordConfig, dry_run: bool) -> Result<Self> {
        let timeouts = TimeoutConfig::builder()
            .operation_timeout(DEFAULT_OPERATION_TIMEOUT)
            .build();

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .timeout_config(timeouts)
            .load()
            .await;

        if dry_run {
            tracing::warn!("Route 53 provider running in DRY-RUN mode - no changes will be made");
        }

        Self::new(Client::new(&sdk_config), record, dry_run)
    }

    /// Hosted zone ID
    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    /// TTL written with every upsert
    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    /// Whether writes are suppressed
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Build the single-change UPSERT batch for `ip`
    fn upsert_batch(&self, ip: IpAddr) -> Result<ChangeBatch> {
        if !ip.is_ipv4() {
            return Err(Error::invalid_input(format!(
                "A record '{}' can only hold IPv4 addresses, got {}",
                self.record_name, ip
            )));
        }

        let record = ResourceRecord::builder()
            .value(ip.to_string())
            .build()
            .map_err(build_error)?;

        let record_set = ResourceRecordSet::builder()
            .name(&self.record_name)
            .r#type(RrType::A)
            .ttl(self.ttl)
            .resource_records(record)
            .build()
            .map_err(build_error)?;

        let change = Change::builder()
            .action(ChangeAction::Upsert)
            .resource_record_set(record_set)
            .build()
            .map_err(build_error)?;

        ChangeBatch::builder()
            .changes(change)
            .comment("ddnsd public IP sync")
            .build()
            .map_err(build_error)
    }
}

fn build_error(err: aws_sdk_route53::error::BuildError) -> Error {
    Error::provider("route53", format!("Failed to build request: {}", err))
}

/// Pick the record's value out of a `ListResourceRecordSets` page
///
/// The list starts at (name, A), so the first set is either the record we
/// manage or whatever follows it in Route 53's ordering.
fn select_record_value(record_sets: &[ResourceRecordSet], record_name: &str) -> Result<IpAddr> {
    let record_set = record_sets
        .first()
        .ok_or_else(|| Error::not_found(format!("Record '{}' not found", record_name)))?;

    if record_set.name() != record_name || *record_set.r#type() != RrType::A {
        return Err(Error::not_found(format!(
            "Record with A type for '{}' not found",
            record_name
        )));
    }

    let value = record_set
        .resource_records()
        .first()
        .map(|record| record.value())
        .ok_or_else(|| {
            Error::not_found(format!("Record '{}' does not contain IP address", record_name))
        })?;

    value.parse().map_err(|_| {
        Error::malformed(format!(
            "Record '{}' holds an invalid IP address: {}",
            record_name, value
        ))
    })
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn current_record(&self) -> Result<IpAddr> {
        tracing::debug!(zone = %self.zone_id, record = %self.record_name, "Looking up record");

        let output = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(&self.zone_id)
            .start_record_name(&self.record_name)
            .start_record_type(RrType::A)
            .max_items(1)
            .send()
            .await
            .map_err(|e| {
                Error::transport(format!(
                    "Error while getting DNS records: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        select_record_value(output.resource_record_sets(), &self.record_name)
    }

    async fn write_record(&self, ip: IpAddr) -> Result<()> {
        let batch = self.upsert_batch(ip)?;

        if self.dry_run {
            tracing::info!(
                zone = %self.zone_id,
                record = %self.record_name,
                ip = %ip,
                ttl = self.ttl,
                "[DRY-RUN] Would send UPSERT change batch"
            );
            return Ok(());
        }

        tracing::info!(
            record = %self.record_name,
            ip = %ip,
            ttl = self.ttl,
            "Upserting Route 53 record"
        );

        self.client
            .change_resource_record_sets()
            .hosted_zone_id(&self.zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| {
                Error::transport(format!(
                    "Error while updating DNS record: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }

    fn record_name(&self) -> &str {
        &self.record_name
    }

    fn provider_name(&self) -> &'static str {
        "route53"
    }
}
