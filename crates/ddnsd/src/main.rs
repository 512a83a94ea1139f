// # ddnsd - DDNS Daemon
//
// Thin integration layer: reads configuration from the environment, builds the
// Route 53 provider and HTTP IP locator, and runs the ddns-core engine until
// SIGINT/SIGTERM. All reconciliation logic lives in ddns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Record
// - `DDNS_HOSTED_ZONE_ID`: Route 53 hosted zone ID (required)
// - `DDNS_RECORD_NAME`: A record to keep in sync (required)
// - `DDNS_RECORD_TTL`: TTL in seconds (default: 300)
//
// ### Engine
// - `DDNS_CHECK_INTERVAL`: Duration string, e.g. `30s`, `5m` (default: 5m)
//
// ### IP Locator
// - `DDNS_IP_LOCATOR_URL`: Address-echo endpoint (default: ipify JSON)
// - `DDNS_IP_LOCATOR_FORMAT`: `json` or `text` (default: json)
//
// ### Misc
// - `DDNS_MODE`: `dry-run` to read without writing
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// AWS credentials and region come from the standard AWS environment/profile chain.
//
// ## Example
//
// ```bash
// export DDNS_HOSTED_ZONE_ID=Z0123456789ABC
// export DDNS_RECORD_NAME=home.example.com
// export DDNS_CHECK_INTERVAL=2m
// export AWS_REGION=us-east-1
//
// ddnsd
// ```

use anyhow::{Context, Result};
use ddns_core::config::{EngineConfig, RecordConfig, parse_interval};
use ddns_core::DdnsEngine;
use ddns_ip_http::{DEFAULT_IP_LOCATOR_URL, HttpIpLocator, ResponseFormat};
use ddns_provider_route53::Route53Provider;
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Default TTL written to the record
const DEFAULT_RECORD_TTL: u32 = 300;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (scheduler start/stop failure)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    hosted_zone_id: String,
    record_name: String,
    record_ttl: u32,
    check_interval: Duration,
    ip_locator_url: String,
    ip_locator_format: ResponseFormat,
    dry_run: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let record_ttl = match lookup("DDNS_RECORD_TTL").filter(|s| !s.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DDNS_RECORD_TTL must be a number of seconds. Got: {}", raw))?,
            None => DEFAULT_RECORD_TTL,
        };

        let check_interval = parse_interval(&lookup("DDNS_CHECK_INTERVAL").unwrap_or_default())
            .context("Failed to parse DDNS_CHECK_INTERVAL")?;

        let ip_locator_format = match lookup("DDNS_IP_LOCATOR_FORMAT") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => ResponseFormat::Json,
        };

        Ok(Self {
            hosted_zone_id: lookup("DDNS_HOSTED_ZONE_ID").unwrap_or_default(),
            record_name: lookup("DDNS_RECORD_NAME").unwrap_or_default(),
            record_ttl,
            check_interval,
            ip_locator_url: lookup("DDNS_IP_LOCATOR_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_IP_LOCATOR_URL.to_string()),
            ip_locator_format,
            dry_run: lookup("DDNS_MODE").unwrap_or_default().to_lowercase() == "dry-run",
            log_level: lookup("DDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.hosted_zone_id.trim().is_empty() {
            anyhow::bail!(
                "DDNS_HOSTED_ZONE_ID is required. \
                Set it via: export DDNS_HOSTED_ZONE_ID=Z0123456789ABC"
            );
        }

        if self.record_name.trim().is_empty() {
            anyhow::bail!(
                "DDNS_RECORD_NAME is required. \
                Set it via: export DDNS_RECORD_NAME=home.example.com"
            );
        }

        validate_domain_name(&self.record_name)?;

        if !(1..=86_400).contains(&self.record_ttl) {
            anyhow::bail!(
                "DDNS_RECORD_TTL must be between 1 and 86400 seconds. Got: {}",
                self.record_ttl
            );
        }

        if !self.ip_locator_url.starts_with("https://") && !self.ip_locator_url.starts_with("http://") {
            anyhow::bail!(
                "DDNS_IP_LOCATOR_URL must use HTTP or HTTPS scheme. Got: {}",
                self.ip_locator_url
            );
        }

        if parse_log_level(&self.log_level).is_none() {
            anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        Ok(())
    }

    fn record(&self) -> RecordConfig {
        RecordConfig::new(self.hosted_zone_id.trim(), self.record_name.trim())
            .with_ttl(self.record_ttl)
    }
}

/// Basic RFC 1035 checks on the record name; a single trailing dot is allowed
fn validate_domain_name(domain: &str) -> Result<()> {
    let domain = domain.trim().strip_suffix('.').unwrap_or(domain.trim());

    if domain.is_empty() {
        anyhow::bail!("Domain name cannot be empty");
    }

    if domain.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric, hyphen and underscore only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

fn parse_log_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Structured logs go to stdout
    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stdout)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Initializing dynamic DNS service");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        let engine = match build_engine(&config).await {
            Ok(engine) => engine,
            Err(e) => {
                error!("Startup error: {:#}", e);
                return DdnsExitCode::ConfigError;
            }
        };

        match engine.run().await {
            Ok(()) => DdnsExitCode::CleanShutdown,
            Err(e) => {
                error!("Controller error: {}", e);
                DdnsExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Build the provider, locator and engine from configuration
async fn build_engine(config: &Config) -> Result<DdnsEngine> {
    let record = config.record();

    let provider = Route53Provider::from_env(&record, config.dry_run)
        .await
        .context("Failed to create DNS provider")?;

    let locator = HttpIpLocator::new(config.ip_locator_url.clone(), config.ip_locator_format);

    info!(
        zone = %record.zone_id,
        record = %record.fqdn(),
        ttl = record.effective_ttl(),
        locator = %locator.url(),
        dry_run = config.dry_run,
        "Configuration loaded"
    );

    let engine = DdnsEngine::new(
        Box::new(locator),
        Box::new(provider),
        EngineConfig::with_interval(config.check_interval),
    )?;

    Ok(engine)
}
