// # HTTP IP Locator
//
// This crate provides an HTTP address-echo IP locator for the DDNS system.
//
// ## Purpose
//
// Asks a public "what is my IP" service for the caller's address, once per
// reconciliation cycle. The default service is ipify's JSON endpoint:
//
// ```text
// GET https://api.ipify.org?format=json
// {"ip":"203.0.113.5"}
// ```
//
// Plain-text services (icanhazip.com, ifconfig.me/ip) are supported through
// [`ResponseFormat::PlainText`].
//
// ## Behavior
//
// - One request per call, 10 second timeout, no retry, no caching
// - Non-success status → `Error::Transport`
// - Undecodable body, empty, unparsable or non-IPv4 address → `Error::MalformedResponse`

use async_trait::async_trait;
use ddns_core::traits::IpLocator;
use ddns_core::{Error, Result};
use serde::Deserialize;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

/// Default address-echo endpoint (ipify, JSON)
pub const DEFAULT_IP_LOCATOR_URL: &str = "https://api.ipify.org?format=json";

/// Default HTTP timeout for a lookup
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Shape of the echo service's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// `{"ip": "<address>"}`
    #[default]
    Json,
    /// The body is the address, possibly surrounded by whitespace
    PlainText,
}

impl FromStr for ResponseFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "text" | "plain" | "plaintext" => Ok(ResponseFormat::PlainText),
            other => Err(Error::config(format!(
                "Unknown IP locator response format '{}'. Supported: json, text",
                other
            ))),
        }
    }
}

/// JSON body returned by ipify
#[derive(Debug, Deserialize)]
struct IpifyResponse {
    ip: String,
}

/// HTTP-based IP locator
#[derive(Debug, Clone)]
pub struct HttpIpLocator {
    /// URL to fetch IP from
    url: String,

    /// Expected response body shape
    format: ResponseFormat,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpLocator {
    /// Create a locator for the default ipify JSON endpoint
    pub fn ipify() -> Self {
        Self::new(DEFAULT_IP_LOCATOR_URL, ResponseFormat::Json)
    }

    /// Create a locator for a custom endpoint
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the address from
    /// - `format`: Shape of the response body
    pub fn new(url: impl Into<String>, format: ResponseFormat) -> Self {
        Self::with_timeout(url, format, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, format: ResponseFormat, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            format,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// The endpoint being queried
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the body from the echo service
    async fn fetch_body(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "Unexpected response code: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))
    }
}

/// Extract the address from a response body
fn parse_body(body: &str, format: ResponseFormat) -> Result<IpAddr> {
    let raw = match format {
        ResponseFormat::Json => {
            let parsed: IpifyResponse = serde_json::from_str(body)
                .map_err(|e| Error::malformed(format!("Failed to decode JSON: {}", e)))?;
            parsed.ip
        }
        ResponseFormat::PlainText => body.to_string(),
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::malformed("Empty IP address received"));
    }

    let ip: IpAddr = raw
        .parse()
        .map_err(|_| Error::malformed(format!("Invalid IP address: {}", raw)))?;

    // The managed record is an A record.
    if !ip.is_ipv4() {
        return Err(Error::malformed(format!("Expected an IPv4 address, got {}", ip)));
    }

    Ok(ip)
}

#[async_trait]
impl IpLocator for HttpIpLocator {
    async fn current_ip(&self) -> Result<IpAddr> {
        let body = self.fetch_body().await?;
        let ip = parse_body(&body, self.format)?;
        tracing::debug!(url = %self.url, ip = %ip, "Discovered public IP");
        Ok(ip)
    }

    fn locator_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ipify_json() {
        let ip = parse_body(r#"{"ip":"203.0.113.5"}"#, ResponseFormat::Json).unwrap();
        assert_eq!(ip, IpAddr::from([203, 0, 113, 5]));
    }

    #[test]
    fn parses_plain_text_with_newline() {
        let ip = parse_body("198.51.100.23\n", ResponseFormat::PlainText).unwrap();
        assert_eq!(ip, IpAddr::from([198, 51, 100, 23]));
    }

    #[test]
    fn empty_ip_is_malformed() {
        let err = parse_body(r#"{"ip":""}"#, ResponseFormat::Json).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));

        let err = parse_body("   \n", ResponseFormat::PlainText).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = parse_body(r#"{"address":"203.0.113.5"}"#, ResponseFormat::Json).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));

        let err = parse_body("<html>rate limited</html>", ResponseFormat::Json).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn garbage_address_is_malformed() {
        let err = parse_body(r#"{"ip":"not-an-ip"}"#, ResponseFormat::Json).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn ipv6_answer_is_malformed() {
        let err = parse_body(r#"{"ip":"2001:db8::1"}"#, ResponseFormat::Json).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));

        let err = parse_body("2001:db8::1\n", ResponseFormat::PlainText).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn response_format_from_str() {
        assert_eq!("json".parse::<ResponseFormat>().unwrap(), ResponseFormat::Json);
        assert_eq!("TEXT".parse::<ResponseFormat>().unwrap(), ResponseFormat::PlainText);
        assert!("xml".parse::<ResponseFormat>().is_err());
    }

    #[test]
    fn ipify_defaults() {
        let locator = HttpIpLocator::ipify();
        assert_eq!(locator.url(), DEFAULT_IP_LOCATOR_URL);
        assert_eq!(locator.format, ResponseFormat::Json);
        assert_eq!(locator.locator_name(), "http");
    }
}
