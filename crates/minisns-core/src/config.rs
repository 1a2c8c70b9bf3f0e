//! Client configuration.
//!
//! Provides [`SnsClientConfig`] for configuring the region, endpoint and
//! connection pool of an [`SnsClient`](crate::SnsClient). Values can be
//! loaded from the standard AWS environment variables.

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::SnsError;

const DEFAULT_REGION: &str = "us-east-1";

/// SNS client configuration.
///
/// # Examples
///
/// ```
/// use minisns_core::SnsClientConfig;
///
/// let config = SnsClientConfig::builder()
///     .region("eu-central-1")
///     .endpoint("http://localhost:4566")
///     .build();
/// let endpoint = config.resolve_endpoint().unwrap();
/// assert_eq!(endpoint.host, "localhost:4566");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SnsClientConfig {
    /// AWS region used for signing and the default endpoint.
    #[builder(default = String::from(DEFAULT_REGION), setter(into))]
    pub region: String,

    /// Endpoint URL override, e.g. `http://localhost:4566` for LocalStack.
    #[builder(default, setter(into, strip_option))]
    pub endpoint: Option<String>,

    /// Idle connections kept per host.
    #[builder(default = 10)]
    pub pool_max_idle_per_host: usize,

    /// Connect timeout in milliseconds.
    #[builder(default = 5_000)]
    pub connect_timeout_ms: u64,

    /// Whole-request timeout in milliseconds.
    #[builder(default = 30_000)]
    pub request_timeout_ms: u64,
}

impl Default for SnsClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The endpoint URL and `Host` header value requests are sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    /// Base URL of the service.
    pub url: Url,
    /// Host name, with the port when it is not the scheme default.
    pub host: String,
}

impl SnsClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `AWS_REGION`, then `AWS_DEFAULT_REGION` | `us-east-1` |
    /// | `SNS_ENDPOINT_URL`, then `AWS_ENDPOINT_URL_SNS` | `https://sns.<region>.amazonaws.com` |
    /// | `SNS_POOL_MAX_IDLE_PER_HOST` | `10` |
    /// | `SNS_CONNECT_TIMEOUT_MS` | `5000` |
    /// | `SNS_REQUEST_TIMEOUT_MS` | `30000` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(region) = var("AWS_REGION").or_else(|| var("AWS_DEFAULT_REGION")) {
            config.region = region;
        }
        config.endpoint = var("SNS_ENDPOINT_URL").or_else(|| var("AWS_ENDPOINT_URL_SNS"));
        if let Some(n) = var("SNS_POOL_MAX_IDLE_PER_HOST").and_then(|v| v.parse().ok()) {
            config.pool_max_idle_per_host = n;
        }
        if let Some(ms) = var("SNS_CONNECT_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            config.connect_timeout_ms = ms;
        }
        if let Some(ms) = var("SNS_REQUEST_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            config.request_timeout_ms = ms;
        }

        config
    }

    /// The configured endpoint, or the public regional one.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://sns.{}.amazonaws.com", self.region))
    }

    /// Parse the endpoint and derive the `Host` header value.
    ///
    /// # Errors
    ///
    /// Returns [`SnsError::InvalidEndpoint`] if the endpoint is not an
    /// absolute URL with a host.
    pub fn resolve_endpoint(&self) -> Result<ResolvedEndpoint, SnsError> {
        let endpoint = self.endpoint_url();
        let invalid = |reason: String| SnsError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            reason,
        };

        let url = Url::parse(&endpoint).map_err(|e| invalid(e.to_string()))?;
        let host_name = url
            .host_str()
            .ok_or_else(|| invalid("no host".to_owned()))?;
        let host = match url.port() {
            Some(port) => format!("{host_name}:{port}"),
            None => host_name.to_owned(),
        };

        Ok(ResolvedEndpoint { url, host })
    }

    /// Connect timeout as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
