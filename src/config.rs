//! Run configuration.

use crate::error::{PrunerError, Result};
use std::time::Duration;

/// Public DoH resolvers queried by default. Several are used so a single
/// resolver's view (or a local sinkhole in front of it) does not decide alone.
pub const DEFAULT_DOH_ENDPOINTS: [&str; 3] = [
    "https://cloudflare-dns.com/dns-query",
    "https://dns.google/resolve",
    "https://dns.quad9.net/dns-query",
];

/// Per-request timeout for DoH queries and HTTP probes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; blocklist-cleaner/1.0)";

/// Maximum number of CNAME hops followed from the queried name.
pub const DEFAULT_MAX_CNAME_DEPTH: usize = 5;

/// Configuration shared by the resolver, the prober and the run.
///
/// # Example
///
/// ```
/// use blocklist_pruner::PrunerConfig;
/// use std::time::Duration;
///
/// let config = PrunerConfig::new()
///     .with_endpoints(["https://dns.google/resolve"])
///     .with_timeout(Duration::from_secs(3));
///
/// assert_eq!(config.doh_endpoints.len(), 1);
/// assert_eq!(config.timeout, Duration::from_secs(3));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PrunerConfig {
    /// DoH JSON endpoints, queried in order for every record type.
    pub doh_endpoints: Vec<String>,

    /// Timeout applied to each individual request.
    pub timeout: Duration,

    /// `User-Agent` header value.
    pub user_agent: String,

    /// CNAME chains longer than this resolve to a server-failure result.
    pub max_cname_depth: usize,
}

impl PrunerConfig {
    /// Creates a config with the public default resolvers and a 10s timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            doh_endpoints: DEFAULT_DOH_ENDPOINTS.iter().map(ToString::to_string).collect(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_cname_depth: DEFAULT_MAX_CNAME_DEPTH,
        }
    }

    /// Replaces the DoH endpoint list.
    #[must_use]
    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.doh_endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Overrides the CNAME depth cap.
    #[must_use]
    pub const fn with_max_cname_depth(mut self, depth: usize) -> Self {
        self.max_cname_depth = depth;
        self
    }

    /// Checks that the config can drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`PrunerError::InvalidConfig`] if no endpoint is configured,
    /// an endpoint is not an `http(s)` URL, or the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.doh_endpoints.is_empty() {
            return Err(PrunerError::InvalidConfig(
                "at least one DoH endpoint is required".into(),
            ));
        }
        for endpoint in &self.doh_endpoints {
            let scheme_ok = reqwest::Url::parse(endpoint)
                .is_ok_and(|url| matches!(url.scheme(), "http" | "https"));
            if !scheme_ok {
                return Err(PrunerError::InvalidConfig(format!(
                    "DoH endpoint is not an http(s) URL: {endpoint}"
                )));
            }
        }
        if self.timeout.is_zero() {
            return Err(PrunerError::InvalidConfig("timeout must be non-zero".into()));
        }
        Ok(())
    }

    /// Builds the blocking HTTP client shared by DoH queries and probes.
    ///
    /// Redirects are followed with reqwest's default policy.
    ///
    /// # Errors
    ///
    /// Returns [`PrunerError::HttpClient`] if the TLS backend cannot be
    /// initialized or the user agent is not a valid header value.
    pub fn http_client(&self) -> Result<reqwest::blocking::Client> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()?;
        Ok(client)
    }
}

impl Default for PrunerConfig {
    fn default() -> Self {
        Self::new()
    }
}
