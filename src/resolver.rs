//! Multi-endpoint DoH resolution with CNAME following.
//!
//! Every configured endpoint is asked for A, AAAA and CNAME records. Answers
//! are merged: addresses are unioned, CNAME targets are resolved recursively
//! and authority (NS/SOA) presence from any query marks the domain as
//! delegated. Results are cached per normalized domain for the life of the
//! resolver, which is one run.

use crate::config::PrunerConfig;
use crate::doh::{DohTransport, HttpDohTransport, RecordType};
use crate::error::Result;
use crate::sinkhole::{ResolutionResult, STATUS_NXDOMAIN, STATUS_SERVFAIL};
use crate::util::normalize_domain;
use moka::sync::Cache;
use std::collections::BTreeSet;

/// Resolves a domain to a [`ResolutionResult`].
///
/// Implementations never fail: missing data is expressed in the result.
pub trait Resolve {
    fn resolve(&self, domain: &str) -> ResolutionResult;
}

impl<R: Resolve + ?Sized> Resolve for &R {
    fn resolve(&self, domain: &str) -> ResolutionResult {
        (**self).resolve(domain)
    }
}

/// DoH resolver aggregating several endpoints.
///
/// # Example
///
/// ```rust,ignore
/// use blocklist_pruner::{DohResolver, PrunerConfig, Resolve};
///
/// let resolver = DohResolver::from_config(&PrunerConfig::new())?;
/// let result = resolver.resolve("example.com");
/// assert!(result.indicates_presence());
/// ```
#[derive(Debug)]
pub struct DohResolver<T> {
    transport: T,
    endpoints: Vec<String>,
    max_depth: usize,
    cache: Cache<String, ResolutionResult>,
}

impl DohResolver<HttpDohTransport> {
    /// Builds a resolver that talks to the configured endpoints over HTTPS.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PrunerError::HttpClient`] if the HTTP client cannot
    /// be built.
    pub fn from_config(config: &PrunerConfig) -> Result<Self> {
        let transport = HttpDohTransport::new(config.http_client()?);
        Ok(Self::new(transport, config))
    }
}

impl<T: DohTransport> DohResolver<T> {
    /// Creates a resolver over an arbitrary transport with an empty cache.
    ///
    /// The cache is unbounded so that no domain is queried twice in a run.
    #[must_use]
    pub fn new(transport: T, config: &PrunerConfig) -> Self {
        Self {
            transport,
            endpoints: config.doh_endpoints.clone(),
            max_depth: config.max_cname_depth,
            cache: Cache::builder().build(),
        }
    }

    /// Returns the underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves `domain` as part of a CNAME chain.
    ///
    /// `visited` holds the normalized names already on the current chain.
    /// A name already on the chain, or a chain longer than the configured
    /// depth, yields [`ResolutionResult::unresolved`] without any query.
    /// That guard result is not cached.
    pub fn resolve_path(&self, domain: &str, visited: &BTreeSet<String>) -> ResolutionResult {
        let key = normalize_domain(domain);

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(domain = %key, "Resolution cache hit");
            return cached;
        }

        if visited.contains(&key) || visited.len() > self.max_depth {
            tracing::debug!(
                domain = %key,
                depth = visited.len(),
                "CNAME chain cycles or exceeds depth limit"
            );
            return ResolutionResult::unresolved();
        }

        let mut path = visited.clone();
        path.insert(key.clone());

        let mut addresses = BTreeSet::new();
        let mut has_authority = false;
        let mut status: Option<u32> = None;

        for endpoint in &self.endpoints {
            for record_type in RecordType::QUERIED {
                let Some(response) = self.transport.query(endpoint, &key, record_type) else {
                    continue;
                };
                status = Some(status.map_or(response.status, |s| s.min(response.status)));

                for record in response.answers() {
                    let Some(value) = record.value() else {
                        continue;
                    };
                    match record.kind() {
                        Some(RecordType::A | RecordType::Aaaa) => {
                            addresses.insert(value.to_lowercase());
                        }
                        Some(RecordType::Cname) => {
                            let target = normalize_domain(value);
                            if path.contains(&target) {
                                continue;
                            }
                            let followed = self.resolve_path(&target, &path);
                            addresses.extend(followed.addresses);
                            has_authority |= followed.has_authority;
                        }
                        _ => {}
                    }
                }

                if !has_authority
                    && response.status != STATUS_NXDOMAIN
                    && response.has_authority_record()
                {
                    has_authority = true;
                }
            }
        }

        let result = ResolutionResult {
            addresses,
            has_authority,
            status: status.unwrap_or(STATUS_SERVFAIL),
        };
        tracing::debug!(
            domain = %key,
            addresses = result.addresses.len(),
            has_authority = result.has_authority,
            status = result.status,
            "Resolved domain"
        );
        self.cache.insert(key, result.clone());
        result
    }
}

impl<T: DohTransport> Resolve for DohResolver<T> {
    fn resolve(&self, domain: &str) -> ResolutionResult {
        self.resolve_path(domain, &BTreeSet::new())
    }
}
