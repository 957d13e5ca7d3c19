//! Resolution results and sinkhole classification.

use std::collections::BTreeSet;

/// Null-route addresses that blocking resolvers answer with instead of the
/// real record.
pub const SINKHOLE_IPS: [&str; 4] = ["0.0.0.0", "127.0.0.1", "::", "::1"];

/// DNS `SERVFAIL`. Used when a domain produced no usable answer at all.
pub const STATUS_SERVFAIL: u32 = 2;

/// DNS `NXDOMAIN`.
pub const STATUS_NXDOMAIN: u32 = 3;

/// Returns `true` if `address` is one of [`SINKHOLE_IPS`].
#[must_use]
pub fn is_sinkhole(address: &str) -> bool {
    SINKHOLE_IPS.contains(&address)
}

/// Aggregated DoH answers for one domain across all endpoints.
///
/// `addresses` holds normalized IP literals (trailing dot stripped,
/// lower-cased), including those reached through CNAME targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// Distinct A/AAAA addresses.
    pub addresses: BTreeSet<String>,
    /// An NS or SOA record was seen in an authority section.
    pub has_authority: bool,
    /// Lowest DNS response code observed, [`STATUS_SERVFAIL`] if none.
    pub status: u32,
}

impl ResolutionResult {
    /// The result for a domain that could not be queried: no addresses, no
    /// authority, `SERVFAIL`.
    #[must_use]
    pub const fn unresolved() -> Self {
        Self {
            addresses: BTreeSet::new(),
            has_authority: false,
            status: STATUS_SERVFAIL,
        }
    }

    /// At least one address is outside the sinkhole set.
    #[must_use]
    pub fn has_non_sinkhole(&self) -> bool {
        self.addresses.iter().any(|address| !is_sinkhole(address))
    }

    /// Addresses were returned, and every one of them is a sinkhole.
    #[must_use]
    pub fn sinkhole_only(&self) -> bool {
        !self.addresses.is_empty() && !self.has_non_sinkhole()
    }

    /// Any resolved address counts as evidence the domain is still in use.
    ///
    /// Sinkholed domains are still being targeted, so they stay on the list.
    #[must_use]
    pub fn indicates_presence(&self) -> bool {
        self.has_non_sinkhole() || self.sinkhole_only()
    }
}

impl Default for ResolutionResult {
    fn default() -> Self {
        Self::unresolved()
    }
}
