//! Liveness decisions for checkable entries.
//!
//! Full URLs are live iff they respond over HTTP. Bare domains move through
//! fixed stages, strongest evidence first:
//!
//! 1. `Unresolved`: resolve the domain. Any address means live. Otherwise go
//!    to the `www.` fallback if the domain has NS/SOA authority, else straight
//!    to direct probing.
//! 2. `AuthorityWwwFallback`: probe `http(s)://www.<domain>`, then resolve
//!    `www.<domain>`. Either succeeding means live.
//! 3. `HttpProbeFallback`: probe the entry's own URLs. A response means live,
//!    anything else dead.

use crate::entry::{CheckableEntry, probe_urls};
use crate::probe::Probe;
use crate::resolver::Resolve;

/// Final classification of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Live,
    Dead,
}

/// Which check produced a [`Decision`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evidence {
    /// A full-URL entry answered over HTTP.
    UrlResponded,
    /// The domain resolved to at least one address, sinkholed or not.
    DnsPresence,
    /// The domain is delegated and its `www.` host answered over HTTP.
    WwwResponded,
    /// The domain is delegated and its `www.` host resolved.
    WwwDnsPresence,
    /// One of the entry's own probe URLs answered over HTTP.
    DirectProbe,
    /// Every check came up empty.
    NoEvidence,
}

/// Outcome of [`LivenessEngine::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub verdict: Verdict,
    pub evidence: Evidence,
}

impl Decision {
    const fn live(evidence: Evidence) -> Self {
        Self {
            verdict: Verdict::Live,
            evidence,
        }
    }

    const fn dead() -> Self {
        Self {
            verdict: Verdict::Dead,
            evidence: Evidence::NoEvidence,
        }
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.verdict == Verdict::Live
    }
}

/// Decision stages for bare domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Unresolved,
    AuthorityWwwFallback,
    HttpProbeFallback,
}

/// Combines a resolver and a prober into per-entry decisions.
///
/// Never fails: resolver and prober failures only remove evidence.
#[derive(Debug)]
pub struct LivenessEngine<R, P> {
    resolver: R,
    prober: P,
}

impl<R: Resolve, P: Probe> LivenessEngine<R, P> {
    #[must_use]
    pub const fn new(resolver: R, prober: P) -> Self {
        Self { resolver, prober }
    }

    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    pub const fn prober(&self) -> &P {
        &self.prober
    }

    /// Returns `true` if the entry should stay on the blocklist.
    pub fn is_entry_live(&self, entry: &CheckableEntry) -> bool {
        self.decide(entry).is_live()
    }

    /// Runs the decision stages for `entry` and reports which one concluded.
    pub fn decide(&self, entry: &CheckableEntry) -> Decision {
        let Some(domain) = entry.domain() else {
            return self.probe_any(entry.candidate_urls(), Evidence::UrlResponded);
        };

        let mut stage = Stage::Unresolved;
        loop {
            tracing::trace!(domain = %domain, stage = ?stage, "Liveness stage");
            stage = match stage {
                Stage::Unresolved => {
                    let resolution = self.resolver.resolve(&domain);
                    if resolution.indicates_presence() {
                        return Decision::live(Evidence::DnsPresence);
                    }
                    if resolution.has_authority {
                        Stage::AuthorityWwwFallback
                    } else {
                        Stage::HttpProbeFallback
                    }
                }
                Stage::AuthorityWwwFallback => {
                    let www = format!("www.{domain}");
                    if self.probe_any(&probe_urls(&www), Evidence::WwwResponded).is_live() {
                        return Decision::live(Evidence::WwwResponded);
                    }
                    if self.resolver.resolve(&www).indicates_presence() {
                        return Decision::live(Evidence::WwwDnsPresence);
                    }
                    Stage::HttpProbeFallback
                }
                Stage::HttpProbeFallback => {
                    return self.probe_any(entry.candidate_urls(), Evidence::DirectProbe);
                }
            };
        }
    }

    /// Probes URLs in order, stopping at the first that responds.
    fn probe_any(&self, urls: &[String], evidence: Evidence) -> Decision {
        if urls.iter().any(|url| self.prober.responds(url)) {
            Decision::live(evidence)
        } else {
            Decision::dead()
        }
    }
}
