//! Internal utilities.

/// Normalizes a domain for cache lookups and queries: trims whitespace,
/// strips one trailing dot and lower-cases.
#[must_use]
pub fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim();
    domain.strip_suffix('.').unwrap_or(domain).to_lowercase()
}
