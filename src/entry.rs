//! Blocklist line classification.
//!
//! Every input line is one of three things: an inert line (blank or `#`
//! comment) copied through untouched, a rule-like line that cannot be checked
//! and is kept for review, or a checkable entry with the URLs to probe.

/// Characters that never appear in a plain hostname but are common in
/// adblock/regex rule syntax.
const RULE_CHARS: &[char] = &[
    ' ', '\t', '"', '\'', '`', '<', '>', '|', '(', ')', '{', '}', '[', ']',
];

/// Classification of one raw blocklist line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Blank line or comment.
    Inert,
    /// Text that looks like a rule or a malformed URL. Holds the trimmed text.
    Skipped(String),
    /// A domain or URL whose liveness can be checked.
    Checkable(CheckableEntry),
}

/// Whether a checkable entry was written as a full URL or a bare domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// `scheme://host...`, probed as written.
    Url,
    /// Bare hostname, resolved over DoH and probed over `http` and `https`.
    Domain,
}

/// A line that passed classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckableEntry {
    text: String,
    kind: EntryKind,
    candidate_urls: Vec<String>,
}

impl CheckableEntry {
    /// Trimmed entry text as it appears in the cleaned output.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// URLs to probe, in probe order.
    #[must_use]
    pub fn candidate_urls(&self) -> &[String] {
        &self.candidate_urls
    }

    /// Cache identity: trimmed, lower-cased text.
    #[must_use]
    pub fn key(&self) -> String {
        self.text.to_lowercase()
    }

    /// Lower-cased hostname for bare-domain entries.
    #[must_use]
    pub fn domain(&self) -> Option<String> {
        match self.kind {
            EntryKind::Domain => Some(self.text.to_lowercase()),
            EntryKind::Url => None,
        }
    }
}

impl Entry {
    /// Classifies a raw line. Surrounding whitespace is ignored.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            return Self::Inert;
        }

        let urls = candidate_urls(text);
        if urls.is_empty() {
            return Self::Skipped(text.to_string());
        }

        let kind = if text.contains("://") {
            EntryKind::Url
        } else {
            EntryKind::Domain
        };
        Self::Checkable(CheckableEntry {
            text: text.to_string(),
            kind,
            candidate_urls: urls,
        })
    }
}

/// Returns the URLs to probe for an entry, or nothing if it cannot be checked.
///
/// Full URLs yield themselves. Bare domains yield `http://` and `https://`
/// variants, in that order.
#[must_use]
pub fn candidate_urls(entry: &str) -> Vec<String> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Vec::new();
    }

    if entry.contains("://") {
        return if is_full_url(entry) {
            vec![entry.to_string()]
        } else {
            Vec::new()
        };
    }

    if !looks_like_hostname(entry) {
        return Vec::new();
    }
    probe_urls(entry)
}

/// Returns `true` if `entry` parses as a URL with both a scheme and a host.
#[must_use]
pub fn is_full_url(entry: &str) -> bool {
    if !entry.contains("://") {
        return false;
    }
    reqwest::Url::parse(entry).is_ok_and(|url| {
        !url.scheme().is_empty() && url.host_str().is_some_and(|host| !host.is_empty())
    })
}

/// Structural hostname check for entries without a scheme.
///
/// Rejects regex rules (leading `/`), anything containing rule syntax
/// characters, and single labels.
#[must_use]
pub fn looks_like_hostname(entry: &str) -> bool {
    !entry.starts_with('/') && !entry.contains(RULE_CHARS) && entry.contains('.')
}

/// `http://` and `https://` probe URLs for a hostname.
#[must_use]
pub fn probe_urls(host: &str) -> Vec<String> {
    vec![format!("http://{host}"), format!("https://{host}")]
}
