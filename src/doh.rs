//! DNS-over-HTTPS JSON wire format and transport.
//!
//! Speaks the `application/dns-json` dialect served by Cloudflare, Google
//! and Quad9: `GET <endpoint>?name=<domain>&type=<A|AAAA|CNAME>`.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;

/// Media type requested from DoH endpoints.
pub const DNS_JSON: &str = "application/dns-json";

/// DNS record types the resolver queries or inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Ns,
    Cname,
    Soa,
    Aaaa,
}

impl RecordType {
    /// Record types queried for every domain, in query order.
    pub const QUERIED: [Self; 3] = [Self::A, Self::Aaaa, Self::Cname];

    /// Numeric RR type code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::A => 1,
            Self::Ns => 2,
            Self::Cname => 5,
            Self::Soa => 6,
            Self::Aaaa => 28,
        }
    }

    /// Mnemonic used in the `type` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Ns => "NS",
            Self::Cname => "CNAME",
            Self::Soa => "SOA",
            Self::Aaaa => "AAAA",
        }
    }

    /// Maps an RR type code back to a known type.
    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::A),
            2 => Some(Self::Ns),
            5 => Some(Self::Cname),
            6 => Some(Self::Soa),
            28 => Some(Self::Aaaa),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a DoH JSON response. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DohResponse {
    /// DNS response code (`0` = `NOERROR`, `3` = `NXDOMAIN`).
    #[serde(rename = "Status", default)]
    pub status: u32,
    #[serde(rename = "Answer", default)]
    pub answer: Option<Vec<DohRecord>>,
    #[serde(rename = "Authority", default)]
    pub authority: Option<Vec<DohRecord>>,
}

impl DohResponse {
    /// Answer records; empty when the section is absent or `null`.
    #[must_use]
    pub fn answers(&self) -> &[DohRecord] {
        self.answer.as_deref().unwrap_or_default()
    }

    /// Authority records; empty when the section is absent or `null`.
    #[must_use]
    pub fn authorities(&self) -> &[DohRecord] {
        self.authority.as_deref().unwrap_or_default()
    }

    /// Returns `true` if the authority section carries an NS or SOA record.
    #[must_use]
    pub fn has_authority_record(&self) -> bool {
        self.authorities()
            .iter()
            .any(|record| matches!(record.kind(), Some(RecordType::Ns | RecordType::Soa)))
    }
}

/// One resource record from an `Answer` or `Authority` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DohRecord {
    #[serde(rename = "type", default)]
    pub record_type: u16,
    #[serde(default)]
    pub data: Option<String>,
}

impl DohRecord {
    #[must_use]
    pub const fn kind(&self) -> Option<RecordType> {
        RecordType::from_code(self.record_type)
    }

    /// Record data with surrounding whitespace and the trailing dot removed.
    /// `None` when the record has no data.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        let value = self.data.as_deref()?.trim();
        let value = value.strip_suffix('.').unwrap_or(value);
        (!value.is_empty()).then_some(value)
    }
}

/// Issues a single DoH query.
///
/// Implementations return `None` for any failure (network, non-2xx status,
/// undecodable body); the resolver treats that as "no data" from this
/// endpoint and record type.
pub trait DohTransport {
    fn query(&self, endpoint: &str, name: &str, record_type: RecordType) -> Option<DohResponse>;
}

impl<T: DohTransport + ?Sized> DohTransport for &T {
    fn query(&self, endpoint: &str, name: &str, record_type: RecordType) -> Option<DohResponse> {
        (**self).query(endpoint, name, record_type)
    }
}

/// [`DohTransport`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpDohTransport {
    client: Client,
}

impl HttpDohTransport {
    /// Wraps a client already configured with timeout and user agent.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

impl DohTransport for HttpDohTransport {
    fn query(&self, endpoint: &str, name: &str, record_type: RecordType) -> Option<DohResponse> {
        let response = self
            .client
            .get(endpoint)
            .query(&[("name", name), ("type", record_type.as_str())])
            .header(ACCEPT, DNS_JSON)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status);

        let body = match response.and_then(reqwest::blocking::Response::bytes) {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(
                    endpoint = %endpoint,
                    domain = %name,
                    record_type = %record_type,
                    error = %e,
                    "DoH query failed"
                );
                return None;
            }
        };

        match serde_json::from_slice(&body) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!(
                    endpoint = %endpoint,
                    domain = %name,
                    record_type = %record_type,
                    error = %e,
                    "DoH response is not valid JSON"
                );
                None
            }
        }
    }
}
