//! HTTP reachability probing.

use crate::config::PrunerConfig;
use crate::error::Result;
use reqwest::StatusCode;
use reqwest::blocking::Client;

/// Answers whether anything is serving a URL.
pub trait Probe {
    /// Returns `true` if the URL produced any HTTP response at all.
    fn responds(&self, url: &str) -> bool;
}

impl<P: Probe + ?Sized> Probe for &P {
    fn responds(&self, url: &str) -> bool {
        (**self).responds(url)
    }
}

/// [`Probe`] that sends `HEAD`, retrying once with `GET` on `405`.
///
/// The status code is irrelevant: a 404 or 500 still proves a server is
/// there. Only transport failures (timeout, refused connection, DNS or TLS
/// errors) count as "does not respond".
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Wraps a client already configured with timeout and user agent.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a prober with its own client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PrunerError::HttpClient`] if the client cannot be built.
    pub fn from_config(config: &PrunerConfig) -> Result<Self> {
        Ok(Self::new(config.http_client()?))
    }
}

impl Probe for HttpProber {
    fn responds(&self, url: &str) -> bool {
        let response = match self.client.head(url).send() {
            Ok(response) if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
                tracing::debug!(url = %url, "HEAD not allowed, retrying with GET");
                self.client.get(url).send()
            }
            other => other,
        };

        match response {
            Ok(response) => {
                tracing::debug!(url = %url, status = %response.status(), "URL responded");
                true
            }
            Err(e) => {
                tracing::warn!(
                    url = %url,
                    timeout = e.is_timeout(),
                    error = %e,
                    "URL did not respond"
                );
                false
            }
        }
    }
}
