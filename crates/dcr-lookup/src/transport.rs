//! HTTP transport seam.

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use thiserror::Error;
use tracing::trace;

use dcr_core::LookupError;

/// A request that never produced a complete response.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Performs a GET and returns the status, plus the body on HTTP 200.
pub trait HttpGet: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Blocking reqwest transport with a request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: std::time::Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| LookupError::Client(err.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps a preconfigured client (proxy, TLS roots).
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl HttpGet for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        trace!(url, "GET");
        let response = self
            .client
            .get(url)
            .header(
                USER_AGENT,
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )
            .send()?;
        let status = response.status().as_u16();
        // Non-200 answers are settled without reading their body.
        let body = if status == 200 {
            response.text()?
        } else {
            String::new()
        };
        Ok(HttpResponse { status, body })
    }
}
