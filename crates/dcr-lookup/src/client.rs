//! Compound lookup client.

use tracing::{debug, warn};

use dcr_core::{CompoundLookup, LookupError};

use crate::config::{LookupConfig, NAME_PLACEHOLDER};
use crate::throttle::Throttle;
use crate::transport::{HttpGet, ReqwestTransport, TransportError};

/// Throttled name to identifier client.
///
/// Spacing is per client: every attempt, retries included, passes through
/// the same [`Throttle`].
#[derive(Debug)]
pub struct CompoundLookupClient<T = ReqwestTransport> {
    transport: T,
    url_template: String,
    max_retries: u32,
    throttle: Throttle,
}

impl CompoundLookupClient<ReqwestTransport> {
    /// Client over HTTP with the configured timeout.
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Self::with_transport(config, transport)
    }
}

impl<T: HttpGet> CompoundLookupClient<T> {
    pub fn with_transport(config: &LookupConfig, transport: T) -> Result<Self, LookupError> {
        if !config.url_template.contains(NAME_PLACEHOLDER) {
            return Err(LookupError::InvalidTemplate {
                template: config.url_template.clone(),
                reason: format!("missing {NAME_PLACEHOLDER} placeholder"),
            });
        }
        Ok(Self {
            transport,
            url_template: config.url_template.clone(),
            max_retries: config.max_retries,
            throttle: Throttle::new(config.min_interval()),
        })
    }

    /// Request URL for a name.
    pub fn url_for(&self, name: &str) -> String {
        self.url_template
            .replace(NAME_PLACEHOLDER, &urlencoding::encode(name.trim()))
    }

    fn attempt(&self, url: &str) -> Result<Option<Vec<String>>, TransportError> {
        self.throttle.wait();
        let response = self.transport.get(url)?;
        if response.status == 200 {
            Ok(Some(
                response
                    .body
                    .split_whitespace()
                    .map(str::to_string)
                    .collect(),
            ))
        } else {
            Ok(None)
        }
    }
}

impl<T: HttpGet> CompoundLookup for CompoundLookupClient<T> {
    /// HTTP 200 yields the whitespace-separated body tokens; any other status
    /// yields an empty list. Transport failures are retried.
    fn lookup(&self, name: &str) -> Result<Vec<String>, LookupError> {
        let url = self.url_for(name);
        let attempts = self.max_retries + 1;
        let mut last_error = None;
        for attempt in 1..=attempts {
            match self.attempt(&url) {
                Ok(Some(ids)) => {
                    debug!(name, ids = ids.len(), "compound found");
                    return Ok(ids);
                }
                Ok(None) => {
                    debug!(name, "compound not found");
                    return Ok(Vec::new());
                }
                Err(err) => {
                    warn!(name, attempt, attempts, error = %err, "lookup request failed");
                    last_error = Some(err);
                }
            }
        }
        Err(LookupError::Transport {
            name: name.to_string(),
            attempts,
            reason: last_error.map(|err| err.to_string()).unwrap_or_default(),
        })
    }
}
