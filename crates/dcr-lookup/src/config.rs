//! Lookup client settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// PubChem PUG REST: compound identifiers by name, plain text.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/name/{name}/cids/TXT";

/// Placeholder replaced by the percent-escaped drug name.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// PubChem asks for no more than five requests per second.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(200);

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_MAX_RETRIES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub url_template: String,
    /// Minimum spacing between two requests, in milliseconds.
    pub min_interval_ms: u64,
    pub timeout_secs: u64,
    /// Extra attempts after a transport failure.
    pub max_retries: u32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            min_interval_ms: DEFAULT_MIN_INTERVAL.as_millis() as u64,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl LookupConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
