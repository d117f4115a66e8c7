//! PubChem compound lookup.
//!
//! [`CompoundLookupClient`] implements [`dcr_core::CompoundLookup`] over a
//! pluggable [`HttpGet`] transport. Requests are spaced by a per-client
//! [`Throttle`]; transport failures are retried, non-200 answers mean "no
//! such compound".

mod client;
mod config;
mod throttle;
mod transport;

pub use client::CompoundLookupClient;
pub use config::{
    DEFAULT_MAX_RETRIES, DEFAULT_MIN_INTERVAL, DEFAULT_TIMEOUT, DEFAULT_URL_TEMPLATE,
    LookupConfig, NAME_PLACEHOLDER,
};
pub use throttle::Throttle;
pub use transport::{HttpGet, HttpResponse, ReqwestTransport, TransportError};
