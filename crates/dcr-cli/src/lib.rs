//! Library side of the `drug-reconcile` binary.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod report;
