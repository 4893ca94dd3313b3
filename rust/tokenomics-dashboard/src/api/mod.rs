//! HTTP API Module
//!
//! Projection, genesis generation and node initialization endpoints, plus
//! health and metrics for monitoring.

mod metrics;
mod routes;

pub use metrics::Metrics;
pub use routes::{router, run_api_server, ApiState};
