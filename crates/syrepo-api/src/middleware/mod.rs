//! # Middleware Stack
//!
//! Tower middleware for the API layer:
//! - [`metrics`]: Prometheus request and download metrics.
//! - [`security_headers`]: hardening headers on every response.

pub mod metrics;
pub mod security_headers;
