//! Custom middleware implementations for the API.
//!
//! Request IDs with request/response logging, and Prometheus request
//! metrics.

pub mod metrics;
pub mod request_id;

pub use metrics::*;
pub use request_id::*;
