//! Business logic and service layer modules.
//!
//! The weather lookup service and the pieces it coordinates: the per-client
//! rate limiter, the cache stores, the upstream provider client, and the
//! Prometheus metrics they report to.

pub mod cache;
pub mod metrics;
pub mod rate_limit;
pub mod upstream;
pub mod weather;

pub use cache::*;
pub use metrics::*;
pub use rate_limit::*;
pub use upstream::*;
pub use weather::*;
