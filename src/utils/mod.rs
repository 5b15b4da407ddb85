//! Utility functions and helper modules.
//!
//! Client identity extraction, route labelling, city name formatting and
//! the clock abstraction used for expiry.

pub mod clock;
pub mod http;
pub mod route;
pub mod text;

pub use clock::*;
pub use http::*;
pub use route::*;
pub use text::*;
