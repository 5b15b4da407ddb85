//! Data models and schemas for the weather lookup API.
//!
//! Request/response models for the HTTP surface and the `WeatherRecord`
//! stored in the cache.

pub mod api;
pub mod weather;

pub use api::*;
pub use weather::*;
