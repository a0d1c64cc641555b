//! Service layer
//!
//! Shared clients used by the HTTP handlers.

pub mod upstream;

pub use upstream::{UpstreamClient, UpstreamRequest, UpstreamResponse};
