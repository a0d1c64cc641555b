//! HTTP layer: route handlers and middleware

pub mod constants;
pub mod middleware;
pub mod services;
