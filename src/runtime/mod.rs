//! Application lifecycle
//!
//! - `server`: shared state, route wiring and the HTTP server loop
//! - `shutdown`: graceful shutdown handling

pub mod server;
pub mod shutdown;

pub use server::{AppState, build_cors_middleware, configure_app, run_server};
