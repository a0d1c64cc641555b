//! workbook-gateway - authentication proxy and page gateway
//!
//! Sits between the browser front-end of the workbook coding-assignment
//! platform and its backend API.
//!
//! # Architecture
//! - `api`: HTTP handlers (proxy, logout, loading state, health, pages) and middleware
//! - `loading`: debounced, reference-counted global loading coordinator
//! - `services`: upstream HTTP client
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: server lifecycle
//! - `interfaces`: CLI commands
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod loading;
pub mod runtime;
pub mod services;
pub mod system;
