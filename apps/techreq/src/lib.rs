//! # Techreq Library
//!
//! This library exposes the techreq modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod storage;

pub use error::CliError;

// Re-export the catalog and client crates for convenience
pub use techreq_core;
pub use techreq_sdk;
