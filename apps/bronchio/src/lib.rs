//! # Bronchio Library
//!
//! Exposes the binary's modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;

// Re-export bronchio_core for convenience
pub use bronchio_core;
