//! # Homeboard Library
//!
//! This library exposes the Homeboard modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod config;
pub mod configs;
pub mod logging;

// Re-export homeboard_core for convenience
pub use homeboard_core;
