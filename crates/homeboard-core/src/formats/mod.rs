//! # Formats Module
//!
//! Import formats for boards.
//!
//! This module contains:
//! - Legacy JSON board configs (one file per board in a configs directory)
//!
//! Note: File I/O operations remain in the app layer (apps/homeboard).
//! This module only handles format conversion (pure transformations).

mod legacy;

pub use legacy::*;
