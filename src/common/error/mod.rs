//! Unified error types for the OpenDocument library.
//!
//! A single error enum covers file access, per-part load and save failures,
//! unsupported types, and invalid arguments.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, PartKind, Result};
