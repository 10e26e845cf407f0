//! Types shared across the crate: the error type and XML text helpers.

pub mod error;
pub mod xml;

pub use error::{Error, PartKind, Result};
