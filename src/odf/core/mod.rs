//! Core ODF container functionality.
//!
//! ZIP package reading and writing, the manifest, and the skeleton parts
//! new documents start from.
//!
//! # References
//! - ODF 1.3 Part 2 (Packages): §3 (Manifest), §3.3 (MIME type stream)
//! - ZIP format: PKZIP Application Note

/// ODF manifest parsing and generation
mod manifest;
/// ODF package reading
mod package;
/// Part templates for new documents
mod templates;
/// ODF package writing
mod writer;

pub use manifest::{Manifest, ManifestEntry, ROOT_ENTRY};
pub use package::Package;
pub use templates::OdfStructure;
pub use writer::PackageWriter;
