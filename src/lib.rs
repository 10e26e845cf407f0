//! OpenDocument - read, edit and write OpenDocument text documents
//!
//! This library loads `.odt` packages and flat `.fodt` files into an
//! editable tree of XML parts, lets callers add and style paragraphs,
//! headings, spans, links and bookmarks, and writes the result back.
//!
//! # Features
//!
//! - **Two storage backends**: ZIP packages with a manifest, and single
//!   flat XML files
//! - **Automatic styles**: property changes fork shared styles, reuse
//!   identical ones and get per-document generated names
//! - **Atomic saves**: a failed save leaves the previous file untouched
//!
//! # Example - Writing a document
//!
//! ```no_run
//! use opendocument::odf::{self, DocumentType};
//! use opendocument::odf::elements::{InlineContainer, StyledElement};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = odf::create(DocumentType::Text)?;
//! doc.create_heading(Some("Report"), 1)?;
//!
//! let p = doc.create_paragraph(Some("See "))?;
//! p.create_hyperlink(&mut doc, Some("the site"), "https://example.org")?;
//! p.apply_style(&mut doc, "fo:font-size", "11pt")?;
//!
//! doc.save(Some(Path::new("report.odt")))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Reading a document
//!
//! ```no_run
//! use opendocument::odf::elements::ElementNode;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = opendocument::odf::open("report.odt")?;
//! for child in doc.children() {
//!     println!("{}: {}", child.kind(), child.text(&doc));
//! }
//! # Ok(())
//! # }
//! ```

/// Error types and XML text helpers
pub mod common;

/// OpenDocument Format support
pub mod odf;

pub use common::{Error, Result};
