//! OpenDocument Text (.odt / .fodt) documents.

mod document;

pub use document::TextDocument;
