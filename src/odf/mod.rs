//! OpenDocument Format support.
//!
//! Text documents are fully supported; the other document types are
//! recognised so that requests for them fail with a clear error.
//!
//! # Example
//!
//! ```no_run
//! use opendocument::odf::{self, DocumentType};
//! use opendocument::odf::elements::StyledElement;
//! use std::path::Path;
//!
//! # fn main() -> opendocument::Result<()> {
//! let mut doc = odf::create(DocumentType::Text)?;
//! let p = doc.create_paragraph(Some("Hello"))?;
//! p.apply_style(&mut doc, "fo:font-weight", "bold")?;
//! doc.save(Some(Path::new("hello.odt")))?;
//!
//! let reopened = odf::open("hello.odt")?;
//! assert_eq!(reopened.text(), "Hello");
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod core;
pub mod dom;
pub mod elements;
pub mod namespace;
pub mod options;
pub mod storage;
pub mod style;
pub mod text;

pub use options::{DocumentOptions, StorageKind};
pub use text::TextDocument;

use crate::common::{Error, Result};
use constants::{ODF_CHART, ODF_DRAWING, ODF_IMAGE, ODF_PRESENTATION, ODF_SPREADSHEET, ODF_TEXT};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Kinds of OpenDocument documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// OpenDocument Text (.odt)
    Text,
    /// OpenDocument Spreadsheet (.ods)
    Spreadsheet,
    /// OpenDocument Presentation (.odp)
    Presentation,
    /// OpenDocument Drawing (.odg)
    Drawing,
    /// OpenDocument Chart (.odc)
    Chart,
    /// OpenDocument Image (.odi)
    Image,
}

impl DocumentType {
    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentType::Text => ODF_TEXT,
            DocumentType::Spreadsheet => ODF_SPREADSHEET,
            DocumentType::Presentation => ODF_PRESENTATION,
            DocumentType::Drawing => ODF_DRAWING,
            DocumentType::Chart => ODF_CHART,
            DocumentType::Image => ODF_IMAGE,
        }
    }

    /// Document type for a container MIME type.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type {
            ODF_TEXT => Some(DocumentType::Text),
            ODF_SPREADSHEET => Some(DocumentType::Spreadsheet),
            ODF_PRESENTATION => Some(DocumentType::Presentation),
            ODF_DRAWING => Some(DocumentType::Drawing),
            ODF_CHART => Some(DocumentType::Chart),
            ODF_IMAGE => Some(DocumentType::Image),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Text => "text",
            DocumentType::Spreadsheet => "spreadsheet",
            DocumentType::Presentation => "presentation",
            DocumentType::Drawing => "drawing",
            DocumentType::Chart => "chart",
            DocumentType::Image => "image",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(DocumentType::Text),
            "spreadsheet" => Ok(DocumentType::Spreadsheet),
            "presentation" => Ok(DocumentType::Presentation),
            "drawing" => Ok(DocumentType::Drawing),
            "chart" => Ok(DocumentType::Chart),
            "image" => Ok(DocumentType::Image),
            _ => Err(Error::UnsupportedType(format!("document type '{}'", s))),
        }
    }
}

/// Open a document with default options.
pub fn open<P: AsRef<Path>>(path: P) -> Result<TextDocument> {
    open_with(path, &DocumentOptions::default())
}

/// Open a document, detecting the storage backend from the file contents.
///
/// Containers of a known type other than text fail with
/// [`Error::UnsupportedMimeType`], like unknown MIME types do.
pub fn open_with<P: AsRef<Path>>(path: P, options: &DocumentOptions) -> Result<TextDocument> {
    TextDocument::open(path, options)
}

/// Create an in-memory document of `document_type` with default options.
pub fn create(document_type: DocumentType) -> Result<TextDocument> {
    create_with(document_type, None, &DocumentOptions::default())
}

/// Create a document of `document_type`, optionally bound to `file`.
pub fn create_with(
    document_type: DocumentType,
    file: Option<&Path>,
    options: &DocumentOptions,
) -> Result<TextDocument> {
    match document_type {
        DocumentType::Text => TextDocument::create(file, options),
        other => Err(Error::UnsupportedType(format!(
            "{} documents are not implemented yet",
            other
        ))),
    }
}

/// Create an in-memory text document.
pub fn text() -> Result<TextDocument> {
    create(DocumentType::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_names() {
        assert_eq!("Text".parse::<DocumentType>().unwrap(), DocumentType::Text);
        assert!(matches!(
            "formula".parse::<DocumentType>(),
            Err(Error::UnsupportedType(_))
        ));
        for kind in [DocumentType::Text, DocumentType::Chart, DocumentType::Image] {
            assert_eq!(DocumentType::from_mime_type(kind.mime_type()), Some(kind));
        }
    }

    #[test]
    fn test_only_text_is_implemented() {
        assert!(text().is_ok());
        for kind in [
            DocumentType::Spreadsheet,
            DocumentType::Presentation,
            DocumentType::Drawing,
            DocumentType::Chart,
            DocumentType::Image,
        ] {
            match create(kind) {
                Err(Error::UnsupportedType(message)) => assert!(message.contains("not implemented yet")),
                other => panic!("unexpected {:?}", other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_open_other_document_type() {
        use crate::odf::core::{OdfStructure, PackageWriter};

        let mut writer = PackageWriter::new(ODF_SPREADSHEET);
        writer
            .add_file("content.xml", OdfStructure::text_content_xml("1.3").as_bytes())
            .unwrap();
        writer
            .add_file("styles.xml", OdfStructure::text_styles_xml("1.3").as_bytes())
            .unwrap();
        writer
            .add_file("meta.xml", OdfStructure::meta_xml("test", "1.3").as_bytes())
            .unwrap();
        writer
            .add_file("settings.xml", OdfStructure::settings_xml("1.3").as_bytes())
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.ods");
        std::fs::write(&path, writer.finish_to_bytes().unwrap()).unwrap();

        match open(&path) {
            Err(Error::UnsupportedMimeType(mime)) => assert_eq!(mime, ODF_SPREADSHEET),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }
}
