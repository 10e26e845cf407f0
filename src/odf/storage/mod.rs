//! Storage backends.
//!
//! A backend turns a file on disk into the four XML parts a document works
//! on, and writes them back. [`ZipStorage`] handles the packaged format with
//! its manifest and embedded files; [`SingleStorage`] handles flat XML
//! documents where all parts live under one `office:document` root.

mod atomic;
mod single_storage;
mod zip_storage;

pub use single_storage::SingleStorage;
pub use zip_storage::ZipStorage;

use crate::common::{Error, PartKind, Result};
use crate::odf::DocumentType;
use crate::odf::core::OdfStructure;
use crate::odf::dom::{self, XmlDocument};
use crate::odf::options::{DocumentOptions, StorageKind};
use std::fmt;
use std::path::Path;

/// One of the four XML parts a document is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlPart {
    Content,
    Meta,
    Settings,
    Styles,
}

impl XmlPart {
    /// All parts, in the order flat documents store them.
    pub const ALL: [XmlPart; 4] = [XmlPart::Meta, XmlPart::Settings, XmlPart::Styles, XmlPart::Content];

    /// The matching error-reporting part.
    pub fn kind(self) -> PartKind {
        match self {
            XmlPart::Content => PartKind::Content,
            XmlPart::Meta => PartKind::Meta,
            XmlPart::Settings => PartKind::Settings,
            XmlPart::Styles => PartKind::Styles,
        }
    }

    /// Path inside a ZIP package.
    #[inline]
    pub fn path(self) -> &'static str {
        self.kind().path()
    }

    /// Local name of the part's root element in the office namespace.
    pub fn root_local_name(self) -> &'static str {
        match self {
            XmlPart::Content => "document-content",
            XmlPart::Meta => "document-meta",
            XmlPart::Settings => "document-settings",
            XmlPart::Styles => "document-styles",
        }
    }
}

impl fmt::Display for XmlPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// The four parsed XML parts of a document.
#[derive(Debug, Clone)]
pub struct Parts {
    pub content: XmlDocument,
    pub meta: XmlDocument,
    pub settings: XmlDocument,
    pub styles: XmlDocument,
}

impl Parts {
    /// Skeleton parts for a new document of `document_type`.
    pub fn template(document_type: DocumentType, options: &DocumentOptions) -> Result<Self> {
        if document_type != DocumentType::Text {
            return Err(Error::UnsupportedType(format!(
                "{} documents are not implemented yet",
                document_type
            )));
        }
        let version = options.office_version.as_str();
        Ok(Self {
            content: parse_part(XmlPart::Content, OdfStructure::text_content_xml(version).as_bytes())?,
            meta: parse_part(XmlPart::Meta, OdfStructure::meta_xml(&options.generator, version).as_bytes())?,
            settings: parse_part(XmlPart::Settings, OdfStructure::settings_xml(version).as_bytes())?,
            styles: parse_part(XmlPart::Styles, OdfStructure::text_styles_xml(version).as_bytes())?,
        })
    }

    /// Borrow one part.
    pub fn get(&self, part: XmlPart) -> &XmlDocument {
        match part {
            XmlPart::Content => &self.content,
            XmlPart::Meta => &self.meta,
            XmlPart::Settings => &self.settings,
            XmlPart::Styles => &self.styles,
        }
    }

    /// Mutably borrow one part.
    pub fn get_mut(&mut self, part: XmlPart) -> &mut XmlDocument {
        match part {
            XmlPart::Content => &mut self.content,
            XmlPart::Meta => &mut self.meta,
            XmlPart::Settings => &mut self.settings,
            XmlPart::Styles => &mut self.styles,
        }
    }

    /// Replace one part.
    pub fn set(&mut self, part: XmlPart, dom: XmlDocument) {
        *self.get_mut(part) = dom;
    }
}

/// Parse `bytes` as `part`, reporting failures against that part.
pub(crate) fn parse_part(part: XmlPart, bytes: &[u8]) -> Result<XmlDocument> {
    dom::parse(bytes).map_err(|e| Error::part_load(part.kind(), e))
}

/// A file stored in a package next to the XML parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedFile {
    /// Path inside the package
    pub path: String,
    /// Media type recorded in the manifest
    pub media_type: String,
    pub data: Vec<u8>,
}

/// Contract shared by the storage backends.
///
/// Constructors are only available on concrete backends; everything else
/// works through a trait object, which is how a document holds its storage.
pub trait Storage: fmt::Debug {
    /// Start a new document of `document_type` from the built-in template.
    /// `file`, when given, becomes the default save target.
    fn create(
        document_type: DocumentType,
        file: Option<&Path>,
        options: &DocumentOptions,
    ) -> Result<Self>
    where
        Self: Sized;

    /// Load an existing document.
    fn open(file: &Path, options: &DocumentOptions) -> Result<Self>
    where
        Self: Sized;

    /// Which backend this is.
    fn kind(&self) -> StorageKind;

    /// MIME type of the document.
    fn mime_type(&self) -> &str;

    /// Default save target.
    fn file(&self) -> Option<&Path>;

    /// Borrow one XML part.
    fn part(&self, part: XmlPart) -> &XmlDocument;

    /// Replace one XML part.
    fn set_part(&mut self, part: XmlPart, dom: XmlDocument);

    /// Write the document to `file`, or to the default target when `None`.
    fn save(&mut self, file: Option<&Path>) -> Result<()>;

    /// Embed the file at `path`; returns its path inside the package.
    fn add_file(&mut self, path: &Path, mime_type: Option<&str>) -> Result<String>;

    /// Remove an embedded file by its path inside the package.
    fn remove_file(&mut self, relative: &str) -> Result<()>;

    /// Files stored next to the XML parts.
    fn embedded_files(&self) -> &[EmbeddedFile];

    /// Copy the MIME type, all four parts, and where supported the embedded
    /// files of `other` into this storage.
    fn import(&mut self, other: &dyn Storage) -> Result<()>;

    /// `content.xml`
    fn content_dom(&self) -> &XmlDocument {
        self.part(XmlPart::Content)
    }

    /// `meta.xml`
    fn meta_dom(&self) -> &XmlDocument {
        self.part(XmlPart::Meta)
    }

    /// `settings.xml`
    fn settings_dom(&self) -> &XmlDocument {
        self.part(XmlPart::Settings)
    }

    /// `styles.xml`
    fn styles_dom(&self) -> &XmlDocument {
        self.part(XmlPart::Styles)
    }

    fn set_content_dom(&mut self, dom: XmlDocument) {
        self.set_part(XmlPart::Content, dom);
    }

    fn set_meta_dom(&mut self, dom: XmlDocument) {
        self.set_part(XmlPart::Meta, dom);
    }

    fn set_settings_dom(&mut self, dom: XmlDocument) {
        self.set_part(XmlPart::Settings, dom);
    }

    fn set_styles_dom(&mut self, dom: XmlDocument) {
        self.set_part(XmlPart::Styles, dom);
    }
}

/// Fail early when `file` cannot be written later: the parent directory
/// must exist and an existing file must not be read-only.
pub(crate) fn check_writability(file: &Path) -> Result<()> {
    let parent = atomic::parent_dir_or_dot(file);
    if !parent.is_dir() {
        return Err(Error::file_access(file, "directory does not exist"));
    }
    if let Ok(metadata) = std::fs::metadata(file)
        && metadata.permissions().readonly()
    {
        return Err(Error::file_access(file, "file is not writable"));
    }
    Ok(())
}

/// Read a whole file, mapping failures onto [`Error::FileAccess`].
pub(crate) fn read_file(file: &Path) -> Result<Vec<u8>> {
    std::fs::read(file).map_err(|e| Error::file_access(file, e))
}

/// Open a document from `file` with whichever backend `kind` names.
pub fn open_storage(kind: StorageKind, file: &Path, options: &DocumentOptions) -> Result<Box<dyn Storage>> {
    Ok(match kind {
        StorageKind::Zip => Box::new(ZipStorage::open(file, options)?),
        StorageKind::Single => Box::new(SingleStorage::open(file, options)?),
    })
}

/// Create a new document with whichever backend `kind` names.
pub fn create_storage(
    kind: StorageKind,
    document_type: DocumentType,
    file: Option<&Path>,
    options: &DocumentOptions,
) -> Result<Box<dyn Storage>> {
    Ok(match kind {
        StorageKind::Zip => Box::new(ZipStorage::create(document_type, file, options)?),
        StorageKind::Single => Box::new(SingleStorage::create(document_type, file, options)?),
    })
}

/// Guess the backend from file contents: ZIP local header magic or XML.
pub fn detect_storage(file: &Path) -> Result<StorageKind> {
    use std::io::Read;
    let mut head = [0u8; 4];
    let mut handle = std::fs::File::open(file).map_err(|e| Error::file_access(file, e))?;
    let read = handle.read(&mut head).map_err(|e| Error::file_access(file, e))?;
    Ok(if read == 4 && head == *b"PK\x03\x04" {
        StorageKind::Zip
    } else {
        StorageKind::Single
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::namespace::OFFICENS;

    #[test]
    fn test_text_template_parts() {
        let parts = Parts::template(DocumentType::Text, &DocumentOptions::default()).unwrap();
        for part in XmlPart::ALL {
            let dom = parts.get(part);
            let root = dom.root().unwrap();
            assert!(dom.is_element(root, OFFICENS, part.root_local_name()), "{part}");
        }
    }

    #[test]
    fn test_other_templates_not_implemented() {
        let err = Parts::template(DocumentType::Spreadsheet, &DocumentOptions::default()).unwrap_err();
        match err {
            Error::UnsupportedType(message) => assert!(message.contains("not implemented yet")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_check_writability() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_writability(&dir.path().join("new.odt")).is_ok());
        let err = check_writability(&dir.path().join("missing/new.odt")).unwrap_err();
        assert!(matches!(err, Error::FileAccess { .. }));
    }

    #[test]
    fn test_detect_storage() {
        let dir = tempfile::tempdir().unwrap();
        let flat = dir.path().join("a.fodt");
        std::fs::write(&flat, "<?xml version=\"1.0\"?><x/>").unwrap();
        assert_eq!(detect_storage(&flat).unwrap(), StorageKind::Single);

        let packed = dir.path().join("a.odt");
        std::fs::write(&packed, b"PK\x03\x04rest").unwrap();
        assert_eq!(detect_storage(&packed).unwrap(), StorageKind::Zip);

        assert!(detect_storage(&dir.path().join("none")).is_err());
    }
}
