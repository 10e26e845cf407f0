//! Unified error types for the OpenDocument library.
//!
//! Every failure surfaces immediately as one of these variants. Storage
//! backends map collaborator failures (XML, ZIP, I/O) onto the part that was
//! being loaded or saved, so callers always learn which part broke.
use std::fmt;
use thiserror::Error;

/// Logical part of an OpenDocument container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// The raw `mimetype` entry
    Mimetype,
    /// `content.xml` (`office:document-content`)
    Content,
    /// `meta.xml` (`office:document-meta`)
    Meta,
    /// `settings.xml` (`office:document-settings`)
    Settings,
    /// `styles.xml` (`office:document-styles`)
    Styles,
    /// `META-INF/manifest.xml`
    Manifest,
}

impl PartKind {
    /// Path of the part inside a ZIP container.
    pub fn path(self) -> &'static str {
        match self {
            PartKind::Mimetype => crate::odf::constants::ODF_MIMETYPE,
            PartKind::Content => crate::odf::constants::ODF_CONTENT,
            PartKind::Meta => crate::odf::constants::ODF_META,
            PartKind::Settings => crate::odf::constants::ODF_SETTINGS,
            PartKind::Styles => crate::odf::constants::ODF_STYLES,
            PartKind::Manifest => crate::odf::constants::ODF_MANIFEST,
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Main error type for OpenDocument operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A path could not be read or written
    #[error("File access error for {path}: {reason}")]
    FileAccess { path: String, reason: String },

    /// A logical part was absent or failed to parse
    #[error("Failed to load {part}: {reason}")]
    PartLoad { part: PartKind, reason: String },

    /// A logical part could not be written
    #[error("Failed to save {part}: {reason}")]
    PartSave { part: PartKind, reason: String },

    /// Unknown or unimplemented document type or storage kind
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// The container MIME type has no registered document class
    #[error("Unsupported MIME type {0}")]
    UnsupportedMimeType(String),

    /// A caller passed an argument of the wrong kind
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not available on this backend
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Every generated name with this prefix is taken
    #[error("No style names left with prefix {0}")]
    StyleNamesExhausted(&'static str),

    /// XML parsing or serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::PartLoad`] from any displayable cause.
    pub fn part_load(part: PartKind, reason: impl fmt::Display) -> Self {
        Error::PartLoad {
            part,
            reason: reason.to_string(),
        }
    }

    /// Build a [`Error::PartSave`] from any displayable cause.
    pub fn part_save(part: PartKind, reason: impl fmt::Display) -> Self {
        Error::PartSave {
            part,
            reason: reason.to_string(),
        }
    }

    /// Build a [`Error::FileAccess`] for `path`.
    pub fn file_access(path: impl AsRef<std::path::Path>, reason: impl fmt::Display) -> Self {
        Error::FileAccess {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// The error raised when an element factory gets an unusable host.
    pub fn host_expected() -> Self {
        Error::InvalidArgument("document or element expected".to_string())
    }
}

/// Result type for OpenDocument operations.
pub type Result<T> = std::result::Result<T, Error>;
