//! Document configuration.
//!
//! Options are plain data: they can be built in code, or deserialized from
//! whatever configuration format the host application uses.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};
use crate::odf::constants::OFFICE_VERSION;

/// Storage backend used for a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Multi-part ZIP container (`.odt`)
    #[default]
    Zip,
    /// Flat single-XML-file document (`.fodt`)
    Single,
}

impl StorageKind {
    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Zip => "zip",
            StorageKind::Single => "single",
        }
    }
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "zip" => Ok(StorageKind::Zip),
            "single" => Ok(StorageKind::Single),
            _ => Err(Error::UnsupportedType(format!("storage kind '{}'", s))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for creating, opening and saving documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    /// Backend for newly created documents
    pub storage: StorageKind,
    /// Remove unreferenced automatic styles before every save
    pub prune_styles_on_save: bool,
    /// Written to `meta:generator` in newly created documents
    pub generator: String,
    /// `office:version` written on new part roots and flat documents
    pub office_version: String,
    /// Indent element-only XML content when serializing
    pub pretty_print: bool,
    /// Deflate level for ZIP entries (`None` for the library default)
    pub compression_level: Option<i64>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            storage: StorageKind::Zip,
            prune_styles_on_save: false,
            generator: concat!("opendocument-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            office_version: OFFICE_VERSION.to_string(),
            pretty_print: false,
            compression_level: None,
        }
    }
}

impl DocumentOptions {
    /// Default options with a different storage backend.
    pub fn with_storage(storage: StorageKind) -> Self {
        Self {
            storage,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_kind_parse() {
        assert_eq!("zip".parse::<StorageKind>().unwrap(), StorageKind::Zip);
        assert_eq!("Single".parse::<StorageKind>().unwrap(), StorageKind::Single);
        let err = "tar".parse::<StorageKind>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn test_defaults() {
        let options = DocumentOptions::default();
        assert_eq!(options.storage, StorageKind::Zip);
        assert_eq!(options.office_version, "1.3");
        assert!(!options.prune_styles_on_save);
        assert!(options.generator.starts_with("opendocument-rs/"));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let options: DocumentOptions =
            serde_json::from_str(r#"{"storage":"single","pretty_print":true}"#).unwrap();
        assert_eq!(options.storage, StorageKind::Single);
        assert!(options.pretty_print);
        assert_eq!(options.office_version, "1.3");

        let json = serde_json::to_string(&DocumentOptions::with_storage(StorageKind::Zip)).unwrap();
        assert!(json.contains(r#""storage":"zip""#));
    }
}
