//! ODF manifest parsing and generation.
//!
//! The manifest.xml file lists every file in the package with its media
//! type. The root entry `/` carries the MIME type of the whole document.

use crate::common::xml::escape_attribute;
use crate::common::{Error, PartKind, Result};
use crate::odf::constants::OFFICE_VERSION;
use crate::odf::dom;
use crate::odf::namespace::MANIFESTNS;

/// Path of the root entry describing the package itself
pub const ROOT_ENTRY: &str = "/";

/// Entry in the ODF manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub full_path: String,
    pub media_type: String,
}

/// ODF manifest (META-INF/manifest.xml), entries kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Create a manifest holding only the root entry for `mime_type`.
    pub fn new(mime_type: &str) -> Self {
        let mut manifest = Self::default();
        manifest.add(ROOT_ENTRY, mime_type);
        manifest
    }

    /// Parse manifest XML content.
    ///
    /// Entries are matched by namespace URI, so any prefix bound to the
    /// manifest namespace is accepted.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let doc = dom::parse(bytes).map_err(|e| Error::part_load(PartKind::Manifest, e))?;
        let root = doc
            .root()
            .filter(|&r| doc.is_element(r, MANIFESTNS, "manifest"))
            .ok_or_else(|| Error::part_load(PartKind::Manifest, "missing manifest:manifest root"))?;

        let mut manifest = Self::default();
        for entry in doc.elements_by_tag_ns(root, MANIFESTNS, "file-entry") {
            let Some(full_path) = doc.attribute_ns(entry, Some(MANIFESTNS), "full-path") else {
                continue;
            };
            let media_type = doc
                .attribute_ns(entry, Some(MANIFESTNS), "media-type")
                .unwrap_or_default();
            manifest.add(full_path, media_type);
        }
        Ok(manifest)
    }

    /// Add or replace the entry for `full_path`.
    pub fn add(&mut self, full_path: &str, media_type: &str) {
        match self.entries.iter_mut().find(|e| e.full_path == full_path) {
            Some(entry) => entry.media_type = media_type.to_string(),
            None => self.entries.push(ManifestEntry {
                full_path: full_path.to_string(),
                media_type: media_type.to_string(),
            }),
        }
    }

    /// Remove the entry for `full_path`; returns whether one existed.
    pub fn remove(&mut self, full_path: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.full_path != full_path);
        self.entries.len() != before
    }

    /// Get media type for a path
    pub fn media_type(&self, full_path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.full_path == full_path)
            .map(|e| e.media_type.as_str())
    }

    /// MIME type recorded on the root entry.
    pub fn mime_type(&self) -> Option<&str> {
        self.media_type(ROOT_ENTRY).filter(|m| !m.is_empty())
    }

    /// Check if a path exists in manifest
    pub fn has_path(&self, full_path: &str) -> bool {
        self.media_type(full_path).is_some()
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Generate the manifest.xml content.
    pub fn to_xml(&self) -> String {
        let mut manifest = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="{}" manifest:version="{}">
"#,
            MANIFESTNS, OFFICE_VERSION
        );

        for entry in &self.entries {
            if entry.full_path == ROOT_ENTRY {
                manifest.push_str(&format!(
                    r#"  <manifest:file-entry manifest:full-path="/" manifest:version="{}" manifest:media-type="{}"/>
"#,
                    OFFICE_VERSION,
                    escape_attribute(&entry.media_type)
                ));
            } else {
                manifest.push_str(&format!(
                    r#"  <manifest:file-entry manifest:full-path="{}" manifest:media-type="{}"/>
"#,
                    escape_attribute(&entry.full_path),
                    escape_attribute(&entry.media_type)
                ));
            }
        }

        manifest.push_str("</manifest:manifest>\n");
        manifest
    }
}
