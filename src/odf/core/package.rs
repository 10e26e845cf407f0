//! ODF package (ZIP archive) reading.
//!
//! A package is opened once; the MIME type and manifest are read eagerly,
//! other entries on demand.

use super::manifest::Manifest;
use crate::common::{Error, PartKind, Result};
use crate::odf::constants::{ODF_MANIFEST, ODF_MIMETYPE};
use std::cell::RefCell;
use std::io::{Read, Seek};

/// An ODF package (ZIP file containing XML documents)
pub struct Package<R> {
    archive: RefCell<zip::ZipArchive<R>>,
    manifest: Manifest,
    mimetype: String,
}

impl<R: Read + Seek> Package<R> {
    /// Open an ODF package from a reader
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;

        let manifest_bytes = Self::read_entry(&mut archive, ODF_MANIFEST)
            .map_err(|e| Error::part_load(PartKind::Manifest, e))?;
        let manifest = Manifest::parse(&manifest_bytes)?;

        // the mimetype entry wins; the manifest root entry is the fallback
        let mimetype = match Self::read_entry(&mut archive, ODF_MIMETYPE) {
            Ok(bytes) => String::from_utf8(bytes)
                .map_err(|e| Error::part_load(PartKind::Mimetype, e))?
                .trim()
                .to_string(),
            Err(_) => manifest
                .mime_type()
                .map(str::to_string)
                .ok_or_else(|| Error::part_load(PartKind::Mimetype, "no mimetype entry"))?,
        };

        Ok(Self {
            archive: RefCell::new(archive),
            manifest,
            mimetype,
        })
    }

    fn read_entry(archive: &mut zip::ZipArchive<R>, path: &str) -> Result<Vec<u8>> {
        let mut file = archive.by_name(path)?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(content)
    }

    /// Get the MIME type of the package
    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    /// Get the manifest
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Get a file from the package by path
    pub fn get_file(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        Self::read_entry(&mut archive, path)
    }

    /// Check if a file exists in the package
    pub fn has_file(&self, path: &str) -> bool {
        self.archive.borrow_mut().by_name(path).is_ok()
    }

    /// List all file entries in the package, skipping directory entries
    pub fn files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        let mut archive = self.archive.borrow_mut();
        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            if !file.is_dir() {
                files.push(file.name().to_string());
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::constants::ODF_TEXT;
    use crate::odf::core::PackageWriter;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_read_written_package() {
        let mut writer = PackageWriter::new(ODF_TEXT);
        writer.add_file("content.xml", b"<x/>").unwrap();
        let bytes = writer.finish_to_bytes().unwrap();

        let package = Package::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(package.mimetype(), ODF_TEXT);
        assert_eq!(package.get_file("content.xml").unwrap(), b"<x/>");
        assert!(package.has_file("META-INF/manifest.xml"));
        assert!(!package.has_file("nope.xml"));
        assert_eq!(
            package.files().unwrap(),
            vec!["mimetype", "content.xml", "META-INF/manifest.xml"]
        );
    }

    #[test]
    fn test_missing_manifest_is_a_part_error() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("mimetype", SimpleFileOptions::default()).unwrap();
        zip.write_all(ODF_TEXT.as_bytes()).unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let err = Package::from_reader(Cursor::new(bytes)).err().unwrap();
        assert!(matches!(
            err,
            Error::PartLoad {
                part: PartKind::Manifest,
                ..
            }
        ));
    }

    #[test]
    fn test_not_a_zip() {
        let err = Package::from_reader(Cursor::new(b"plain text".to_vec())).err().unwrap();
        assert!(matches!(err, Error::Zip(_)));
    }
}
