//! ODF package writing functionality.
//!
//! The `mimetype` entry is written first and uncompressed as soon as the
//! writer is created, so readers that sniff the first local header find it.
//! The manifest is generated from every added file when the package is
//! finished.

use super::manifest::Manifest;
use crate::common::Result;
use crate::odf::constants::{ODF_MANIFEST, ODF_MIMETYPE, guess_media_type};
use std::io::{Cursor, Seek, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

/// Builder for creating ODF packages (ZIP archives)
///
/// # Examples
///
/// ```no_run
/// # use opendocument::odf::core::PackageWriter;
/// # use opendocument::Result;
/// # fn example() -> Result<()> {
/// let mut writer = PackageWriter::new("application/vnd.oasis.opendocument.text");
/// writer.add_file("content.xml", b"<office:document-content/>")?;
///
/// let bytes = writer.finish_to_bytes()?;
/// std::fs::write("document.odt", bytes)?;
/// # Ok(())
/// # }
/// ```
pub struct PackageWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
    manifest: Manifest,
    compression_level: Option<i64>,
    started: bool,
    mimetype: String,
}

impl PackageWriter<Cursor<Vec<u8>>> {
    /// Create a new package writer that writes to memory
    pub fn new(mimetype: &str) -> Self {
        Self::with_writer(Cursor::new(Vec::new()), mimetype)
    }

    /// Finish writing and return the bytes
    pub fn finish_to_bytes(self) -> Result<Vec<u8>> {
        let cursor = self.finish()?;
        Ok(cursor.into_inner())
    }
}

impl<W: Write + Seek> PackageWriter<W> {
    /// Create a new package writer with a custom writer
    pub fn with_writer(writer: W, mimetype: &str) -> Self {
        Self {
            zip_writer: ZipWriter::new(writer),
            manifest: Manifest::new(mimetype),
            compression_level: None,
            started: false,
            mimetype: mimetype.to_string(),
        }
    }

    /// Deflate level for every compressed entry (`None` uses the default).
    pub fn set_compression_level(&mut self, level: Option<i64>) {
        self.compression_level = level;
    }

    fn deflated(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .compression_level(self.compression_level)
    }

    fn ensure_mimetype(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        self.zip_writer.start_file(ODF_MIMETYPE, options)?;
        self.zip_writer.write_all(self.mimetype.as_bytes())?;
        self.started = true;
        Ok(())
    }

    /// Add a file to the package, guessing its manifest media type from the
    /// extension.
    pub fn add_file(&mut self, path: &str, content: &[u8]) -> Result<()> {
        self.add_file_with_media_type(path, content, guess_media_type(path))
    }

    /// Add a file to the package with a specific media type
    pub fn add_file_with_media_type(
        &mut self,
        path: &str,
        content: &[u8],
        media_type: &str,
    ) -> Result<()> {
        // both are generated by the writer itself
        if path == ODF_MIMETYPE || path == ODF_MANIFEST {
            return Ok(());
        }
        self.ensure_mimetype()?;
        self.manifest.add(path, media_type);

        let options = self.deflated();
        self.zip_writer.start_file(path, options)?;
        self.zip_writer.write_all(content)?;
        Ok(())
    }

    /// Finish writing the package: manifest last, then the ZIP directory.
    pub fn finish(mut self) -> Result<W> {
        self.ensure_mimetype()?;
        let manifest_content = self.manifest.to_xml();
        let options = self.deflated();
        self.zip_writer.start_file(ODF_MANIFEST, options)?;
        self.zip_writer.write_all(manifest_content.as_bytes())?;

        let writer = self.zip_writer.finish()?;
        Ok(writer)
    }
}
