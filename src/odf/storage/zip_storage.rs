//! Packaged (ZIP) documents.

use super::atomic::atomic_write;
use super::{
    EmbeddedFile, Parts, Storage, XmlPart, check_writability, parse_part, read_file,
};
use crate::common::{Error, PartKind, Result};
use crate::odf::DocumentType;
use crate::odf::constants::{ODF_MANIFEST, ODF_MIMETYPE, ODF_PICTURES, guess_media_type};
use crate::odf::core::{Package, PackageWriter};
use crate::odf::dom::{self, XmlDocument};
use crate::odf::options::{DocumentOptions, StorageKind};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Storage for `.odt`-style ZIP packages.
///
/// Entries other than the four XML parts, the `mimetype` stream and the
/// manifest are kept as embedded files and written back on save with their
/// manifest media types, so unknown content survives a round trip.
#[derive(Debug, Clone)]
pub struct ZipStorage {
    file: Option<PathBuf>,
    mime_type: String,
    parts: Parts,
    files: Vec<EmbeddedFile>,
    options: DocumentOptions,
}

impl ZipStorage {
    /// Load a package from memory.
    pub fn from_bytes(bytes: Vec<u8>, options: &DocumentOptions) -> Result<Self> {
        let package = Package::from_reader(Cursor::new(bytes))?;
        let load = |part: XmlPart| -> Result<XmlDocument> {
            let bytes = package
                .get_file(part.path())
                .map_err(|e| Error::part_load(part.kind(), e))?;
            parse_part(part, &bytes)
        };
        let parts = Parts {
            content: load(XmlPart::Content)?,
            meta: load(XmlPart::Meta)?,
            settings: load(XmlPart::Settings)?,
            styles: load(XmlPart::Styles)?,
        };

        let mut files = Vec::new();
        for path in package.files()? {
            if is_generated_entry(&path) {
                continue;
            }
            let media_type = package
                .manifest()
                .media_type(&path)
                .map(str::to_string)
                .unwrap_or_else(|| guess_media_type(&path).to_string());
            let data = package.get_file(&path)?;
            debug!(path = %path, media_type = %media_type, "keeping embedded file");
            files.push(EmbeddedFile {
                path,
                media_type,
                data,
            });
        }

        Ok(Self {
            file: None,
            mime_type: package.mimetype().to_string(),
            parts,
            files,
            options: options.clone(),
        })
    }

    /// Serialize the package to memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = PackageWriter::new(&self.mime_type);
        self.write_entries(&mut writer)?;
        writer
            .finish_to_bytes()
            .map_err(|e| Error::part_save(PartKind::Manifest, e))
    }

    fn write_entries<W: std::io::Write + std::io::Seek>(
        &self,
        writer: &mut PackageWriter<W>,
    ) -> Result<()> {
        writer.set_compression_level(self.options.compression_level);
        for part in [XmlPart::Content, XmlPart::Meta, XmlPart::Settings, XmlPart::Styles] {
            let bytes = dom::to_bytes(self.parts.get(part), self.options.pretty_print);
            writer
                .add_file_with_media_type(part.path(), &bytes, "text/xml")
                .map_err(|e| Error::part_save(part.kind(), e))?;
        }
        for file in &self.files {
            writer.add_file_with_media_type(&file.path, &file.data, &file.media_type)?;
        }
        Ok(())
    }

    fn unique_path(&self, file_name: &str) -> String {
        let candidate = format!("{}{}", ODF_PICTURES, file_name);
        if !self.files.iter().any(|f| f.path == candidate) {
            return candidate;
        }
        let (stem, extension) = match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{}", ext)),
            _ => (file_name, String::new()),
        };
        let mut n = 1usize;
        loop {
            let candidate = format!("{}{}-{}{}", ODF_PICTURES, stem, n, extension);
            if !self.files.iter().any(|f| f.path == candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Entries the writer regenerates or that hold the XML parts.
fn is_generated_entry(path: &str) -> bool {
    path == ODF_MIMETYPE
        || path == ODF_MANIFEST
        || XmlPart::ALL.iter().any(|part| part.path() == path)
}

impl Storage for ZipStorage {
    fn create(
        document_type: DocumentType,
        file: Option<&Path>,
        options: &DocumentOptions,
    ) -> Result<Self> {
        if let Some(file) = file {
            check_writability(file)?;
        }
        let parts = Parts::template(document_type, options)?;
        debug!(document_type = %document_type, "created package from template");
        Ok(Self {
            file: file.map(Path::to_path_buf),
            mime_type: document_type.mime_type().to_string(),
            parts,
            files: Vec::new(),
            options: options.clone(),
        })
    }

    fn open(file: &Path, options: &DocumentOptions) -> Result<Self> {
        let bytes = read_file(file)?;
        let mut storage = Self::from_bytes(bytes, options)?;
        storage.file = Some(file.to_path_buf());
        info!(path = %file.display(), mime_type = %storage.mime_type, "opened package");
        Ok(storage)
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Zip
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    fn part(&self, part: XmlPart) -> &XmlDocument {
        self.parts.get(part)
    }

    fn set_part(&mut self, part: XmlPart, dom: XmlDocument) {
        self.parts.set(part, dom);
    }

    fn save(&mut self, file: Option<&Path>) -> Result<()> {
        let target = file
            .map(Path::to_path_buf)
            .or_else(|| self.file.clone())
            .ok_or_else(|| Error::InvalidArgument("no file name given for saving".to_string()))?;

        atomic_write(&target, |out| {
            let mut writer = PackageWriter::with_writer(out, &self.mime_type);
            self.write_entries(&mut writer)?;
            writer
                .finish()
                .map_err(|e| Error::part_save(PartKind::Manifest, e))?;
            Ok(())
        })?;

        info!(path = %target.display(), files = self.files.len(), "saved package");
        self.file = Some(target);
        Ok(())
    }

    fn add_file(&mut self, path: &Path, mime_type: Option<&str>) -> Result<String> {
        let data = read_file(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidArgument(format!("not a file path: {}", path.display())))?;
        let relative = self.unique_path(file_name);
        let media_type = mime_type
            .map(str::to_string)
            .unwrap_or_else(|| guess_media_type(file_name).to_string());
        debug!(path = %relative, media_type = %media_type, "embedding file");
        self.files.push(EmbeddedFile {
            path: relative.clone(),
            media_type,
            data,
        });
        Ok(relative)
    }

    fn remove_file(&mut self, relative: &str) -> Result<()> {
        let before = self.files.len();
        self.files.retain(|f| f.path != relative);
        if self.files.len() == before {
            return Err(Error::InvalidArgument(format!(
                "no embedded file named {}",
                relative
            )));
        }
        Ok(())
    }

    fn embedded_files(&self) -> &[EmbeddedFile] {
        &self.files
    }

    fn import(&mut self, other: &dyn Storage) -> Result<()> {
        self.mime_type = other.mime_type().to_string();
        for part in XmlPart::ALL {
            self.parts.set(part, other.part(part).clone());
        }
        self.files = other.embedded_files().to_vec();
        debug!(from = %other.kind(), files = self.files.len(), "imported storage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::constants::ODF_TEXT;
    use crate::odf::namespace::{OFFICENS, TEXTNS};
    use std::io::{Read, Write};

    fn new_text() -> ZipStorage {
        ZipStorage::create(DocumentType::Text, None, &DocumentOptions::default()).unwrap()
    }

    fn add_paragraph(storage: &mut ZipStorage, text: &str) {
        let mut content = storage.content_dom().clone();
        let root = content.root().unwrap();
        let body = content.find_child(root, OFFICENS, "body").unwrap();
        let office_text = content.find_child(body, OFFICENS, "text").unwrap();
        let p = content.create_element_ns(TEXTNS, "p");
        content.append_child(office_text, p);
        content.append_text(p, text);
        storage.set_content_dom(content);
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.odt");
        let mut storage = new_text();
        add_paragraph(&mut storage, "Hello");
        storage.save(Some(path.as_path())).unwrap();
        assert_eq!(storage.file(), Some(path.as_path()));

        let reopened = ZipStorage::open(&path, &DocumentOptions::default()).unwrap();
        assert_eq!(reopened.mime_type(), ODF_TEXT);
        let content = reopened.content_dom();
        let paragraphs = content.elements_by_tag_ns(content.root().unwrap(), TEXTNS, "p");
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(content.text_content(paragraphs[0]), "Hello");
    }

    #[test]
    fn test_save_without_target_fails() {
        let mut storage = new_text();
        assert!(matches!(storage.save(None), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let err = ZipStorage::open(Path::new("/no/such/file.odt"), &DocumentOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::FileAccess { .. }));
    }

    #[test]
    fn test_missing_part_is_reported() {
        let mut writer = PackageWriter::new(ODF_TEXT);
        writer.add_file("content.xml", b"<office:document-content/>").unwrap();
        let bytes = writer.finish_to_bytes().unwrap();
        let err = ZipStorage::from_bytes(bytes, &DocumentOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::PartLoad {
                part: PartKind::Meta,
                ..
            }
        ));
    }

    #[test]
    fn test_broken_part_is_reported() {
        let bytes = new_text().to_bytes().unwrap();
        // re-package with a truncated styles.xml
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut writer = PackageWriter::new(ODF_TEXT);
        for name in ["content.xml", "meta.xml", "settings.xml"] {
            let mut data = Vec::new();
            archive.by_name(name).unwrap().read_to_end(&mut data).unwrap();
            writer.add_file(name, &data).unwrap();
        }
        writer.add_file("styles.xml", b"<office:document-styles").unwrap();
        let bytes = writer.finish_to_bytes().unwrap();

        let err = ZipStorage::from_bytes(bytes, &DocumentOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::PartLoad {
                part: PartKind::Styles,
                ..
            }
        ));
    }

    #[test]
    fn test_embedded_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("logo.png");
        std::fs::File::create(&image).unwrap().write_all(&[0x89, b'P', b'N', b'G']).unwrap();

        let mut storage = new_text();
        let first = storage.add_file(&image, None).unwrap();
        let second = storage.add_file(&image, Some("image/x-custom")).unwrap();
        assert_eq!(first, "Pictures/logo.png");
        assert_eq!(second, "Pictures/logo-1.png");

        let path = dir.path().join("doc.odt");
        storage.save(Some(path.as_path())).unwrap();
        let mut reopened = ZipStorage::open(&path, &DocumentOptions::default()).unwrap();
        let files = reopened.embedded_files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].media_type, "image/png");
        assert_eq!(files[1].media_type, "image/x-custom");
        assert_eq!(files[0].data, vec![0x89, b'P', b'N', b'G']);

        reopened.remove_file("Pictures/logo.png").unwrap();
        assert!(reopened.remove_file("Pictures/logo.png").is_err());
        assert_eq!(reopened.embedded_files().len(), 1);
    }

    #[test]
    fn test_import_copies_parts_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("a.gif");
        std::fs::write(&image, b"GIF89a").unwrap();

        let mut source = new_text();
        add_paragraph(&mut source, "copied");
        source.add_file(&image, None).unwrap();

        let mut target = new_text();
        target.import(&source).unwrap();
        assert_eq!(target.embedded_files().len(), 1);
        let content = target.content_dom();
        assert_eq!(content.text_content(content.root().unwrap()), "copied");
    }
}
