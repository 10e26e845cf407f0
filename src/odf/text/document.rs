//! The text document façade.

use crate::common::{Error, PartKind, Result};
use crate::odf::DocumentType;
use crate::odf::constants::ODF_TEXT;
use crate::odf::dom::{NodeId, XmlDocument};
use crate::odf::elements::{
    Bookmark, DocumentId, Element, ElementKind, ElementNode, Heading, Host, NodeRef, Paragraph,
    children_of,
};
use crate::odf::namespace::{OFFICENS, STYLENS, SVGNS, TEXTNS};
use crate::odf::options::{DocumentOptions, StorageKind};
use crate::odf::storage::{
    EmbeddedFile, Parts, Storage, XmlPart, create_storage, detect_storage, open_storage,
};
use crate::odf::style::StyleTable;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;
use tracing::{debug, info};

/// An OpenDocument text document.
///
/// The document owns the four XML parts and hands them to its storage
/// backend on save. Elements are handles into the content part; see
/// [`crate::odf::elements`].
#[derive(Debug)]
pub struct TextDocument {
    id: DocumentId,
    storage: Box<dyn Storage>,
    parts: Parts,
    /// `office:body/office:text`, where new top-level elements go
    cursor: NodeId,
    font_face_decls: NodeId,
    styles: StyleTable,
    options: DocumentOptions,
}

/// Nodes of the content part the document works with.
struct Layout {
    cursor: NodeId,
    automatic_styles: NodeId,
    font_face_decls: NodeId,
}

impl TextDocument {
    /// New in-memory document with default options and ZIP storage.
    pub fn new() -> Result<Self> {
        Self::create(None, &DocumentOptions::default())
    }

    /// New document from the built-in template. `file`, when given, must be
    /// writable and becomes the default save target.
    pub fn create(file: Option<&Path>, options: &DocumentOptions) -> Result<Self> {
        let storage = create_storage(options.storage, DocumentType::Text, file, options)?;
        Self::from_storage(storage, options.clone())
    }

    /// Open a `.odt` package or a flat `.fodt` file, telling them apart by
    /// content.
    pub fn open<P: AsRef<Path>>(path: P, options: &DocumentOptions) -> Result<Self> {
        let path = path.as_ref();
        let kind = detect_storage(path)?;
        let storage = open_storage(kind, path, options)?;
        Self::from_storage(storage, options.clone())
    }

    /// Wrap an already loaded storage.
    pub fn from_storage(storage: Box<dyn Storage>, options: DocumentOptions) -> Result<Self> {
        if storage.mime_type() != ODF_TEXT {
            return Err(Error::UnsupportedMimeType(storage.mime_type().to_string()));
        }
        let mut parts = Parts {
            content: storage.content_dom().clone(),
            meta: storage.meta_dom().clone(),
            settings: storage.settings_dom().clone(),
            styles: storage.styles_dom().clone(),
        };
        let layout = Self::layout(&mut parts.content)?;
        let styles = StyleTable::new(&parts.content, layout.automatic_styles, layout.cursor);
        let document = Self {
            id: DocumentId::next(),
            storage,
            parts,
            cursor: layout.cursor,
            font_face_decls: layout.font_face_decls,
            styles,
            options,
        };
        debug!(
            storage = %document.storage.kind(),
            children = document.children().len(),
            "text document ready"
        );
        Ok(document)
    }

    /// Locate the text body and make sure the font and automatic style
    /// sections exist.
    fn layout(content: &mut XmlDocument) -> Result<Layout> {
        let root = content
            .root()
            .filter(|&root| content.is_element(root, OFFICENS, "document-content"))
            .ok_or_else(|| Error::part_load(PartKind::Content, "missing office:document-content"))?;
        let body = content
            .find_child(root, OFFICENS, "body")
            .ok_or_else(|| Error::part_load(PartKind::Content, "missing office:body"))?;
        let cursor = content
            .find_child(body, OFFICENS, "text")
            .ok_or_else(|| Error::part_load(PartKind::Content, "missing office:text"))?;

        let automatic_styles = match content.find_child(root, OFFICENS, "automatic-styles") {
            Some(node) => node,
            None => {
                let node = content.create_element_ns(OFFICENS, "automatic-styles");
                content.insert_before(root, node, Some(body));
                node
            },
        };
        let font_face_decls = match content.find_child(root, OFFICENS, "font-face-decls") {
            Some(node) => node,
            None => {
                let node = content.create_element_ns(OFFICENS, "font-face-decls");
                content.insert_before(root, node, Some(automatic_styles));
                node
            },
        };
        Ok(Layout {
            cursor,
            automatic_styles,
            font_face_decls,
        })
    }

    /// Identity that element handles of this document carry.
    #[inline]
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// MIME type recorded in the container.
    pub fn mime_type(&self) -> &str {
        self.storage.mime_type()
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.storage.kind()
    }

    /// Default save target.
    pub fn file(&self) -> Option<&Path> {
        self.storage.file()
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// One of the XML parts as it currently stands.
    pub fn dom(&self, part: XmlPart) -> &XmlDocument {
        self.parts.get(part)
    }

    pub(crate) fn content(&self) -> &XmlDocument {
        &self.parts.content
    }

    pub(crate) fn content_mut(&mut self) -> &mut XmlDocument {
        &mut self.parts.content
    }

    /// Node named by a handle of this document.
    pub(crate) fn node_of(&self, node: NodeRef) -> Result<NodeId> {
        if node.document != self.id {
            return Err(Error::InvalidArgument(
                "element belongs to another document".to_string(),
            ));
        }
        Ok(node.node)
    }

    /// Node that new elements for `host` are appended to.
    pub(crate) fn resolve_host(&self, host: Host) -> Result<NodeId> {
        match host {
            Host::Document => Ok(self.cursor),
            Host::Element(node, kind) => {
                let content = &self.parts.content;
                let usable = node.document == self.id
                    && kind.is_container()
                    && ElementKind::from_node(content, node.node) == Some(kind)
                    && content.is_ancestor_or_self(self.cursor, node.node);
                if usable {
                    Ok(node.node)
                } else {
                    Err(Error::host_expected())
                }
            },
        }
    }

    // ------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------

    /// Top-level elements of the text body.
    pub fn children(&self) -> Vec<Element> {
        children_of(&self.parts.content, self.id, self.cursor)
    }

    /// Append a paragraph to the body.
    pub fn create_paragraph(&mut self, text: Option<&str>) -> Result<Paragraph> {
        Paragraph::create(self, Host::Document, text)
    }

    /// Append a heading to the body; see [`Heading::create`] for `level`.
    pub fn create_heading(&mut self, text: Option<&str>, level: impl Display) -> Result<Heading> {
        Heading::create(self, Host::Document, text, level)
    }

    /// Append a bookmark marker to the body.
    pub fn create_bookmark(&mut self, name: &str, bookmark_type: &str) -> Result<Bookmark> {
        Bookmark::create(self, Host::Document, name, bookmark_type)
    }

    /// Remove an element and its subtree from the body.
    pub fn delete_element(&mut self, element: &impl ElementNode) -> Result<()> {
        let node = self.node_of(element.node_ref())?;
        let content = &mut self.parts.content;
        if node == self.cursor || !content.is_ancestor_or_self(self.cursor, node) {
            return Err(Error::InvalidArgument(
                "element is not part of the document body".to_string(),
            ));
        }
        content.detach(node);
        Ok(())
    }

    /// Plain text of the body, one line per top-level element.
    pub fn text(&self) -> String {
        self.children()
            .iter()
            .map(|child| child.text(self))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ------------------------------------------------------------------
    // Styles
    // ------------------------------------------------------------------

    /// Set one text property on an element of `kind` through the style
    /// table and store the resulting name on it.
    pub(crate) fn apply_style_to(
        &mut self,
        element: NodeRef,
        kind: ElementKind,
        property: &str,
        value: &str,
    ) -> Result<String> {
        let category = kind.style_category()?;
        let node = self.node_of(element)?;
        let current = self.style_name_of_node(node);
        let content = &mut self.parts.content;
        let name = self
            .styles
            .apply(content, current.as_deref(), property, value, category)?;
        content.set_attribute_ns(node, Some(TEXTNS), "style-name", name.as_str());
        Ok(name)
    }

    pub(crate) fn style_name_of_node(&self, node: NodeId) -> Option<String> {
        self.parts
            .content
            .attribute_ns(node, Some(TEXTNS), "style-name")
            .map(str::to_string)
    }

    /// Values of `properties` (`prefix:local`) in automatic style `name`.
    pub fn style(&self, name: &str, properties: &[&str]) -> BTreeMap<String, String> {
        self.styles.get(&self.parts.content, name, properties)
    }

    /// Names of the automatic styles in the content part.
    pub fn style_names(&self) -> Vec<String> {
        self.styles.names(&self.parts.content)
    }

    /// Drop automatic styles nothing refers to any more.
    pub fn prune_styles(&mut self) -> usize {
        self.styles.prune(&mut self.parts.content)
    }

    // ------------------------------------------------------------------
    // Fonts
    // ------------------------------------------------------------------

    /// Names of the declared font faces.
    pub fn fonts(&self) -> Vec<String> {
        let content = &self.parts.content;
        content
            .element_children(self.font_face_decls)
            .filter(|&node| content.is_element(node, STYLENS, "font-face"))
            .filter_map(|node| content.attribute_ns(node, Some(STYLENS), "name"))
            .map(str::to_string)
            .collect()
    }

    /// Declare a font face unless one named `name` exists. `family`
    /// defaults to the name. Returns whether a declaration was added.
    pub fn add_font(&mut self, name: &str, family: Option<&str>) -> bool {
        if self.fonts().iter().any(|font| font == name) {
            return false;
        }
        let content = &mut self.parts.content;
        let node = content.create_element_ns(STYLENS, "font-face");
        content.set_attribute_ns(node, Some(STYLENS), "name", name);
        content.set_attribute_ns(node, Some(SVGNS), "font-family", family.unwrap_or(name));
        content.append_child(self.font_face_decls, node);
        debug!(font = name, "declared font face");
        true
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the document to `file`, or to the default target.
    pub fn save(&mut self, file: Option<&Path>) -> Result<()> {
        if self.options.prune_styles_on_save {
            let pruned = self.prune_styles();
            debug!(pruned, "pruned styles before save");
        }
        for part in XmlPart::ALL {
            self.storage.set_part(part, self.parts.get(part).clone());
        }
        self.storage.save(file)?;
        info!(storage = %self.storage.kind(), "saved text document");
        Ok(())
    }

    /// Replace this document's parts, MIME type, and where the backend
    /// allows embedded files, with those of `other`.
    ///
    /// Handles created before the import no longer refer to this document.
    pub fn import(&mut self, other: &TextDocument) -> Result<()> {
        self.storage.import(other.storage.as_ref())?;
        let mut parts = other.parts.clone();
        let layout = Self::layout(&mut parts.content)?;
        self.styles = StyleTable::new(&parts.content, layout.automatic_styles, layout.cursor);
        self.parts = parts;
        self.cursor = layout.cursor;
        self.font_face_decls = layout.font_face_decls;
        self.id = DocumentId::next();
        Ok(())
    }

    /// Embed a file; returns its path inside the container.
    pub fn add_file(&mut self, path: &Path, mime_type: Option<&str>) -> Result<String> {
        self.storage.add_file(path, mime_type)
    }

    pub fn remove_file(&mut self, relative: &str) -> Result<()> {
        self.storage.remove_file(relative)
    }

    pub fn embedded_files(&self) -> &[EmbeddedFile] {
        self.storage.embedded_files()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::elements::{InlineContainer, StyledElement};

    #[test]
    fn test_new_document_is_empty() {
        let doc = TextDocument::new().unwrap();
        assert_eq!(doc.mime_type(), ODF_TEXT);
        assert_eq!(doc.storage_kind(), StorageKind::Zip);
        assert!(doc.children().is_empty());
        assert!(doc.fonts().is_empty());
        assert!(doc.style_names().is_empty());
    }

    #[test]
    fn test_children_and_delete() {
        let mut doc = TextDocument::new().unwrap();
        let first = doc.create_paragraph(Some("one")).unwrap();
        let heading = doc.create_heading(Some("two"), 2).unwrap();
        doc.create_paragraph(Some("three")).unwrap();
        assert_eq!(doc.text(), "one\ntwo\nthree");

        doc.delete_element(&heading).unwrap();
        assert_eq!(doc.children().len(), 2);
        assert_eq!(doc.children()[0], Element::Paragraph(first));

        // the deleted node can no longer host anything
        let err = heading.create_span(&mut doc, Some("x")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(doc.delete_element(&heading).is_err());
    }

    #[test]
    fn test_handles_are_tied_to_their_document() {
        let mut first = TextDocument::new().unwrap();
        let mut second = TextDocument::new().unwrap();
        let p = first.create_paragraph(None).unwrap();
        assert!(p.apply_style(&mut second, "fo:color", "red").is_err());
        assert!(second.delete_element(&p).is_err());
    }

    #[test]
    fn test_documents_number_styles_independently() {
        let mut first = TextDocument::new().unwrap();
        let mut second = TextDocument::new().unwrap();
        let a = first.create_paragraph(None).unwrap();
        let b = second.create_paragraph(None).unwrap();
        assert_eq!(a.apply_style(&mut first, "fo:color", "red").unwrap(), "P1");
        assert_eq!(b.apply_style(&mut second, "fo:color", "blue").unwrap(), "P1");
    }

    #[test]
    fn test_add_font_once() {
        let mut doc = TextDocument::new().unwrap();
        assert!(doc.add_font("Liberation Serif", None));
        assert!(doc.add_font("Mono", Some("DejaVu Sans Mono")));
        assert!(!doc.add_font("Mono", Some("Other")));
        assert!(doc.add_font("mono", None));
        assert_eq!(doc.fonts(), vec!["Liberation Serif", "Mono", "mono"]);
    }

    #[test]
    fn test_prune_styles() {
        let mut doc = TextDocument::new().unwrap();
        let a = doc.create_paragraph(Some("a")).unwrap();
        let b = doc.create_paragraph(Some("b")).unwrap();
        a.apply_style(&mut doc, "fo:color", "red").unwrap();
        b.apply_style(&mut doc, "fo:color", "blue").unwrap();
        doc.delete_element(&b).unwrap();
        assert_eq!(doc.prune_styles(), 1);
        assert_eq!(doc.style_names(), vec!["P1"]);
    }

    #[test]
    fn test_missing_sections_are_created() {
        let xml = r#"<?xml version="1.0"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0"><office:body><office:text><text:p>hi</text:p></office:text></office:body></office:document-content>"#;
        let mut parts = Parts::template(DocumentType::Text, &DocumentOptions::default()).unwrap();
        parts.content = crate::odf::dom::parse(xml.as_bytes()).unwrap();
        let layout = TextDocument::layout(&mut parts.content).unwrap();
        let root = parts.content.root().unwrap();
        let names: Vec<String> = parts
            .content
            .element_children(root)
            .filter_map(|n| parts.content.element(n).map(|e| e.local.clone()))
            .collect();
        assert_eq!(names, vec!["font-face-decls", "automatic-styles", "body"]);
        assert_eq!(parts.content.text_content(layout.cursor), "hi");
    }

    #[test]
    fn test_content_without_body_is_rejected() {
        let mut content = crate::odf::dom::parse(
            br#"<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"/>"#,
        )
        .unwrap();
        let err = TextDocument::layout(&mut content).err().unwrap();
        assert!(matches!(err, Error::PartLoad { part: PartKind::Content, .. }));
    }

    #[test]
    fn test_save_without_target_fails() {
        let mut doc = TextDocument::new().unwrap();
        let err = doc.save(None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_import_replaces_content() {
        let mut source = TextDocument::new().unwrap();
        source.create_paragraph(Some("copied")).unwrap();
        source.add_font("Serif", None);

        let mut target = TextDocument::new().unwrap();
        let old = target.create_paragraph(Some("old")).unwrap();
        target.import(&source).unwrap();

        assert_eq!(target.text(), "copied");
        assert_eq!(target.fonts(), vec!["Serif"]);
        assert!(target.delete_element(&old).is_err());
    }
}
