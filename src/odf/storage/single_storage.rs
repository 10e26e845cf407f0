//! Flat (single XML file) documents.
//!
//! A flat document keeps every part under one `office:document` root. On
//! open the root's children are distributed over the four parts; on save the
//! parts are merged back in the order meta, settings, styles, content. Font
//! declarations and automatic styles exist once in a flat file, so those of
//! the styles part are merged into the content ones.

use super::atomic::atomic_write;
use super::{EmbeddedFile, Parts, Storage, XmlPart, check_writability, read_file};
use crate::common::{Error, PartKind, Result};
use crate::odf::DocumentType;
use crate::odf::dom::{self, NodeId, XmlDocument};
use crate::odf::namespace::{OFFICENS, STYLENS};
use crate::odf::options::{DocumentOptions, StorageKind};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Storage for flat `.fodt`-style documents.
///
/// Embedded files cannot be represented and are rejected.
#[derive(Debug, Clone)]
pub struct SingleStorage {
    file: Option<PathBuf>,
    mime_type: String,
    parts: Parts,
    options: DocumentOptions,
}

/// Which part a top-level child of `office:document` belongs to.
fn part_for_child(local: &str) -> Option<XmlPart> {
    match local {
        "meta" => Some(XmlPart::Meta),
        "settings" => Some(XmlPart::Settings),
        "styles" | "master-styles" => Some(XmlPart::Styles),
        "font-face-decls" | "automatic-styles" | "scripts" | "body" => Some(XmlPart::Content),
        _ => None,
    }
}

/// Children of a styles part that are merged into the content part.
const SHARED_SECTIONS: [&str; 2] = ["font-face-decls", "automatic-styles"];

impl SingleStorage {
    /// Split a flat document into its four parts.
    pub fn from_bytes(bytes: &[u8], options: &DocumentOptions) -> Result<Self> {
        let flat = dom::parse(bytes).map_err(|e| Error::part_load(PartKind::Content, e))?;
        let root = flat
            .root()
            .filter(|&r| flat.is_element(r, OFFICENS, "document"))
            .ok_or_else(|| {
                Error::part_load(PartKind::Content, "root element is not office:document")
            })?;
        let mime_type = flat
            .attribute_ns(root, Some(OFFICENS), "mimetype")
            .filter(|m| !m.is_empty())
            .ok_or_else(|| Error::part_load(PartKind::Mimetype, "office:mimetype is missing"))?
            .to_string();
        let version = flat.attribute_ns(root, Some(OFFICENS), "version");

        let new_part = |part: XmlPart| {
            let mut doc = XmlDocument::new();
            let part_root = doc.create_element_ns(OFFICENS, part.root_local_name());
            if let Some(element) = flat.element(root) {
                for (prefix, uri) in &element.declarations {
                    doc.declare_namespace(part_root, prefix.as_deref(), uri);
                }
            }
            if let Some(version) = version {
                doc.set_attribute_ns(part_root, Some(OFFICENS), "version", version);
            }
            let document = doc.document_node();
            doc.append_child(document, part_root);
            (doc, part_root)
        };

        let (mut content, content_root) = new_part(XmlPart::Content);
        let (mut meta, meta_root) = new_part(XmlPart::Meta);
        let (mut settings, settings_root) = new_part(XmlPart::Settings);
        let (mut styles, styles_root) = new_part(XmlPart::Styles);

        for child in flat.element_children(root) {
            let Some(element) = flat.element(child) else {
                continue;
            };
            let part = if element.namespace.as_deref() == Some(OFFICENS) {
                part_for_child(&element.local)
            } else {
                None
            };
            let (target, target_root) = match part {
                Some(XmlPart::Content) => (&mut content, content_root),
                Some(XmlPart::Meta) => (&mut meta, meta_root),
                Some(XmlPart::Settings) => (&mut settings, settings_root),
                Some(XmlPart::Styles) => (&mut styles, styles_root),
                None => {
                    warn!(element = %element.qualified_name(), "skipping unknown top-level element");
                    continue;
                },
            };
            let copy = target.import_node(&flat, child);
            target.append_child(target_root, copy);
        }

        debug!(mime_type = %mime_type, "split flat document into parts");
        Ok(Self {
            file: None,
            mime_type,
            parts: Parts {
                content,
                meta,
                settings,
                styles,
            },
            options: options.clone(),
        })
    }

    /// Merge the parts into one flat document.
    pub fn to_document(&self) -> XmlDocument {
        let mut flat = XmlDocument::new();
        let root = flat.create_element_ns(OFFICENS, "document");
        let document = flat.document_node();
        flat.append_child(document, root);

        for part in XmlPart::ALL {
            let dom = self.parts.get(part);
            if let Some(part_root) = dom.root()
                && let Some(element) = dom.element(part_root)
            {
                for (prefix, uri) in &element.declarations {
                    if flat.lookup_namespace_uri(root, prefix.as_deref()).is_none() {
                        flat.declare_namespace(root, prefix.as_deref(), uri);
                    }
                }
            }
        }
        flat.set_attribute_ns(root, Some(OFFICENS), "version", self.options.office_version.as_str());
        flat.set_attribute_ns(root, Some(OFFICENS), "mimetype", self.mime_type.as_str());

        let styles = self.styles_for_merge();
        for part in [XmlPart::Meta, XmlPart::Settings, XmlPart::Styles] {
            let dom = match part {
                XmlPart::Styles => &*styles,
                other => self.parts.get(other),
            };
            let Some(part_root) = dom.root() else {
                continue;
            };
            for child in dom.element_children(part_root) {
                if part == XmlPart::Styles && is_shared_section(dom, child) {
                    continue;
                }
                let copy = flat.import_node(dom, child);
                flat.append_child(root, copy);
            }
        }

        let content = &self.parts.content;
        let styles = &*styles;
        let styles_root = styles.root();
        let mut merged = Vec::new();
        if let Some(content_root) = content.root() {
            for child in content.element_children(content_root) {
                let copy = flat.import_node(content, child);
                flat.append_child(root, copy);
                if let Some(element) = content.element(child)
                    && element.namespace.as_deref() == Some(OFFICENS)
                    && SHARED_SECTIONS.contains(&element.local.as_str())
                {
                    merged.push(element.local.clone());
                    if let Some(styles_root) = styles_root {
                        merge_section(&mut flat, copy, styles, styles_root, &element.local);
                    }
                }
            }
        }
        // sections only the styles part has are still written
        if let Some(styles_root) = styles_root {
            for section in SHARED_SECTIONS {
                if merged.iter().any(|m| m == section) {
                    continue;
                }
                if let Some(source) = styles.find_child(styles_root, OFFICENS, section) {
                    let copy = flat.import_node(styles, source);
                    let body = flat.find_child(root, OFFICENS, "body");
                    flat.insert_before(root, copy, body);
                }
            }
        }
        flat
    }

    /// The styles part, with its automatic styles and font faces renamed
    /// where a different entry of the content part already uses the name.
    /// References inside the styles part follow the new names.
    fn styles_for_merge(&self) -> Cow<'_, XmlDocument> {
        let content = &self.parts.content;
        let styles = &self.parts.styles;
        let (Some(content_root), Some(styles_root)) = (content.root(), styles.root()) else {
            return Cow::Borrowed(styles);
        };

        let mut renamed: Option<XmlDocument> = None;
        for section in SHARED_SECTIONS {
            let (Some(target), Some(source)) = (
                content.find_child(content_root, OFFICENS, section),
                styles.find_child(styles_root, OFFICENS, section),
            ) else {
                continue;
            };
            let mut taken: HashSet<String> = section_names(content, target)
                .chain(section_names(styles, source))
                .map(str::to_string)
                .collect();

            let mut renames = HashMap::new();
            for child in styles.element_children(source) {
                let Some(name) = styles.attribute_ns(child, Some(STYLENS), "name") else {
                    continue;
                };
                let Some(existing) = content
                    .element_children(target)
                    .find(|&e| content.attribute_ns(e, Some(STYLENS), "name") == Some(name))
                else {
                    continue;
                };
                if dom::nodes_equal(content, existing, styles, child) {
                    continue;
                }
                let fresh = (1u32..)
                    .map(|n| format!("{}_{}", name, n))
                    .find(|candidate| !taken.contains(candidate))
                    .unwrap_or_else(|| name.to_string());
                taken.insert(fresh.clone());
                debug!(section, from = name, to = %fresh, "renaming clashing styles entry");
                renames.insert(name.to_string(), fresh);
            }
            if renames.is_empty() {
                continue;
            }
            let doc = renamed.get_or_insert_with(|| styles.clone());
            rename_entries(doc, source, section, &renames);
        }
        match renamed {
            Some(doc) => Cow::Owned(doc),
            None => Cow::Borrowed(styles),
        }
    }
}

/// `style:name` values declared directly under `section`.
fn section_names(doc: &XmlDocument, section: NodeId) -> impl Iterator<Item = &str> + '_ {
    doc.element_children(section)
        .filter_map(move |node| doc.attribute_ns(node, Some(STYLENS), "name"))
}

/// Whether an attribute can name an entry of `section`.
fn refers_to(section: &str, namespace: Option<&str>, local: &str) -> bool {
    match section {
        "font-face-decls" => namespace == Some(STYLENS) && local.starts_with("font-name"),
        _ => local.ends_with("style-name") || local == "page-layout-name",
    }
}

/// Rename the entries of `section` (rooted at `source`) and every reference
/// to them in `doc`.
fn rename_entries(doc: &mut XmlDocument, source: NodeId, section: &str, renames: &HashMap<String, String>) {
    let root = doc.document_node();
    for node in doc.descendants(root) {
        let is_entry = doc.parent(node) == Some(source);
        let Some(element) = doc.element_mut(node) else {
            continue;
        };
        for attribute in &mut element.attributes {
            let namespace = attribute.namespace.as_deref();
            let declares = is_entry && namespace == Some(STYLENS) && attribute.local == "name";
            if !declares && !refers_to(section, namespace, &attribute.local) {
                continue;
            }
            if let Some(fresh) = renames.get(&attribute.value) {
                attribute.value = fresh.clone();
            }
        }
    }
}

fn is_shared_section(dom: &XmlDocument, node: NodeId) -> bool {
    dom.element(node).is_some_and(|e| {
        e.namespace.as_deref() == Some(OFFICENS) && SHARED_SECTIONS.contains(&e.local.as_str())
    })
}

/// Append the children of the styles part's `section` to `target`, skipping
/// entries whose `style:name` the target already declares. Clashing entries
/// that differ were renamed beforehand, so the skipped ones are identical.
fn merge_section(
    flat: &mut XmlDocument,
    target: NodeId,
    styles: &XmlDocument,
    styles_root: NodeId,
    section: &str,
) {
    let Some(source) = styles.find_child(styles_root, OFFICENS, section) else {
        return;
    };
    for child in styles.element_children(source) {
        let name = styles.attribute_ns(child, Some(STYLENS), "name");
        let clash = name.is_some_and(|name| {
            flat.element_children(target)
                .any(|existing| flat.attribute_ns(existing, Some(STYLENS), "name") == Some(name))
        });
        if clash {
            debug!(section, name = name.unwrap_or_default(), "entry already present while merging styles");
            continue;
        }
        let copy = flat.import_node(styles, child);
        flat.append_child(target, copy);
    }
}

impl Storage for SingleStorage {
    fn create(
        document_type: DocumentType,
        file: Option<&Path>,
        options: &DocumentOptions,
    ) -> Result<Self> {
        if let Some(file) = file {
            check_writability(file)?;
        }
        let parts = Parts::template(document_type, options)?;
        debug!(document_type = %document_type, "created flat document from template");
        Ok(Self {
            file: file.map(Path::to_path_buf),
            mime_type: document_type.mime_type().to_string(),
            parts,
            options: options.clone(),
        })
    }

    fn open(file: &Path, options: &DocumentOptions) -> Result<Self> {
        let bytes = read_file(file)?;
        let mut storage = Self::from_bytes(&bytes, options)?;
        storage.file = Some(file.to_path_buf());
        info!(path = %file.display(), mime_type = %storage.mime_type, "opened flat document");
        Ok(storage)
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Single
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

        let bytes = dom::to_bytes(&self.to_document(), self.options.pretty_print);
        atomic_write(&target, |out| {
            out.write_all(&bytes)
                .map_err(|e| Error::part_save(PartKind::Content, e))
        })?;

        info!(path = %target.display(), "saved flat document");
        self.file = Some(target);
        Ok(())
    }

    fn add_file(&mut self, path: &Path, _mime_type: Option<&str>) -> Result<String> {
        Err(Error::UnsupportedOperation(format!(
            "flat documents cannot embed files ({})",
            path.display()
        )))
    }

    fn remove_file(&mut self, relative: &str) -> Result<()> {
        Err(Error::UnsupportedOperation(format!(
            "flat documents hold no embedded files ({})",
            relative
        )))
    }

    fn embedded_files(&self) -> &[EmbeddedFile] {
        &[]
    }

    fn import(&mut self, other: &dyn Storage) -> Result<()> {
        if !other.embedded_files().is_empty() {
            return Err(Error::UnsupportedOperation(
                "flat documents cannot embed files".to_string(),
            ));
        }
        self.mime_type = other.mime_type().to_string();
        for part in XmlPart::ALL {
            self.parts.set(part, other.part(part).clone());
        }
        debug!(from = %other.kind(), "imported storage");
        Ok(())
    }
}
