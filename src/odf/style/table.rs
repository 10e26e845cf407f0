//! The automatic style table of a content part.

use super::{StyleCategory, StyleFamily, StyleNameAllocator};
use crate::common::{Error, Result};
use crate::odf::constants::DEFAULT_PARENT_STYLE;
use crate::odf::dom::{NodeId, XmlDocument, nodes_equal_ignoring};
use crate::odf::namespace::{QName, STYLENS, TEXTNS, well_known_uri};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Automatic styles of one document plus the name counters used to label
/// new ones.
///
/// The table stores node handles only; the XML lives in the content part,
/// which is passed to every call.
#[derive(Debug, Clone)]
pub struct StyleTable {
    automatic_styles: NodeId,
    scope: NodeId,
    allocator: StyleNameAllocator,
}

impl StyleTable {
    /// Table over the `office:automatic-styles` node, counting references
    /// among the descendants of `scope` (the text body).
    pub fn new(doc: &XmlDocument, automatic_styles: NodeId, scope: NodeId) -> Self {
        let mut table = Self {
            automatic_styles,
            scope,
            allocator: StyleNameAllocator::new(),
        };
        table.reseed(doc);
        table
    }

    /// Re-read every style name in use and move the counters past them.
    pub fn reseed(&mut self, doc: &XmlDocument) {
        let mut names: Vec<&str> = doc
            .descendants(self.scope)
            .into_iter()
            .filter_map(|node| doc.attribute_ns(node, Some(TEXTNS), "style-name"))
            .collect();
        names.extend(
            self.style_nodes(doc)
                .filter_map(|node| doc.attribute_ns(node, Some(STYLENS), "name")),
        );
        self.allocator.seed(names);
        debug!(
            paragraph = self.allocator.current(StyleCategory::Paragraph),
            heading = self.allocator.current(StyleCategory::Heading),
            hyperlink = self.allocator.current(StyleCategory::Hyperlink),
            span = self.allocator.current(StyleCategory::Span),
            "seeded style name counters"
        );
    }

    /// The `office:automatic-styles` node.
    #[inline]
    pub fn automatic_styles(&self) -> NodeId {
        self.automatic_styles
    }

    #[inline]
    pub fn allocator(&self) -> &StyleNameAllocator {
        &self.allocator
    }

    /// `style:style` children of the automatic styles, in document order.
    fn style_nodes<'a>(&self, doc: &'a XmlDocument) -> impl Iterator<Item = NodeId> + use<'a> {
        doc.element_children(self.automatic_styles)
            .filter(move |&node| doc.is_element(node, STYLENS, "style"))
    }

    /// Style node named `name`.
    pub fn find(&self, doc: &XmlDocument, name: &str) -> Option<NodeId> {
        self.style_nodes(doc)
            .find(|&node| doc.attribute_ns(node, Some(STYLENS), "name") == Some(name))
    }

    /// Names of all automatic styles, in document order.
    pub fn names(&self, doc: &XmlDocument) -> Vec<String> {
        self.style_nodes(doc)
            .filter_map(|node| doc.attribute_ns(node, Some(STYLENS), "name"))
            .map(str::to_string)
            .collect()
    }

    /// Number of elements in the text body whose `text:style-name` is `name`.
    pub fn reference_count(&self, doc: &XmlDocument, name: &str) -> usize {
        doc.descendants(self.scope)
            .into_iter()
            .filter(|&node| doc.attribute_ns(node, Some(TEXTNS), "style-name") == Some(name))
            .count()
    }

    /// Set `property` (a `prefix:local` attribute name of the text
    /// properties) to `value` for an element currently using `current`, and
    /// return the style name the element must use afterwards.
    ///
    /// A style used by more than one element is copied before the change.
    /// If the result matches another automatic style, that style's name is
    /// returned and the candidate node is dropped.
    pub fn apply(
        &mut self,
        doc: &mut XmlDocument,
        current: Option<&str>,
        property: &str,
        value: &str,
        category: StyleCategory,
    ) -> Result<String> {
        let family = category.family();
        let current = current.filter(|name| !name.is_empty());
        let existing = current.and_then(|name| self.find(doc, name));
        let shared = current.is_some_and(|name| self.reference_count(doc, name) > 1);
        let mut generate = false;

        let target = match existing {
            Some(node) if shared => {
                let copy = doc.deep_clone(node);
                doc.append_child(self.automatic_styles, copy);
                doc.set_attribute_ns(copy, Some(STYLENS), "family", family.as_str());
                generate = true;
                debug!(style = current.unwrap_or_default(), "copying shared style");
                copy
            },
            Some(node) => node,
            None => {
                let node = doc.create_element_ns(STYLENS, "style");
                match current {
                    Some(name) if !shared => {
                        doc.set_attribute_ns(node, Some(STYLENS), "name", name);
                    },
                    _ => generate = true,
                }
                doc.set_attribute_ns(node, Some(STYLENS), "family", family.as_str());
                doc.set_attribute_ns(node, Some(STYLENS), "parent-style-name", DEFAULT_PARENT_STYLE);
                doc.append_child(self.automatic_styles, node);
                node
            },
        };

        if let Err(e) = set_property(doc, target, property, value) {
            if Some(target) != existing {
                doc.detach(target);
            }
            return Err(e);
        }

        if let Some(duplicate) = self.find_duplicate(doc, target) {
            doc.detach(target);
            debug!(style = %duplicate, "reusing identical style");
            return Ok(duplicate);
        }

        if generate {
            let name = loop {
                let candidate = match self.allocator.next(category) {
                    Ok(candidate) => candidate,
                    Err(e) => {
                        doc.detach(target);
                        return Err(e);
                    },
                };
                if self.find(doc, &candidate).is_none() {
                    break candidate;
                }
            };
            debug!(style = %name, family = %family, "allocated style name");
            doc.set_attribute_ns(target, Some(STYLENS), "name", name.as_str());
            return Ok(name);
        }

        Ok(doc
            .attribute_ns(target, Some(STYLENS), "name")
            .unwrap_or_default()
            .to_string())
    }

    /// First other named style structurally equal to `target`.
    fn find_duplicate(&self, doc: &XmlDocument, target: NodeId) -> Option<String> {
        let ignored = [(Some(STYLENS), "name")];
        self.style_nodes(doc)
            .filter(|&node| node != target)
            .find(|&node| {
                doc.has_attribute_ns(node, Some(STYLENS), "name")
                    && nodes_equal_ignoring(doc, target, doc, node, &ignored)
            })
            .and_then(|node| doc.attribute_ns(node, Some(STYLENS), "name"))
            .map(str::to_string)
    }

    /// Values of `properties` (`prefix:local` names) in the text properties
    /// of style `name`. Properties that are not set are left out; an unknown
    /// style yields an empty map.
    pub fn get(&self, doc: &XmlDocument, name: &str, properties: &[&str]) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        let Some(props) = self
            .find(doc, name)
            .and_then(|style| doc.find_child(style, STYLENS, "text-properties"))
        else {
            return values;
        };
        for &property in properties {
            let Ok((namespace, local)) = resolve_property(doc, props, property) else {
                continue;
            };
            if let Some(value) = doc.attribute_ns(props, namespace.as_deref(), &local) {
                values.insert(property.to_string(), value.to_string());
            }
        }
        values
    }

    /// Remove paragraph and text automatic styles that nothing outside the
    /// automatic styles refers to. Returns how many were removed.
    pub fn prune(&mut self, doc: &mut XmlDocument) -> usize {
        let mut referenced: HashSet<String> = HashSet::new();
        let root = doc.document_node();
        for node in doc.descendants(root) {
            if doc.is_ancestor_or_self(self.automatic_styles, node) {
                continue;
            }
            if let Some(element) = doc.element(node) {
                referenced.extend(
                    element
                        .attributes
                        .iter()
                        .filter(|a| a.local.ends_with("style-name"))
                        .map(|a| a.value.clone()),
                );
            }
        }

        let orphans: Vec<NodeId> = self
            .style_nodes(doc)
            .filter(|&node| {
                doc.attribute_ns(node, Some(STYLENS), "family")
                    .and_then(StyleFamily::parse)
                    .is_some()
            })
            .filter(|&node| {
                doc.attribute_ns(node, Some(STYLENS), "name")
                    .is_none_or(|name| !referenced.contains(name))
            })
            .collect();
        for &node in &orphans {
            doc.detach(node);
        }
        if !orphans.is_empty() {
            debug!(count = orphans.len(), "pruned unused automatic styles");
        }
        orphans.len()
    }
}

/// Split `prefix:local` and resolve the prefix in scope at `node`, falling
/// back to the conventional ODF bindings.
fn resolve_property(doc: &XmlDocument, node: NodeId, property: &str) -> Result<(Option<String>, String)> {
    let name = QName::parse(property);
    let namespace = match name.prefix.as_deref() {
        None => None,
        Some(prefix) => Some(
            doc.lookup_namespace_uri(node, Some(prefix))
                .or_else(|| well_known_uri(prefix).map(str::to_string))
                .ok_or_else(|| {
                    Error::InvalidArgument(format!("unknown namespace prefix in property {}", property))
                })?,
        ),
    };
    Ok((namespace, name.local))
}

fn set_property(doc: &mut XmlDocument, style: NodeId, property: &str, value: &str) -> Result<()> {
    let props = match doc.find_child(style, STYLENS, "text-properties") {
        Some(node) => node,
        None => {
            let node = doc.create_element_ns(STYLENS, "text-properties");
            doc.append_child(style, node);
            node
        },
    };
    let (namespace, local) = resolve_property(doc, props, property)?;
    doc.set_attribute_ns(props, namespace.as_deref(), &local, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::dom::parse;
    use crate::odf::namespace::{FONS, OFFICENS};
    use proptest::prelude::*;

    const CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0">
<office:automatic-styles/>
<office:body><office:text/></office:body>
</office:document-content>"#;

    struct Fixture {
        doc: XmlDocument,
        table: StyleTable,
        body: NodeId,
    }

    impl Fixture {
        fn new(xml: &str) -> Self {
            let doc = parse(xml.as_bytes()).unwrap();
            let root = doc.root().unwrap();
            let automatic = doc.find_child(root, OFFICENS, "automatic-styles").unwrap();
            let body = doc
                .find_child(root, OFFICENS, "body")
                .and_then(|b| doc.find_child(b, OFFICENS, "text"))
                .unwrap();
            let table = StyleTable::new(&doc, automatic, body);
            Self { doc, table, body }
        }

        fn paragraph(&mut self) -> NodeId {
            let p = self.doc.create_element_ns(TEXTNS, "p");
            self.doc.append_child(self.body, p);
            p
        }

        /// Style `node` the way an element does: apply, then store the name.
        fn style(&mut self, node: NodeId, property: &str, value: &str) -> String {
            let current = self
                .doc
                .attribute_ns(node, Some(TEXTNS), "style-name")
                .map(str::to_string);
            let name = self
                .table
                .apply(&mut self.doc, current.as_deref(), property, value, StyleCategory::Paragraph)
                .unwrap();
            self.doc.set_attribute_ns(node, Some(TEXTNS), "style-name", name.as_str());
            name
        }

        fn style_count(&self) -> usize {
            self.table.names(&self.doc).len()
        }
    }

    #[test]
    fn test_first_apply_creates_style() {
        let mut f = Fixture::new(CONTENT);
        let p = f.paragraph();
        let name = f.style(p, "fo:font-weight", "bold");
        assert_eq!(name, "P1");

        let node = f.table.find(&f.doc, "P1").unwrap();
        assert_eq!(f.doc.attribute_ns(node, Some(STYLENS), "family"), Some("paragraph"));
        assert_eq!(f.doc.attribute_ns(node, Some(STYLENS), "parent-style-name"), Some("Standard"));
        let props = f.doc.find_child(node, STYLENS, "text-properties").unwrap();
        assert_eq!(f.doc.attribute_ns(props, Some(FONS), "font-weight"), Some("bold"));
    }

    #[test]
    fn test_repeated_apply_is_stable() {
        let mut f = Fixture::new(CONTENT);
        let p = f.paragraph();
        let first = f.style(p, "fo:font-weight", "bold");
        let second = f.style(p, "fo:font-weight", "bold");
        assert_eq!(first, second);
        assert_eq!(f.style_count(), 1);
    }

    #[test]
    fn test_identical_requests_share_one_style() {
        let mut f = Fixture::new(CONTENT);
        let a = f.paragraph();
        let b = f.paragraph();
        let first = f.style(a, "fo:font-weight", "bold");
        let second = f.style(b, "fo:font-weight", "bold");
        assert_eq!(first, second);
        assert_eq!(f.style_count(), 1);
        assert_eq!(f.table.reference_count(&f.doc, &first), 2);
    }

    #[test]
    fn test_shared_style_is_copied_before_change() {
        let mut f = Fixture::new(CONTENT);
        let a = f.paragraph();
        let b = f.paragraph();
        f.style(a, "fo:font-weight", "bold");
        f.style(b, "fo:font-weight", "bold");

        let forked = f.style(b, "fo:color", "red");
        assert_ne!(forked, "P1");
        assert_eq!(f.doc.attribute_ns(a, Some(TEXTNS), "style-name"), Some("P1"));
        assert_eq!(f.table.get(&f.doc, "P1", &["fo:color"]).len(), 0);
        assert_eq!(
            f.table.get(&f.doc, &forked, &["fo:color", "fo:font-weight"]),
            BTreeMap::from([
                ("fo:color".to_string(), "red".to_string()),
                ("fo:font-weight".to_string(), "bold".to_string()),
            ])
        );
    }

    #[test]
    fn test_single_user_mutates_in_place() {
        let mut f = Fixture::new(CONTENT);
        let p = f.paragraph();
        f.style(p, "fo:font-weight", "bold");
        let name = f.style(p, "fo:font-style", "italic");
        assert_eq!(name, "P1");
        assert_eq!(f.style_count(), 1);
    }

    #[test]
    fn test_converging_style_collapses_onto_existing() {
        let mut f = Fixture::new(CONTENT);
        let a = f.paragraph();
        let b = f.paragraph();
        f.style(a, "fo:font-weight", "bold");
        f.style(a, "fo:color", "red");
        f.style(b, "fo:color", "red");
        let name = f.style(b, "fo:font-weight", "bold");
        assert_eq!(name, "P1");
        assert_eq!(f.style_count(), 1);
    }

    #[test]
    fn test_named_style_without_node_keeps_name() {
        let mut f = Fixture::new(CONTENT);
        let p = f.paragraph();
        f.doc.set_attribute_ns(p, Some(TEXTNS), "style-name", "Custom");
        let name = f.style(p, "fo:font-weight", "bold");
        assert_eq!(name, "Custom");
        assert!(f.table.find(&f.doc, "Custom").is_some());
    }

    #[test]
    fn test_seeding_skips_existing_names() {
        let xml = CONTENT
            .replace(
                "<office:automatic-styles/>",
                r#"<office:automatic-styles><style:style style:name="P7" style:family="paragraph"/></office:automatic-styles>"#,
            )
            .replace(
                "<office:text/>",
                r#"<office:text><text:p text:style-name="P3"/></office:text>"#,
            );
        let mut f = Fixture::new(&xml);
        let p = f.paragraph();
        assert_eq!(f.style(p, "fo:font-weight", "bold"), "P8");
    }

    #[test]
    fn test_exhausted_counter_fails_without_leftovers() {
        let top = format!("P{}", u64::MAX);
        let xml = CONTENT.replace(
            "<office:text/>",
            &format!(r#"<office:text><text:p text:style-name="{}"/></office:text>"#, top),
        );
        let mut f = Fixture::new(&xml);
        let existing = f.doc.element_children(f.body).next().unwrap();
        assert_eq!(f.table.allocator().current(StyleCategory::Paragraph), u64::MAX);

        // the sole user of the top name still edits in place
        assert_eq!(f.style(existing, "fo:color", "red"), top);

        let p = f.paragraph();
        let err = f
            .table
            .apply(&mut f.doc, None, "fo:color", "blue", StyleCategory::Paragraph)
            .unwrap_err();
        assert!(matches!(err, Error::StyleNamesExhausted("P")));
        assert_eq!(f.table.names(&f.doc), vec![top.clone()]);
        assert!(!f.doc.has_attribute_ns(p, Some(TEXTNS), "style-name"));

        // an identical style needs no new name
        assert_eq!(f.style(p, "fo:color", "red"), top);
    }

    #[test]
    fn test_unknown_prefix_is_rejected() {
        let mut f = Fixture::new(CONTENT);
        let err = f
            .table
            .apply(&mut f.doc, None, "bogus:weight", "bold", StyleCategory::Paragraph)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(f.style_count(), 0);
        assert!(f.doc.element_children(f.table.automatic_styles()).next().is_none());
    }

    #[test]
    fn test_get_missing_style_is_empty() {
        let f = Fixture::new(CONTENT);
        assert!(f.table.get(&f.doc, "P9", &["fo:color"]).is_empty());
    }

    #[test]
    fn test_prune_removes_unreferenced() {
        let mut f = Fixture::new(CONTENT);
        let a = f.paragraph();
        let b = f.paragraph();
        f.style(a, "fo:font-weight", "bold");
        f.style(b, "fo:color", "red");
        f.doc.detach(b);

        assert_eq!(f.table.prune(&mut f.doc), 1);
        assert_eq!(f.table.names(&f.doc), vec!["P1".to_string()]);
        assert_eq!(f.table.prune(&mut f.doc), 0);
    }

    const PROPERTIES: [&str; 3] = ["fo:font-weight", "fo:color", "fo:font-style"];
    const VALUES: [&str; 3] = ["bold", "red", "italic"];

    proptest! {
        #[test]
        fn prop_same_requests_converge_on_one_style(
            steps in proptest::collection::vec((0usize..3, 0usize..3), 1..8),
        ) {
            let mut f = Fixture::new(CONTENT);
            let a = f.paragraph();
            let b = f.paragraph();
            let mut first = String::new();
            for &(p, v) in &steps {
                first = f.style(a, PROPERTIES[p], VALUES[v]);
            }
            let mut second = String::new();
            for &(p, v) in &steps {
                second = f.style(b, PROPERTIES[p], VALUES[v]);
            }
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(f.style_count(), 1);

            let (p, v) = steps[steps.len() - 1];
            prop_assert_eq!(f.style(a, PROPERTIES[p], VALUES[v]), first);
        }
    }
}
