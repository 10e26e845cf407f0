//! [`XmlDocument`] to XML text.
//!
//! Namespace declarations recorded on elements are written back verbatim.
//! Nodes created or imported programmatically may use prefixes nobody
//! declared; the writer adds the missing `xmlns` attributes on the element
//! that first needs them.

use super::tree::{ElementData, NodeId, NodeKind, XmlDocument};
use crate::common::xml::{escape_attribute, escape_text};
use crate::odf::namespace::{TEXTNS, XMLNS};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Serialize a whole document, including the XML declaration.
///
/// With `pretty` set, element-only content outside the text namespace is
/// indented. Mixed content and text-namespace elements are never touched,
/// since whitespace there is significant.
pub fn to_string(doc: &XmlDocument, pretty: bool) -> String {
    let mut writer = Writer {
        doc,
        out: String::with_capacity(4096),
        scopes: Vec::new(),
        pretty,
    };
    writer.out.push_str(XML_DECLARATION);
    writer.out.push('\n');
    for &child in doc.children(doc.document_node()) {
        writer.write_node(child, 0);
    }
    if pretty {
        writer.out.push('\n');
    }
    writer.out
}

/// Serialize a whole document as UTF-8 bytes.
#[inline]
pub fn to_bytes(doc: &XmlDocument, pretty: bool) -> Vec<u8> {
    to_string(doc, pretty).into_bytes()
}

/// Serialize one subtree without an XML declaration.
pub fn node_to_string(doc: &XmlDocument, node: NodeId) -> String {
    let mut writer = Writer {
        doc,
        out: String::new(),
        scopes: Vec::new(),
        pretty: false,
    };
    writer.write_node(node, 0);
    writer.out
}

type Scope = Vec<(Option<String>, String)>;

struct Writer<'a> {
    doc: &'a XmlDocument,
    out: String,
    scopes: Vec<Scope>,
    pretty: bool,
}

impl Writer<'_> {
    fn bound(&self, prefix: Option<&str>) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    fn write_node(&mut self, node: NodeId, depth: usize) {
        match self.doc.kind(node) {
            NodeKind::Text(text) => self.out.push_str(&escape_text(text)),
            NodeKind::Element(element) => self.write_element(node, element, depth),
            NodeKind::Document => {
                for &child in self.doc.children(node) {
                    self.write_node(child, depth);
                }
            },
        }
    }

    /// Declarations needed on `element` beyond those it already carries.
    fn missing_declarations(&self, element: &ElementData) -> Scope {
        let mut scope: Scope = element.declarations.clone();
        let mut missing = Scope::new();
        let mut need = |prefix: Option<&str>, uri: &str, writer: &Self| {
            let in_scope = scope
                .iter()
                .rev()
                .find(|(p, _)| p.as_deref() == prefix)
                .map(|(_, u)| u.as_str())
                .or_else(|| writer.bound(prefix));
            if in_scope != Some(uri) {
                let binding = (prefix.map(str::to_string), uri.to_string());
                scope.push(binding.clone());
                missing.push(binding);
            }
        };

        match (&element.prefix, &element.namespace) {
            (Some(prefix), Some(uri)) if prefix != "xml" => need(Some(prefix), uri, self),
            (None, Some(uri)) => need(None, uri, self),
            (None, None) if self.bound(None).is_some_and(|uri| !uri.is_empty()) => {
                need(None, "", self)
            },
            _ => {},
        }
        for attr in &element.attributes {
            if let (Some(prefix), Some(uri)) = (&attr.prefix, &attr.namespace)
                && prefix != "xml"
                && uri != XMLNS
            {
                need(Some(prefix), uri, self);
            }
        }
        missing
    }

    fn write_element(&mut self, node: NodeId, element: &ElementData, depth: usize) {
        let missing = self.missing_declarations(element);
        let name = element.qualified_name();

        self.out.push('<');
        self.out.push_str(&name);
        for (prefix, uri) in element.declarations.iter().chain(missing.iter()) {
            match prefix {
                Some(prefix) => {
                    self.out.push_str(" xmlns:");
                    self.out.push_str(prefix);
                },
                None => self.out.push_str(" xmlns"),
            }
            self.out.push_str("=\"");
            self.out.push_str(&escape_attribute(uri));
            self.out.push('"');
        }
        for attr in &element.attributes {
            self.out.push(' ');
            self.out.push_str(&attr.qualified_name());
            self.out.push_str("=\"");
            self.out.push_str(&escape_attribute(&attr.value));
            self.out.push('"');
        }

        let children = self.doc.children(node);
        if children.is_empty() {
            self.out.push_str("/>");
            return;
        }
        self.out.push('>');

        let mut scope = element.declarations.clone();
        scope.extend(missing);
        self.scopes.push(scope);

        let indent = self.pretty
            && element.namespace.as_deref() != Some(TEXTNS)
            && children.iter().all(|&c| self.doc.element(c).is_some());
        for &child in children {
            if indent {
                self.newline(depth + 1);
            }
            self.write_node(child, depth + 1);
        }
        if indent {
            self.newline(depth);
        }

        self.scopes.pop();
        self.out.push_str("</");
        self.out.push_str(&name);
        self.out.push('>');
    }

    fn newline(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str("  ");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::dom::parse;
    use crate::odf::namespace::{FONS, OFFICENS, STYLENS};

    #[test]
    fn test_roundtrip_keeps_declarations_and_text() {
        let source = r#"<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" office:version="1.3"><office:body><office:text><text:p>a &amp; b <text:s/></text:p></office:text></office:body></office:document-content>"#;
        let doc = parse(source.as_bytes()).unwrap();
        let written = to_string(&doc, false);
        assert!(written.starts_with(XML_DECLARATION));
        assert!(written.ends_with(source));
    }

    #[test]
    fn test_missing_declarations_are_added() {
        let mut doc = XmlDocument::new();
        let root = doc.create_element_ns(OFFICENS, "automatic-styles");
        let document = doc.document_node();
        doc.append_child(document, root);
        let style = doc.create_element_ns(STYLENS, "style");
        doc.append_child(root, style);
        doc.set_attribute_ns(style, Some(FONS), "font-weight", "bold");

        let written = node_to_string(&doc, root);
        assert_eq!(
            written,
            concat!(
                r#"<office:automatic-styles xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0">"#,
                r#"<style:style xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" "#,
                r#"xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" fo:font-weight="bold"/>"#,
                r#"</office:automatic-styles>"#
            )
        );
        // and the output parses back to the same names
        let reparsed = parse(written.as_bytes()).unwrap();
        let style = reparsed.elements_by_tag_ns(reparsed.root().unwrap(), STYLENS, "style")[0];
        assert_eq!(reparsed.attribute_ns(style, Some(FONS), "font-weight"), Some("bold"));
    }

    #[test]
    fn test_pretty_print_leaves_text_content_alone() {
        let source = r#"<office:text xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0"><text:p>x<text:span>y</text:span></text:p><text:p/></office:text>"#;
        let doc = parse(source.as_bytes()).unwrap();
        let pretty = to_string(&doc, true);
        assert!(pretty.contains("\n  <text:p>x<text:span>y</text:span></text:p>\n  <text:p/>\n</office:text>"));

        let reparsed = parse(pretty.as_bytes()).unwrap();
        assert_eq!(to_string(&reparsed, false), to_string(&doc, false));
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let mut doc = XmlDocument::new();
        let root = doc.create_element_ns(OFFICENS, "x");
        doc.set_attribute_ns(root, Some(OFFICENS), "name", "a\"<b>\n");
        let written = node_to_string(&doc, root);
        assert!(written.contains(r#"office:name="a&quot;&lt;b&gt;&#10;""#));
    }
}
