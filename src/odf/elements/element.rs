//! The element sum type and the capabilities shared by its variants.

use super::{
    Bookmark, DocumentId, ElementKind, Heading, Host, Hyperlink, NodeRef, Paragraph, Span, Text,
};
use crate::common::{Error, Result};
use crate::odf::dom::{NodeId, XmlDocument};
use crate::odf::namespace::TEXTNS;
use crate::odf::style::ElementStyle;
use crate::odf::text::TextDocument;
use std::collections::BTreeMap;

/// Anything backed by a node of a text document.
pub trait ElementNode {
    /// The node this handle names.
    fn node_ref(&self) -> NodeRef;

    fn kind(&self) -> ElementKind;

    /// Concatenated text of the element and its descendants.
    fn text(&self, doc: &TextDocument) -> String {
        doc.node_of(self.node_ref())
            .map(|node| doc.content().text_content(node))
            .unwrap_or_default()
    }

    /// Child elements in document order. Markup without a matching kind is
    /// skipped.
    fn children(&self, doc: &TextDocument) -> Vec<Element> {
        match doc.node_of(self.node_ref()) {
            Ok(node) => children_of(doc.content(), doc.id(), node),
            Err(_) => Vec::new(),
        }
    }
}

/// Elements whose formatting lives in an automatic style. The naming
/// category comes from the element's [`ElementKind`].
pub trait StyledElement: ElementNode {
    /// Set one text property, e.g. `("fo:font-weight", "bold")`, and point
    /// the element at the resulting style. Returns the style name.
    fn apply_style(&self, doc: &mut TextDocument, property: &str, value: &str) -> Result<String> {
        doc.apply_style_to(self.node_ref(), self.kind(), property, value)
    }

    /// Current `text:style-name`.
    fn style_name(&self, doc: &TextDocument) -> Option<String> {
        style_name_of(doc, self.node_ref())
    }

    /// Values of `properties` in the element's style.
    fn style(&self, doc: &TextDocument, properties: &[&str]) -> BTreeMap<String, String> {
        self.style_name(doc)
            .map(|name| doc.style(&name, properties))
            .unwrap_or_default()
    }

    /// Typed view of the element's text properties.
    fn element_style(&self, doc: &TextDocument) -> ElementStyle {
        ElementStyle::for_element(doc, self.node_ref(), self.kind())
    }
}

/// Elements that take inline children.
pub trait InlineContainer: ElementNode + Sized {
    /// Append a bare text node.
    fn create_text_element(&self, doc: &mut TextDocument, text: &str) -> Result<Text> {
        Text::create(doc, self.into(), text)
    }

    /// Append a `text:span`.
    fn create_span(&self, doc: &mut TextDocument, text: Option<&str>) -> Result<Span> {
        Span::create(doc, self.into(), text)
    }

    /// Append a `text:a` pointing at `location`.
    fn create_hyperlink(
        &self,
        doc: &mut TextDocument,
        text: Option<&str>,
        location: &str,
    ) -> Result<Hyperlink> {
        Hyperlink::create(doc, self.into(), text, location)
    }
}

/// Any element of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Text(Text),
    Span(Span),
    Paragraph(Paragraph),
    Heading(Heading),
    Hyperlink(Hyperlink),
    Bookmark(Bookmark),
}

impl ElementNode for Element {
    fn node_ref(&self) -> NodeRef {
        match self {
            Element::Text(e) => e.node_ref(),
            Element::Span(e) => e.node_ref(),
            Element::Paragraph(e) => e.node_ref(),
            Element::Heading(e) => e.node_ref(),
            Element::Hyperlink(e) => e.node_ref(),
            Element::Bookmark(e) => e.node_ref(),
        }
    }

    fn kind(&self) -> ElementKind {
        match self {
            Element::Text(_) => ElementKind::Text,
            Element::Span(_) => ElementKind::Span,
            Element::Paragraph(_) => ElementKind::Paragraph,
            Element::Heading(_) => ElementKind::Heading,
            Element::Hyperlink(_) => ElementKind::Hyperlink,
            Element::Bookmark(_) => ElementKind::Bookmark,
        }
    }
}

impl Element {
    /// Current `text:style-name`; always `None` for unstyled kinds.
    pub fn style_name(&self, doc: &TextDocument) -> Option<String> {
        self.kind().category()?;
        style_name_of(doc, self.node_ref())
    }

    /// Set one text property on a styled element.
    pub fn apply_style(&self, doc: &mut TextDocument, property: &str, value: &str) -> Result<String> {
        doc.apply_style_to(self.node_ref(), self.kind(), property, value)
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Element::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_heading(&self) -> Option<&Heading> {
        match self {
            Element::Heading(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_hyperlink(&self) -> Option<&Hyperlink> {
        match self {
            Element::Hyperlink(a) => Some(a),
            _ => None,
        }
    }
}

fn style_name_of(doc: &TextDocument, node: NodeRef) -> Option<String> {
    let node = doc.node_of(node).ok()?;
    doc.content()
        .attribute_ns(node, Some(TEXTNS), "style-name")
        .map(str::to_string)
}

/// Handle for `node` if its kind is modelled.
fn element_at(doc: &XmlDocument, document: DocumentId, node: NodeId) -> Option<Element> {
    let node_ref = NodeRef { document, node };
    Some(match ElementKind::from_node(doc, node)? {
        ElementKind::Text => Element::Text(Text::from_ref(node_ref)),
        ElementKind::Span => Element::Span(Span::from_ref(node_ref)),
        ElementKind::Paragraph => Element::Paragraph(Paragraph::from_ref(node_ref)),
        ElementKind::Heading => Element::Heading(Heading::from_ref(node_ref)),
        ElementKind::Hyperlink => Element::Hyperlink(Hyperlink::from_ref(node_ref)),
        ElementKind::Bookmark => Element::Bookmark(Bookmark::from_ref(node_ref)),
    })
}

pub(crate) fn children_of(doc: &XmlDocument, document: DocumentId, node: NodeId) -> Vec<Element> {
    doc.children(node)
        .iter()
        .filter_map(|&child| element_at(doc, document, child))
        .collect()
}

/// Create an element of `kind` at the end of `host`, with an optional text
/// child. The tag and namespace come from the kind table.
pub(crate) fn create_in(
    doc: &mut TextDocument,
    host: Host,
    kind: ElementKind,
    text: Option<&str>,
) -> Result<NodeRef> {
    let tag = kind
        .default_tag()
        .ok_or_else(|| Error::InvalidArgument(format!("{} elements have no tag", kind)))?;
    create_tagged(doc, host, kind, tag, text)
}

/// Like [`create_in`], with one of the other tags `kind` accepts.
pub(crate) fn create_tagged(
    doc: &mut TextDocument,
    host: Host,
    kind: ElementKind,
    tag: &str,
    text: Option<&str>,
) -> Result<NodeRef> {
    let info = kind.info();
    if !info.tags.contains(&tag) {
        return Err(Error::InvalidArgument(format!("{} is not a {} tag", tag, kind)));
    }
    let parent = doc.resolve_host(host)?;
    let document = doc.id();
    let content = doc.content_mut();
    let node = content.create_element_ns(info.namespace, tag);
    content.append_child(parent, node);
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        content.append_text(node, text);
    }
    Ok(NodeRef { document, node })
}
