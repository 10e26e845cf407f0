//! Hyperlinks (`text:a`).

use super::{ElementKind, ElementNode, Host, NodeRef, Span, StyledElement, create_in};
use crate::common::Result;
use crate::odf::namespace::{OFFICENS, XLINKNS};
use crate::odf::text::TextDocument;
use tracing::debug;

/// The only link type ODF text documents use.
pub const SIMPLE_LINK: &str = "simple";

/// A `text:a` element.
///
/// Every setter writes its attribute right away; getters read them back
/// from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hyperlink {
    node: NodeRef,
}

impl Hyperlink {
    pub(crate) fn from_ref(node: NodeRef) -> Self {
        Self { node }
    }

    /// Append a simple link to `location`.
    pub fn create(
        doc: &mut TextDocument,
        host: Host,
        text: Option<&str>,
        location: &str,
    ) -> Result<Self> {
        Self::create_with(doc, host, text, location, SIMPLE_LINK, None, None)
    }

    /// Append a link with every attribute given. `link_type` other than
    /// `"simple"` is stored as `"simple"`.
    pub fn create_with(
        doc: &mut TextDocument,
        host: Host,
        text: Option<&str>,
        location: &str,
        link_type: &str,
        target: Option<&str>,
        name: Option<&str>,
    ) -> Result<Self> {
        let link = create_in(doc, host, ElementKind::Hyperlink, text).map(Self::from_ref)?;
        link.set_type(doc, link_type)?;
        link.set_location(doc, location)?;
        if let Some(target) = target {
            link.set_target(doc, target)?;
        }
        if let Some(name) = name {
            link.set_name(doc, name)?;
        }
        Ok(link)
    }

    fn attribute(&self, doc: &TextDocument, namespace: &str, local: &str) -> Option<String> {
        let node = doc.node_of(self.node).ok()?;
        doc.content()
            .attribute_ns(node, Some(namespace), local)
            .map(str::to_string)
    }

    fn set_attribute(&self, doc: &mut TextDocument, namespace: &str, local: &str, value: &str) -> Result<()> {
        let node = doc.node_of(self.node)?;
        doc.content_mut()
            .set_attribute_ns(node, Some(namespace), local, value);
        Ok(())
    }

    /// `xlink:href`
    pub fn location(&self, doc: &TextDocument) -> Option<String> {
        self.attribute(doc, XLINKNS, "href")
    }

    pub fn set_location(&self, doc: &mut TextDocument, location: &str) -> Result<()> {
        self.set_attribute(doc, XLINKNS, "href", location)
    }

    /// `xlink:type`
    pub fn link_type(&self, doc: &TextDocument) -> Option<String> {
        self.attribute(doc, XLINKNS, "type")
    }

    /// Store the link type; anything but `"simple"` is replaced by it.
    pub fn set_type(&self, doc: &mut TextDocument, link_type: &str) -> Result<()> {
        if link_type != SIMPLE_LINK {
            debug!(link_type, "storing unsupported link type as simple");
        }
        self.set_attribute(doc, XLINKNS, "type", SIMPLE_LINK)
    }

    /// `office:target-frame-name`
    pub fn target(&self, doc: &TextDocument) -> Option<String> {
        self.attribute(doc, OFFICENS, "target-frame-name")
    }

    pub fn set_target(&self, doc: &mut TextDocument, target: &str) -> Result<()> {
        self.set_attribute(doc, OFFICENS, "target-frame-name", target)
    }

    /// `office:name`
    pub fn name(&self, doc: &TextDocument) -> Option<String> {
        self.attribute(doc, OFFICENS, "name")
    }

    pub fn set_name(&self, doc: &mut TextDocument, name: &str) -> Result<()> {
        self.set_attribute(doc, OFFICENS, "name", name)
    }

    /// Append a `text:span` inside the link.
    pub fn create_span(&self, doc: &mut TextDocument, text: Option<&str>) -> Result<Span> {
        Span::create(doc, self.into(), text)
    }
}

impl ElementNode for Hyperlink {
    fn node_ref(&self) -> NodeRef {
        self.node
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Hyperlink
    }
}

impl StyledElement for Hyperlink {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::elements::{Element, InlineContainer};
    use crate::odf::namespace::TEXTNS;

    #[test]
    fn test_attributes_written_immediately() {
        let mut doc = TextDocument::new().unwrap();
        let p = doc.create_paragraph(None).unwrap();
        let link = Hyperlink::create_with(
            &mut doc,
            (&p).into(),
            Some("docs"),
            "https://example.org",
            "unknown",
            Some("_blank"),
            Some("ref1"),
        )
        .unwrap();

        assert_eq!(link.location(&doc).as_deref(), Some("https://example.org"));
        assert_eq!(link.link_type(&doc).as_deref(), Some("simple"));
        assert_eq!(link.target(&doc).as_deref(), Some("_blank"));
        assert_eq!(link.name(&doc).as_deref(), Some("ref1"));

        link.set_location(&mut doc, "https://example.net").unwrap();
        let node = doc.node_of(link.node_ref()).unwrap();
        assert_eq!(
            doc.content().attribute_ns(node, Some(XLINKNS), "href"),
            Some("https://example.net")
        );
        assert!(doc.content().is_element(node, TEXTNS, "a"));
    }

    #[test]
    fn test_span_inside_link() {
        let mut doc = TextDocument::new().unwrap();
        let p = doc.create_paragraph(None).unwrap();
        let link = p.create_hyperlink(&mut doc, None, "#top").unwrap();
        let span = link.create_span(&mut doc, Some("top")).unwrap();
        assert_eq!(link.children(&doc), vec![Element::Span(span)]);
        assert_eq!(link.apply_style(&mut doc, "fo:color", "blue").unwrap(), "A1");
    }
}
