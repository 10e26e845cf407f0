//! Bare text nodes.

use super::{ElementKind, ElementNode, Host, NodeRef};
use crate::common::{Error, Result};
use crate::odf::text::TextDocument;

/// A run of character data inside a paragraph, heading, span or link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text {
    node: NodeRef,
}

impl Text {
    pub(crate) fn from_ref(node: NodeRef) -> Self {
        Self { node }
    }

    /// Append `text` to `host`.
    ///
    /// When the host already ends in a text node, `text` is added to that
    /// node and its handle is returned, so the children read the same after
    /// a save and reload.
    pub fn create(doc: &mut TextDocument, host: Host, text: &str) -> Result<Self> {
        let parent = doc.resolve_host(host)?;
        let document = doc.id();
        let content = doc.content_mut();
        let trailing = content
            .children(parent)
            .last()
            .copied()
            .filter(|&node| content.text(node).is_some());
        let node = match trailing {
            Some(node) => {
                let merged = format!("{}{}", content.text(node).unwrap_or_default(), text);
                content.set_text(node, merged);
                node
            },
            None => content.append_text(parent, text),
        };
        Ok(Self::from_ref(NodeRef { document, node }))
    }

    /// Replace the characters of this node.
    pub fn set_content(&self, doc: &mut TextDocument, text: &str) -> Result<()> {
        let node = doc.node_of(self.node)?;
        if doc.content_mut().set_text(node, text) {
            Ok(())
        } else {
            Err(Error::InvalidArgument("not a text node".to_string()))
        }
    }
}

impl ElementNode for Text {
    fn node_ref(&self) -> NodeRef {
        self.node
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::elements::{Element, InlineContainer};

    #[test]
    fn test_text_inside_paragraph() {
        let mut doc = TextDocument::new().unwrap();
        let p = doc.create_paragraph(None).unwrap();
        let text = p.create_text_element(&mut doc, "Hello").unwrap();
        let span = p.create_span(&mut doc, Some(", ")).unwrap();
        let tail = p.create_text_element(&mut doc, "world").unwrap();
        assert_eq!(p.text(&doc), "Hello, world");
        assert_ne!(text, tail);

        text.set_content(&mut doc, "Bye").unwrap();
        assert_eq!(p.text(&doc), "Bye, world");
        assert!(text.children(&doc).is_empty());
        assert_eq!(
            p.children(&doc),
            vec![Element::Text(text), Element::Span(span), Element::Text(tail)]
        );
    }

    #[test]
    fn test_adjacent_text_joins_previous_node() {
        let mut doc = TextDocument::new().unwrap();
        let p = doc.create_paragraph(Some("Hello")).unwrap();
        let first = p.children(&doc)[0];
        let joined = p.create_text_element(&mut doc, ", world").unwrap();
        assert_eq!(Element::Text(joined), first);
        assert_eq!(p.children(&doc).len(), 1);
        assert_eq!(p.text(&doc), "Hello, world");

        let reparsed = crate::odf::dom::parse(&crate::odf::dom::to_bytes(doc.content(), false)).unwrap();
        let root = reparsed.root().unwrap();
        let paragraph = reparsed.elements_by_tag_ns(root, crate::odf::namespace::TEXTNS, "p")[0];
        assert_eq!(reparsed.children(paragraph).len(), 1);
    }

    #[test]
    fn test_text_is_not_a_host() {
        let mut doc = TextDocument::new().unwrap();
        let p = doc.create_paragraph(None).unwrap();
        let text = p.create_text_element(&mut doc, "x").unwrap();
        let err = Text::create(&mut doc, (&text).into(), "y").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
