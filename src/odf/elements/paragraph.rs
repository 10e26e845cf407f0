//! Paragraphs (`text:p`).

use super::{ElementKind, ElementNode, Host, InlineContainer, NodeRef, StyledElement, create_in};
use crate::common::Result;
use crate::odf::text::TextDocument;

/// A `text:p` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paragraph {
    node: NodeRef,
}

impl Paragraph {
    pub(crate) fn from_ref(node: NodeRef) -> Self {
        Self { node }
    }

    /// Append a paragraph to `host`, optionally with text.
    pub fn create(doc: &mut TextDocument, host: Host, text: Option<&str>) -> Result<Self> {
        create_in(doc, host, ElementKind::Paragraph, text).map(Self::from_ref)
    }
}

impl ElementNode for Paragraph {
    fn node_ref(&self) -> NodeRef {
        self.node
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Paragraph
    }
}

impl StyledElement for Paragraph {}

impl InlineContainer for Paragraph {}
