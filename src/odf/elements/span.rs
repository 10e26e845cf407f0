//! Spans (`text:span`).

use super::{ElementKind, ElementNode, Host, InlineContainer, NodeRef, StyledElement, create_in};
use crate::common::Result;
use crate::odf::text::TextDocument;

/// A `text:span` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    node: NodeRef,
}

impl Span {
    pub(crate) fn from_ref(node: NodeRef) -> Self {
        Self { node }
    }

    pub fn create(doc: &mut TextDocument, host: Host, text: Option<&str>) -> Result<Self> {
        create_in(doc, host, ElementKind::Span, text).map(Self::from_ref)
    }
}

impl ElementNode for Span {
    fn node_ref(&self) -> NodeRef {
        self.node
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Span
    }
}

impl StyledElement for Span {}

impl InlineContainer for Span {}
