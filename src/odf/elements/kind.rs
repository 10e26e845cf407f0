//! Static description of each element kind.

use crate::common::{Error, Result};
use crate::odf::dom::{NodeId, NodeKind, XmlDocument};
use crate::odf::namespace::TEXTNS;
use crate::odf::style::{StyleCategory, StyleFamily};
use std::fmt;

/// Kind of a document element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A bare text node
    Text,
    Span,
    Paragraph,
    Heading,
    Hyperlink,
    Bookmark,
}

/// Fixed facts about an element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    /// Local names of the elements of this kind. The first is the one new
    /// elements get; empty for text nodes.
    pub tags: &'static [&'static str],
    /// Namespace of the element
    pub namespace: &'static str,
    /// Style naming category, for kinds that carry a style
    pub category: Option<StyleCategory>,
    /// Whether other elements may be created inside it
    pub container: bool,
}

const TEXT: KindInfo = KindInfo {
    tags: &[],
    namespace: TEXTNS,
    category: None,
    container: false,
};
const SPAN: KindInfo = KindInfo {
    tags: &["span"],
    namespace: TEXTNS,
    category: Some(StyleCategory::Span),
    container: true,
};
const PARAGRAPH: KindInfo = KindInfo {
    tags: &["p"],
    namespace: TEXTNS,
    category: Some(StyleCategory::Paragraph),
    container: true,
};
const HEADING: KindInfo = KindInfo {
    tags: &["h"],
    namespace: TEXTNS,
    category: Some(StyleCategory::Heading),
    container: true,
};
const HYPERLINK: KindInfo = KindInfo {
    tags: &["a"],
    namespace: TEXTNS,
    category: Some(StyleCategory::Hyperlink),
    container: true,
};
const BOOKMARK: KindInfo = KindInfo {
    tags: &["bookmark-start", "bookmark-end", "bookmark"],
    namespace: TEXTNS,
    category: None,
    container: false,
};

impl ElementKind {
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Text,
        ElementKind::Span,
        ElementKind::Paragraph,
        ElementKind::Heading,
        ElementKind::Hyperlink,
        ElementKind::Bookmark,
    ];

    pub fn info(self) -> &'static KindInfo {
        match self {
            ElementKind::Text => &TEXT,
            ElementKind::Span => &SPAN,
            ElementKind::Paragraph => &PARAGRAPH,
            ElementKind::Heading => &HEADING,
            ElementKind::Hyperlink => &HYPERLINK,
            ElementKind::Bookmark => &BOOKMARK,
        }
    }

    #[inline]
    pub fn category(self) -> Option<StyleCategory> {
        self.info().category
    }

    /// Category of a kind that must carry a style.
    pub fn style_category(self) -> Result<StyleCategory> {
        self.category()
            .ok_or_else(|| Error::InvalidArgument(format!("{} elements do not carry a style", self)))
    }

    /// Family of the styles this kind uses.
    pub fn style_family(self) -> Option<StyleFamily> {
        self.category().map(StyleCategory::family)
    }

    #[inline]
    pub fn is_container(self) -> bool {
        self.info().container
    }

    /// Local name given to new elements of this kind.
    pub fn default_tag(self) -> Option<&'static str> {
        self.info().tags.first().copied()
    }

    /// Kind of `node`, or `None` for markup this model does not cover.
    pub fn from_node(doc: &XmlDocument, node: NodeId) -> Option<Self> {
        match doc.kind(node) {
            NodeKind::Text(_) => Some(ElementKind::Text),
            NodeKind::Element(data) => Self::ALL.into_iter().find(|kind| {
                let info = kind.info();
                data.namespace.as_deref() == Some(info.namespace)
                    && info.tags.contains(&data.local.as_str())
            }),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Text => "text",
            ElementKind::Span => "span",
            ElementKind::Paragraph => "paragraph",
            ElementKind::Heading => "heading",
            ElementKind::Hyperlink => "hyperlink",
            ElementKind::Bookmark => "bookmark",
        };
        f.write_str(name)
    }
}
