//! Headings (`text:h`).

use super::{ElementKind, ElementNode, Host, InlineContainer, NodeRef, StyledElement, create_in};
use crate::common::Result;
use crate::odf::namespace::TEXTNS;
use crate::odf::text::TextDocument;
use std::fmt::Display;

/// Lowest heading level.
pub const MIN_LEVEL: u8 = 1;
/// Highest heading level.
pub const MAX_LEVEL: u8 = 6;

/// A `text:h` element with its outline level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading {
    node: NodeRef,
}

impl Heading {
    pub(crate) fn from_ref(node: NodeRef) -> Self {
        Self { node }
    }

    /// Append a heading to `host`.
    ///
    /// `level` may be anything printable; values that are not a number
    /// between 1 and 6 become 1.
    pub fn create(
        doc: &mut TextDocument,
        host: Host,
        text: Option<&str>,
        level: impl Display,
    ) -> Result<Self> {
        let heading = create_in(doc, host, ElementKind::Heading, text).map(Self::from_ref)?;
        heading.set_level(doc, level)?;
        Ok(heading)
    }

    /// Outline level, 1 when absent or unreadable.
    pub fn level(&self, doc: &TextDocument) -> u8 {
        doc.node_of(self.node)
            .ok()
            .and_then(|node| doc.content().attribute_ns(node, Some(TEXTNS), "outline-level"))
            .map(coerce_level)
            .unwrap_or(MIN_LEVEL)
    }

    /// Store a new outline level, coerced like [`Heading::create`] does.
    pub fn set_level(&self, doc: &mut TextDocument, level: impl Display) -> Result<u8> {
        let node = doc.node_of(self.node)?;
        let level = coerce_level(level);
        let mut buffer = itoa::Buffer::new();
        doc.content_mut()
            .set_attribute_ns(node, Some(TEXTNS), "outline-level", buffer.format(level));
        Ok(level)
    }
}

/// Level named by `value`, or 1 when it is not an integer in range.
pub fn coerce_level(value: impl Display) -> u8 {
    value
        .to_string()
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|level| (MIN_LEVEL..=MAX_LEVEL).contains(level))
        .unwrap_or(MIN_LEVEL)
}

impl ElementNode for Heading {
    fn node_ref(&self) -> NodeRef {
        self.node
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Heading
    }
}

impl StyledElement for Heading {}

impl InlineContainer for Heading {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_level() {
        assert_eq!(coerce_level("abc"), 1);
        assert_eq!(coerce_level(7), 1);
        assert_eq!(coerce_level(0), 1);
        assert_eq!(coerce_level(-2), 1);
        assert_eq!(coerce_level(3), 3);
        assert_eq!(coerce_level(" 6 "), 6);
        assert_eq!(coerce_level(2.5), 1);
    }

    #[test]
    fn test_heading_level_is_stored() {
        let mut doc = TextDocument::new().unwrap();
        let h = doc.create_heading(Some("Title"), 3).unwrap();
        assert_eq!(h.level(&doc), 3);
        assert_eq!(h.text(&doc), "Title");

        assert_eq!(h.set_level(&mut doc, "x").unwrap(), 1);
        assert_eq!(h.level(&doc), 1);
        let node = doc.node_of(h.node_ref()).unwrap();
        assert_eq!(doc.content().attribute_ns(node, Some(TEXTNS), "outline-level"), Some("1"));
    }

    #[test]
    fn test_heading_style_prefix() {
        let mut doc = TextDocument::new().unwrap();
        let h = doc.create_heading(None, 1).unwrap();
        assert_eq!(h.apply_style(&mut doc, "fo:font-size", "18pt").unwrap(), "H1");
    }
}
