//! Bookmarks (`text:bookmark-start`, `text:bookmark-end`, `text:bookmark`).

use super::{ElementKind, ElementNode, Host, NodeRef, create_tagged};
use crate::common::Result;
use crate::odf::namespace::TEXTNS;
use crate::odf::text::TextDocument;
use std::fmt;

/// Which end of a bookmarked range a marker stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BookmarkType {
    #[default]
    Start,
    End,
    /// A single position, only found in loaded documents
    Point,
}

impl BookmarkType {
    /// `"end"` gives [`BookmarkType::End`]; any other value gives
    /// [`BookmarkType::Start`].
    pub fn parse_lossy(value: &str) -> Self {
        match value {
            "end" => BookmarkType::End,
            _ => BookmarkType::Start,
        }
    }

    /// Local name of the marker element.
    pub fn tag(self) -> &'static str {
        match self {
            BookmarkType::Start => "bookmark-start",
            BookmarkType::End => "bookmark-end",
            BookmarkType::Point => "bookmark",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "bookmark-start" => Some(BookmarkType::Start),
            "bookmark-end" => Some(BookmarkType::End),
            "bookmark" => Some(BookmarkType::Point),
            _ => None,
        }
    }
}

impl fmt::Display for BookmarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookmarkType::Start => "start",
            BookmarkType::End => "end",
            BookmarkType::Point => "point",
        };
        f.write_str(name)
    }
}

/// A bookmark marker. Its name is fixed once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bookmark {
    node: NodeRef,
}

impl Bookmark {
    pub(crate) fn from_ref(node: NodeRef) -> Self {
        Self { node }
    }

    /// Append a marker named `name`; `bookmark_type` is `"start"` or
    /// `"end"`, anything else counts as `"start"`.
    pub fn create(doc: &mut TextDocument, host: Host, name: &str, bookmark_type: &str) -> Result<Self> {
        let kind = BookmarkType::parse_lossy(bookmark_type);
        let node = create_tagged(doc, host, ElementKind::Bookmark, kind.tag(), None)?;
        let id = doc.node_of(node)?;
        doc.content_mut()
            .set_attribute_ns(id, Some(TEXTNS), "name", name);
        Ok(Self::from_ref(node))
    }

    /// `text:name`
    pub fn name(&self, doc: &TextDocument) -> Option<String> {
        let node = doc.node_of(self.node).ok()?;
        doc.content()
            .attribute_ns(node, Some(TEXTNS), "name")
            .map(str::to_string)
    }

    pub fn bookmark_type(&self, doc: &TextDocument) -> BookmarkType {
        doc.node_of(self.node)
            .ok()
            .and_then(|node| doc.content().element(node))
            .and_then(|element| BookmarkType::from_tag(&element.local))
            .unwrap_or_default()
    }
}

impl ElementNode for Bookmark {
    fn node_ref(&self) -> NodeRef {
        self.node
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Bookmark
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use crate::odf::elements::{Element, Paragraph};

    #[test]
    fn test_parse_lossy() {
        assert_eq!(BookmarkType::parse_lossy("end"), BookmarkType::End);
        assert_eq!(BookmarkType::parse_lossy("start"), BookmarkType::Start);
        assert_eq!(BookmarkType::parse_lossy("middle"), BookmarkType::Start);
    }

    #[test]
    fn test_bookmarks_inside_paragraph() {
        let mut doc = TextDocument::new().unwrap();
        let p = doc.create_paragraph(None).unwrap();
        let start = Bookmark::create(&mut doc, (&p).into(), "intro", "start").unwrap();
        let end = Bookmark::create(&mut doc, (&p).into(), "intro", "bogus-type").unwrap();

        assert_eq!(start.name(&doc).as_deref(), Some("intro"));
        assert_eq!(start.bookmark_type(&doc), BookmarkType::Start);
        assert_eq!(end.bookmark_type(&doc), BookmarkType::Start);
        assert_eq!(p.children(&doc), vec![Element::Bookmark(start), Element::Bookmark(end)]);
    }

    #[test]
    fn test_bookmark_is_not_a_host() {
        let mut doc = TextDocument::new().unwrap();
        let mark = doc.create_bookmark("b", "end").unwrap();
        assert_eq!(mark.bookmark_type(&doc), BookmarkType::End);
        let err = Paragraph::create(&mut doc, (&mark).into(), None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
