//! Typed handles over the elements of a text document body.
//!
//! Handles are small `Copy` values naming a node of one particular
//! [`TextDocument`](crate::odf::text::TextDocument). They hold no XML and no
//! reference to the document: every read or write takes the document as an
//! argument, and a handle used with a document it does not belong to is
//! rejected.

mod bookmark;
mod element;
mod heading;
mod hyperlink;
mod kind;
mod paragraph;
mod span;
mod text;

pub use bookmark::{Bookmark, BookmarkType};
pub use element::{Element, ElementNode, InlineContainer, StyledElement};
pub use heading::Heading;
pub use hyperlink::Hyperlink;
pub use kind::{ElementKind, KindInfo};
pub use paragraph::Paragraph;
pub use span::Span;
pub use text::Text;

pub(crate) use element::{children_of, create_in, create_tagged};

use crate::odf::dom::NodeId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one open document, used to match handles to their document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(u64);

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

impl DocumentId {
    /// A fresh identity, distinct from every other in this process.
    pub(crate) fn next() -> Self {
        Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A node of a particular document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub document: DocumentId,
    pub node: NodeId,
}

/// Where a new element is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// The end of the document body
    Document,
    /// The end of an existing element
    Element(NodeRef, ElementKind),
}

impl<E: ElementNode> From<&E> for Host {
    fn from(element: &E) -> Self {
        Host::Element(element.node_ref(), element.kind())
    }
}
