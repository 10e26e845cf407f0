//! Automatic style management.
//!
//! Elements never edit style nodes directly. A property change goes through
//! [`StyleTable::apply`], which forks shared styles, collapses structurally
//! identical ones, and hands out fresh names from a per-document
//! [`StyleNameAllocator`].

mod allocator;
mod element_style;
mod table;

pub use allocator::{StyleCategory, StyleNameAllocator};
pub use element_style::{ElementStyle, StyleProperty};
pub use table::StyleTable;

use std::fmt;
use std::str::FromStr;

use crate::common::Error;

/// `style:family` values used by automatic styles of text elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleFamily {
    Paragraph,
    Text,
}

impl StyleFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleFamily::Paragraph => "paragraph",
            StyleFamily::Text => "text",
        }
    }

    /// Family named by a `style:family` value, if it is one we manage.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paragraph" => Some(StyleFamily::Paragraph),
            "text" => Some(StyleFamily::Text),
            _ => None,
        }
    }
}

impl fmt::Display for StyleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::UnsupportedType(format!("unknown style family: {}", s)))
    }
}
