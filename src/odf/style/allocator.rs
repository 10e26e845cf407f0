//! Generated style names.
//!
//! Each element category owns a counter. Names are `<prefix><n>` where `n`
//! only grows, starting above the highest suffix already present in the
//! document, so a generated name never collides with one that was loaded.

use super::StyleFamily;
use crate::common::{Error, Result};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::fmt;

/// Category of styled element, each with its own name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleCategory {
    Paragraph,
    Heading,
    Hyperlink,
    Span,
}

impl StyleCategory {
    /// Every category, in counter order
    pub const ALL: [StyleCategory; 4] = [
        StyleCategory::Paragraph,
        StyleCategory::Heading,
        StyleCategory::Hyperlink,
        StyleCategory::Span,
    ];

    /// Prefix of generated names.
    pub fn prefix(self) -> &'static str {
        match self {
            StyleCategory::Paragraph => "P",
            StyleCategory::Heading => "H",
            StyleCategory::Hyperlink => "A",
            StyleCategory::Span => "T",
        }
    }

    /// Family written on styles created for this category.
    pub fn family(self) -> StyleFamily {
        match self {
            StyleCategory::Paragraph | StyleCategory::Heading => StyleFamily::Paragraph,
            StyleCategory::Hyperlink | StyleCategory::Span => StyleFamily::Text,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn pattern(self) -> &'static Regex {
        &PATTERNS[self.index()]
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleCategory::Paragraph => "paragraph",
            StyleCategory::Heading => "heading",
            StyleCategory::Hyperlink => "hyperlink",
            StyleCategory::Span => "span",
        };
        f.write_str(name)
    }
}

// `^<prefix>(\d+)$` for each category, in `StyleCategory::ALL` order
static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    StyleCategory::ALL
        .iter()
        .map(|c| {
            Regex::new(&format!(r"^{}(\d+)$", regex_lite::escape(c.prefix())))
                .expect("style name pattern is valid")
        })
        .collect()
});

/// Per-document style name counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleNameAllocator {
    counters: [u64; 4],
}

impl StyleNameAllocator {
    /// Allocator with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every counter to the highest numeric suffix among `names`
    /// carrying that category's prefix (zero when none match).
    pub fn seed<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        let mut max = [0u64; 4];
        for name in names {
            for category in StyleCategory::ALL {
                let suffix = category
                    .pattern()
                    .captures(name)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| m.as_str().parse::<u64>().ok());
                if let Some(n) = suffix {
                    let slot = &mut max[category.index()];
                    *slot = (*slot).max(n);
                }
            }
        }
        self.counters = max;
    }

    /// Current counter value (the suffix of the last generated or highest
    /// seen name).
    pub fn current(&self, category: StyleCategory) -> u64 {
        self.counters[category.index()]
    }

    /// Advance the category's counter and return the new name.
    ///
    /// Fails once the counter has reached `u64::MAX`; the counter is left
    /// there so no smaller suffix is ever handed out.
    pub fn next(&mut self, category: StyleCategory) -> Result<String> {
        let counter = &mut self.counters[category.index()];
        *counter = counter
            .checked_add(1)
            .ok_or(Error::StyleNamesExhausted(category.prefix()))?;
        let mut buffer = itoa::Buffer::new();
        let digits = buffer.format(*counter);
        let mut name = String::with_capacity(category.prefix().len() + digits.len());
        name.push_str(category.prefix());
        name.push_str(digits);
        Ok(name)
    }
}
