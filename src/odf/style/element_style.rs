//! Named text properties of one element.

use crate::common::{Error, Result};
use crate::odf::elements::{ElementKind, NodeRef};
use crate::odf::text::TextDocument;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A text property with a friendly name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleProperty {
    FontName,
    FontSize,
    FontWeight,
    FontStyle,
    Color,
    BackgroundColor,
    Underline,
    LineThrough,
    TextPosition,
}

impl StyleProperty {
    pub const ALL: [StyleProperty; 9] = [
        StyleProperty::FontName,
        StyleProperty::FontSize,
        StyleProperty::FontWeight,
        StyleProperty::FontStyle,
        StyleProperty::Color,
        StyleProperty::BackgroundColor,
        StyleProperty::Underline,
        StyleProperty::LineThrough,
        StyleProperty::TextPosition,
    ];

    /// Key used by [`ElementStyle::export`] and [`ElementStyle::import`].
    pub fn key(self) -> &'static str {
        match self {
            StyleProperty::FontName => "font_name",
            StyleProperty::FontSize => "font_size",
            StyleProperty::FontWeight => "font_weight",
            StyleProperty::FontStyle => "font_style",
            StyleProperty::Color => "color",
            StyleProperty::BackgroundColor => "background_color",
            StyleProperty::Underline => "underline",
            StyleProperty::LineThrough => "line_through",
            StyleProperty::TextPosition => "text_position",
        }
    }

    /// Qualified attribute of `style:text-properties` holding the value.
    pub fn attribute(self) -> &'static str {
        match self {
            StyleProperty::FontName => "style:font-name",
            StyleProperty::FontSize => "fo:font-size",
            StyleProperty::FontWeight => "fo:font-weight",
            StyleProperty::FontStyle => "fo:font-style",
            StyleProperty::Color => "fo:color",
            StyleProperty::BackgroundColor => "fo:background-color",
            StyleProperty::Underline => "style:text-underline-style",
            StyleProperty::LineThrough => "style:text-line-through-style",
            StyleProperty::TextPosition => "style:text-position",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StyleProperty {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| Error::InvalidArgument(format!("unknown style property: {}", s)))
    }
}

/// Snapshot of an element's text properties with write-through setters.
///
/// Values are read once when the view is made; [`ElementStyle::set`]
/// updates both the document and the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementStyle {
    element: NodeRef,
    kind: ElementKind,
    values: BTreeMap<StyleProperty, String>,
}

impl ElementStyle {
    /// Load the current properties of `element`.
    pub fn for_element(doc: &TextDocument, element: NodeRef, kind: ElementKind) -> Self {
        let attributes: Vec<&str> = StyleProperty::ALL.iter().map(|p| p.attribute()).collect();
        let current = doc
            .node_of(element)
            .ok()
            .and_then(|node| doc.style_name_of_node(node))
            .map(|name| doc.style(&name, &attributes))
            .unwrap_or_default();
        let values = StyleProperty::ALL
            .into_iter()
            .filter_map(|p| current.get(p.attribute()).map(|v| (p, v.clone())))
            .collect();
        Self {
            element,
            kind,
            values,
        }
    }

    pub fn get(&self, property: StyleProperty) -> Option<&str> {
        self.values.get(&property).map(String::as_str)
    }

    /// Apply one property to the element and remember it.
    pub fn set(&mut self, doc: &mut TextDocument, property: StyleProperty, value: &str) -> Result<()> {
        doc.apply_style_to(self.element, self.kind, property.attribute(), value)?;
        self.values.insert(property, value.to_string());
        Ok(())
    }

    /// Non-empty properties keyed by [`StyleProperty::key`].
    pub fn export(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(p, v)| (p.key().to_string(), v.clone()))
            .collect()
    }

    /// Apply every known entry of `values`; unknown keys are ignored.
    pub fn import(&mut self, doc: &mut TextDocument, values: &BTreeMap<String, String>) -> Result<()> {
        for (key, value) in values {
            match StyleProperty::from_key(key) {
                Some(property) => self.set(doc, property, value)?,
                None => debug!(key = %key, "ignoring unknown style property"),
            }
        }
        Ok(())
    }

    /// Give this element the properties of `other`.
    pub fn copy_from(&mut self, doc: &mut TextDocument, other: &ElementStyle) -> Result<()> {
        self.import(doc, &other.export())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::elements::{InlineContainer, StyledElement};

    #[test]
    fn test_property_table() {
        assert_eq!(StyleProperty::FontSize.attribute(), "fo:font-size");
        assert_eq!("line_through".parse::<StyleProperty>().unwrap(), StyleProperty::LineThrough);
        assert!("kerning".parse::<StyleProperty>().is_err());
    }

    #[test]
    fn test_set_and_reload() {
        let mut doc = TextDocument::new().unwrap();
        let p = doc.create_paragraph(Some("x")).unwrap();
        let mut style = p.element_style(&doc);
        assert!(style.export().is_empty());

        style.set(&mut doc, StyleProperty::FontWeight, "bold").unwrap();
        style.set(&mut doc, StyleProperty::Color, "red").unwrap();
        assert_eq!(style.get(StyleProperty::FontWeight), Some("bold"));

        let reloaded = p.element_style(&doc);
        assert_eq!(reloaded.get(StyleProperty::Color), Some("red"));
        assert_eq!(reloaded.export(), style.export());
    }

    #[test]
    fn test_copy_from_shares_style() {
        let mut doc = TextDocument::new().unwrap();
        let p = doc.create_paragraph(None).unwrap();
        let a = p.create_span(&mut doc, Some("a")).unwrap();
        let b = p.create_span(&mut doc, Some("b")).unwrap();

        let mut first = a.element_style(&doc);
        first.set(&mut doc, StyleProperty::FontStyle, "italic").unwrap();
        first.set(&mut doc, StyleProperty::Underline, "solid").unwrap();

        let mut second = b.element_style(&doc);
        second.copy_from(&mut doc, &first).unwrap();
        assert_eq!(a.style_name(&doc), b.style_name(&doc));
        assert_eq!(second.export(), first.export());
    }

    #[test]
    fn test_import_skips_unknown_keys() {
        let mut doc = TextDocument::new().unwrap();
        let p = doc.create_paragraph(None).unwrap();
        let mut style = p.element_style(&doc);
        let values = BTreeMap::from([
            ("font_size".to_string(), "12pt".to_string()),
            ("sparkle".to_string(), "yes".to_string()),
        ]);
        style.import(&mut doc, &values).unwrap();
        assert_eq!(
            style.export(),
            BTreeMap::from([("font_size".to_string(), "12pt".to_string())])
        );
    }
}
