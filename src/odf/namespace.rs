//! Namespace handling for ODF XML parts.
//!
//! Every qualified element or attribute access goes through a namespace URI,
//! never a bare prefix string. The prefix tables below are only used to pick
//! a prefix when a node is created programmatically, and as a last-resort
//! fallback when a prefix is not declared in scope.

use phf::{Map, phf_map};
use std::fmt;

/// Manifest namespace
pub const MANIFESTNS: &str = "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0";

/// Text namespace
pub const TEXTNS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";

/// Style namespace
pub const STYLENS: &str = "urn:oasis:names:tc:opendocument:xmlns:style:1.0";

/// XSL-FO compatible namespace
pub const FONS: &str = "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0";

/// Office namespace
pub const OFFICENS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";

/// SVG compatible namespace
pub const SVGNS: &str = "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0";

/// XLink namespace
pub const XLINKNS: &str = "http://www.w3.org/1999/xlink";

/// Metadata namespace
pub const METANS: &str = "urn:oasis:names:tc:opendocument:xmlns:meta:1.0";

/// Dublin Core namespace
pub const DCNS: &str = "http://purl.org/dc/elements/1.1/";

/// Configuration namespace
pub const CONFIGNS: &str = "urn:oasis:names:tc:opendocument:xmlns:config:1.0";

/// Table namespace
pub const TABLENS: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";

/// Drawing namespace
pub const DRAWNS: &str = "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0";

/// Number/data style namespace
pub const NUMBERNS: &str = "urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0";

/// XML namespace (bound to `xml` without declaration)
pub const XMLNS: &str = "http://www.w3.org/XML/1998/namespace";

/// URI to preferred prefix
static URI_TO_PREFIX: Map<&'static str, &'static str> = phf_map! {
    "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0" => "manifest",
    "urn:oasis:names:tc:opendocument:xmlns:text:1.0" => "text",
    "urn:oasis:names:tc:opendocument:xmlns:style:1.0" => "style",
    "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" => "fo",
    "urn:oasis:names:tc:opendocument:xmlns:office:1.0" => "office",
    "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0" => "svg",
    "http://www.w3.org/1999/xlink" => "xlink",
    "urn:oasis:names:tc:opendocument:xmlns:meta:1.0" => "meta",
    "http://purl.org/dc/elements/1.1/" => "dc",
    "urn:oasis:names:tc:opendocument:xmlns:config:1.0" => "config",
    "urn:oasis:names:tc:opendocument:xmlns:table:1.0" => "table",
    "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0" => "draw",
    "urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0" => "number",
    "http://www.w3.org/XML/1998/namespace" => "xml",
};

/// Well-known prefix to URI
static PREFIX_TO_URI: Map<&'static str, &'static str> = phf_map! {
    "manifest" => "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0",
    "text" => "urn:oasis:names:tc:opendocument:xmlns:text:1.0",
    "style" => "urn:oasis:names:tc:opendocument:xmlns:style:1.0",
    "fo" => "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0",
    "office" => "urn:oasis:names:tc:opendocument:xmlns:office:1.0",
    "svg" => "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0",
    "xlink" => "http://www.w3.org/1999/xlink",
    "meta" => "urn:oasis:names:tc:opendocument:xmlns:meta:1.0",
    "dc" => "http://purl.org/dc/elements/1.1/",
    "config" => "urn:oasis:names:tc:opendocument:xmlns:config:1.0",
    "table" => "urn:oasis:names:tc:opendocument:xmlns:table:1.0",
    "draw" => "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0",
    "number" => "urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0",
    "xml" => "http://www.w3.org/XML/1998/namespace",
};

/// Preferred prefix for a namespace URI, if it is one of the ODF namespaces.
#[inline]
pub fn prefix_for(uri: &str) -> Option<&'static str> {
    URI_TO_PREFIX.get(uri).copied()
}

/// URI conventionally bound to `prefix` in ODF documents.
#[inline]
pub fn well_known_uri(prefix: &str) -> Option<&'static str> {
    PREFIX_TO_URI.get(prefix).copied()
}

/// A `prefix:local` name as written in markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Prefix, absent for unprefixed names
    pub prefix: Option<String>,
    /// Local part
    pub local: String,
}

impl QName {
    /// Split a qualified name at its first colon.
    pub fn parse(name: &str) -> Self {
        match name.split_once(':') {
            Some((prefix, local)) => Self {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            None => Self {
                prefix: None,
                local: name.to_string(),
            },
        }
    }

    /// Build a name for `local` in namespace `uri`, choosing the preferred prefix.
    pub fn for_namespace(uri: Option<&str>, local: &str) -> Self {
        Self {
            prefix: uri.and_then(prefix_for).map(str::to_string),
            local: local.to_string(),
        }
    }

    /// True when the name carries `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.prefix.as_deref() == Some(prefix)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => f.write_str(&self.local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_tables_are_inverse() {
        for uri in [MANIFESTNS, TEXTNS, STYLENS, FONS, OFFICENS, SVGNS, XLINKNS] {
            let prefix = prefix_for(uri).unwrap();
            assert_eq!(well_known_uri(prefix), Some(uri));
        }
    }

    #[test]
    fn test_qname_parse_and_display() {
        let name = QName::parse("fo:font-weight");
        assert_eq!(name.prefix.as_deref(), Some("fo"));
        assert_eq!(name.local, "font-weight");
        assert_eq!(name.to_string(), "fo:font-weight");

        let bare = QName::parse("href");
        assert!(bare.prefix.is_none());
        assert_eq!(bare.to_string(), "href");
    }

    #[test]
    fn test_qname_for_namespace() {
        let name = QName::for_namespace(Some(TEXTNS), "p");
        assert_eq!(name.to_string(), "text:p");
        let unknown = QName::for_namespace(Some("urn:example"), "x");
        assert_eq!(unknown.to_string(), "x");
    }
}
