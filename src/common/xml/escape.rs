use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use std::borrow::Cow;

// Static initialization: automata are built only once, thread-safe
static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">"])
        .expect("Failed to build XML text escaper")
});

static ATTR_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "\n", "\t", "\r"])
        .expect("Failed to build XML attribute escaper")
});

/// Escape character data for use between tags.
///
/// # Examples
///
/// ```
/// use opendocument::common::xml::escape_text;
/// assert_eq!(escape_text("a & b"), "a &amp; b");
/// assert_eq!(escape_text("plain"), "plain");
/// ```
#[inline]
pub fn escape_text(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(TEXT_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;"]))
}

/// Escape an attribute value for use inside double quotes.
///
/// Whitespace control characters are written as character references so
/// they survive attribute value normalization on the way back in.
///
/// # Examples
///
/// ```
/// use opendocument::common::xml::escape_attribute;
/// assert_eq!(escape_attribute("say \"hi\""), "say &quot;hi&quot;");
/// assert_eq!(escape_attribute("a\tb"), "a&#9;b");
/// ```
#[inline]
pub fn escape_attribute(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\n', '\t', '\r']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(ATTR_ESCAPER.replace_all(
        s,
        &["&amp;", "&lt;", "&gt;", "&quot;", "&#10;", "&#9;", "&#13;"],
    ))
}

/// Resolve the body of an entity or character reference (`amp`, `#x20`, `#160`).
///
/// Returns `None` for unknown named entities and malformed numbers.
pub fn resolve_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        },
    }
}
