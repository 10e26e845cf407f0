//! XML text to [`XmlDocument`].
//!
//! Built on quick-xml's pull reader. Prefixes are resolved against the
//! declarations in scope while reading, so every element and attribute
//! carries its namespace URI from then on.

use super::tree::{Attribute, ElementData, NodeId, XmlDocument};
use crate::common::xml::resolve_reference;
use crate::common::{Error, Result};
use crate::odf::namespace::{self, QName, TEXTNS, XMLNS};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Parse a complete XML document.
///
/// Comments, processing instructions and the doctype are dropped.
/// Whitespace-only text is kept only inside text-namespace elements, where
/// it is content.
pub fn parse(bytes: &[u8]) -> Result<XmlDocument> {
    let source = std::str::from_utf8(bytes)?;
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);

    let mut doc = XmlDocument::new();
    let mut builder = Builder::new(doc.document_node());

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                builder.flush_text(&mut doc);
                let node = builder.open_element(&mut doc, &start)?;
                builder.stack.push(node);
            },
            Event::Empty(start) => {
                builder.flush_text(&mut doc);
                builder.open_element(&mut doc, &start)?;
                builder.scopes.pop();
            },
            Event::End(_) => {
                builder.flush_text(&mut doc);
                builder.stack.pop();
                builder.scopes.pop();
            },
            Event::Text(text) => builder.text.push_str(std::str::from_utf8(&text)?),
            Event::CData(data) => builder.text.push_str(std::str::from_utf8(&data)?),
            Event::GeneralRef(reference) => {
                let name = std::str::from_utf8(&reference)?;
                let ch = resolve_reference(name)
                    .ok_or_else(|| Error::Xml(format!("unknown entity reference &{};", name)))?;
                builder.text.push(ch);
            },
            Event::Eof => break,
            // declarations, comments, processing instructions, doctype
            _ => {},
        }
    }

    if builder.stack.len() > 1 {
        return Err(Error::Xml("unexpected end of document".to_string()));
    }
    if doc.root().is_none() {
        return Err(Error::Xml("document has no root element".to_string()));
    }
    Ok(doc)
}

/// Parse state: open elements, the namespace bindings each one introduced,
/// and pending character data.
struct Builder {
    stack: Vec<NodeId>,
    scopes: Vec<HashMap<Option<String>, String>>,
    text: String,
}

impl Builder {
    fn new(document: NodeId) -> Self {
        Self {
            stack: vec![document],
            scopes: Vec::new(),
            text: String::new(),
        }
    }

    fn current(&self) -> NodeId {
        // the document node is never popped
        self.stack[self.stack.len() - 1]
    }

    fn resolve(&self, prefix: Option<&str>) -> Option<String> {
        if prefix == Some("xml") {
            return Some(XMLNS.to_string());
        }
        let key = prefix.map(str::to_string);
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&key).cloned())
            .filter(|uri| !uri.is_empty())
            .or_else(|| prefix.and_then(namespace::well_known_uri).map(str::to_string))
    }

    fn flush_text(&mut self, doc: &mut XmlDocument) {
        if self.text.is_empty() {
            return;
        }
        let parent = self.current();
        let keep = !self.text.chars().all(char::is_whitespace)
            || doc
                .element(parent)
                .is_some_and(|e| e.namespace.as_deref() == Some(TEXTNS));
        let text = std::mem::take(&mut self.text);
        if !keep {
            return;
        }
        // merge with a preceding text node so references don't split text
        if let Some(&last) = doc.children(parent).last()
            && let Some(existing) = doc.text(last)
        {
            let merged = format!("{}{}", existing, text);
            doc.set_text(last, merged);
            return;
        }
        doc.append_text(parent, text);
    }

    /// Create the element for `start` under the current node and push its
    /// namespace scope. The caller pops the scope when the element closes.
    fn open_element(&mut self, doc: &mut XmlDocument, start: &BytesStart<'_>) -> Result<NodeId> {
        let mut declarations = Vec::new();
        let mut raw_attributes = Vec::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let raw = std::str::from_utf8(&attr.value)?;
            let value = quick_xml::escape::unescape(raw)?.into_owned();
            if key == "xmlns" {
                declarations.push((None, value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                declarations.push((Some(prefix.to_string()), value));
            } else {
                raw_attributes.push((QName::parse(key), value));
            }
        }

        self.scopes.push(declarations.iter().cloned().collect());

        let name = QName::parse(std::str::from_utf8(start.name().as_ref())?);
        let element_ns = self.resolve(name.prefix.as_deref());
        let attributes = raw_attributes
            .into_iter()
            .map(|(qname, value)| {
                // unprefixed attributes are in no namespace
                let namespace = match &qname.prefix {
                    Some(prefix) => self.resolve(Some(prefix.as_str())),
                    None => None,
                };
                Attribute {
                    prefix: qname.prefix,
                    local: qname.local,
                    namespace,
                    value,
                }
            })
            .collect();

        let node = doc.create_element(ElementData {
            prefix: name.prefix,
            local: name.local,
            namespace: element_ns,
            attributes,
            declarations,
        });
        doc.append_child(self.current(), node);
        Ok(node)
    }
}
