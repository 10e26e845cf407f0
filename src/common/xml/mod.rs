//! XML escaping helpers shared by the part serializer and the manifest builder.

mod escape;

pub use escape::{escape_attribute, escape_text, resolve_reference};
