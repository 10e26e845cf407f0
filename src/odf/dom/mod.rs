//! In-memory XML tree for ODF parts.
//!
//! Each part (content, styles, meta, settings) is parsed into an
//! [`XmlDocument`], mutated through namespace-qualified accessors, and
//! serialized back on save.

/// Structural equality
pub mod compare;
/// XML reading
mod parser;
/// Node arena
mod tree;
/// XML writing
mod writer;

pub use compare::{nodes_equal, nodes_equal_ignoring};
pub use parser::parse;
pub use tree::{Attribute, ElementData, NodeId, NodeKind, XmlDocument};
pub use writer::{node_to_string, to_bytes, to_string};
