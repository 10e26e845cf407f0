//! Arena-backed XML tree.
//!
//! Nodes live in a flat vector owned by [`XmlDocument`] and are addressed by
//! [`NodeId`]. Detached nodes stay in the arena until the document is dropped;
//! parts are small and short-lived, so nothing is ever compacted.

use crate::odf::namespace::{self, XMLNS};

/// Handle to a node inside one [`XmlDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index (stable for the lifetime of the owning document).
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A namespace-qualified attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub prefix: Option<String>,
    pub local: String,
    pub namespace: Option<String>,
    pub value: String,
}

impl Attribute {
    /// Name as written in markup (`prefix:local`).
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local),
            None => self.local.clone(),
        }
    }

    fn matches(&self, namespace: Option<&str>, local: &str) -> bool {
        self.local == local && self.namespace.as_deref() == namespace
    }
}

/// Element payload: name, attributes, and the namespace declarations
/// written on this element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub prefix: Option<String>,
    pub local: String,
    pub namespace: Option<String>,
    pub attributes: Vec<Attribute>,
    /// `(prefix, uri)` pairs; a `None` prefix is the default namespace
    pub declarations: Vec<(Option<String>, String)>,
}

impl ElementData {
    /// Name as written in markup (`prefix:local`).
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local),
            None => self.local.clone(),
        }
    }

    /// True when the element is `{namespace}local`.
    #[inline]
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.local == local && self.namespace.as_deref() == Some(namespace)
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The invisible document node every parsed tree hangs from
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An XML document held as an arena of nodes.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<NodeData>,
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlDocument {
    /// Create an empty document containing only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document node.
    #[inline]
    pub fn document_node(&self) -> NodeId {
        NodeId(0)
    }

    /// The document element, if one has been attached.
    pub fn root(&self) -> Option<NodeId> {
        self.element_children(self.document_node()).next()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a detached element `{namespace}local` using the namespace's
    /// conventional prefix.
    pub fn create_element_ns(&mut self, namespace: &str, local: &str) -> NodeId {
        let prefix = namespace::prefix_for(namespace).map(str::to_string);
        self.push(NodeKind::Element(ElementData {
            prefix,
            local: local.to_string(),
            namespace: Some(namespace.to_string()),
            attributes: Vec::new(),
            declarations: Vec::new(),
        }))
    }

    /// Create a detached element from fully resolved parts.
    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.push(NodeKind::Element(data))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Node payload.
    #[inline]
    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    /// Element payload, `None` for text and document nodes.
    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable element payload.
    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Text of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Replace the text of a text node. Returns false for other nodes.
    pub fn set_text(&mut self, node: NodeId, value: impl Into<String>) -> bool {
        match &mut self.nodes[node.0].kind {
            NodeKind::Text(text) => {
                *text = value.into();
                true
            },
            _ => false,
        }
    }

    /// True when `node` is the element `{namespace}local`.
    pub fn is_element(&self, node: NodeId, namespace: &str, local: &str) -> bool {
        self.element(node).is_some_and(|e| e.is(namespace, local))
    }

    /// Parent of `node`, `None` when detached or the document node.
    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Children of `node` in document order.
    #[inline]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Element children of `node` in document order.
    pub fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[node.0]
            .children
            .iter()
            .copied()
            .filter(|&child| self.element(child).is_some())
    }

    /// First element child named `{namespace}local`.
    pub fn find_child(&self, node: NodeId, namespace: &str, local: &str) -> Option<NodeId> {
        self.element_children(node)
            .find(|&child| self.is_element(child, namespace, local))
    }

    /// All descendants of `node` in document order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Descendant elements named `{namespace}local`, in document order.
    pub fn elements_by_tag_ns(&self, node: NodeId, namespace: &str, local: &str) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|&n| self.is_element(n, namespace, local))
            .collect()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.text(node) {
            return text.to_string();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// True when `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Attribute `{namespace}local`; pass `None` for unqualified attributes.
    pub fn attribute_ns(&self, node: NodeId, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.element(node)?
            .attributes
            .iter()
            .find(|a| a.matches(namespace, local))
            .map(|a| a.value.as_str())
    }

    /// True when the attribute is present, even if empty.
    pub fn has_attribute_ns(&self, node: NodeId, namespace: Option<&str>, local: &str) -> bool {
        self.attribute_ns(node, namespace, local).is_some()
    }

    /// Set attribute `{namespace}local`, replacing any previous value.
    ///
    /// A new attribute reuses a prefix already bound to `namespace` in scope,
    /// then the conventional ODF prefix, then a synthesized `nsN` prefix.
    pub fn set_attribute_ns(
        &mut self,
        node: NodeId,
        namespace: Option<&str>,
        local: &str,
        value: impl Into<String>,
    ) {
        let value = value.into();
        let prefix = match namespace {
            Some(uri) => Some(self.choose_prefix(node, uri)),
            None => None,
        };
        let Some(element) = self.element_mut(node) else {
            return;
        };
        if let Some(existing) = element
            .attributes
            .iter_mut()
            .find(|a| a.matches(namespace, local))
        {
            existing.value = value;
            return;
        }
        element.attributes.push(Attribute {
            prefix,
            local: local.to_string(),
            namespace: namespace.map(str::to_string),
            value,
        });
    }

    /// Remove attribute `{namespace}local`; returns its previous value.
    pub fn remove_attribute_ns(
        &mut self,
        node: NodeId,
        namespace: Option<&str>,
        local: &str,
    ) -> Option<String> {
        let element = self.element_mut(node)?;
        let index = element
            .attributes
            .iter()
            .position(|a| a.matches(namespace, local))?;
        Some(element.attributes.remove(index).value)
    }

    fn choose_prefix(&self, node: NodeId, uri: &str) -> String {
        if uri == XMLNS {
            return "xml".to_string();
        }
        if let Some(prefix) = self.lookup_prefix(node, uri) {
            return prefix;
        }
        if let Some(prefix) = namespace::prefix_for(uri) {
            return prefix.to_string();
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("ns{}", n);
            if self.lookup_namespace_uri(node, Some(&candidate)).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    // ------------------------------------------------------------------
    // Namespaces
    // ------------------------------------------------------------------

    /// Declare `xmlns:prefix="uri"` (or the default namespace) on `node`.
    pub fn declare_namespace(&mut self, node: NodeId, prefix: Option<&str>, uri: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        let prefix = prefix.map(str::to_string);
        match element.declarations.iter_mut().find(|(p, _)| *p == prefix) {
            Some(existing) => existing.1 = uri.to_string(),
            None => element.declarations.push((prefix, uri.to_string())),
        }
    }

    /// Resolve `prefix` to a URI by walking `node` and its ancestors.
    pub fn lookup_namespace_uri(&self, node: NodeId, prefix: Option<&str>) -> Option<String> {
        if prefix == Some("xml") {
            return Some(XMLNS.to_string());
        }
        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(element) = self.element(n) {
                if let Some((_, uri)) = element
                    .declarations
                    .iter()
                    .find(|(p, _)| p.as_deref() == prefix)
                {
                    return Some(uri.clone());
                }
                // an element's own name binds its prefix even when the
                // declaration lives on an ancestor in another document
                if element.prefix.as_deref() == prefix
                    && let Some(uri) = &element.namespace
                {
                    return Some(uri.clone());
                }
            }
            current = self.parent(n);
        }
        None
    }

    /// Find a prefix bound to `uri` in scope at `node`.
    pub fn lookup_prefix(&self, node: NodeId, uri: &str) -> Option<String> {
        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(element) = self.element(n)
                && let Some((Some(prefix), _)) =
                    element.declarations.iter().find(|(_, u)| u == uri)
            {
                return Some(prefix.clone());
            }
            current = self.parent(n);
        }
        None
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Remove `node` from its parent. The node and its subtree stay usable.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` before `reference`; appends when `reference` is `None`
    /// or not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        match reference.and_then(|r| children.iter().position(|&c| c == r)) {
            Some(index) => children.insert(index, child),
            None => children.push(child),
        }
    }

    /// Append a new text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    /// Copy `node` and its subtree into a new, detached subtree.
    pub fn deep_clone(&mut self, node: NodeId) -> NodeId {
        let kind = self.nodes[node.0].kind.clone();
        let copy = self.push(kind);
        let children = self.nodes[node.0].children.clone();
        for child in children {
            let child_copy = self.deep_clone(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Copy `node` from another document into this one, detached.
    ///
    /// Names keep their resolved namespace URIs, so the copy serializes
    /// correctly wherever it is attached.
    pub fn import_node(&mut self, source: &XmlDocument, node: NodeId) -> NodeId {
        let copy = match source.kind(node) {
            NodeKind::Document => self.push(NodeKind::Document),
            other => self.push(other.clone()),
        };
        for &child in source.children(node) {
            let child_copy = self.import_node(source, child);
            self.append_child(copy, child_copy);
        }
        copy
    }
}
