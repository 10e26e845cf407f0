//! Structural equality of XML subtrees.
//!
//! Two elements are equal when they have the same namespace-qualified name,
//! the same attribute set, and children that pair up one-to-one under
//! name-based matching. Child order is ignored between differently named
//! siblings and within a bucket of same-named siblings; text children are
//! compared in order.

use super::tree::{Attribute, NodeId, NodeKind, XmlDocument};

/// An attribute left out of the comparison of the two root nodes.
pub type IgnoredAttribute<'a> = (Option<&'a str>, &'a str);

/// Structural equality of `a` (in `doc_a`) and `b` (in `doc_b`).
pub fn nodes_equal(doc_a: &XmlDocument, a: NodeId, doc_b: &XmlDocument, b: NodeId) -> bool {
    equal(doc_a, a, doc_b, b, &[])
}

/// Like [`nodes_equal`], but `ignored` attributes on the two roots only are
/// skipped. Descendants are always compared in full.
pub fn nodes_equal_ignoring(
    doc_a: &XmlDocument,
    a: NodeId,
    doc_b: &XmlDocument,
    b: NodeId,
    ignored: &[IgnoredAttribute<'_>],
) -> bool {
    equal(doc_a, a, doc_b, b, ignored)
}

fn equal(
    doc_a: &XmlDocument,
    a: NodeId,
    doc_b: &XmlDocument,
    b: NodeId,
    ignored: &[IgnoredAttribute<'_>],
) -> bool {
    match (doc_a.kind(a), doc_b.kind(b)) {
        (NodeKind::Text(x), NodeKind::Text(y)) => x == y,
        (NodeKind::Document, NodeKind::Document) => children_equal(doc_a, a, doc_b, b),
        (NodeKind::Element(x), NodeKind::Element(y)) => {
            x.local == y.local
                && x.namespace == y.namespace
                && attributes_equal(&x.attributes, &y.attributes, ignored)
                && children_equal(doc_a, a, doc_b, b)
        },
        _ => false,
    }
}

fn attributes_equal(a: &[Attribute], b: &[Attribute], ignored: &[IgnoredAttribute<'_>]) -> bool {
    let kept = |attr: &&Attribute| {
        !ignored
            .iter()
            .any(|(ns, local)| attr.namespace.as_deref() == *ns && attr.local == *local)
    };
    let a: Vec<&Attribute> = a.iter().filter(kept).collect();
    let b: Vec<&Attribute> = b.iter().filter(kept).collect();
    a.len() == b.len()
        && a.iter().all(|x| {
            b.iter()
                .any(|y| x.local == y.local && x.namespace == y.namespace && x.value == y.value)
        })
}

fn children_equal(doc_a: &XmlDocument, a: NodeId, doc_b: &XmlDocument, b: NodeId) -> bool {
    let texts_a: Vec<&str> = doc_a.children(a).iter().filter_map(|&c| doc_a.text(c)).collect();
    let texts_b: Vec<&str> = doc_b.children(b).iter().filter_map(|&c| doc_b.text(c)).collect();
    if texts_a != texts_b {
        return false;
    }

    let elements_a: Vec<NodeId> = doc_a.element_children(a).collect();
    let mut unmatched: Vec<NodeId> = doc_b.element_children(b).collect();
    if elements_a.len() != unmatched.len() {
        return false;
    }
    for child in elements_a {
        let Some(data) = doc_a.element(child) else {
            return false;
        };
        // candidates share the child's name bucket
        let found = unmatched.iter().position(|&other| {
            doc_b
                .element(other)
                .is_some_and(|o| o.local == data.local && o.namespace == data.namespace)
                && equal(doc_a, child, doc_b, other, &[])
        });
        match found {
            Some(index) => {
                unmatched.swap_remove(index);
            },
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::dom::parse;
    use crate::odf::namespace::STYLENS;

    const NS: &str = r#"xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0""#;

    fn root_of(xml: &str) -> (XmlDocument, NodeId) {
        let doc = parse(xml.replace("NS", NS).as_bytes()).unwrap();
        let root = doc.root().unwrap();
        (doc, root)
    }

    #[test]
    fn test_equal_ignores_attribute_and_child_order() {
        let (a, ra) = root_of(
            r#"<style:style NS style:family="text" style:name="T1"><style:text-properties fo:font-weight="bold" fo:color="red"/><style:paragraph-properties/></style:style>"#,
        );
        let (b, rb) = root_of(
            r#"<style:style NS style:name="T1" style:family="text"><style:paragraph-properties/><style:text-properties fo:color="red" fo:font-weight="bold"/></style:style>"#,
        );
        assert!(nodes_equal(&a, ra, &b, rb));
    }

    #[test]
    fn test_name_only_ignored_on_roots() {
        let (a, ra) = root_of(
            r#"<style:style NS style:name="T1" style:family="text"><style:text-properties fo:font-weight="bold"/></style:style>"#,
        );
        let (b, rb) = root_of(
            r#"<style:style NS style:name="T7" style:family="text"><style:text-properties fo:font-weight="bold"/></style:style>"#,
        );
        assert!(!nodes_equal(&a, ra, &b, rb));
        let ignored = [(Some(STYLENS), "name")];
        assert!(nodes_equal_ignoring(&a, ra, &b, rb, &ignored));
    }

    #[test]
    fn test_differences_are_detected() {
        let (a, ra) = root_of(
            r#"<style:style NS style:family="text"><style:text-properties fo:font-weight="bold"/></style:style>"#,
        );
        for other in [
            r#"<style:style NS style:family="paragraph"><style:text-properties fo:font-weight="bold"/></style:style>"#,
            r#"<style:style NS style:family="text"><style:text-properties fo:font-weight="normal"/></style:style>"#,
            r#"<style:style NS style:family="text"><style:text-properties fo:font-weight="bold" fo:color="black"/></style:style>"#,
            r#"<style:style NS style:family="text"/>"#,
            r#"<style:style NS style:family="text"><style:text-properties fo:font-weight="bold"/><style:text-properties fo:font-weight="bold"/></style:style>"#,
        ] {
            let (b, rb) = root_of(other);
            assert!(!nodes_equal(&a, ra, &b, rb), "{other}");
        }
    }

    #[test]
    fn test_duplicate_children_pair_one_to_one() {
        let (a, ra) = root_of(
            r#"<style:style NS><style:tab fo:x="1"/><style:tab fo:x="1"/></style:style>"#,
        );
        let (b, rb) = root_of(
            r#"<style:style NS><style:tab fo:x="1"/><style:tab fo:x="2"/></style:style>"#,
        );
        assert!(!nodes_equal(&a, ra, &b, rb));
        assert!(nodes_equal(&a, ra, &a, ra));
    }
}
