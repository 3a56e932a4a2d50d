//! Integrity verification between a tree and its merged form.
//!
//! A merged tree records, in each node's `origin`, which siblings of the
//! input it was built from. [`verify`] walks both trees along those indices
//! and reports every structural discrepancy it finds. Violations are data,
//! not failures: the whole list is returned so a caller can report all of
//! them.

use crate::parser::text::strip;
use crate::tree::{NodeData, NodeKind, StyleNode};

/// A structural mismatch between a tree and the tree it was merged from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{node} - {message}", line_prefix(.line))]
pub struct IntegrityError {
    /// Source line of the offending node, 0 when unknown.
    pub line: usize,
    /// Kind of the offending node.
    pub kind: NodeKind,
    /// One-line summary of the offending node.
    pub node: String,
    /// What did not match.
    pub message: String,
}

impl IntegrityError {
    fn new(node: &StyleNode, message: impl Into<String>) -> Self {
        Self {
            line: node.line,
            kind: node.kind(),
            node: node.to_string(),
            message: message.into(),
        }
    }
}

fn line_prefix(line: &usize) -> String {
    if *line == 0 {
        return String::new();
    }
    let suffix = match (line % 10, line % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("Unexpected error near {line}{suffix} line: ")
}

/// Check `post` against `pre`, the tree it was merged from.
///
/// Both arguments are the containers at the same position in their trees,
/// normally the two roots.
pub fn verify(pre: &StyleNode, post: &StyleNode) -> Vec<IntegrityError> {
    let mut errors = Vec::new();
    let originals: Vec<&StyleNode> = pre.children().iter().collect();
    verify_children(pre, &originals, post, &mut errors);

    if !errors.is_empty() {
        tracing::debug!("Integrity check found {} violations", errors.len());
    }
    errors
}

/// `originals` is the sibling list `post` was merged from; `anchor` is the
/// node errors about the list as a whole are reported against.
fn verify_children(
    anchor: &StyleNode,
    originals: &[&StyleNode],
    post: &StyleNode,
    errors: &mut Vec<IntegrityError>,
) {
    let merged = post.children().len();
    let reduced = post.reduced();
    if originals.len() != merged + reduced {
        let compressed = if reduced > 0 {
            format!("{merged} + {reduced} = {}", merged + reduced)
        } else {
            merged.to_string()
        };
        errors.push(IntegrityError::new(
            anchor,
            format!(
                "Child counts are not identical. (original: {}, compressed: {compressed})",
                originals.len()
            ),
        ));
        return;
    }

    for child in post.children() {
        let mut members = Vec::with_capacity(child.origin.len());
        let mut consistent = true;

        for &index in &child.origin {
            let Some(&original) = originals.get(index) else {
                errors.push(IntegrityError::new(
                    child,
                    format!(
                        "Origin index {index} is out of range. (siblings: {})",
                        originals.len()
                    ),
                ));
                consistent = false;
                continue;
            };
            if compare(original, child, errors) {
                members.push(original);
            } else {
                consistent = false;
            }
        }

        if consistent && child.kind().is_container() {
            let union: Vec<&StyleNode> = members.iter().flat_map(|m| m.children()).collect();
            let anchor = members.first().copied().unwrap_or(child);
            verify_children(anchor, &union, child, errors);
        }
    }
}

/// Compare one original node against the node it was merged into.
///
/// Returns `false` and records an error when they do not correspond.
fn compare(original: &StyleNode, merged: &StyleNode, errors: &mut Vec<IntegrityError>) -> bool {
    if original.kind() != merged.kind() {
        errors.push(IntegrityError::new(
            original,
            format!(
                "Style types are not identical. (original: {}, compressed: {})",
                original.kind(),
                merged.kind()
            ),
        ));
        return false;
    }

    match (&original.data, &merged.data) {
        (NodeData::Import(lhs), NodeData::Import(rhs)) => {
            if strip(lhs) != strip(rhs) {
                errors.push(IntegrityError::new(
                    original,
                    format!("Import rules are not identical. (original: {lhs}, compressed: {rhs})"),
                ));
                return false;
            }
            true
        }
        // rules are coalesced on purpose
        (NodeData::Rule(_), NodeData::Rule(_)) | (NodeData::Root(_), NodeData::Root(_)) => true,
        _ => {
            let lhs = original.header_text();
            let rhs = merged.header_text();
            if strip(&lhs) != strip(&rhs) {
                errors.push(IntegrityError::new(
                    original,
                    format!(
                        "{} rules are not identical. (original: {lhs}, compressed: {rhs})",
                        capitalized(original.kind().name())
                    ),
                ));
                return false;
            }
            true
        }
    }
}

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{merge_by_content, merge_by_header};
    use crate::parser::parse;

    fn first_child_mut(tree: &mut StyleNode) -> &mut StyleNode {
        &mut tree.container_mut().unwrap().children[0]
    }

    #[test]
    fn merged_tree_verifies_clean() {
        let tree = parse(".a{color:red} .a{font-size:1px}").unwrap();
        let merged = merge_by_header(&tree);
        assert_eq!(merged.reduced(), 1);
        assert!(verify(&tree, &merged).is_empty());
    }

    #[test]
    fn nested_union_verifies_clean() {
        let css = "@import url(a.css);\n\
                   @media x { .a{c:1} }\n\
                   .z{c:1}\n\
                   @media x { .a{d:2} .b{c:1} }\n\
                   @supports (a:b) { .q{r:s} }";
        let parsed = parse(css).unwrap();
        let first = merge_by_header(&parsed);
        let second = merge_by_content(&first);

        assert!(verify(&parsed, &first).is_empty());
        assert!(verify(&first, &second).is_empty());
    }

    #[test]
    fn remerging_is_idempotent() {
        let tree = parse(".a{x:1} @media y { .b{z:2} }").unwrap();
        let once = merge_by_header(&tree);
        let twice = merge_by_header(&once);

        assert!(verify(&once, &twice).is_empty());
        assert!(twice.walk().all(|n| n.reduced() == 0));
    }

    #[test]
    fn header_drift_is_reported() {
        let tree = parse("@media x {\n.a{c:1} }").unwrap();
        let mut merged = merge_by_header(&tree);
        if let NodeData::Media(at) = &mut first_child_mut(&mut merged).data {
            at.header = "@media y".to_string();
        }

        let errors = verify(&tree, &merged);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, NodeKind::Media);
        assert_eq!(errors[0].line, 1);
        assert_eq!(
            errors[0].to_string(),
            "Unexpected error near 1st line: @media x { [1 nodes inside] } - \
             Media query rules are not identical. (original: @media x, compressed: @media y)"
        );
    }

    #[test]
    fn whitespace_in_headers_is_ignored() {
        let tree = parse("@media x { .a{c:1} }").unwrap();
        let mut merged = merge_by_header(&tree);
        if let NodeData::Media(at) = &mut first_child_mut(&mut merged).data {
            at.header = " @media x\n".to_string();
        }
        assert!(verify(&tree, &merged).is_empty());
    }

    #[test]
    fn kind_mismatch_is_reported() {
        let tree = parse("@media x { .a{c:1} }").unwrap();
        let mut merged = merge_by_header(&tree);
        let origin = first_child_mut(&mut merged).origin.clone();
        *first_child_mut(&mut merged) = StyleNode::import("@import url(a.css);", 1).with_origin(origin);

        let errors = verify(&tree, &merged);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("Style types are not identical"));
    }

    #[test]
    fn count_mismatch_stops_descent() {
        let tree = parse(".a{x:1} .b{y:2}").unwrap();
        let mut merged = merge_by_header(&tree);
        merged.container_mut().unwrap().reduced = 1;

        let errors = verify(&tree, &merged);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, NodeKind::Root);
        assert!(errors[0].message.contains("compressed: 2 + 1 = 3"));
        // root has no line
        assert!(!errors[0].to_string().starts_with("Unexpected"));
    }

    #[test]
    fn out_of_range_origin_is_reported() {
        let tree = parse(".a{x:1}").unwrap();
        let mut merged = merge_by_header(&tree);
        first_child_mut(&mut merged).origin = vec![5];

        let errors = verify(&tree, &merged);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("out of range"));
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(line_prefix(&0), "");
        assert_eq!(line_prefix(&2), "Unexpected error near 2nd line: ");
        assert_eq!(line_prefix(&3), "Unexpected error near 3rd line: ");
        assert_eq!(line_prefix(&11), "Unexpected error near 11th line: ");
        assert_eq!(line_prefix(&22), "Unexpected error near 22nd line: ");
    }
}
