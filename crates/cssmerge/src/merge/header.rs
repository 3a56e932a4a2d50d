//! Merge by header: siblings with the same selector or at-rule header become one node.

use std::collections::HashMap;

use super::MergeStats;
use crate::tree::{Container, NodeData, NodeKind, Rule, StyleNode};

/// Sibling positions sharing one header, in input order.
#[derive(Debug)]
struct Group {
    members: Vec<usize>,
}

/// Merge a sibling list. Containers in the result hold the merge of the
/// union of their members' children.
pub(super) fn merge_siblings(siblings: &[&StyleNode], stats: &mut MergeStats) -> Container {
    let mut body = Container::new();
    let mut groups: Vec<Group> = Vec::new();
    let mut by_key: HashMap<(NodeKind, String), usize> = HashMap::new();

    for (index, &node) in siblings.iter().enumerate() {
        if let NodeData::Import(_) = node.data {
            body.children.push(node.clone().with_origin(vec![index]));
            continue;
        }

        let key = (node.kind(), group_key(node));
        match by_key.get(&key) {
            Some(&group) => {
                groups[group].members.push(index);
                stats.total_merged += value_count(node);
            }
            None => {
                by_key.insert(key, groups.len());
                groups.push(Group {
                    members: vec![index],
                });
            }
        }
    }

    for group in groups {
        body.reduced += group.members.len() - 1;
        let first = siblings[group.members[0]];

        let merged = match &first.data {
            NodeData::Rule(rule) => {
                let mut selectors = rule.selectors.clone();
                selectors.sort();
                let declarations = group
                    .members
                    .iter()
                    .filter_map(|&member| siblings[member].as_rule())
                    .flat_map(|rule| rule.declarations.iter().cloned())
                    .collect();
                StyleNode::rule(Rule::new(selectors, declarations), first.line)
            }
            _ => {
                let union: Vec<&StyleNode> = group
                    .members
                    .iter()
                    .flat_map(|&member| siblings[member].children())
                    .collect();
                first.rebuild_with_body(merge_siblings(&union, stats))
            }
        };
        body.children.push(merged.with_origin(group.members));
    }

    body.sort();
    body
}

/// Rules group by their sorted selectors, at-rules by their header.
fn group_key(node: &StyleNode) -> String {
    match &node.data {
        NodeData::Rule(rule) => {
            let mut selectors: Vec<&str> = rule.selectors.iter().map(String::as_str).collect();
            selectors.sort_unstable();
            selectors.join(",")
        }
        _ => node.header_text(),
    }
}

/// Number of values a node contributes to its group.
fn value_count(node: &StyleNode) -> usize {
    match &node.data {
        NodeData::Rule(rule) => rule.declarations.len(),
        _ => node.children().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::{merge_by_header, merge_by_header_with};
    use super::*;
    use crate::parser::parse;

    #[test]
    fn duplicate_selectors_union_declarations() {
        let tree = parse(".a{color:red} .a{font-size:1px}").unwrap();
        let merged = merge_by_header(&tree);

        assert_eq!(merged.children().len(), 1);
        assert_eq!(merged.reduced(), 1);
        let node = &merged.children()[0];
        assert_eq!(node.origin, vec![0, 1]);
        assert_eq!(
            node.as_rule().unwrap().declarations,
            vec!["color:red", "font-size:1px"]
        );
    }

    #[test]
    fn selector_order_does_not_matter() {
        let tree = parse(".b,.a{x:1} .a, .b{y:2}").unwrap();
        let merged = merge_by_header(&tree);

        assert_eq!(merged.children().len(), 1);
        assert_eq!(merged.children()[0].as_rule().unwrap().selectors, vec![".a", ".b"]);
    }

    #[test]
    fn containers_union_and_recurse() {
        let tree = parse("@media x { .a{c:1} } .z{q:0} @media x { .a{d:2} .b{e:3} }").unwrap();
        let mut stats = MergeStats::new();
        let merged = merge_by_header_with(&tree, &mut stats);

        assert_eq!(merged.children().len(), 2);
        assert_eq!(merged.reduced(), 1);

        // ".z" sorts before "@media x"
        assert_eq!(merged.children()[0].header_text(), ".z");
        let media = &merged.children()[1];
        assert_eq!(media.kind(), NodeKind::Media);
        assert_eq!(media.origin, vec![0, 2]);
        assert_eq!(media.reduced(), 1);
        assert_eq!(media.children().len(), 2);
        assert_eq!(media.children()[0].origin, vec![0, 1]);
        assert_eq!(media.children()[1].origin, vec![2]);

        // two children folded into the first media, one declaration into .a
        assert_eq!(stats.total_merged, 3);
    }

    #[test]
    fn different_kinds_do_not_merge() {
        let tree = parse("@media x { .a{c:1} } @supports x { .a{c:1} }").unwrap();
        let merged = merge_by_header(&tree);
        assert_eq!(merged.children().len(), 2);
        assert_eq!(merged.reduced(), 0);
    }

    #[test]
    fn imports_pass_through_and_sort() {
        let tree = parse(".b{x:1} @import url(a.css); .a{y:2}").unwrap();
        let merged = merge_by_header(&tree);

        let summary: Vec<_> = merged
            .children()
            .iter()
            .map(|c| (c.header_text(), c.origin.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (".a".to_string(), vec![1]),
                (".b".to_string(), vec![0]),
                ("@import url(a.css);".to_string(), vec![2]),
            ]
        );
    }

    #[test]
    fn already_merged_tree_is_stable() {
        let tree = parse(".a{x:1} @media y { .b{z:2} }").unwrap();
        let once = merge_by_header(&tree);
        let twice = merge_by_header(&once);

        assert_eq!(twice.reduced(), 0);
        assert!(twice.walk().all(|n| n.reduced() == 0));
        assert_eq!(twice.children().len(), once.children().len());
    }
}
