//! Merge by content: rules with identical declarations become one rule.

use std::collections::HashMap;

use super::MergeStats;
use crate::tree::{Container, NodeData, Rule, StyleNode};

#[derive(Debug)]
struct Group {
    selectors: Vec<String>,
    declarations: Vec<String>,
    members: Vec<usize>,
    line: usize,
}

/// Merge a sibling list. Containers are rebuilt one-to-one with their
/// children merged recursively; only rules are grouped.
pub(super) fn merge_siblings(siblings: &[StyleNode], stats: &mut MergeStats) -> Container {
    let mut body = Container::new();
    let mut groups: Vec<Group> = Vec::new();
    let mut by_declarations: HashMap<Vec<String>, usize> = HashMap::new();

    for (index, node) in siblings.iter().enumerate() {
        match &node.data {
            NodeData::Rule(rule) => {
                let mut declarations = rule.declarations.clone();
                declarations.sort();
                declarations.reverse();

                match by_declarations.get(&declarations) {
                    Some(&group) => {
                        let group = &mut groups[group];
                        group.selectors.extend(rule.selectors.iter().cloned());
                        group.members.push(index);
                        stats.total_merged += rule.selectors.len();
                    }
                    None => {
                        by_declarations.insert(declarations.clone(), groups.len());
                        groups.push(Group {
                            selectors: rule.selectors.clone(),
                            declarations,
                            members: vec![index],
                            line: node.line,
                        });
                    }
                }
            }
            NodeData::Import(_) => {
                body.children.push(node.clone().with_origin(vec![index]));
            }
            _ => {
                let nested = merge_siblings(node.children(), stats);
                body.children
                    .push(node.rebuild_with_body(nested).with_origin(vec![index]));
            }
        }
    }

    for mut group in groups {
        body.reduced += group.members.len() - 1;
        group.selectors.sort();
        let rule = Rule::new(group.selectors, group.declarations);
        body.children
            .push(StyleNode::rule(rule, group.line).with_origin(group.members));
    }

    body.sort();
    body
}
