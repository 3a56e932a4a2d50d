//! Text serialization of style trees.

use crate::config::PrintOptions;
use crate::tree::{NodeData, StyleNode};

const RESET: &str = "\x1b[0m";

/// Colors cycled through by nesting depth.
const PALETTE: [&str; 5] = [
    "\x1b[35m", // magenta
    "\x1b[36m", // cyan
    "\x1b[32m", // green
    "\x1b[31m", // red
    "\x1b[33m", // yellow
];

/// Print a tree.
///
/// Within every sibling list, imports are written before all other nodes.
/// Containers print as `header {` children `}` and rules as
/// `selectors { decl;decl }`.
pub fn print(tree: &StyleNode, options: &PrintOptions) -> String {
    let mut printer = Printer {
        options,
        unit: options.indent.unit(),
        out: String::new(),
    };
    printer.siblings(tree.children(), 0);
    printer.out
}

struct Printer<'a> {
    options: &'a PrintOptions,
    unit: String,
    out: String,
}

impl Printer<'_> {
    fn siblings(&mut self, nodes: &[StyleNode], depth: usize) {
        let (imports, others): (Vec<_>, Vec<_>) = nodes
            .iter()
            .partition(|node| matches!(node.data, NodeData::Import(_)));

        for node in imports.into_iter().chain(others) {
            self.node(node, depth);
        }
    }

    fn node(&mut self, node: &StyleNode, depth: usize) {
        match &node.data {
            NodeData::Import(statement) => self.piece(statement, depth),
            NodeData::Rule(rule) => {
                let text = format!(
                    "{} {{ {} }}",
                    rule.selector_text(),
                    rule.declarations.join(";")
                );
                self.piece(&text, depth);
            }
            NodeData::Root(body) => self.siblings(&body.children, depth),
            NodeData::Media(at)
            | NodeData::MozDocument(at)
            | NodeData::Supports(at)
            | NodeData::Keyframes(at) => {
                self.piece(&format!("{} {{", at.header), depth);
                self.siblings(&at.body.children, depth + 1);
                self.piece("}", depth);
            }
        }
    }

    fn piece(&mut self, text: &str, depth: usize) {
        let multiline = self.options.indent.is_multiline();
        if multiline {
            for _ in 0..depth {
                self.out.push_str(&self.unit);
            }
        }
        if self.options.color {
            self.out.push_str(PALETTE[depth % PALETTE.len()]);
            self.out.push_str(text);
            self.out.push_str(RESET);
        } else {
            self.out.push_str(text);
        }
        if multiline {
            self.out.push('\n');
        }
    }
}
