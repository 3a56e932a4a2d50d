//! Style tree model.

mod node;

pub use node::{AtRule, Container, NodeData, NodeKind, Rule, StyleNode};
