//! Style tree nodes.

use std::fmt;

/// The kind of a [`StyleNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// The stylesheet itself.
    Root,
    /// `selectors { declarations }`.
    Rule,
    /// `@media … { … }`.
    Media,
    /// `@import …;`.
    Import,
    /// `@-moz-document … { … }`.
    MozDocument,
    /// `@supports … { … }`.
    Supports,
    /// `@keyframes … { … }` and its vendor-prefixed forms.
    Keyframes,
}

impl NodeKind {
    /// Human readable name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Rule => "rule",
            NodeKind::Media => "media query",
            NodeKind::Import => "import",
            NodeKind::MozDocument => "mozilla document",
            NodeKind::Supports => "supports",
            NodeKind::Keyframes => "keyframes",
        }
    }

    /// Whether nodes of this kind own child nodes.
    pub fn is_container(&self) -> bool {
        !matches!(self, NodeKind::Rule | NodeKind::Import)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered children of a container node plus merge bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    /// Child nodes in order.
    pub children: Vec<StyleNode>,
    /// Number of sibling nodes absorbed into header groups by a merge pass.
    pub reduced: usize,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort children by their header text. The sort is stable.
    pub fn sort(&mut self) {
        self.children.sort_by_cached_key(|child| child.header_text());
    }
}

/// An at-rule block such as `@media`, `@supports`, `@keyframes` or `@-moz-document`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtRule {
    /// The `@…` condition text preceding `{`, trimmed.
    pub header: String,
    /// Nested nodes.
    pub body: Container,
}

impl AtRule {
    /// Create an at-rule with no children.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            body: Container::new(),
        }
    }
}

/// A plain style rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    /// Comma separated selectors, trimmed.
    pub selectors: Vec<String>,
    /// Semicolon separated `property: value` fragments, trimmed.
    pub declarations: Vec<String>,
}

impl Rule {
    /// Create a rule from selectors and declarations.
    pub fn new(selectors: Vec<String>, declarations: Vec<String>) -> Self {
        Self {
            selectors,
            declarations,
        }
    }

    /// Selectors joined with `,`.
    pub fn selector_text(&self) -> String {
        self.selectors.join(",")
    }
}

/// Variant data of a [`StyleNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Root(Container),
    Rule(Rule),
    Media(AtRule),
    Import(String),
    MozDocument(AtRule),
    Supports(AtRule),
    Keyframes(AtRule),
}

/// A node of the style tree.
///
/// Nodes are produced by the parser or by a merge pass. `origin` is filled in
/// by merge passes only and lists the sibling positions, in the tree the node
/// was merged from, whose content this node carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleNode {
    /// 1-based source line, 0 when unknown.
    pub line: usize,
    /// Sibling indices in the preceding tree folded into this node.
    pub origin: Vec<usize>,
    /// Kind specific content.
    pub data: NodeData,
}

impl StyleNode {
    /// Create a node from its variant data.
    pub fn new(data: NodeData, line: usize) -> Self {
        Self {
            line,
            origin: Vec::new(),
            data,
        }
    }

    /// Create an empty root node.
    pub fn root() -> Self {
        Self::new(NodeData::Root(Container::new()), 0)
    }

    /// Create a rule node.
    pub fn rule(rule: Rule, line: usize) -> Self {
        Self::new(NodeData::Rule(rule), line)
    }

    /// Create an import node from its raw statement text.
    pub fn import(statement: impl Into<String>, line: usize) -> Self {
        Self::new(NodeData::Import(statement.into()), line)
    }

    /// A node of the same kind and header carrying `body` as its children.
    ///
    /// Rules and imports have no body and are cloned unchanged.
    pub fn rebuild_with_body(&self, body: Container) -> Self {
        let header = self.as_at_rule().map(|at| at.header.clone()).unwrap_or_default();
        let data = match &self.data {
            NodeData::Root(_) => NodeData::Root(body),
            NodeData::Media(_) => NodeData::Media(AtRule { header, body }),
            NodeData::MozDocument(_) => NodeData::MozDocument(AtRule { header, body }),
            NodeData::Supports(_) => NodeData::Supports(AtRule { header, body }),
            NodeData::Keyframes(_) => NodeData::Keyframes(AtRule { header, body }),
            NodeData::Rule(_) | NodeData::Import(_) => self.data.clone(),
        };
        Self::new(data, self.line)
    }

    /// Builder-style setter for `origin`.
    pub fn with_origin(mut self, origin: Vec<usize>) -> Self {
        self.origin = origin;
        self
    }

    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        match &self.data {
            NodeData::Root(_) => NodeKind::Root,
            NodeData::Rule(_) => NodeKind::Rule,
            NodeData::Media(_) => NodeKind::Media,
            NodeData::Import(_) => NodeKind::Import,
            NodeData::MozDocument(_) => NodeKind::MozDocument,
            NodeData::Supports(_) => NodeKind::Supports,
            NodeData::Keyframes(_) => NodeKind::Keyframes,
        }
    }

    /// Header text: selectors for rules, the `@…` text for at-rules, the
    /// statement for imports and an empty string for the root.
    pub fn header_text(&self) -> String {
        match &self.data {
            NodeData::Root(_) => String::new(),
            NodeData::Rule(rule) => rule.selector_text(),
            NodeData::Import(statement) => statement.clone(),
            NodeData::Media(at)
            | NodeData::MozDocument(at)
            | NodeData::Supports(at)
            | NodeData::Keyframes(at) => at.header.clone(),
        }
    }

    /// The at-rule data, if this is an at-rule container.
    pub fn as_at_rule(&self) -> Option<&AtRule> {
        match &self.data {
            NodeData::Media(at)
            | NodeData::MozDocument(at)
            | NodeData::Supports(at)
            | NodeData::Keyframes(at) => Some(at),
            _ => None,
        }
    }

    /// The rule data, if this is a rule.
    pub fn as_rule(&self) -> Option<&Rule> {
        match &self.data {
            NodeData::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    /// The statement text, if this is an import.
    pub fn as_import(&self) -> Option<&str> {
        match &self.data {
            NodeData::Import(statement) => Some(statement),
            _ => None,
        }
    }

    /// The container of a root or at-rule node.
    pub fn container(&self) -> Option<&Container> {
        match &self.data {
            NodeData::Root(body) => Some(body),
            NodeData::Media(at)
            | NodeData::MozDocument(at)
            | NodeData::Supports(at)
            | NodeData::Keyframes(at) => Some(&at.body),
            NodeData::Rule(_) | NodeData::Import(_) => None,
        }
    }

    /// Mutable access to the container of a root or at-rule node.
    pub fn container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.data {
            NodeData::Root(body) => Some(body),
            NodeData::Media(at)
            | NodeData::MozDocument(at)
            | NodeData::Supports(at)
            | NodeData::Keyframes(at) => Some(&mut at.body),
            NodeData::Rule(_) | NodeData::Import(_) => None,
        }
    }

    /// Children of a container, or an empty slice.
    pub fn children(&self) -> &[StyleNode] {
        self.container().map_or(&[], |body| body.children.as_slice())
    }

    /// `reduced` of a container, or 0.
    pub fn reduced(&self) -> usize {
        self.container().map_or(0, |body| body.reduced)
    }

    /// Append a child. Does nothing on rules and imports.
    pub fn push_child(&mut self, child: StyleNode) {
        if let Some(body) = self.container_mut() {
            body.children.push(child);
        }
    }

    /// Number of descendants, excluding this node.
    pub fn count_descendants(&self) -> usize {
        self.children()
            .iter()
            .map(|child| 1 + child.count_descendants())
            .sum()
    }

    /// Depth-first iterator over this node and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &StyleNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }
}

impl fmt::Display for StyleNode {
    /// Short one-line description used in diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            NodeData::Root(body) => write!(f, "<root> {{ [{} nodes inside] }}", body.children.len()),
            NodeData::Rule(rule) => write!(
                f,
                "{} {{ [{} declarations inside] }}",
                rule.selector_text(),
                rule.declarations.len()
            ),
            NodeData::Import(statement) => f.write_str(statement),
            NodeData::Media(at)
            | NodeData::MozDocument(at)
            | NodeData::Supports(at)
            | NodeData::Keyframes(at) => {
                write!(f, "{} {{ [{} nodes inside] }}", at.header, at.body.children.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(selector: &str, decls: &[&str], line: usize) -> StyleNode {
        StyleNode::rule(
            Rule::new(
                vec![selector.to_string()],
                decls.iter().map(|d| d.to_string()).collect(),
            ),
            line,
        )
    }

    #[test]
    fn kinds_and_headers() {
        let media = StyleNode::new(NodeData::Media(AtRule::new("@media print")), 3);
        assert_eq!(media.kind(), NodeKind::Media);
        assert_eq!(media.header_text(), "@media print");
        assert_eq!(media.line, 3);

        let import = StyleNode::import("@import url(a.css);", 1);
        assert_eq!(import.kind(), NodeKind::Import);
        assert_eq!(import.as_import(), Some("@import url(a.css);"));
        assert!(import.children().is_empty());
        assert!(!NodeKind::Import.is_container());
    }

    #[test]
    fn sort_is_by_header_and_stable() {
        let mut body = Container::new();
        body.children.push(rule(".b", &[], 1));
        body.children.push(rule(".a", &["x:1"], 2));
        body.children.push(rule(".a", &["y:2"], 3));
        body.sort();

        let lines: Vec<_> = body.children.iter().map(|c| c.line).collect();
        assert_eq!(lines, vec![2, 3, 1]);
    }

    #[test]
    fn walk_visits_depth_first() {
        let mut media = StyleNode::new(NodeData::Media(AtRule::new("@media x")), 1);
        media.push_child(rule(".inner", &[], 2));
        let mut root = StyleNode::root();
        root.push_child(media);
        root.push_child(rule(".outer", &[], 3));

        let kinds: Vec<_> = root.walk().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Root, NodeKind::Media, NodeKind::Rule, NodeKind::Rule]
        );
        assert_eq!(root.count_descendants(), 3);
    }

    #[test]
    fn display_summaries() {
        let node = rule(".a", &["color:red", "margin:0"], 1);
        assert_eq!(node.to_string(), ".a { [2 declarations inside] }");
    }
}
