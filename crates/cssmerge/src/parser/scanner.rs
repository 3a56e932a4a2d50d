//! The scan loop that turns stylesheet text into a style tree.

use super::context::ScanContext;
use super::error::{ScanError, ScanErrorKind};
use super::filters::{Effect, Filter, FilterInput, FilterSet};
use super::text::{split_list, strip};
use crate::tree::{AtRule, NodeData, Rule, StyleNode};

/// At-rule prefixes recognized when a block opens, in priority order.
///
/// Any header not matching one of these opens a plain rule.
const AT_RULES: &[(&str, fn(AtRule) -> NodeData)] = &[
    ("@media", NodeData::Media),
    ("@-moz-document", NodeData::MozDocument),
    ("@supports", NodeData::Supports),
    ("@keyframes", NodeData::Keyframes),
    ("@-webkit-keyframes", NodeData::Keyframes),
    ("@-moz-keyframes", NodeData::Keyframes),
    ("@-o-keyframes", NodeData::Keyframes),
];

/// Parse stylesheet text into a tree rooted at a `Root` node.
///
/// The scan is a single left-to-right pass. Comments and `@import`
/// statements are consumed by filters; imports are appended to the end of
/// the root's children once the scan completes.
///
/// # Errors
///
/// Returns a [`ScanError`] for unmatched or unbalanced braces, a block opened
/// inside a rule body, a stray `*/`, or an `@import` missing its `;`. No
/// partial tree is produced.
///
/// # Example
///
/// ```ignore
/// let tree = parse(".a { color: red; } @media print { .b { color: black; } }")?;
/// assert_eq!(tree.children().len(), 2);
/// ```
pub fn parse(text: &str) -> Result<StyleNode, ScanError> {
    let mut ctx = ScanContext::new(text);
    let mut filters = FilterSet::new();
    let mut scanner = Scanner::default();

    while ctx.index < ctx.len() {
        ctx.current = ctx.input[ctx.index];

        if ctx.current == '\n' {
            ctx.line += 1;
        }
        // quotes inside comments are text
        if !filters.comment.is_active() {
            ctx.track_quote();
        }

        let closing = poll_filters(&mut filters, &mut ctx)?;

        if !filters.any_active() {
            if ctx.in_string() {
                ctx.buffer.push(ctx.current);
            } else {
                match ctx.current {
                    '{' => scanner.open_block(&mut ctx)?,
                    '}' => scanner.close_block(&mut ctx)?,
                    c => ctx.buffer.push(c),
                }
            }
        }

        for (slot, close) in closing.into_iter().enumerate() {
            if close && let Some(filter) = filters.get_mut(slot) {
                filter.close();
            }
        }

        ctx.index += 1;
    }

    if ctx.depth > 0 {
        return Err(ctx.error(ScanErrorKind::UnbalancedBraces));
    }
    for slot in 0..FilterSet::LEN {
        if let Some(filter) = filters.get_mut(slot) {
            filter.finish().map_err(|kind| ctx.error(kind))?;
        }
    }

    let mut root = scanner.root;
    for record in filters.import.take_records() {
        root.push_child(StyleNode::import(record.statement, record.line));
    }

    tracing::debug!(
        "Parsed {} characters into {} nodes",
        ctx.len(),
        root.count_descendants()
    );
    Ok(root)
}

/// Poll every filter with the current character.
///
/// Returns, per filter slot, whether that filter asked to be closed once the
/// character has been handled.
fn poll_filters(
    filters: &mut FilterSet,
    ctx: &mut ScanContext,
) -> Result<[bool; FilterSet::LEN], ScanError> {
    let mut closing = [false; FilterSet::LEN];

    for (slot, close) in closing.iter_mut().enumerate() {
        let input = FilterInput {
            ch: ctx.current,
            line: ctx.line,
            in_string: ctx.in_string(),
            can_activate: !ctx.in_string() && !filters.others_active(slot),
        };
        let Some(filter) = filters.get_mut(slot) else {
            continue;
        };
        match filter.step(input).map_err(|kind| ctx.error(kind))? {
            Some(Effect::StripBuffer(prefix)) => {
                tracing::trace!("{} filter opened at line {}", filter.name(), ctx.line);
                ctx.strip_buffer_suffix(prefix);
            }
            Some(Effect::Close { clear_buffer }) => {
                if clear_buffer {
                    ctx.buffer.clear();
                }
                *close = true;
            }
            None => {}
        }
    }

    Ok(closing)
}

/// Open blocks and the tree under construction.
#[derive(Debug)]
struct Scanner {
    stack: Vec<StyleNode>,
    root: StyleNode,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            stack: Vec::new(),
            root: StyleNode::root(),
        }
    }
}

impl Scanner {
    fn open_block(&mut self, ctx: &mut ScanContext) -> Result<(), ScanError> {
        if !ctx.block_allowed {
            return Err(ctx.error(ScanErrorKind::NestedBlock));
        }
        ctx.depth += 1;

        let header = strip(&ctx.buffer);
        let at_rule = AT_RULES
            .iter()
            .find(|(prefix, _)| header.starts_with(prefix))
            .map(|(_, build)| build);

        let node = match at_rule {
            Some(build) => StyleNode::new(build(AtRule::new(header)), ctx.line),
            None => {
                ctx.block_allowed = false;
                StyleNode::rule(Rule::new(split_list(&header, ','), Vec::new()), ctx.line)
            }
        };
        self.stack.push(node);
        ctx.buffer.clear();
        Ok(())
    }

    fn close_block(&mut self, ctx: &mut ScanContext) -> Result<(), ScanError> {
        let Some(mut node) = self.stack.pop() else {
            return Err(ctx.error(ScanErrorKind::UnmatchedClose));
        };
        ctx.depth -= 1;

        if let NodeData::Rule(rule) = &mut node.data {
            rule.declarations = split_list(&ctx.buffer, ';');
            ctx.block_allowed = true;
        }

        match self.stack.last_mut() {
            Some(parent) => parent.push_child(node),
            None => self.root.push_child(node),
        }
        ctx.buffer.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    fn rule_at<'a>(node: &'a StyleNode, index: usize) -> &'a Rule {
        node.children()[index].as_rule().unwrap()
    }

    #[test]
    fn parse_single_rule() {
        let tree = parse(".a, .b { color: red; margin: 0 }").unwrap();
        assert_eq!(tree.kind(), NodeKind::Root);
        assert_eq!(tree.children().len(), 1);

        let rule = rule_at(&tree, 0);
        assert_eq!(rule.selectors, vec![".a", ".b"]);
        assert_eq!(rule.declarations, vec!["color: red", "margin: 0"]);
        assert_eq!(tree.children()[0].line, 1);
    }

    #[test]
    fn parse_at_rules() {
        let css = "@media (max-width: 10px) {\n .a { x: 1 }\n}\n\
                   @supports (display: grid) { .b { y: 2 } }\n\
                   @-webkit-keyframes spin { from { a: b } to { a: c } }\n\
                   @-moz-document url-prefix() { .c { z: 3 } }";
        let tree = parse(css).unwrap();
        let kinds: Vec<_> = tree.children().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Media,
                NodeKind::Supports,
                NodeKind::Keyframes,
                NodeKind::MozDocument
            ]
        );
        assert_eq!(tree.children()[0].header_text(), "@media (max-width: 10px)");
        assert_eq!(tree.children()[0].children().len(), 1);
        assert_eq!(tree.children()[0].children()[0].line, 2);
        assert_eq!(tree.children()[2].children().len(), 2);
    }

    #[test]
    fn unknown_at_rule_becomes_rule() {
        let tree = parse("@font-face { font-family: x; }").unwrap();
        assert_eq!(rule_at(&tree, 0).selectors, vec!["@font-face"]);
    }

    #[test]
    fn quoted_brace_does_not_open_block() {
        let tree = parse(r#"a[href="{"] { color: red; }"#).unwrap();
        assert_eq!(tree.children().len(), 1);
        assert_eq!(rule_at(&tree, 0).selectors, vec![r#"a[href="{"]"#]);
    }

    #[test]
    fn comments_are_stripped() {
        let tree = parse("/* x { y */ .a { color: red; }").unwrap();
        assert_eq!(tree.children().len(), 1);
        assert_eq!(rule_at(&tree, 0).selectors, vec![".a"]);

        let tree = parse("/* it's */ .a { color: red; }").unwrap();
        assert_eq!(rule_at(&tree, 0).selectors, vec![".a"]);
        assert_eq!(rule_at(&tree, 0).declarations, vec!["color: red"]);
    }

    #[test]
    fn comment_discards_pending_text() {
        let tree = parse(".a { color: red; /* c */ margin: 0 }").unwrap();
        assert_eq!(rule_at(&tree, 0).declarations, vec!["margin: 0"]);

        let tree = parse(".a /* c */ { x: 1 }").unwrap();
        let rule = rule_at(&tree, 0);
        assert!(rule.selectors.is_empty());
        assert_eq!(rule.declarations, vec!["x: 1"]);
    }

    #[test]
    fn imports_are_appended_last() {
        let tree = parse(".a{color:red} @import url(x.css); .b{color:blue}").unwrap();
        let kinds: Vec<_> = tree.children().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::Rule, NodeKind::Rule, NodeKind::Import]);
        assert_eq!(tree.children()[2].as_import(), Some("@import url(x.css);"));
        assert_eq!(rule_at(&tree, 1).selectors, vec![".b"]);
    }

    #[test]
    fn import_keeps_quoted_url() {
        let tree = parse("@import \"a{b}.css\";\n.a { x: y }").unwrap();
        assert_eq!(tree.children()[1].as_import(), Some("@import \"a{b}.css\";"));
        assert_eq!(tree.children()[1].line, 1);
    }

    #[test]
    fn import_with_quoted_semicolon_keeps_following_rules() {
        let css = "@import url(\"a;b.css\");\n.a { color: red; }\n.b { margin: 0; }";
        let tree = parse(css).unwrap();
        let kinds: Vec<_> = tree.children().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::Rule, NodeKind::Rule, NodeKind::Import]);
        assert_eq!(tree.children()[2].as_import(), Some("@import url(\"a;b.css\");"));

        let css = "@import 'a;b.css';\n.a { color: red; }";
        let tree = parse(css).unwrap();
        assert_eq!(rule_at(&tree, 0).selectors, vec![".a"]);
        assert_eq!(tree.children()[1].as_import(), Some("@import 'a;b.css';"));
    }

    #[test]
    fn fatal_errors() {
        let cases = [
            (".a { color: red; }}", ScanErrorKind::UnmatchedClose),
            (".a { .b { color: red; } }", ScanErrorKind::NestedBlock),
            (".a { color: red; } */", ScanErrorKind::UnmatchedCommentClose),
            ("@import url(a.css)\n.a { }", ScanErrorKind::MissingSemicolon),
            ("@import url(a.css)", ScanErrorKind::MissingSemicolon),
            ("@media x { .a { color: red; }", ScanErrorKind::UnbalancedBraces),
        ];
        for (css, kind) in cases {
            let err = parse(css).unwrap_err();
            assert_eq!(err.kind, kind, "input: {css}");
        }
    }

    #[test]
    fn error_reports_line() {
        let err = parse(".a { x: y }\n\n}").unwrap_err();
        assert_eq!(err.kind, ScanErrorKind::UnmatchedClose);
        assert_eq!(err.line, 3);
        assert_eq!(err.index, 13);
    }

    #[test]
    fn empty_input_gives_empty_root() {
        let tree = parse("").unwrap();
        assert!(tree.children().is_empty());
    }
}
