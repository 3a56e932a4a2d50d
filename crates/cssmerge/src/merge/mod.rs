//! Tree-to-tree merge passes.
//!
//! Both passes leave their input untouched and build a new tree in which
//! every node records, in [`StyleNode::origin`], the sibling positions of the
//! input it was built from. The integrity verifier uses those indices to
//! check a merged tree against its input.
//!
//! - [`merge_by_header`] groups siblings sharing a selector or at-rule header
//!   and unions their declarations or children.
//! - [`merge_by_content`] groups rules sharing the same set of declarations
//!   and unions their selectors.

mod content;
mod header;

use crate::tree::StyleNode;

/// Running merge statistics, owned by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Declarations, children or selectors folded into an earlier sibling.
    pub total_merged: usize,
}

impl MergeStats {
    /// Create zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// First merge pass: union siblings sharing a header.
pub fn merge_by_header(tree: &StyleNode) -> StyleNode {
    merge_by_header_with(tree, &mut MergeStats::new())
}

/// [`merge_by_header`] accumulating into `stats`.
pub fn merge_by_header_with(tree: &StyleNode, stats: &mut MergeStats) -> StyleNode {
    let children: Vec<&StyleNode> = tree.children().iter().collect();
    let body = header::merge_siblings(&children, stats);
    tracing::debug!(
        "Header merge: {} -> {} top-level nodes ({} reduced)",
        children.len(),
        body.children.len(),
        body.reduced
    );
    tree.rebuild_with_body(body)
}

/// Second merge pass: union rules sharing the same declarations.
pub fn merge_by_content(tree: &StyleNode) -> StyleNode {
    merge_by_content_with(tree, &mut MergeStats::new())
}

/// [`merge_by_content`] accumulating into `stats`.
pub fn merge_by_content_with(tree: &StyleNode, stats: &mut MergeStats) -> StyleNode {
    let body = content::merge_siblings(tree.children(), stats);
    tracing::debug!(
        "Content merge: {} -> {} top-level nodes ({} reduced)",
        tree.children().len(),
        body.children.len(),
        body.reduced
    );
    tree.rebuild_with_body(body)
}
