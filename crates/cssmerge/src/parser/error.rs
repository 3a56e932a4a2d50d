//! Fatal scan errors.

/// Characters shown on each side of the offending index in an excerpt.
pub const EXCERPT_RADIUS: usize = 100;

/// The fatal conditions that abort a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanErrorKind {
    /// A `}` with no open block.
    UnmatchedClose,
    /// A `{` inside a rule's declaration body.
    NestedBlock,
    /// A `*/` outside of any comment.
    UnmatchedCommentClose,
    /// An `@import` statement not terminated by `;` on its line.
    MissingSemicolon,
    /// Open blocks remaining at end of input.
    UnbalancedBraces,
}

impl ScanErrorKind {
    /// The reason reported to the user.
    pub fn reason(&self) -> &'static str {
        match self {
            ScanErrorKind::UnmatchedClose => "Closing brace without a matching block",
            ScanErrorKind::NestedBlock => "Block opened inside a rule body",
            ScanErrorKind::UnmatchedCommentClose => "Comment closed without being opened",
            ScanErrorKind::MissingSemicolon => "Missing semicolon after @import",
            ScanErrorKind::UnbalancedBraces => "Braces are not balanced at end of input",
        }
    }
}

/// A fatal scan error with location information.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} at line {line}: {excerpt}", .kind.reason())]
pub struct ScanError {
    /// What went wrong.
    pub kind: ScanErrorKind,
    /// Character offset of the offending character.
    pub index: usize,
    /// Line number of the offending character (1-indexed).
    pub line: usize,
    /// Up to `2 * EXCERPT_RADIUS` characters centered on `index`.
    pub excerpt: String,
}

impl ScanError {
    /// Create a scan error, cutting the excerpt out of `input`.
    pub fn new(kind: ScanErrorKind, input: &[char], index: usize, line: usize) -> Self {
        Self {
            kind,
            index,
            line,
            excerpt: excerpt(input, index),
        }
    }

    /// The reason reported to the user.
    pub fn reason(&self) -> &'static str {
        self.kind.reason()
    }
}

/// Cut the window `[index - EXCERPT_RADIUS, index + EXCERPT_RADIUS)` out of `input`.
pub fn excerpt(input: &[char], index: usize) -> String {
    let from = index.saturating_sub(EXCERPT_RADIUS);
    let to = index.saturating_add(EXCERPT_RADIUS).min(input.len());
    if from >= to {
        return String::new();
    }
    input[from..to].iter().collect()
}
