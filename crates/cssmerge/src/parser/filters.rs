//! Character filters that consume input before default tokenization.
//!
//! A filter is a small state machine fed every character of the input. While
//! a filter is active, the characters it sees are consumed by it and never
//! reach the scanner's buffer. Each step may request a side effect; buffer
//! edits are applied as soon as the filter has been polled, while closing a
//! filter is deferred until the scanner finished handling the character, so
//! the character that closes a filter is still consumed by it.

use std::collections::VecDeque;

use super::error::ScanErrorKind;

/// Per-character input handed to each filter.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FilterInput {
    /// The current character.
    pub ch: char,
    /// The current line (1-indexed).
    pub line: usize,
    /// Whether the current character is part of a string literal.
    pub in_string: bool,
    /// False inside string literals and while another filter is active.
    pub can_activate: bool,
}

/// Side effect requested by a filter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Effect {
    /// Remove the given trigger prefix from the end of the scanner buffer.
    StripBuffer(&'static str),
    /// Return to idle once the current character has been handled,
    /// optionally discarding the scanner buffer right away.
    Close { clear_buffer: bool },
}

/// A character filter.
pub(crate) trait Filter {
    /// Name used in log output.
    fn name(&self) -> &'static str;

    /// Whether the filter currently consumes characters.
    fn is_active(&self) -> bool;

    /// Feed one character.
    fn step(&mut self, input: FilterInput) -> Result<Option<Effect>, ScanErrorKind>;

    /// Leave the active state.
    fn close(&mut self);

    /// Called once at end of input.
    fn finish(&mut self) -> Result<(), ScanErrorKind> {
        Ok(())
    }
}

/// Fixed-size window over the most recent characters.
#[derive(Debug, Clone)]
struct Trail {
    chars: VecDeque<char>,
    limit: usize,
}

impl Trail {
    fn new(limit: usize) -> Self {
        Self {
            chars: VecDeque::with_capacity(limit),
            limit,
        }
    }

    fn push(&mut self, c: char) {
        if self.chars.len() == self.limit {
            self.chars.pop_front();
        }
        self.chars.push_back(c);
    }

    fn is(&self, text: &str) -> bool {
        self.chars.len() == text.chars().count() && self.chars.iter().copied().eq(text.chars())
    }

    fn clear(&mut self) {
        self.chars.clear();
    }
}

const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentState {
    Idle,
    Open,
}

/// Suppresses `/* … */` comments.
///
/// Closing a comment discards the pending text before it, so only what
/// follows the comment reaches the next selector or declaration list.
#[derive(Debug, Clone)]
pub(crate) struct CommentFilter {
    state: CommentState,
    trail: Trail,
}

impl CommentFilter {
    pub fn new() -> Self {
        Self {
            state: CommentState::Idle,
            trail: Trail::new(2),
        }
    }
}

impl Default for CommentFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for CommentFilter {
    fn name(&self) -> &'static str {
        "comment"
    }

    fn is_active(&self) -> bool {
        self.state == CommentState::Open
    }

    fn step(&mut self, input: FilterInput) -> Result<Option<Effect>, ScanErrorKind> {
        self.trail.push(input.ch);

        if self.trail.is(COMMENT_OPEN) {
            if self.state == CommentState::Idle && input.can_activate {
                self.state = CommentState::Open;
                self.trail.clear();
                return Ok(Some(Effect::StripBuffer("/")));
            }
        } else if self.trail.is(COMMENT_CLOSE) {
            match self.state {
                CommentState::Open => {
                    self.trail.clear();
                    return Ok(Some(Effect::Close { clear_buffer: true }));
                }
                CommentState::Idle if input.can_activate => {
                    return Err(ScanErrorKind::UnmatchedCommentClose);
                }
                CommentState::Idle => {}
            }
        }
        Ok(None)
    }

    fn close(&mut self) {
        self.state = CommentState::Idle;
    }

    fn finish(&mut self) -> Result<(), ScanErrorKind> {
        if self.is_active() {
            tracing::warn!("Comment is not closed at end of input");
        }
        Ok(())
    }
}

const IMPORT_KEYWORD: &str = "@import";

/// An `@import` statement captured by the [`ImportFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportRecord {
    /// The raw statement, from `@import` through `;`.
    pub statement: String,
    /// Line of the terminating `;`.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ImportState {
    Idle,
    Open { statement: String },
}

/// Captures `@import …;` statements into a side list.
///
/// A `;` inside a quoted URL does not end the statement.
#[derive(Debug, Clone)]
pub(crate) struct ImportFilter {
    state: ImportState,
    trail: Trail,
    records: Vec<ImportRecord>,
}

impl ImportFilter {
    pub fn new() -> Self {
        Self {
            state: ImportState::Idle,
            trail: Trail::new(IMPORT_KEYWORD.len()),
            records: Vec::new(),
        }
    }

    /// Take the statements captured so far, in the order they ended.
    pub fn take_records(&mut self) -> Vec<ImportRecord> {
        std::mem::take(&mut self.records)
    }
}

impl Default for ImportFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for ImportFilter {
    fn name(&self) -> &'static str {
        "import"
    }

    fn is_active(&self) -> bool {
        matches!(self.state, ImportState::Open { .. })
    }

    fn step(&mut self, input: FilterInput) -> Result<Option<Effect>, ScanErrorKind> {
        self.trail.push(input.ch);

        if self.trail.is(IMPORT_KEYWORD) {
            if self.is_active() {
                return Err(ScanErrorKind::MissingSemicolon);
            }
            if input.can_activate {
                self.state = ImportState::Open {
                    statement: IMPORT_KEYWORD.to_string(),
                };
                self.trail.clear();
                return Ok(Some(Effect::StripBuffer("@impor")));
            }
            return Ok(None);
        }

        let ImportState::Open { statement } = &mut self.state else {
            return Ok(None);
        };
        statement.push(input.ch);
        match input.ch {
            ';' if !input.in_string => {
                self.records.push(ImportRecord {
                    statement: std::mem::take(statement),
                    line: input.line,
                });
                self.trail.clear();
                Ok(Some(Effect::Close {
                    clear_buffer: false,
                }))
            }
            '\n' => Err(ScanErrorKind::MissingSemicolon),
            _ => Ok(None),
        }
    }

    fn close(&mut self) {
        self.state = ImportState::Idle;
    }

    fn finish(&mut self) -> Result<(), ScanErrorKind> {
        if self.is_active() {
            return Err(ScanErrorKind::MissingSemicolon);
        }
        Ok(())
    }
}

/// The filters run by the scanner, in polling order.
#[derive(Debug, Clone, Default)]
pub(crate) struct FilterSet {
    pub comment: CommentFilter,
    pub import: ImportFilter,
}

impl FilterSet {
    /// Number of filters.
    pub const LEN: usize = 2;

    /// Create the default filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The filter polled at position `slot`.
    pub fn get(&self, slot: usize) -> Option<&dyn Filter> {
        match slot {
            0 => Some(&self.comment),
            1 => Some(&self.import),
            _ => None,
        }
    }

    /// Mutable access to the filter polled at position `slot`.
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut dyn Filter> {
        match slot {
            0 => Some(&mut self.comment),
            1 => Some(&mut self.import),
            _ => None,
        }
    }

    /// Whether any filter other than the one at `slot` is active.
    pub fn others_active(&self, slot: usize) -> bool {
        (0..Self::LEN)
            .filter(|&other| other != slot)
            .filter_map(|other| self.get(other))
            .any(|filter| filter.is_active())
    }

    /// Whether any filter is active.
    pub fn any_active(&self) -> bool {
        (0..Self::LEN)
            .filter_map(|slot| self.get(slot))
            .any(|filter| filter.is_active())
    }
}
