//! Mutable state threaded through one scan.

use super::error::{ScanError, ScanErrorKind};

/// Scan state for a single pass over the input.
///
/// A context is created per [`parse`](super::parse) call and dropped when the
/// scan ends; it is never shared between scans.
#[derive(Debug)]
pub(crate) struct ScanContext {
    /// The input as characters.
    pub input: Vec<char>,
    /// Index of the current character.
    pub index: usize,
    /// The current character.
    pub current: char,
    /// Text accumulated since the last `{` or `}`.
    pub buffer: String,
    /// Number of currently open blocks.
    pub depth: usize,
    /// False while inside a rule's declaration body.
    pub block_allowed: bool,
    /// Current line (1-indexed).
    pub line: usize,
    /// The quote character of the string literal being scanned, if any.
    pub quote: Option<char>,
}

impl ScanContext {
    /// Create a context positioned before the first character of `text`.
    pub fn new(text: &str) -> Self {
        Self {
            input: text.chars().collect(),
            index: 0,
            current: '\0',
            buffer: String::new(),
            depth: 0,
            block_allowed: true,
            line: 1,
            quote: None,
        }
    }

    /// Number of characters in the input.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Whether the scanner is inside a string literal.
    pub fn in_string(&self) -> bool {
        self.quote.is_some()
    }

    /// Toggle string mode for the current character.
    ///
    /// The quote that opened a literal is the only one that closes it.
    pub fn track_quote(&mut self) {
        let c = self.current;
        if c != '\'' && c != '"' {
            return;
        }
        match self.quote {
            Some(open) if open == c => self.quote = None,
            Some(_) => {}
            None => self.quote = Some(c),
        }
    }

    /// Remove `suffix` from the end of the buffer if present.
    pub fn strip_buffer_suffix(&mut self, suffix: &str) {
        if self.buffer.ends_with(suffix) {
            let keep = self.buffer.len() - suffix.len();
            self.buffer.truncate(keep);
        }
    }

    /// Build a fatal error at the current position.
    pub fn error(&self, kind: ScanErrorKind) -> ScanError {
        ScanError::new(kind, &self.input, self.index, self.line)
    }
}
