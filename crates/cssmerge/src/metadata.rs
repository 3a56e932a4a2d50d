//! UserStyle metadata blocks.

const START: &str = "/* ==UserStyle==";
const END: &str = "==/UserStyle== */";

/// Split a leading `/* ==UserStyle== … ==/UserStyle== */` block off `text`.
///
/// Only whitespace may precede the block. Returns the block verbatim and the
/// text following it; otherwise the whole text is returned as the remainder.
pub fn split_metadata(text: &str) -> (Option<&str>, &str) {
    let start = text.trim_start();
    if !start.starts_with(START) {
        return (None, text);
    }
    let Some(offset) = start.find(END) else {
        return (None, text);
    };
    let finish = offset + END.len();
    (Some(&start[..finish]), &start[finish..])
}
