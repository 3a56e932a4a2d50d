//! Text helpers shared by the scanner and the merge engine.

/// Remove line breaks and trim surrounding whitespace.
pub fn strip(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split `text` on `delimiter`, ignoring delimiters inside `'…'` or `"…"`.
///
/// Quotes are not escape-aware: a quote character always opens or closes a
/// literal. The pieces are returned untrimmed; a trailing empty piece is
/// dropped.
pub fn split_outside_quotes(text: &str, delimiter: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (offset, c) in text.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == delimiter => {
                pieces.push(&text[start..offset]);
                start = offset + c.len_utf8();
            }
            None => {}
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Split on `delimiter` outside quotes, strip every piece and drop empty ones.
pub fn split_list(text: &str, delimiter: char) -> Vec<String> {
    split_outside_quotes(text, delimiter)
        .into_iter()
        .map(strip)
        .filter(|piece| !piece.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_removes_line_breaks() {
        assert_eq!(strip("  .a,\r\n .b  "), ".a, .b");
        assert_eq!(strip("\n"), "");
    }

    #[test]
    fn split_respects_quotes() {
        assert_eq!(
            split_outside_quotes(r#"a[title="x,y"],b"#, ','),
            vec![r#"a[title="x,y"]"#, "b"]
        );
        assert_eq!(
            split_outside_quotes("content: ';'; color: red;", ';'),
            vec!["content: ';'", " color: red"]
        );
    }

    #[test]
    fn split_list_drops_empty_pieces() {
        assert_eq!(split_list(" color: red; ;\n margin: 0 ;", ';'), vec!["color: red", "margin: 0"]);
        assert!(split_list("   ", ';').is_empty());
    }
}
