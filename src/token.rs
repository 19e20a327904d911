use crate::config::SpanMode;

/// Character that opens every data line of a catchment file
pub const MARKER: char = 'C';

/// Token separators. Only blanks and tabs count; the format has no others.
pub fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// A whitespace-delimited run of characters with its offsets in the raw line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Starting byte offset
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
    /// The token text, `&line[start..end]`
    pub text: &'a str,
}

/// Byte range of a field within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    /// Starting byte offset
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

impl FieldSpan {
    /// Number of bytes a replacement value may occupy
    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// Lazy left-to-right tokenizer over a single line
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = &self.line[self.pos..];
        let skip = rest.find(|c: char| !is_separator(c))?;
        let start = self.pos + skip;
        let len = self.line[start..]
            .find(is_separator)
            .unwrap_or(self.line.len() - start);
        let end = start + len;
        self.pos = end;
        Some(Token {
            start,
            end,
            text: &self.line[start..end],
        })
    }
}

/// Tokenize a raw line, keeping byte offsets into it
///
/// The marker, when present, comes out as the first token.
///
/// # Example
/// ```
/// use catg_edit::tokenize;
/// let tokens: Vec<_> = tokenize("C   12  4.5").collect();
/// assert_eq!(tokens.len(), 3);
/// assert_eq!((tokens[1].start, tokens[1].end, tokens[1].text), (4, 6, "12"));
/// ```
pub fn tokenize(line: &str) -> Tokens<'_> {
    Tokens { line, pos: 0 }
}

/// Whether the line starts with the marker followed by a separator
pub fn has_marker(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some(MARKER) && chars.next().is_some_and(is_separator)
}

/// Tokens after the marker token
pub fn field_tokens(line: &str) -> std::iter::Skip<Tokens<'_>> {
    tokenize(line).skip(1)
}

/// The `index`-th field token (1-based, after the marker)
///
/// Scanning stops as soon as the token is found. `None` means the line ran
/// out of tokens first.
pub fn field_token(line: &str, index: usize) -> Option<Token<'_>> {
    if index == 0 {
        return None;
    }
    field_tokens(line).nth(index - 1)
}

/// Editable span for a token under the given span mode
///
/// In [`SpanMode::Column`] the span runs on to one byte before the next
/// token, so at least one separator survives; the last token of a line
/// takes everything up to the end of the line.
pub fn field_span(line: &str, token: &Token<'_>, mode: SpanMode) -> FieldSpan {
    match mode {
        SpanMode::Token => FieldSpan {
            start: token.start,
            end: token.end,
        },
        SpanMode::Column => {
            let end = match line[token.end..].find(|c: char| !is_separator(c)) {
                Some(gap) => token.end + gap - 1,
                None => line.len(),
            };
            FieldSpan {
                start: token.start,
                end,
            }
        }
    }
}
