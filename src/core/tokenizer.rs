//! Line tokenizer for console commands.
//!
//! Splits one line into whitespace-separated tokens. A token that starts
//! with a double quote runs until the closing quote and keeps its opening
//! quote, so the argument resolver can tell string literals from names.
//! The input is never modified; tokens are byte ranges into it.

use std::ops::Range;

/// Result of tokenizing one console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedLine<'a> {
    /// The raw input string.
    raw: &'a str,
    /// Byte range of each token within `raw`.
    spans: Vec<Range<usize>>,
    /// A quoted token was still open at end of line.
    trailing_quote: bool,
}

impl<'a> TokenizedLine<'a> {
    /// Get the raw input string.
    #[inline]
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Get the number of tokens, including the command name.
    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Get a token by index.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        let raw = self.raw;
        self.spans.get(index).map(|span| &raw[span.clone()])
    }

    /// The command name (first token).
    #[inline]
    pub fn command(&self) -> Option<&'a str> {
        self.get(0)
    }

    /// The tokens after the command name.
    pub fn args(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.iter().skip(1)
    }

    /// Iterate over all tokens.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        let raw = self.raw;
        self.spans.iter().map(move |span| &raw[span.clone()])
    }

    /// Byte ranges of the tokens.
    #[inline]
    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    /// True if a quoted token was left unterminated.
    #[inline]
    pub fn has_trailing_quote(&self) -> bool {
        self.trailing_quote
    }
}

/// Tokenize a console line.
///
/// # Syntax
///
/// - Tokens are separated by whitespace
/// - A token starting with `"` extends to the next `"`, whitespace
///   included; the closing quote is dropped and anything between it and
///   the next whitespace is ignored
/// - A line feed outside quotes ends the line
/// - There are no escape sequences
///
/// # Examples
///
/// ```
/// use bevy_quake_console::core::tokenize;
///
/// let line = tokenize("echo hello world");
/// assert_eq!(line.command(), Some("echo"));
/// assert_eq!(line.args().collect::<Vec<_>>(), vec!["hello", "world"]);
///
/// // Quoted tokens keep the opening quote
/// let line = tokenize(r#"set motd "hello world""#);
/// assert_eq!(line.args().collect::<Vec<_>>(), vec!["motd", "\"hello world"]);
/// ```
pub fn tokenize(line: &str) -> TokenizedLine<'_> {
    let mut spans = Vec::new();
    let mut expecting_new_token = true;
    let mut inside_quoted_string = false;
    let mut token_start: Option<usize> = None;
    let mut end = line.len();

    for (i, c) in line.char_indices() {
        if !inside_quoted_string && c == '\n' {
            end = i;
            break;
        }

        if expecting_new_token {
            if c.is_whitespace() {
                continue;
            }
            token_start = Some(i);
            inside_quoted_string = c == '"';
            expecting_new_token = false;
        } else if inside_quoted_string {
            if c == '"' {
                if let Some(start) = token_start.take() {
                    spans.push(start..i);
                }
                inside_quoted_string = false;
            }
        } else if c.is_whitespace() {
            if let Some(start) = token_start.take() {
                spans.push(start..i);
            }
            expecting_new_token = true;
        }
    }

    if let Some(start) = token_start {
        spans.push(start..end);
    }

    TokenizedLine {
        raw: line,
        spans,
        trailing_quote: inside_quoted_string,
    }
}
