//! `<dict>` parsing.

use crate::ast::Dict;
use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::lexer::TokenKind;
use crate::parser::{text_lines, Parser};

/// Separator used when `<dict>` has no usable `sep` attribute.
pub const DEFAULT_SEPARATOR: &str = ":";

impl Parser {
    /// Parse `<dict sep="…">…</dict>`. The cursor sits on `<dict>`.
    ///
    /// Every non-blank line becomes one entry, split at the first occurrence
    /// of the separator. Tags inside the body are skipped.
    pub(crate) fn parse_dictionary<'t, 'a>(
        &mut self,
        cursor: Cursor<'t, 'a>,
    ) -> (Dict, Cursor<'t, 'a>) {
        let open = cursor.current();
        let separator = match open.attr("sep") {
            Some("") => {
                self.record_error(ParseError::invalid_attribute(
                    "sep",
                    DEFAULT_SEPARATOR,
                    Some(open.span),
                ));
                DEFAULT_SEPARATOR
            }
            Some(sep) => sep,
            None => DEFAULT_SEPARATOR,
        };

        let mut dict = Dict::new();
        let mut cursor = cursor.advance();

        loop {
            let token = cursor.current();
            match token.kind {
                TokenKind::DictClose => {
                    cursor = cursor.advance();
                    break;
                }
                TokenKind::EndOfInput => {
                    self.record_error(ParseError::unclosed_tag("dict", Some(open.span)));
                    break;
                }
                TokenKind::Text => {
                    for line in text_lines(token.text) {
                        let (key, value) = split_entry(line, separator);
                        dict.insert(key, value);
                    }
                }
                kind => {
                    let tag = kind.tag_name().unwrap_or("?");
                    self.record_error(ParseError::unexpected_tag(tag, "<dict>", Some(token.span)));
                }
            }
            cursor = cursor.advance();
        }

        (dict, cursor)
    }
}

/// Split a dictionary line at the first `separator`. A line without the
/// separator is a key with an empty value.
///
/// ```rust
/// use docai_core::dict::split_entry;
///
/// assert_eq!(split_entry("Key --> a --> b", "-->"), ("Key", "a --> b"));
/// assert_eq!(split_entry("Flag", ":"), ("Flag", ""));
/// ```
pub fn split_entry<'a>(line: &'a str, separator: &str) -> (&'a str, &'a str) {
    match line.split_once(separator) {
        Some((key, value)) => (key.trim(), value.trim()),
        None => (line.trim(), ""),
    }
}
