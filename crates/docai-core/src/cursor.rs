//! Immutable position over a token sequence.
//!
//! A `Cursor` is a shared slice plus an index. Advancing returns a new
//! cursor, so a parser can hold on to an earlier position for lookahead
//! without affecting the parse in progress.

use crate::lexer::{Token, TokenKind};

#[derive(Debug, Clone, Copy)]
pub struct Cursor<'t, 'a> {
    tokens: &'t [Token<'a>],
    index: usize,
}

impl<'t, 'a> Cursor<'t, 'a> {
    /// Start at the first token. `tokens` must end with `EndOfInput`, as
    /// produced by [`tokenize`](crate::lexer::tokenize).
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        debug_assert!(
            tokens.last().map(|t| t.kind) == Some(TokenKind::EndOfInput),
            "token sequence must be terminated"
        );
        Self { tokens, index: 0 }
    }

    /// The token under the cursor. Positions past the end resolve to the
    /// trailing `EndOfInput`.
    #[inline]
    pub fn current(&self) -> &'t Token<'a> {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.index.min(last)]
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.kind() == TokenKind::EndOfInput
    }

    /// The cursor one token further on. Advancing at end of input stays put.
    #[inline]
    #[must_use]
    pub fn advance(self) -> Self {
        if self.is_at_end() {
            return self;
        }
        Self {
            tokens: self.tokens,
            index: self.index + 1,
        }
    }

    /// Whether a `<list>` opens before the next `</list>`.
    ///
    /// Called just inside a list, this tells whether that list body contains
    /// an explicit nested list anywhere, including inside nested blocks.
    pub fn has_list_open_ahead(&self) -> bool {
        self.tokens[self.index.min(self.tokens.len())..]
            .iter()
            .map(|t| t.kind)
            .take_while(|&kind| kind != TokenKind::ListClose)
            .any(|kind| kind == TokenKind::ListOpen)
    }

    /// Skip a whole tag subtree starting at an opening tag, returning the
    /// text tokens found inside it and the cursor past its matching close.
    ///
    /// Depth is counted over all four tag kinds, so unbalanced input still
    /// terminates at end of input. This is iterative and used where
    /// recursion is cut off.
    pub fn skip_subtree(self) -> (Vec<&'a str>, Self) {
        let mut texts = Vec::new();
        let mut depth = 0usize;
        let mut cursor = self;

        loop {
            let token = cursor.current();
            match token.kind {
                TokenKind::EndOfInput => return (texts, cursor),
                TokenKind::Text => texts.push(token.text),
                kind if kind.is_open() => depth += 1,
                _ => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return (texts, cursor.advance());
                    }
                }
            }
            cursor = cursor.advance();
        }
    }
}
