//! Recursive-descent block parser.
//!
//! Works over an immutable [`Cursor`]: every parse step takes a cursor by
//! value and returns the parsed value together with the advanced cursor.
//! Malformed input never aborts parsing; problems are recorded as
//! recoverable diagnostics instead.

use tracing::debug;

use crate::ast::{Block, Node};
use crate::cursor::Cursor;
use crate::error::{ParseError, ParseErrors};
use crate::lexer::{tokenize, TokenKind};
use crate::span::Span;

/// Default limit for nested `<block>`/`<list>` containers.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Result type for parsing that includes recovered errors.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed document.
    pub document: Block,
    /// Diagnostics encountered during parsing.
    pub errors: ParseErrors,
}

impl ParseResult {
    /// Check if parsing completed without diagnostics.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if any input was discarded.
    pub fn has_lossy_errors(&self) -> bool {
        self.errors.has_lossy()
    }
}

/// Tunables for a [`Parser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Containers nested deeper than this are flattened into text.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Markup parser with configurable limits and diagnostic collection.
#[derive(Debug, Default)]
pub struct Parser {
    options: ParserOptions,
    /// Diagnostics collected during the current parse.
    errors: ParseErrors,
}

impl Parser {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Limit container nesting. A limit of zero keeps every nested
    /// container's text in the document root.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Parse the input into a document tree, discarding diagnostics.
    #[inline]
    pub fn parse(&mut self, input: &str) -> Block {
        self.parse_with_recovery(input).document
    }

    /// Parse the input, returning the tree together with diagnostics.
    pub fn parse_with_recovery(&mut self, input: &str) -> ParseResult {
        self.errors = ParseErrors::new();

        let tokens = tokenize(input);
        let (document, _) = self.parse_container(Cursor::new(&tokens), 0, None);
        let errors = std::mem::take(&mut self.errors);

        debug!(
            bytes = input.len(),
            tokens = tokens.len(),
            nodes = document.body.len(),
            diagnostics = errors.len(),
            "parsed document"
        );

        ParseResult { document, errors }
    }

    #[inline]
    pub(crate) fn record_error(&mut self, error: ParseError) {
        debug!(kind = ?error.kind, "{}", error);
        self.errors.push(error);
    }

    /// Whether a container opened at `depth` would exceed the limit.
    #[inline]
    pub(crate) fn too_deep(&self, depth: usize) -> bool {
        depth > self.options.max_depth
    }

    /// Parse a `<block>` body. `cursor` sits just past the opening tag.
    pub(crate) fn parse_block<'t, 'a>(
        &mut self,
        cursor: Cursor<'t, 'a>,
        depth: usize,
        open: Span,
    ) -> (Block, Cursor<'t, 'a>) {
        self.parse_container(cursor, depth, Some(open))
    }

    /// Shared loop for the document root (`open == None`) and `<block>`.
    ///
    /// The root runs to end of input and skips stray `</block>` tags; a
    /// nested block returns after consuming its `</block>`.
    fn parse_container<'t, 'a>(
        &mut self,
        mut cursor: Cursor<'t, 'a>,
        depth: usize,
        open: Option<Span>,
    ) -> (Block, Cursor<'t, 'a>) {
        let mut head = None;
        let mut body: Vec<Node> = Vec::new();

        loop {
            let token = cursor.current();
            match token.kind {
                TokenKind::EndOfInput => {
                    if open.is_some() {
                        self.record_error(ParseError::unclosed_tag("block", open));
                    }
                    break;
                }
                TokenKind::BlockClose if open.is_some() => {
                    cursor = cursor.advance();
                    break;
                }
                TokenKind::HeadOpen => {
                    let (parsed, next) = self.parse_head(cursor);
                    head = Some(parsed);
                    cursor = next;
                }
                TokenKind::BlockOpen if self.too_deep(depth + 1) => {
                    cursor = self.flatten_into(cursor, &mut body);
                }
                TokenKind::BlockOpen => {
                    let (child, next) = self.parse_block(cursor.advance(), depth + 1, token.span);
                    body.push(Node::Block(child));
                    cursor = next;
                }
                TokenKind::ListOpen if self.too_deep(depth + 1) => {
                    cursor = self.flatten_into(cursor, &mut body);
                }
                TokenKind::ListOpen => {
                    let (list, next) = self.parse_list(cursor, depth + 1);
                    body.push(Node::List(list));
                    cursor = next;
                }
                TokenKind::DictOpen => {
                    let (dict, next) = self.parse_dictionary(cursor);
                    body.push(Node::Dict(dict));
                    cursor = next;
                }
                TokenKind::Text => {
                    body.extend(text_lines(token.text).map(Node::text));
                    cursor = cursor.advance();
                }
                TokenKind::BlockClose
                | TokenKind::HeadClose
                | TokenKind::ListClose
                | TokenKind::DictClose => {
                    self.record_unmatched(token.kind, token.span);
                    cursor = cursor.advance();
                }
            }
        }

        (Block { number: None, head, body }, cursor)
    }

    /// Parse `<head>…</head>` into a heading. The cursor sits on `<head>`.
    ///
    /// Interior text tokens are joined with single spaces; other tags inside
    /// a head are ignored. A head with no text is the empty string.
    pub(crate) fn parse_head<'t, 'a>(&mut self, cursor: Cursor<'t, 'a>) -> (String, Cursor<'t, 'a>) {
        let open = cursor.current().span;
        let mut cursor = cursor.advance();
        let mut parts: Vec<&str> = Vec::new();

        loop {
            let token = cursor.current();
            match token.kind {
                TokenKind::HeadClose => {
                    cursor = cursor.advance();
                    break;
                }
                TokenKind::EndOfInput => {
                    self.record_error(ParseError::unclosed_tag("head", Some(open)));
                    break;
                }
                TokenKind::Text => parts.push(token.text),
                kind => {
                    let tag = kind.tag_name().unwrap_or("?");
                    self.record_error(ParseError::unexpected_tag(tag, "<head>", Some(token.span)));
                }
            }
            cursor = cursor.advance();
        }

        (parts.join(" "), cursor)
    }

    /// Consume a container that exceeds the depth limit, keeping its text
    /// lines in `body`. The cursor sits on the opening tag.
    fn flatten_into<'t, 'a>(&mut self, cursor: Cursor<'t, 'a>, body: &mut Vec<Node>) -> Cursor<'t, 'a> {
        let (lines, next) = self.flatten(cursor);
        body.extend(lines.into_iter().map(Node::text));
        next
    }

    /// Skip an over-deep container subtree and return its text lines.
    pub(crate) fn flatten<'t, 'a>(&mut self, cursor: Cursor<'t, 'a>) -> (Vec<&'a str>, Cursor<'t, 'a>) {
        let token = cursor.current();
        let tag = token.kind.tag_name().unwrap_or("?");
        self.record_error(ParseError::nesting_too_deep(
            tag,
            self.options.max_depth,
            Some(token.span),
        ));

        let (texts, next) = cursor.skip_subtree();
        let lines = texts.into_iter().flat_map(text_lines).collect();
        (lines, next)
    }

    pub(crate) fn record_unmatched(&mut self, kind: TokenKind, span: Span) {
        let tag = kind.tag_name().unwrap_or("?");
        self.record_error(ParseError::unmatched_close(tag, Some(span)));
    }
}

/// Split a text token into trimmed, non-empty lines.
pub(crate) fn text_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim).filter(|line| !line.is_empty())
}
