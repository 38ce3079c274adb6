use crate::span::Span;
use std::fmt;

/// Error kinds for categorizing parse diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `<head>`, `<block>`, `<list>` or `<dict>` ran to end of input
    UnclosedTag,
    /// A closing tag with no matching opener in the current container
    UnmatchedClose,
    /// A container tag beyond the configured nesting limit
    NestingTooDeep,
    /// List content that appeared before the first item
    DroppedContent,
    /// A tag that has no meaning where it appeared
    UnexpectedTag,
    /// An attribute value that could not be used
    InvalidAttribute,
}

/// A recoverable observation about malformed input.
///
/// Parsing never stops on these; they are collected so callers can report
/// them (see [`Parser::parse_with_recovery`](crate::Parser::parse_with_recovery)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable error message
    pub message: String,
    /// Source location where the error occurred
    pub span: Option<Span>,
    /// Error categorization
    pub kind: ParseErrorKind,
    /// Whether the tree still reflects all of the input
    pub recoverable: bool,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Option<Span>, kind: ParseErrorKind) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            recoverable: true,
        }
    }

    /// A container that was still open at end of input.
    pub fn unclosed_tag(tag: &str, span: Option<Span>) -> Self {
        Self::new(
            format!("unclosed <{}>", tag),
            span,
            ParseErrorKind::UnclosedTag,
        )
    }

    /// A closing tag that does not close anything.
    pub fn unmatched_close(tag: &str, span: Option<Span>) -> Self {
        Self::new(
            format!("unmatched </{}>", tag),
            span,
            ParseErrorKind::UnmatchedClose,
        )
    }

    /// A container flattened because it exceeded the depth limit.
    pub fn nesting_too_deep(tag: &str, limit: usize, span: Option<Span>) -> Self {
        Self::new(
            format!("<{}> nested deeper than {} levels was flattened", tag, limit),
            span,
            ParseErrorKind::NestingTooDeep,
        )
    }

    /// List content with no item to attach to.
    pub fn dropped_content(what: &str, span: Option<Span>) -> Self {
        Self::new(
            format!("{} before the first list item was dropped", what),
            span,
            ParseErrorKind::DroppedContent,
        )
        .lossy()
    }

    /// A tag that is ignored in its context.
    pub fn unexpected_tag(tag: &str, context: &str, span: Option<Span>) -> Self {
        Self::new(
            format!("<{}> is ignored inside {}", tag, context),
            span,
            ParseErrorKind::UnexpectedTag,
        )
    }

    /// An attribute value that was replaced by its default.
    pub fn invalid_attribute(name: &str, fallback: &str, span: Option<Span>) -> Self {
        Self::new(
            format!("empty `{}` attribute, using \"{}\"", name, fallback),
            span,
            ParseErrorKind::InvalidAttribute,
        )
    }

    /// Mark this error as having discarded part of the input.
    pub fn lossy(mut self) -> Self {
        self.recoverable = false;
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(span) = self.span {
            write!(f, " at bytes {}..{}", span.start, span.end)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Diagnostics collected during one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    /// Count the diagnostics of one kind.
    pub fn count(&self, kind: ParseErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    /// Check if any diagnostic discarded input.
    pub fn has_lossy(&self) -> bool {
        self.errors.iter().any(|e| !e.recoverable)
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Caller contract violations.
///
/// Parsing markup cannot fail; these cover input that is not text at all and
/// JSON that does not follow the document schema.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::InvalidInput(format!("input is not valid UTF-8 ({})", err))
    }
}
