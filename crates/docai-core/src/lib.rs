//! # docai core
//!
//! A tolerant parser for a small tag-based document markup.
//!
//! Documents are built from `<head>`, `<block>`, `<list>` and `<dict>` tags
//! with free text in between. The parser turns them into a tree of
//! [`Block`]s, inferring list hierarchy from item numbering and bullet
//! glyphs, and can emit the tree as canonical JSON.
//!
//! ## Quick Start
//!
//! ```rust
//! let input = "<head>Terms</head>\n<list>\n1. Scope\n1.1. Services\n2. Fees\n</list>";
//! let doc = docai_core::parse(input);
//!
//! assert_eq!(doc.head.as_deref(), Some("Terms"));
//! let list = doc.body[0].as_list().unwrap();
//! assert_eq!(list.len(), 2);
//! ```
//!
//! ## Error Recovery
//!
//! Parsing never fails. Malformed markup is kept where possible and reported
//! as diagnostics:
//!
//! ```rust
//! use docai_core::{ParseErrorKind, Parser};
//!
//! let mut parser = Parser::new();
//! let result = parser.parse_with_recovery("<block>\nnever closed");
//!
//! assert_eq!(result.document.body.len(), 1);
//! assert_eq!(result.errors.count(ParseErrorKind::UnclosedTag), 1);
//! ```
//!
//! ## JSON
//!
//! ```rust
//! let doc = docai_core::parse("");
//! assert_eq!(docai_core::to_json(&doc).unwrap(), r#"{"kind":"block"}"#);
//! ```

pub mod ast;
pub mod cursor;
pub mod dict;
pub mod error;
pub mod json;
pub mod lexer;
pub mod list;
pub mod nesting;
pub mod parser;
pub mod span;

pub use ast::{Block, Dict, List, ListKind, Node};
pub use error::{Error, ParseError, ParseErrorKind, ParseErrors};
pub use json::{from_json, to_json, to_json_pretty};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{ParseResult, Parser, ParserOptions, DEFAULT_MAX_DEPTH};

/// Parse a document with default options.
#[inline]
pub fn parse(input: &str) -> Block {
    Parser::new().parse(input)
}

/// Parse raw bytes, rejecting input that is not valid UTF-8.
///
/// ```rust
/// assert!(docai_core::parse_bytes(b"<head>Ok</head>").is_ok());
/// assert!(docai_core::parse_bytes(&[0xff, 0xfe]).is_err());
/// ```
pub fn parse_bytes(input: &[u8]) -> Result<Block, Error> {
    let text = std::str::from_utf8(input)?;
    Ok(parse(text))
}
