//! `<list>` parsing and list item recognition.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::ast::{Block, List, ListKind, Node};
use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::lexer::TokenKind;
use crate::nesting;
use crate::parser::{text_lines, Parser};
use crate::span::Span;

static NUMBERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)*)\.\s*(.*)$").unwrap());

/// Glyphs that start a bulleted item.
pub const BULLETS: [char; 4] = ['•', '*', '-', 'o'];

/// Recognize `line` as a list item of the given kind.
///
/// Numbered items keep their dotted number with a trailing `.`; bulleted
/// items use the glyph as their number. The remainder becomes the head.
///
/// ```rust
/// use docai_core::ast::ListKind;
/// use docai_core::list::parse_item;
///
/// let item = parse_item("2.1. Scope", ListKind::Numbered).unwrap();
/// assert_eq!(item.number.as_deref(), Some("2.1."));
/// assert_eq!(item.head.as_deref(), Some("Scope"));
/// assert!(parse_item("Scope", ListKind::Numbered).is_none());
/// ```
pub fn parse_item(line: &str, kind: ListKind) -> Option<Block> {
    let line = line.trim();
    match kind {
        ListKind::Numbered => {
            let captures = NUMBERED_ITEM.captures(line)?;
            let number = format!("{}.", &captures[1]);
            Some(Block::item(number, non_empty(&captures[2])))
        }
        ListKind::Bulleted => {
            let glyph = line.chars().next().filter(|c| BULLETS.contains(c))?;
            let rest = &line[glyph.len_utf8()..];
            Some(Block::item(glyph.to_string(), non_empty(rest.trim())))
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

/// Per-list state threaded through the body loop.
#[derive(Debug, Clone, Copy)]
struct ListContext {
    kind: ListKind,
    explicit_nesting: bool,
}

impl Parser {
    /// Parse `<list kind="…">…</list>`. The cursor sits on `<list>`; `depth`
    /// is the depth of this list.
    pub(crate) fn parse_list<'t, 'a>(
        &mut self,
        cursor: Cursor<'t, 'a>,
        depth: usize,
    ) -> (List, Cursor<'t, 'a>) {
        let open = cursor.current().span;
        let kind = ListKind::from_attr(cursor.current().attr("kind"));
        let mut cursor = cursor.advance();

        let ctx = ListContext {
            kind,
            explicit_nesting: cursor.has_list_open_ahead(),
        };
        trace!(?kind, explicit_nesting = ctx.explicit_nesting, depth, "parsing list");

        let mut items: Vec<Block> = Vec::new();

        loop {
            let token = cursor.current();
            match token.kind {
                TokenKind::ListClose => {
                    cursor = cursor.advance();
                    break;
                }
                TokenKind::EndOfInput => {
                    self.record_error(ParseError::unclosed_tag("list", Some(open)));
                    break;
                }
                // An enclosing block closes; leave the tag for it.
                TokenKind::BlockClose => {
                    self.record_error(ParseError::unclosed_tag("list", Some(open)));
                    break;
                }
                TokenKind::Text => {
                    for line in text_lines(token.text) {
                        items = self.add_line(items, line, ctx, token.span);
                    }
                    cursor = cursor.advance();
                }
                TokenKind::BlockOpen | TokenKind::ListOpen if self.too_deep(depth + 1) => {
                    let (lines, next) = self.flatten(cursor);
                    for line in lines {
                        items = self.attach_content(items, Node::text(line), "text", token.span);
                    }
                    cursor = next;
                }
                TokenKind::BlockOpen => {
                    let (block, next) = self.parse_block(cursor.advance(), depth + 1, token.span);
                    items = self.attach_content(items, Node::Block(block), "<block>", token.span);
                    cursor = next;
                }
                TokenKind::DictOpen => {
                    let (dict, next) = self.parse_dictionary(cursor);
                    items = self.attach_content(items, Node::Dict(dict), "<dict>", token.span);
                    cursor = next;
                }
                TokenKind::ListOpen => {
                    let (list, next) = self.parse_list(cursor, depth + 1);
                    items = self.attach_nested_list(items, list, token.span);
                    cursor = next;
                }
                TokenKind::HeadOpen => {
                    self.record_error(ParseError::unexpected_tag("head", "<list>", Some(token.span)));
                    cursor = cursor.advance();
                }
                TokenKind::HeadClose | TokenKind::DictClose => {
                    self.record_unmatched(token.kind, token.span);
                    cursor = cursor.advance();
                }
            }
        }

        (List::from(items), cursor)
    }

    /// Handle one text line of a list body: a new item, or content for the
    /// current top-level item.
    fn add_line(&mut self, items: Vec<Block>, line: &str, ctx: ListContext, span: Span) -> Vec<Block> {
        match parse_item(line, ctx.kind) {
            Some(item) => nesting::place(items, item, ctx.explicit_nesting),
            None => self.attach_content(items, Node::text(line), "text", span),
        }
    }

    /// Attach a sub-node to the last top-level item, dropping it when the
    /// list has no items yet.
    fn attach_content(&mut self, items: Vec<Block>, node: Node, what: &str, span: Span) -> Vec<Block> {
        if items.is_empty() {
            self.record_error(ParseError::dropped_content(what, Some(span)));
            return items;
        }
        nesting::attach_to_last(items, node)
    }

    /// Attach an explicit nested list to the item it most plausibly belongs to.
    fn attach_nested_list(&mut self, items: Vec<Block>, list: List, span: Span) -> Vec<Block> {
        match nesting::ancestor_for_nested_list(&items) {
            Some(index) => {
                trace!(
                    parent = items[index].number.as_deref().unwrap_or(""),
                    "attaching nested list"
                );
                nesting::attach(items, index, Node::List(list))
            }
            None => {
                self.record_error(ParseError::dropped_content("<list>", Some(span)));
                items
            }
        }
    }
}
