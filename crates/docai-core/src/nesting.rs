//! Implicit list hierarchy.
//!
//! List markup has no indentation, so depth is inferred from item markers:
//! `2.1.` belongs under `2.`, and a change of bullet glyph (`o` after `•`)
//! starts a sub-list. These functions decide where an item goes and rebuild
//! the item sequence accordingly. They take the sequence by value and hand
//! back the updated one; an item that gains content is replaced, not edited
//! in place.

use tracing::trace;

use crate::ast::{Block, Node};

/// Where a freshly recognized item goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Append as a new top-level item.
    TopLevel,
    /// Fold into the nested list of the top-level item at this index.
    Under(usize),
}

/// Decide the placement of `item` given the top-level items so far.
///
/// With `explicit_nesting` set (the list contains its own `<list>` tags) no
/// item is ever folded. Otherwise the item is compared with the last
/// top-level item only.
pub fn placement(item: &Block, items: &[Block], explicit_nesting: bool) -> Placement {
    if explicit_nesting {
        return Placement::TopLevel;
    }
    let Some(previous) = items.last() else {
        return Placement::TopLevel;
    };
    let (Some(current), Some(prev)) = (item.number.as_deref(), previous.number.as_deref()) else {
        return Placement::TopLevel;
    };

    if is_numbered_child(current, prev) || is_bullet_child(current, prev) {
        Placement::Under(items.len() - 1)
    } else {
        Placement::TopLevel
    }
}

/// Add `item` to `items` according to [`placement`].
pub fn place(items: Vec<Block>, item: Block, explicit_nesting: bool) -> Vec<Block> {
    match placement(&item, &items, explicit_nesting) {
        Placement::TopLevel => {
            let mut items = items;
            items.push(item);
            items
        }
        Placement::Under(index) => {
            trace!(
                number = item.number.as_deref().unwrap_or(""),
                parent = items[index].number.as_deref().unwrap_or(""),
                "folding list item"
            );
            replace(items, index, |parent| parent.with_nested_item(item))
        }
    }
}

/// Append `node` to the body of the item at `index`.
pub fn attach(items: Vec<Block>, index: usize, node: Node) -> Vec<Block> {
    replace(items, index, |item| item.with_node(node))
}

/// Append `node` to the last top-level item. No-op on an empty sequence.
pub fn attach_to_last(items: Vec<Block>, node: Node) -> Vec<Block> {
    match items.len().checked_sub(1) {
        Some(last) => attach(items, last, node),
        None => items,
    }
}

/// Pick the item that should own an explicit nested `<list>`.
///
/// Starting from the last item: if its number has several segments, the
/// nearest earlier item numbered with its first segment wins (`2.` for
/// `2.1.` and for `2.1.3.`). Failing that, the last item itself. `None` only
/// for an empty sequence.
pub fn ancestor_for_nested_list(items: &[Block]) -> Option<usize> {
    let last = items.len().checked_sub(1)?;
    let Some(number) = items[last].number.as_deref() else {
        return Some(last);
    };

    let parts = segments(number);
    if parts.len() < 2 {
        return Some(last);
    }
    let parent = format!("{}.", parts[0]);
    let index = items[..last]
        .iter()
        .rposition(|item| item.number.as_deref() == Some(parent.as_str()));
    Some(index.unwrap_or(last))
}

/// Split an item number into its dotted segments, ignoring the trailing dot.
///
/// ```rust
/// use docai_core::nesting::segments;
///
/// assert_eq!(segments("2.1."), ["2", "1"]);
/// assert_eq!(segments("•"), ["•"]);
/// ```
pub fn segments(number: &str) -> Vec<&str> {
    number.strip_suffix('.').unwrap_or(number).split('.').collect()
}

/// `current` extends `previous` by at least one segment (`2.1.` after `2.`).
fn is_numbered_child(current: &str, previous: &str) -> bool {
    let current = segments(current);
    let previous = segments(previous);
    current.len() > previous.len() && current.starts_with(&previous)
}

/// Both are bullet glyphs and the glyph changed.
fn is_bullet_child(current: &str, previous: &str) -> bool {
    !current.contains('.') && !previous.contains('.') && current != previous
}

fn replace(mut items: Vec<Block>, index: usize, rebuild: impl FnOnce(Block) -> Block) -> Vec<Block> {
    let item = std::mem::take(&mut items[index]);
    items[index] = rebuild(item);
    items
}
