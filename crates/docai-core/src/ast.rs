//! Document tree types.
//!
//! The tree is built once per parse and handed to the caller by value.
//! Updates during parsing go through consuming `with_*` methods that return
//! the rebuilt node, so a node is never edited through a shared reference.

use indexmap::IndexMap;

/// Any node that can appear in a block body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A single trimmed line of text.
    Text(String),
    /// A nested sub-document.
    Block(Block),
    /// A numbered or bulleted list.
    List(List),
    /// A key/value table.
    Dict(Dict),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Node::Dict(dict) => Some(dict),
            _ => None,
        }
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Block(block)
    }
}

impl From<List> for Node {
    fn from(list: List) -> Self {
        Node::List(list)
    }
}

impl From<Dict> for Node {
    fn from(dict: Dict) -> Self {
        Node::Dict(dict)
    }
}

/// A document or sub-document. List items are blocks as well, carrying their
/// marker in `number`.
///
/// An empty `body` is the absent state: it is omitted from JSON output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    /// Item marker such as `"2.1."` or `"•"`; only set on list items.
    pub number: Option<String>,
    /// Title from `<head>`, or the text after a list item marker.
    pub head: Option<String>,
    /// Child nodes in document order.
    pub body: Vec<Node>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list item with the given marker and optional heading.
    pub fn item(number: impl Into<String>, head: Option<String>) -> Self {
        Self {
            number: Some(number.into()),
            head,
            body: Vec::new(),
        }
    }

    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = Some(head.into());
        self
    }

    /// Return this block with `node` appended to its body.
    pub fn with_node(mut self, node: impl Into<Node>) -> Self {
        self.body.push(node.into());
        self
    }

    /// Return this block with `item` added to its trailing nested list,
    /// starting a new nested list when the body does not end in one.
    pub fn with_nested_item(mut self, item: Block) -> Self {
        match self.body.pop() {
            Some(Node::List(list)) => self.body.push(Node::List(list.with_item(item))),
            other => {
                self.body.extend(other);
                self.body.push(Node::List(List::new().with_item(item)));
            }
        }
        self
    }
}

/// An ordered sequence of list items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    pub items: Vec<Block>,
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: Block) -> Self {
        self.items.push(item);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<Block>> for List {
    fn from(items: Vec<Block>) -> Self {
        Self { items }
    }
}

/// Key/value entries in first-seen key order.
///
/// Inserting an existing key replaces its value but keeps its position.
/// Equality compares entries in order.
#[derive(Debug, Clone, Default)]
pub struct Dict {
    entries: IndexMap<String, String>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for Dict {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Dict::new();
        for (key, value) in iter {
            dict.insert(key, value);
        }
        dict
    }
}

/// List item syntax selected by the `kind` attribute of `<list>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListKind {
    /// `kind="."`: dotted hierarchical numbers (`1.`, `2.1.`).
    #[default]
    Numbered,
    /// `kind="*"`: single bullet glyphs (`•`, `*`, `-`, `o`).
    Bulleted,
}

impl ListKind {
    /// Map a `kind` attribute value; anything unrecognized is numbered.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("*") => ListKind::Bulleted,
            _ => ListKind::Numbered,
        }
    }
}
