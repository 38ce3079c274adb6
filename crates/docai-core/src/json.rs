//! Canonical JSON form of the document tree.
//!
//! ```text
//! Text  := "string"
//! Block := { "kind": "block", "number"?: string, "head"?: string, "body"?: [Node] }
//! List  := { "kind": "list", "items": [Block] }
//! Dict  := { "kind": "dict", "items": { string: string } }
//! ```
//!
//! Absent fields are omitted rather than written as `null`, and dictionary
//! entries keep their document order in both directions.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Unexpected, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::ast::{Block, Dict, List, Node};
use crate::error::Error;

/// Serialize a document to compact canonical JSON.
///
/// ```rust
/// let doc = docai_core::parse("<head>Title</head>\nBody");
/// assert_eq!(
///     docai_core::to_json(&doc).unwrap(),
///     r#"{"kind":"block","head":"Title","body":["Body"]}"#
/// );
/// ```
pub fn to_json(block: &Block) -> Result<String, Error> {
    serde_json::to_string(block).map_err(Error::Encode)
}

/// Serialize a document to indented canonical JSON.
pub fn to_json_pretty(block: &Block) -> Result<String, Error> {
    serde_json::to_string_pretty(block).map_err(Error::Encode)
}

/// Decode a document from canonical JSON. The root must be a block object.
///
/// Nesting depth is not limited, so anything [`to_json`] produced decodes
/// again. The stack grows on demand for deeply nested input.
pub fn from_json(json: &str) -> Result<Block, Error> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let block = Block::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
        .map_err(Error::Decode)?;
    deserializer.end().map_err(Error::Decode)?;
    Ok(block)
}

/// Convert a document to a `serde_json::Value`.
pub fn to_value(block: &Block) -> Result<serde_json::Value, Error> {
    serde_json::to_value(block).map_err(Error::Encode)
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Text(text) => serializer.serialize_str(text),
            Node::Block(block) => block.serialize(serializer),
            Node::List(list) => list.serialize(serializer),
            Node::Dict(dict) => dict.serialize(serializer),
        }
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("kind", "block")?;
        if let Some(number) = &self.number {
            map.serialize_entry("number", number)?;
        }
        if let Some(head) = &self.head {
            map.serialize_entry("head", head)?;
        }
        if !self.body.is_empty() {
            map.serialize_entry("body", &self.body)?;
        }
        map.end()
    }
}

impl Serialize for List {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("kind", "list")?;
        map.serialize_entry("items", &self.items)?;
        map.end()
    }
}

impl Serialize for Dict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("kind", "dict")?;
        map.serialize_entry("items", &DictItems(self))?;
        map.end()
    }
}

/// Dict entries as a JSON object, in insertion order.
struct DictItems<'d>(&'d Dict);

impl Serialize for DictItems<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter())
    }
}

const KINDS: &[&str] = &["block", "list", "dict"];

/// Fields of an object node, collected before `kind` is known since keys
/// may arrive in any order.
#[derive(Default)]
struct Fields {
    kind: Option<String>,
    number: Option<String>,
    head: Option<String>,
    body: Option<Vec<Node>>,
    items: Option<Items>,
}

/// `items` is an array for lists and an object for dicts.
enum Items {
    Blocks(Vec<Block>),
    Entries(Dict),
}

impl Fields {
    fn into_node<E: de::Error>(self) -> Result<Node, E> {
        let kind = self.kind.ok_or_else(|| E::missing_field("kind"))?;
        match (kind.as_str(), self.items) {
            ("block", _) => Ok(Node::Block(Block {
                number: self.number,
                head: self.head,
                body: self.body.unwrap_or_default(),
            })),
            ("list", Some(Items::Blocks(items))) => Ok(Node::List(List::from(items))),
            ("list", Some(Items::Entries(_))) => {
                Err(E::invalid_type(Unexpected::Map, &"an array of blocks"))
            }
            ("dict", Some(Items::Entries(dict))) => Ok(Node::Dict(dict)),
            ("dict", Some(Items::Blocks(_))) => {
                Err(E::invalid_type(Unexpected::Seq, &"an object of string values"))
            }
            ("list" | "dict", None) => Err(E::missing_field("items")),
            (other, _) => Err(E::unknown_variant(other, KINDS)),
        }
    }
}

struct ItemsVisitor;

impl<'de> Visitor<'de> for ItemsVisitor {
    type Value = Items;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of blocks or an object of string values")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Items, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Block>()? {
            items.push(item);
        }
        Ok(Items::Blocks(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Items, A::Error> {
        DictVisitor.visit_map(map).map(Items::Entries)
    }
}

impl<'de> Deserialize<'de> for Items {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ItemsVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or an object with a `kind` field")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Node, E> {
        Ok(Node::text(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Node, E> {
        Ok(Node::Text(value))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut fields = Fields::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "kind" => fields.kind = Some(map.next_value()?),
                "number" => fields.number = map.next_value()?,
                "head" => fields.head = map.next_value()?,
                "body" => fields.body = Some(map.next_value()?),
                "items" => fields.items = Some(map.next_value()?),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        fields.into_node()
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Node::deserialize(deserializer)? {
            Node::Block(block) => Ok(block),
            Node::Text(_) => Err(de::Error::custom("expected a block, found a string")),
            Node::List(_) => Err(de::Error::custom("expected a block, found kind `list`")),
            Node::Dict(_) => Err(de::Error::custom("expected a block, found kind `dict`")),
        }
    }
}

struct DictVisitor;

impl<'de> Visitor<'de> for DictVisitor {
    type Value = Dict;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Dict, A::Error> {
        let mut dict = Dict::new();
        while let Some((key, value)) = map.next_entry::<String, String>()? {
            dict.insert(key, value);
        }
        Ok(dict)
    }
}

impl<'de> Deserialize<'de> for Dict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DictVisitor)
    }
}
