//! Canonical JSON encoding and decoding

use docai_core::{
    from_json, parse, to_json, to_json_pretty, Block, Dict, Error, List, Node, DEFAULT_MAX_DEPTH,
};
use serde_json::json;

fn value(block: &Block) -> serde_json::Value {
    docai_core::json::to_value(block).unwrap()
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_empty_document_encodes_as_bare_block() {
    assert_eq!(to_json(&parse("")).unwrap(), r#"{"kind":"block"}"#);
}

#[test]
fn test_fields_are_omitted_when_absent() {
    let item = Block::item("1.", None);
    assert_eq!(value(&item), json!({"kind": "block", "number": "1."}));
}

#[test]
fn test_document_encoding() {
    let doc = parse(
        "<head>Terms</head>
intro
<list>
1. Scope
1.1. Detail
</list>
<dict sep=\"=\">
b = 2
a = 1
</dict>",
    );

    assert_eq!(
        value(&doc),
        json!({
            "kind": "block",
            "head": "Terms",
            "body": [
                "intro",
                {
                    "kind": "list",
                    "items": [{
                        "kind": "block",
                        "number": "1.",
                        "head": "Scope",
                        "body": [{
                            "kind": "list",
                            "items": [{"kind": "block", "number": "1.1.", "head": "Detail"}]
                        }]
                    }]
                },
                {"kind": "dict", "items": {"b": "2", "a": "1"}}
            ]
        })
    );
}

#[test]
fn test_dict_keys_keep_document_order() {
    let doc = parse("<dict>\nzeta: 1\nalpha: 2\nmid: 3\n</dict>");
    let json = to_json(&doc).unwrap();
    assert!(json.contains(r#"{"zeta":"1","alpha":"2","mid":"3"}"#), "{}", json);
}

#[test]
fn test_empty_list_keeps_items_field() {
    let doc = Block::new().with_node(List::new());
    assert_eq!(
        to_json(&doc).unwrap(),
        r#"{"kind":"block","body":[{"kind":"list","items":[]}]}"#
    );
}

#[test]
fn test_pretty_output_decodes_to_same_tree() {
    let doc = parse("<head>T</head>\n<block>\ninner\n</block>");
    let pretty = to_json_pretty(&doc).unwrap();
    assert!(pretty.contains('\n'));
    assert_eq!(from_json(&pretty).unwrap(), doc);
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_round_trip_preserves_tree() {
    let input = "<head>Agreement</head>
Preamble text.
<list kind=\"*\">
• One
o Sub one
• Two
<dict sep=\"-->\">
Key --> Value
Empty -->
</dict>
</list>
<block>
<head>Annex</head>
<list>
1. A
2. B
2.1. C
</list>
</block>";
    let doc = parse(input);
    let json = to_json(&doc).unwrap();
    assert_eq!(from_json(&json).unwrap(), doc);
}

#[test]
fn test_decode_ignores_field_order() {
    let doc = from_json(r#"{"body":["x"],"head":"H","kind":"block"}"#).unwrap();
    assert_eq!(doc, Block::new().with_head("H").with_node(Node::text("x")));
}

#[test]
fn test_decode_builds_all_node_kinds() {
    let doc = from_json(
        r#"{"kind":"block","body":[
            "text",
            {"kind":"block","number":"1.","head":"N"},
            {"kind":"list","items":[{"kind":"block","number":"•"}]},
            {"kind":"dict","items":{"k":"v"}}
        ]}"#,
    )
    .unwrap();

    let expected = Block::new()
        .with_node(Node::text("text"))
        .with_node(Block::item("1.", Some("N".to_string())))
        .with_node(List::new().with_item(Block::item("•", None)))
        .with_node(Dict::new().with_entry("k", "v"));
    assert_eq!(doc, expected);
}

#[test]
fn test_decode_rejects_missing_kind() {
    let err = from_json(r#"{"head":"H"}"#).unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "{:?}", err);
}

#[test]
fn test_decode_rejects_unknown_kind() {
    assert!(matches!(
        from_json(r#"{"kind":"table"}"#),
        Err(Error::Decode(_))
    ));
}

#[test]
fn test_decode_rejects_non_block_root() {
    assert!(from_json(r#""just text""#).is_err());
    assert!(from_json(r#"{"kind":"list","items":[]}"#).is_err());
    assert!(from_json(r#"{"kind":"dict","items":{}}"#).is_err());
}

#[test]
fn test_decode_rejects_list_without_items() {
    assert!(matches!(
        from_json(r#"{"kind":"block","body":[{"kind":"list"}]}"#),
        Err(Error::Decode(_))
    ));
}

#[test]
fn test_decode_rejects_non_string_dict_value() {
    assert!(matches!(
        from_json(r#"{"kind":"block","body":[{"kind":"dict","items":{"k":1}}]}"#),
        Err(Error::Decode(_))
    ));
}

#[test]
fn test_decode_rejects_non_object_node() {
    assert!(matches!(
        from_json(r#"{"kind":"block","body":[42]}"#),
        Err(Error::Decode(_))
    ));
}

#[test]
fn test_decode_rejects_malformed_json() {
    let err = from_json("{not json").unwrap_err();
    assert!(err.to_string().starts_with("decode error"));
}

#[test]
fn test_decode_rejects_trailing_characters() {
    assert!(matches!(
        from_json(r#"{"kind":"block"} {"kind":"block"}"#),
        Err(Error::Decode(_))
    ));
}

// ============================================================================
// Deep Documents
// ============================================================================

#[test]
fn test_round_trip_blocks_at_default_max_depth() {
    let input = format!("{}x", "<block>\n".repeat(DEFAULT_MAX_DEPTH));
    let doc = parse(&input);
    let json = to_json(&doc).unwrap();
    assert_eq!(from_json(&json).unwrap(), doc);
}

#[test]
fn test_round_trip_deeply_nested_lists() {
    let input = "<list>\n1. a\n".repeat(DEFAULT_MAX_DEPTH / 2);
    let doc = parse(&input);
    let json = to_json(&doc).unwrap();
    assert_eq!(from_json(&json).unwrap(), doc);
}

#[test]
fn test_round_trip_deep_built_tree() {
    let mut block = Block::new().with_node(Node::text("leaf"));
    for _ in 0..500 {
        block = Block::new().with_node(Node::Block(block));
    }
    let json = to_json(&block).unwrap();
    assert_eq!(from_json(&json).unwrap(), block);
}
