//! End-to-end tests of the lexer and parser over realistic sources

use proto2ts_common::ast::{NodeKind, NodeRef};
use proto2ts_common::TokenKind;
use proto2ts_parser::{parse, tokenize, ParseResult};

const COMPLETE: &str = r#"
syntax = "proto3";

package acme.store.v1;

import "google/protobuf/timestamp.proto";
import public "acme/common.proto";

option java_package = "com.acme.store";
option (acme.file_tag).label = "store";

// A product on sale
enum Category {
  option allow_alias = true;
  CATEGORY_UNSPECIFIED = 0;
  BOOKS = 1;
  PAPERBACKS = 1 [deprecated = true];
  reserved 10 to 20, "LEGACY";
}

message Product {
  string id = 1;
  optional string title = 2;
  repeated string tags = 3;
  map<string, Price> prices = 4 [json_name = "priceTable"];
  .google.protobuf.Timestamp created_at = 5;

  oneof availability {
    bool in_stock = 6;
    int64 restock_at = 7;
  }

  message Price {
    double amount = 1;
    string currency = 2;
  }

  enum State { DRAFT = 0; LIVE = 1; }

  extend Product {
    string legacy_sku = 1000;
  }

  reserved 8, 9 to 11;
  extensions 1000 to max;
}

extend google.protobuf.MessageOptions {
  optional bool cacheable = 51000;
}

service Store {
  option deprecated = false;
  rpc GetProduct (GetProductRequest) returns (Product);
  rpc Upload (stream Chunk) returns (UploadSummary) {
    option idempotency_level = "IDEMPOTENT";
  }
  rpc Watch (WatchRequest) returns (stream Product);
}
"#;

fn parse_source(source: &str) -> ParseResult {
    let lexed = tokenize(source);
    assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
    parse(lexed.tokens)
}

#[test]
fn test_complete_file() {
    let result = parse_source(COMPLETE);
    assert!(result.is_ok(), "{:?}", result.errors);

    let file = result.file;
    assert_eq!(file.package.as_ref().unwrap().name.name, "acme.store.v1");
    assert_eq!(file.imports.len(), 2);
    assert_eq!(file.options.len(), 2);
    assert_eq!(file.enums[0].values.len(), 3);
    assert_eq!(file.extends.len(), 1);

    let product = &file.messages[0];
    assert_eq!(product.fields.len(), 5);
    assert_eq!(product.oneofs[0].fields.len(), 2);
    assert_eq!(product.messages[0].name.name, "Price");
    assert_eq!(product.enums[0].name.name, "State");
    assert_eq!(product.extends[0].extendee.name, "Product");
    assert_eq!(product.reserved[0].items.len(), 2);
    assert!(product.extensions.is_some());

    let store = &file.services[0];
    let streams: Vec<(bool, bool)> = store
        .methods
        .iter()
        .map(|m| (m.request_stream, m.response_stream))
        .collect();
    assert_eq!(streams, vec![(false, false), (true, false), (false, true)]);
}

#[test]
fn test_children_positions_are_contained() {
    let result = parse_source(COMPLETE);
    let mut visited = 0;

    NodeRef::File(&result.file).walk(&mut |node, parent| {
        visited += 1;
        if let Some(parent) = parent {
            assert!(
                parent.position().contains(&node.position()),
                "{:?} at {:?} escapes {:?} at {:?}",
                node.kind(),
                node.position(),
                parent.kind(),
                parent.position()
            );
        }
    });

    assert!(visited > 50);
}

#[test]
fn test_walk_reaches_every_declaration_kind() {
    let result = parse_source(COMPLETE);
    let mut kinds = std::collections::HashSet::new();
    NodeRef::File(&result.file).walk(&mut |node, _| {
        kinds.insert(node.kind());
    });

    for kind in [
        NodeKind::File,
        NodeKind::Syntax,
        NodeKind::Package,
        NodeKind::Import,
        NodeKind::Option,
        NodeKind::Enum,
        NodeKind::EnumField,
        NodeKind::Message,
        NodeKind::Field,
        NodeKind::FieldType,
        NodeKind::FieldLabel,
        NodeKind::Oneof,
        NodeKind::Extend,
        NodeKind::Reserved,
        NodeKind::Range,
        NodeKind::Extensions,
        NodeKind::Service,
        NodeKind::Rpc,
        NodeKind::Identifier,
        NodeKind::StringLiteral,
        NodeKind::NumberLiteral,
        NodeKind::BooleanLiteral,
    ] {
        assert!(kinds.contains(&kind), "{:?} never visited", kind);
    }
}

#[test]
fn test_malformed_inputs_terminate_with_errors() {
    let inputs = [
        "message",
        "message {",
        "message M { string",
        "message M { string name = }",
        "message M { map<string int32> m = 1; }",
        "enum E { A = ; B }",
        "service S { rpc }",
        "service S { rpc R (A) returns B; }",
        "option = 1;",
        "option x = [;",
        "message M { reserved 1 to ; }",
        "message M { extensions 5, ; }",
        "message M { int32 a = 1 [deprecated = true; }",
        "import ;",
        "syntax = 3;",
        "package ;",
        "} } }",
        "extend { }",
        "message M { oneof o { int32 = 1; } }",
        "= = = message M {}",
    ];

    for input in inputs {
        let lexed = tokenize(input);
        let result = parse(lexed.tokens);
        assert!(!result.errors.is_empty(), "no errors for {:?}", input);
    }
}

#[test]
fn test_error_positions_lie_within_source() {
    let source = "message M {\n  string name = ;\n  int32 = 2;\n}\nservice S { rpc R ) }";
    let result = parse_source(source);

    assert!(result.errors.len() >= 3, "{:?}", result.errors);
    for error in &result.errors {
        assert!(error.position.end <= source.len());
        assert!(error.position.line >= 1 && error.position.column >= 1);
    }
    assert_eq!(result.errors[0].position.line, 2);
    assert_eq!(result.errors[0].expected, vec![TokenKind::NumberLiteral]);
}

#[test]
fn test_keywords_are_case_insensitive() {
    let result = parse_source("MESSAGE Upper { STRING value = 1; }");
    assert!(result.is_ok(), "{:?}", result.errors);
    let message = &result.file.messages[0];
    assert_eq!(message.name.name, "Upper");
    // type names keep their source spelling
    assert_eq!(message.fields[0].field_type.name.name, "STRING");
}

#[test]
fn test_ast_serializes_to_json() {
    let result = parse_source("message M { reserved 1 to max; }");
    let json = serde_json::to_value(&result.file).unwrap();
    let item = &json["messages"][0]["reserved"][0]["items"][0];
    assert_eq!(item["kind"], "Range");
    assert_eq!(item["end"]["kind"], "Max");
}
