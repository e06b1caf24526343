//! Descriptor export over a full source file

use prost::Message;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::FileDescriptorSet;
use proto2ts_parser::descriptor::{encode_descriptor_set, to_file_descriptor_set};
use proto2ts_parser::{parse, tokenize};

const STORAGE: &str = r#"
syntax = "proto3";
package storage.v1;

message Bucket {
  string name = 1;
  optional string location = 2;
  map<string, string> labels = 3;
  repeated Object objects = 4;

  message Object {
    string key = 1;
    bytes data = 2;
  }
}

message CreateBucketRequest {
  string project = 1;
  Bucket bucket = 2;
}

service StorageService {
  rpc CreateBucket (CreateBucketRequest) returns (Bucket);
  rpc ListObjects (Bucket) returns (stream Bucket.Object);
}
"#;

fn storage_set() -> FileDescriptorSet {
    let parsed = parse(tokenize(STORAGE).tokens);
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    to_file_descriptor_set(&parsed.file, "storage/v1/storage.proto")
}

#[test]
fn test_encoded_set_decodes_to_same_descriptor() {
    let parsed = parse(tokenize(STORAGE).tokens);
    let bytes = encode_descriptor_set(&parsed.file, "storage/v1/storage.proto");
    assert!(!bytes.is_empty());

    let decoded = FileDescriptorSet::decode(bytes.as_slice()).expect("valid descriptor set");
    assert_eq!(decoded, storage_set());
}

#[test]
fn test_storage_messages() {
    let set = storage_set();
    let file = &set.file[0];
    assert_eq!(file.name(), "storage/v1/storage.proto");
    assert_eq!(file.package(), "storage.v1");

    let names: Vec<&str> = file.message_type.iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["Bucket", "CreateBucketRequest"]);

    let bucket = &file.message_type[0];
    let nested: Vec<&str> = bucket.nested_type.iter().map(|m| m.name()).collect();
    assert_eq!(nested, vec!["LabelsEntry", "Object"]);

    let labels = &bucket.field[2];
    assert_eq!(labels.label(), Label::Repeated);
    assert_eq!(labels.r#type(), Type::Message);
    assert_eq!(labels.type_name(), "LabelsEntry");

    let objects = &bucket.field[3];
    assert_eq!(objects.label(), Label::Repeated);
    assert_eq!(objects.type_name(), "Object");

    let object = &bucket.nested_type[1];
    assert_eq!(object.field[1].r#type(), Type::Bytes);
}

#[test]
fn test_storage_service() {
    let set = storage_set();
    let service = &set.file[0].service[0];
    assert_eq!(service.name(), "StorageService");

    let create = &service.method[0];
    assert_eq!(create.input_type(), "CreateBucketRequest");
    assert_eq!(create.output_type(), "Bucket");
    assert!(!create.server_streaming());

    let list = &service.method[1];
    assert_eq!(list.output_type(), "Bucket.Object");
    assert!(list.server_streaming());
}

#[test]
fn test_explicit_presence_survives_export() {
    let set = storage_set();
    let bucket = &set.file[0].message_type[0];

    let name = &bucket.field[0];
    let location = &bucket.field[1];
    assert_eq!(name.label(), location.label());
    assert_eq!(name.proto3_optional, None);
    assert_eq!(name.oneof_index, None);
    assert!(location.proto3_optional());
    assert_eq!(location.oneof_index, Some(0));

    let oneofs: Vec<&str> = bucket.oneof_decl.iter().map(|o| o.name()).collect();
    assert_eq!(oneofs, vec!["_location"]);
}
