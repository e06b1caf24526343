//! Export of a parsed file as `google.protobuf` descriptor messages
//!
//! Type names are copied as written: nothing is resolved across scopes or
//! files, so non-scalar fields carry a `type_name` but no `type`.

use crate::grammar::is_scalar;
use prost::Message as _;
use prost_types::descriptor_proto::{ExtensionRange as DescriptorExtensionRange, ReservedRange};
use prost_types::enum_descriptor_proto::EnumReservedRange;
use prost_types::field_descriptor_proto::{Label as DescriptorLabel, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldOptions, FileDescriptorProto, FileDescriptorSet, MessageOptions, MethodDescriptorProto,
    OneofDescriptorProto, ServiceDescriptorProto,
};
use proto2ts_common::ast::{
    Constant, Enum, Extend, ExtensionRange, Field, File, ImportModifier, Label, Message,
    NumberLiteral, RangeEnd, ReservedItem, Service,
};

/// Exclusive upper bound of field numbers, used for `max`
pub const FIELD_NUMBER_LIMIT: i32 = 536_870_912;

/// Build the descriptor of `file`, registered under `name`
/// (e.g. `"example/person.proto"`).
pub fn to_file_descriptor(file: &File, name: &str) -> FileDescriptorProto {
    let mut descriptor = FileDescriptorProto {
        name: Some(name.to_string()),
        package: file.package.as_ref().map(|p| p.name.name.clone()),
        syntax: file.syntax.as_ref().map(|s| s.version.value.clone()),
        ..Default::default()
    };

    for (index, import) in file.imports.iter().enumerate() {
        descriptor.dependency.push(import.path.value.clone());
        let index = index as i32;
        match import.modifier {
            Some(ImportModifier::Public) => descriptor.public_dependency.push(index),
            Some(ImportModifier::Weak) => descriptor.weak_dependency.push(index),
            None => {}
        }
    }

    descriptor.enum_type = file.enums.iter().map(enum_descriptor).collect();
    let proto3 = file
        .syntax
        .as_ref()
        .is_some_and(|s| s.version.value == "proto3");
    descriptor.message_type = file
        .messages
        .iter()
        .map(|message| message_descriptor(message, proto3))
        .collect();
    descriptor.service = file.services.iter().map(service_descriptor).collect();
    descriptor.extension = file.extends.iter().flat_map(extension_fields).collect();

    log::debug!(
        "built descriptor for {}: {} messages, {} enums, {} services",
        name,
        descriptor.message_type.len(),
        descriptor.enum_type.len(),
        descriptor.service.len()
    );

    descriptor
}

/// A set holding the single descriptor of `file`
pub fn to_file_descriptor_set(file: &File, name: &str) -> FileDescriptorSet {
    FileDescriptorSet {
        file: vec![to_file_descriptor(file, name)],
    }
}

/// Binary protobuf encoding of [`to_file_descriptor_set`]
pub fn encode_descriptor_set(file: &File, name: &str) -> Vec<u8> {
    to_file_descriptor_set(file, name).encode_to_vec()
}

fn message_descriptor(message: &Message, proto3: bool) -> DescriptorProto {
    let mut descriptor = DescriptorProto {
        name: Some(message.name.name.clone()),
        ..Default::default()
    };

    // proto3 `optional` fields each get a synthetic oneof, placed after the
    // declared ones
    let mut synthetic = Vec::new();
    for field in &message.fields {
        let (mut field_descriptor, entry) = field_descriptor(field, None);
        if proto3 && field.label() == Some(Label::Optional) {
            field_descriptor.proto3_optional = Some(true);
            field_descriptor.oneof_index = Some((message.oneofs.len() + synthetic.len()) as i32);
            synthetic.push(synthetic_oneof_name(message, &field.name.name));
        }
        descriptor.field.push(field_descriptor);
        descriptor.nested_type.extend(entry);
    }

    for (index, oneof) in message.oneofs.iter().enumerate() {
        descriptor.oneof_decl.push(OneofDescriptorProto {
            name: Some(oneof.name.name.clone()),
            options: None,
        });
        for field in &oneof.fields {
            let (field_descriptor, entry) = field_descriptor(field, Some(index as i32));
            descriptor.field.push(field_descriptor);
            descriptor.nested_type.extend(entry);
        }
    }

    descriptor
        .oneof_decl
        .extend(synthetic.into_iter().map(|name| OneofDescriptorProto {
            name: Some(name),
            options: None,
        }));

    descriptor.nested_type.extend(
        message
            .messages
            .iter()
            .map(|nested| message_descriptor(nested, proto3)),
    );
    descriptor.enum_type = message.enums.iter().map(enum_descriptor).collect();
    descriptor.extension = message.extends.iter().flat_map(extension_fields).collect();

    for reserved in &message.reserved {
        for item in &reserved.items {
            match item {
                ReservedItem::Name(name) => descriptor.reserved_name.push(name.value.clone()),
                ReservedItem::Number(n) => {
                    let start = to_i32(n);
                    descriptor.reserved_range.push(ReservedRange {
                        start: Some(start),
                        end: Some(start.saturating_add(1)),
                    });
                }
                ReservedItem::Range(range) => descriptor.reserved_range.push(ReservedRange {
                    start: Some(to_i32(&range.start)),
                    end: Some(exclusive_end(&range.end)),
                }),
            }
        }
    }

    if let Some(extensions) = &message.extensions {
        for range in &extensions.ranges {
            let (start, end) = match range {
                ExtensionRange::Number(n) => {
                    let start = to_i32(n);
                    (start, start.saturating_add(1))
                }
                ExtensionRange::Range(range) => (to_i32(&range.start), exclusive_end(&range.end)),
            };
            descriptor.extension_range.push(DescriptorExtensionRange {
                start: Some(start),
                end: Some(end),
                options: None,
            });
        }
    }

    descriptor
}

/// `_<field>`, prefixed with `X` until it clashes with no declared oneof
fn synthetic_oneof_name(message: &Message, field: &str) -> String {
    let mut name = format!("_{}", field);
    while message.oneofs.iter().any(|o| o.name.name == name) {
        name.insert(0, 'X');
    }
    name
}

/// The field descriptor plus, for map fields, the synthetic entry message
fn field_descriptor(
    field: &Field,
    oneof_index: Option<i32>,
) -> (FieldDescriptorProto, Option<DescriptorProto>) {
    let mut descriptor = FieldDescriptorProto {
        name: Some(field.name.name.clone()),
        number: Some(to_i32(&field.number)),
        oneof_index,
        options: field_options(field),
        json_name: string_option(field, "json_name"),
        default_value: field.option("default").map(constant_text),
        ..Default::default()
    };

    let label = match field.label() {
        Some(Label::Repeated) => DescriptorLabel::Repeated,
        Some(Label::Required) => DescriptorLabel::Required,
        Some(Label::Optional) | None => DescriptorLabel::Optional,
    };
    descriptor.label = Some(label as i32);

    if field.field_type.is_map() {
        let entry = map_entry(field);
        descriptor.label = Some(DescriptorLabel::Repeated as i32);
        descriptor.r#type = Some(Type::Message as i32);
        descriptor.type_name = entry.name.clone();
        return (descriptor, Some(entry));
    }

    set_type(&mut descriptor, &field.field_type.name.name);
    (descriptor, None)
}

/// `map<K, V> counts = 1;` becomes a nested `CountsEntry { K key = 1; V value = 2; }`
fn map_entry(field: &Field) -> DescriptorProto {
    let mut fields = Vec::new();
    for (number, (name, argument)) in ["key", "value"]
        .iter()
        .zip(&field.field_type.arguments)
        .enumerate()
    {
        let mut entry_field = FieldDescriptorProto {
            name: Some(name.to_string()),
            number: Some(number as i32 + 1),
            label: Some(DescriptorLabel::Optional as i32),
            ..Default::default()
        };
        set_type(&mut entry_field, &argument.name.name);
        fields.push(entry_field);
    }

    DescriptorProto {
        name: Some(format!("{}Entry", pascal_case(&field.name.name))),
        field: fields,
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn set_type(descriptor: &mut FieldDescriptorProto, type_name: &str) {
    match scalar_type(type_name) {
        Some(scalar) => descriptor.r#type = Some(scalar as i32),
        None => descriptor.type_name = Some(type_name.to_string()),
    }
}

fn scalar_type(name: &str) -> Option<Type> {
    if !is_scalar(name) {
        return None;
    }
    Some(match name {
        "double" => Type::Double,
        "float" => Type::Float,
        "int32" => Type::Int32,
        "int64" => Type::Int64,
        "uint32" => Type::Uint32,
        "uint64" => Type::Uint64,
        "sint32" => Type::Sint32,
        "sint64" => Type::Sint64,
        "fixed32" => Type::Fixed32,
        "fixed64" => Type::Fixed64,
        "sfixed32" => Type::Sfixed32,
        "sfixed64" => Type::Sfixed64,
        "bool" => Type::Bool,
        "string" => Type::String,
        "bytes" => Type::Bytes,
        _ => return None,
    })
}

fn field_options(field: &Field) -> Option<FieldOptions> {
    let deprecated = bool_option(field, "deprecated");
    let packed = bool_option(field, "packed");
    if deprecated.is_none() && packed.is_none() {
        return None;
    }
    Some(FieldOptions {
        deprecated,
        packed,
        ..Default::default()
    })
}

fn bool_option(field: &Field, name: &str) -> Option<bool> {
    match field.option(name) {
        Some(Constant::Boolean(b)) => Some(b.value),
        _ => None,
    }
}

fn string_option(field: &Field, name: &str) -> Option<String> {
    match field.option(name) {
        Some(Constant::String(s)) => Some(s.value.clone()),
        _ => None,
    }
}

/// Text form of a default value, as `FieldDescriptorProto.default_value` holds it
fn constant_text(constant: &Constant) -> String {
    match constant {
        Constant::String(s) => s.value.clone(),
        Constant::Number(n) => n.raw.clone(),
        Constant::Boolean(b) => b.value.to_string(),
    }
}

fn enum_descriptor(decl: &Enum) -> EnumDescriptorProto {
    let mut descriptor = EnumDescriptorProto {
        name: Some(decl.name.name.clone()),
        value: decl
            .values
            .iter()
            .map(|v| EnumValueDescriptorProto {
                name: Some(v.name.name.clone()),
                number: Some(to_i32(&v.value)),
                options: None,
            })
            .collect(),
        ..Default::default()
    };

    // enum reserved ranges are inclusive on both ends
    for reserved in &decl.reserved {
        for item in &reserved.items {
            match item {
                ReservedItem::Name(name) => descriptor.reserved_name.push(name.value.clone()),
                ReservedItem::Number(n) => descriptor.reserved_range.push(EnumReservedRange {
                    start: Some(to_i32(n)),
                    end: Some(to_i32(n)),
                }),
                ReservedItem::Range(range) => {
                    let end = match &range.end {
                        RangeEnd::Number(n) => to_i32(n),
                        RangeEnd::Max(_) => i32::MAX,
                    };
                    descriptor.reserved_range.push(EnumReservedRange {
                        start: Some(to_i32(&range.start)),
                        end: Some(end),
                    });
                }
            }
        }
    }

    descriptor
}

fn service_descriptor(service: &Service) -> ServiceDescriptorProto {
    ServiceDescriptorProto {
        name: Some(service.name.name.clone()),
        method: service
            .methods
            .iter()
            .map(|rpc| MethodDescriptorProto {
                name: Some(rpc.name.name.clone()),
                input_type: Some(rpc.request_type.name.clone()),
                output_type: Some(rpc.response_type.name.clone()),
                client_streaming: Some(rpc.request_stream),
                server_streaming: Some(rpc.response_stream),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn extension_fields(extend: &Extend) -> Vec<FieldDescriptorProto> {
    extend
        .fields
        .iter()
        .map(|field| {
            let (mut descriptor, _) = field_descriptor(field, None);
            descriptor.extendee = Some(extend.extendee.name.clone());
            descriptor
        })
        .collect()
}

fn exclusive_end(end: &RangeEnd) -> i32 {
    match end {
        RangeEnd::Number(n) => to_i32(n).saturating_add(1),
        RangeEnd::Max(_) => FIELD_NUMBER_LIMIT,
    }
}

/// Parsed numbers are checked to be integers; anything outside `i32`
/// saturates.
fn to_i32(n: &NumberLiteral) -> i32 {
    match n.as_integer() {
        Some(value) => value.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        None => 0,
    }
}

/// `tag_counts` -> `TagCounts`
fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, tokenize};
    use prost::Message as _;

    fn descriptor(source: &str) -> FileDescriptorProto {
        let parsed = parse(tokenize(source).tokens);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        to_file_descriptor(&parsed.file, "test.proto")
    }

    #[test]
    fn test_file_header() {
        let fd = descriptor(
            r#"syntax = "proto3";
package acme.v1;
import "a.proto";
import public "b.proto";
import weak "c.proto";"#,
        );
        assert_eq!(fd.name(), "test.proto");
        assert_eq!(fd.package(), "acme.v1");
        assert_eq!(fd.syntax(), "proto3");
        assert_eq!(fd.dependency, vec!["a.proto", "b.proto", "c.proto"]);
        assert_eq!(fd.public_dependency, vec![1]);
        assert_eq!(fd.weak_dependency, vec![2]);
    }

    #[test]
    fn test_scalar_and_message_fields() {
        let fd = descriptor("message M { repeated int64 ids = 1; .acme.Other other = 2; }");
        let fields = &fd.message_type[0].field;

        assert_eq!(fields[0].r#type(), Type::Int64);
        assert_eq!(fields[0].label(), DescriptorLabel::Repeated);
        assert!(fields[0].type_name.is_none());

        assert!(fields[1].r#type.is_none());
        assert_eq!(fields[1].type_name(), ".acme.Other");
        assert_eq!(fields[1].label(), DescriptorLabel::Optional);
    }

    #[test]
    fn test_map_field_gets_entry_message() {
        let fd = descriptor("message M { map<string, Item> tag_counts = 3; }");
        let message = &fd.message_type[0];

        let field = &message.field[0];
        assert_eq!(field.label(), DescriptorLabel::Repeated);
        assert_eq!(field.type_name(), "TagCountsEntry");

        let entry = &message.nested_type[0];
        assert_eq!(entry.name(), "TagCountsEntry");
        assert_eq!(entry.options.as_ref().unwrap().map_entry, Some(true));
        assert_eq!(entry.field[0].name(), "key");
        assert_eq!(entry.field[0].r#type(), Type::String);
        assert_eq!(entry.field[1].number(), 2);
        assert_eq!(entry.field[1].type_name(), "Item");
    }

    #[test]
    fn test_oneof_index() {
        let fd = descriptor("message M { string a = 1; oneof kind { int32 b = 2; bool c = 3; } }");
        let message = &fd.message_type[0];
        assert_eq!(message.oneof_decl[0].name(), "kind");
        assert_eq!(message.field[0].oneof_index, None);
        assert_eq!(message.field[1].oneof_index, Some(0));
        assert_eq!(message.field[2].oneof_index, Some(0));
    }

    #[test]
    fn test_proto3_optional_gets_synthetic_oneof() {
        let fd = descriptor(
            r#"syntax = "proto3";
message M {
  optional int32 a = 1;
  int32 b = 2;
  oneof kind { string c = 3; }
  message N { optional string d = 1; }
}"#,
        );
        let message = &fd.message_type[0];
        let names: Vec<&str> = message.oneof_decl.iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["kind", "_a"]);

        assert_eq!(message.field[0].proto3_optional, Some(true));
        assert_eq!(message.field[0].oneof_index, Some(1));
        assert_eq!(message.field[1].proto3_optional, None);
        assert_eq!(message.field[1].oneof_index, None);
        assert_eq!(message.field[2].oneof_index, Some(0));

        let nested = message.nested_type.iter().find(|m| m.name() == "N").unwrap();
        assert_eq!(nested.field[0].proto3_optional, Some(true));
        assert_eq!(nested.oneof_decl[0].name(), "_d");
    }

    #[test]
    fn test_proto2_optional_has_no_synthetic_oneof() {
        let fd = descriptor(r#"syntax = "proto2"; message M { optional int32 a = 1; }"#);
        let message = &fd.message_type[0];
        assert!(message.oneof_decl.is_empty());
        assert_eq!(message.field[0].proto3_optional, None);
        assert_eq!(message.field[0].label(), DescriptorLabel::Optional);
    }

    #[test]
    fn test_synthetic_oneof_name_avoids_declared_oneofs() {
        let fd = descriptor(
            r#"syntax = "proto3"; message M { optional int32 a = 1; oneof _a { bool b = 2; } }"#,
        );
        let names: Vec<&str> = fd.message_type[0].oneof_decl.iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["_a", "X_a"]);
    }

    #[test]
    fn test_reserved_and_extension_ranges() {
        let fd = descriptor(
            r#"message M {
                 reserved 2, 9 to 11, "old";
                 extensions 100 to max;
               }"#,
        );
        let message = &fd.message_type[0];
        let reserved: Vec<(i32, i32)> = message
            .reserved_range
            .iter()
            .map(|r| (r.start(), r.end()))
            .collect();
        assert_eq!(reserved, vec![(2, 3), (9, 12)]);
        assert_eq!(message.reserved_name, vec!["old"]);
        assert_eq!(message.extension_range[0].start(), 100);
        assert_eq!(message.extension_range[0].end(), FIELD_NUMBER_LIMIT);
    }

    #[test]
    fn test_field_options() {
        let fd = descriptor(
            r#"message M {
                 repeated int32 a = 1 [packed = true, deprecated = true];
                 string b = 2 [json_name = "bee", default = "x"];
               }"#,
        );
        let fields = &fd.message_type[0].field;
        let options = fields[0].options.as_ref().unwrap();
        assert_eq!(options.packed, Some(true));
        assert_eq!(options.deprecated, Some(true));
        assert!(fields[1].options.is_none());
        assert_eq!(fields[1].json_name(), "bee");
        assert_eq!(fields[1].default_value(), "x");
    }

    #[test]
    fn test_enum_and_service() {
        let fd = descriptor(
            "enum E { A = 0; B = -1; reserved 5 to max; }
             service S { rpc Watch (Req) returns (stream Res); }",
        );
        let e = &fd.enum_type[0];
        assert_eq!(e.value[1].number(), -1);
        assert_eq!(e.reserved_range[0].start(), 5);
        assert_eq!(e.reserved_range[0].end(), i32::MAX);

        let method = &fd.service[0].method[0];
        assert_eq!(method.input_type(), "Req");
        assert!(!method.client_streaming());
        assert!(method.server_streaming());
    }

    #[test]
    fn test_extend_becomes_extension() {
        let fd = descriptor(
            "extend google.protobuf.FieldOptions { string label = 50000; }
             message M { extend Other { int32 n = 100; } }",
        );
        assert_eq!(fd.extension[0].extendee(), "google.protobuf.FieldOptions");
        assert_eq!(fd.extension[0].number(), 50000);
        assert_eq!(fd.message_type[0].extension[0].extendee(), "Other");
    }

    #[test]
    fn test_encoding_decodes_back() {
        let parsed = parse(tokenize("message M { string a = 1; }").tokens);
        let bytes = encode_descriptor_set(&parsed.file, "m.proto");
        let set = FileDescriptorSet::decode(bytes.as_slice()).unwrap();
        assert_eq!(set.file.len(), 1);
        assert_eq!(set.file[0].message_type[0].name(), "M");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("tag_counts"), "TagCounts");
        assert_eq!(pascal_case("x"), "X");
    }
}
