//! Type mapping from protobuf field types to TypeScript types

use proto2ts_common::ast::{Field, FieldType, Label};

/// Maps protobuf type names to TypeScript type expressions
pub struct TypeMapper;

impl TypeMapper {
    /// TypeScript type for a scalar keyword, or `None` for any other name
    ///
    /// # Examples
    /// ```
    /// use proto2ts_generator::TypeMapper;
    ///
    /// assert_eq!(TypeMapper::scalar("sfixed64"), Some("number"));
    /// assert_eq!(TypeMapper::scalar("bytes"), Some("Uint8Array"));
    /// assert_eq!(TypeMapper::scalar("Person"), None);
    /// ```
    pub fn scalar(name: &str) -> Option<&'static str> {
        match name {
            "double" | "float" | "int32" | "int64" | "uint32" | "uint64" | "sint32"
            | "sint64" | "fixed32" | "fixed64" | "sfixed32" | "sfixed64" => Some("number"),
            "bool" => Some("boolean"),
            "string" => Some("string"),
            "bytes" => Some("Uint8Array"),
            _ => None,
        }
    }

    /// Map a field type, resolving `map<K, V>` arguments recursively
    pub fn map_type(field_type: &FieldType) -> String {
        let name = field_type.name.name.as_str();

        if name == "map" {
            return match field_type.arguments.as_slice() {
                [key, value] => {
                    format!("Record<{}, {}>", Self::map_type(key), Self::map_type(value))
                }
                _ => "Record<string, unknown>".to_string(),
            };
        }

        match Self::scalar(name) {
            Some(ts) => ts.to_string(),
            None => Self::reference(name),
        }
    }

    /// A user-defined type name as written, without the leading dot of a
    /// fully qualified name
    pub fn reference(name: &str) -> String {
        name.strip_prefix('.').unwrap_or(name).to_string()
    }

    /// `name?: Type[];` member line for a field. `force_optional` is set for
    /// oneof members, which are never all present at once.
    pub fn member(field: &Field, force_optional: bool) -> String {
        let label = field.label();
        let optional = force_optional || label == Some(Label::Optional);
        let array = if label == Some(Label::Repeated) { "[]" } else { "" };

        format!(
            "{}{}: {}{};",
            field.name.name,
            if optional { "?" } else { "" },
            Self::map_type(&field.field_type),
            array
        )
    }
}
