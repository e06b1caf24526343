//! Abstract syntax tree for protobuf source files
//!
//! Every node owns its children outright and records the span of source
//! text it was parsed from. A node's span always contains the spans of its
//! children. [`NodeRef`] gives a uniform, exhaustively matchable view over
//! all node types for walkers that do not care about concrete shapes.

use crate::Position;
use serde::Serialize;

/// The closed set of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Identifier,
    StringLiteral,
    NumberLiteral,
    BooleanLiteral,
    Option,
    Range,
    Reserved,
    Field,
    FieldType,
    FieldLabel,
    Oneof,
    EnumField,
    Enum,
    Extensions,
    Extend,
    Message,
    Rpc,
    Service,
    Import,
    Package,
    Syntax,
    File,
}

/// A plain or dotted name, e.g. `Foo`, `google.protobuf.Any` or `(my.ext).field`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    pub value: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberLiteral {
    pub value: f64,
    /// Source text, kept so integers are never rounded through `f64`
    pub raw: String,
    pub position: Position,
}

impl NumberLiteral {
    /// The literal as an integer, if it has no fractional part
    pub fn as_integer(&self) -> Option<i64> {
        if self.raw.contains('.') {
            return None;
        }
        self.raw.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanLiteral {
    pub value: bool,
    pub position: Position,
}

/// An option or field-option value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Constant {
    String(StringLiteral),
    Number(NumberLiteral),
    Boolean(BooleanLiteral),
}

impl Constant {
    pub fn position(&self) -> Position {
        match self {
            Constant::String(s) => s.position,
            Constant::Number(n) => n.position,
            Constant::Boolean(b) => b.position,
        }
    }
}

/// `option name = value;` or one entry of a `[name = value, ...]` list.
///
/// `value` is `None` when the source held something other than a string,
/// number or boolean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionNode {
    pub name: Identifier,
    pub value: Option<Constant>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum RangeEnd {
    Number(NumberLiteral),
    /// The `max` keyword
    Max(Identifier),
}

/// `start to end`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Range {
    pub start: NumberLiteral,
    pub end: RangeEnd,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ReservedItem {
    Number(NumberLiteral),
    Name(StringLiteral),
    Range(Range),
}

/// `reserved 2, 15, 9 to 11, "foo";`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reserved {
    pub items: Vec<ReservedItem>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ExtensionRange {
    Number(NumberLiteral),
    Range(Range),
}

/// All `extensions ...;` statements of one message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extensions {
    pub ranges: Vec<ExtensionRange>,
    pub options: Vec<OptionNode>,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Optional,
    Required,
    Repeated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldLabel {
    pub label: Label,
    pub position: Position,
}

/// A field's type: a (possibly dotted) name with optional type arguments,
/// as in `map<string, Foo>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldType {
    pub name: Identifier,
    pub arguments: Vec<FieldType>,
    pub position: Position,
}

impl FieldType {
    pub fn is_map(&self) -> bool {
        self.name.name == "map" && !self.arguments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub label: Option<FieldLabel>,
    pub field_type: FieldType,
    pub name: Identifier,
    pub number: NumberLiteral,
    pub options: Vec<OptionNode>,
    pub position: Position,
}

impl Field {
    pub fn label(&self) -> Option<Label> {
        self.label.as_ref().map(|l| l.label)
    }

    /// Look up a field option by plain name, e.g. `deprecated`
    pub fn option(&self, name: &str) -> Option<&Constant> {
        self.options
            .iter()
            .find(|o| o.name.name == name)
            .and_then(|o| o.value.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Oneof {
    pub name: Identifier,
    pub fields: Vec<Field>,
    pub options: Vec<OptionNode>,
    pub position: Position,
}

/// One `NAME = number [options];` entry of an enum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumField {
    pub name: Identifier,
    pub value: NumberLiteral,
    pub options: Vec<OptionNode>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enum {
    pub name: Identifier,
    pub values: Vec<EnumField>,
    pub options: Vec<OptionNode>,
    pub reserved: Vec<Reserved>,
    pub position: Position,
}

/// `extend Foo { ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extend {
    pub extendee: Identifier,
    pub fields: Vec<Field>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub name: Identifier,
    pub fields: Vec<Field>,
    pub oneofs: Vec<Oneof>,
    pub enums: Vec<Enum>,
    pub messages: Vec<Message>,
    pub extends: Vec<Extend>,
    pub reserved: Vec<Reserved>,
    pub extensions: Option<Extensions>,
    pub options: Vec<OptionNode>,
    pub position: Position,
}

impl Message {
    /// Whether the message declares anything that lives in its own scope
    pub fn has_nested(&self) -> bool {
        !self.enums.is_empty() || !self.messages.is_empty() || !self.extends.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rpc {
    pub name: Identifier,
    pub request_type: Identifier,
    pub request_stream: bool,
    pub response_type: Identifier,
    pub response_stream: bool,
    pub options: Vec<OptionNode>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub name: Identifier,
    pub methods: Vec<Rpc>,
    pub options: Vec<OptionNode>,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportModifier {
    Weak,
    Public,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Import {
    pub path: StringLiteral,
    pub modifier: Option<ImportModifier>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    pub name: Identifier,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Syntax {
    pub version: StringLiteral,
    pub position: Position,
}

/// Root of the tree: one parsed `.proto` source
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct File {
    pub syntax: Option<Syntax>,
    pub package: Option<Package>,
    pub imports: Vec<Import>,
    pub options: Vec<OptionNode>,
    pub enums: Vec<Enum>,
    pub messages: Vec<Message>,
    pub services: Vec<Service>,
    pub extends: Vec<Extend>,
    pub position: Position,
}

/// Borrowed view of any node in the tree
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Identifier(&'a Identifier),
    StringLiteral(&'a StringLiteral),
    NumberLiteral(&'a NumberLiteral),
    BooleanLiteral(&'a BooleanLiteral),
    Option(&'a OptionNode),
    Range(&'a Range),
    Reserved(&'a Reserved),
    Field(&'a Field),
    FieldType(&'a FieldType),
    FieldLabel(&'a FieldLabel),
    Oneof(&'a Oneof),
    EnumField(&'a EnumField),
    Enum(&'a Enum),
    Extensions(&'a Extensions),
    Extend(&'a Extend),
    Message(&'a Message),
    Rpc(&'a Rpc),
    Service(&'a Service),
    Import(&'a Import),
    Package(&'a Package),
    Syntax(&'a Syntax),
    File(&'a File),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Identifier(_) => NodeKind::Identifier,
            NodeRef::StringLiteral(_) => NodeKind::StringLiteral,
            NodeRef::NumberLiteral(_) => NodeKind::NumberLiteral,
            NodeRef::BooleanLiteral(_) => NodeKind::BooleanLiteral,
            NodeRef::Option(_) => NodeKind::Option,
            NodeRef::Range(_) => NodeKind::Range,
            NodeRef::Reserved(_) => NodeKind::Reserved,
            NodeRef::Field(_) => NodeKind::Field,
            NodeRef::FieldType(_) => NodeKind::FieldType,
            NodeRef::FieldLabel(_) => NodeKind::FieldLabel,
            NodeRef::Oneof(_) => NodeKind::Oneof,
            NodeRef::EnumField(_) => NodeKind::EnumField,
            NodeRef::Enum(_) => NodeKind::Enum,
            NodeRef::Extensions(_) => NodeKind::Extensions,
            NodeRef::Extend(_) => NodeKind::Extend,
            NodeRef::Message(_) => NodeKind::Message,
            NodeRef::Rpc(_) => NodeKind::Rpc,
            NodeRef::Service(_) => NodeKind::Service,
            NodeRef::Import(_) => NodeKind::Import,
            NodeRef::Package(_) => NodeKind::Package,
            NodeRef::Syntax(_) => NodeKind::Syntax,
            NodeRef::File(_) => NodeKind::File,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            NodeRef::Identifier(n) => n.position,
            NodeRef::StringLiteral(n) => n.position,
            NodeRef::NumberLiteral(n) => n.position,
            NodeRef::BooleanLiteral(n) => n.position,
            NodeRef::Option(n) => n.position,
            NodeRef::Range(n) => n.position,
            NodeRef::Reserved(n) => n.position,
            NodeRef::Field(n) => n.position,
            NodeRef::FieldType(n) => n.position,
            NodeRef::FieldLabel(n) => n.position,
            NodeRef::Oneof(n) => n.position,
            NodeRef::EnumField(n) => n.position,
            NodeRef::Enum(n) => n.position,
            NodeRef::Extensions(n) => n.position,
            NodeRef::Extend(n) => n.position,
            NodeRef::Message(n) => n.position,
            NodeRef::Rpc(n) => n.position,
            NodeRef::Service(n) => n.position,
            NodeRef::Import(n) => n.position,
            NodeRef::Package(n) => n.position,
            NodeRef::Syntax(n) => n.position,
            NodeRef::File(n) => n.position,
        }
    }

    /// Direct children in source order within each category
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match *self {
            NodeRef::Identifier(_)
            | NodeRef::StringLiteral(_)
            | NodeRef::NumberLiteral(_)
            | NodeRef::BooleanLiteral(_)
            | NodeRef::FieldLabel(_) => {}
            NodeRef::Option(n) => {
                out.push(NodeRef::Identifier(&n.name));
                if let Some(value) = &n.value {
                    out.push(constant_ref(value));
                }
            }
            NodeRef::Range(n) => {
                out.push(NodeRef::NumberLiteral(&n.start));
                out.push(range_end_ref(&n.end));
            }
            NodeRef::Reserved(n) => {
                out.extend(n.items.iter().map(|item| match item {
                    ReservedItem::Number(num) => NodeRef::NumberLiteral(num),
                    ReservedItem::Name(s) => NodeRef::StringLiteral(s),
                    ReservedItem::Range(r) => NodeRef::Range(r),
                }));
            }
            NodeRef::Field(n) => {
                if let Some(label) = &n.label {
                    out.push(NodeRef::FieldLabel(label));
                }
                out.push(NodeRef::FieldType(&n.field_type));
                out.push(NodeRef::Identifier(&n.name));
                out.push(NodeRef::NumberLiteral(&n.number));
                out.extend(n.options.iter().map(NodeRef::Option));
            }
            NodeRef::FieldType(n) => {
                out.push(NodeRef::Identifier(&n.name));
                out.extend(n.arguments.iter().map(NodeRef::FieldType));
            }
            NodeRef::Oneof(n) => {
                out.push(NodeRef::Identifier(&n.name));
                out.extend(n.options.iter().map(NodeRef::Option));
                out.extend(n.fields.iter().map(NodeRef::Field));
            }
            NodeRef::EnumField(n) => {
                out.push(NodeRef::Identifier(&n.name));
                out.push(NodeRef::NumberLiteral(&n.value));
                out.extend(n.options.iter().map(NodeRef::Option));
            }
            NodeRef::Enum(n) => {
                out.push(NodeRef::Identifier(&n.name));
                out.extend(n.options.iter().map(NodeRef::Option));
                out.extend(n.values.iter().map(NodeRef::EnumField));
                out.extend(n.reserved.iter().map(NodeRef::Reserved));
            }
            NodeRef::Extensions(n) => {
                out.extend(n.ranges.iter().map(|range| match range {
                    ExtensionRange::Number(num) => NodeRef::NumberLiteral(num),
                    ExtensionRange::Range(r) => NodeRef::Range(r),
                }));
                out.extend(n.options.iter().map(NodeRef::Option));
            }
            NodeRef::Extend(n) => {
                out.push(NodeRef::Identifier(&n.extendee));
                out.extend(n.fields.iter().map(NodeRef::Field));
            }
            NodeRef::Message(n) => {
                out.push(NodeRef::Identifier(&n.name));
                out.extend(n.options.iter().map(NodeRef::Option));
                out.extend(n.fields.iter().map(NodeRef::Field));
                out.extend(n.oneofs.iter().map(NodeRef::Oneof));
                out.extend(n.enums.iter().map(NodeRef::Enum));
                out.extend(n.messages.iter().map(NodeRef::Message));
                out.extend(n.extends.iter().map(NodeRef::Extend));
                out.extend(n.reserved.iter().map(NodeRef::Reserved));
                if let Some(extensions) = &n.extensions {
                    out.push(NodeRef::Extensions(extensions));
                }
            }
            NodeRef::Rpc(n) => {
                out.push(NodeRef::Identifier(&n.name));
                out.push(NodeRef::Identifier(&n.request_type));
                out.push(NodeRef::Identifier(&n.response_type));
                out.extend(n.options.iter().map(NodeRef::Option));
            }
            NodeRef::Service(n) => {
                out.push(NodeRef::Identifier(&n.name));
                out.extend(n.options.iter().map(NodeRef::Option));
                out.extend(n.methods.iter().map(NodeRef::Rpc));
            }
            NodeRef::Import(n) => out.push(NodeRef::StringLiteral(&n.path)),
            NodeRef::Package(n) => out.push(NodeRef::Identifier(&n.name)),
            NodeRef::Syntax(n) => out.push(NodeRef::StringLiteral(&n.version)),
            NodeRef::File(n) => {
                if let Some(syntax) = &n.syntax {
                    out.push(NodeRef::Syntax(syntax));
                }
                if let Some(package) = &n.package {
                    out.push(NodeRef::Package(package));
                }
                out.extend(n.imports.iter().map(NodeRef::Import));
                out.extend(n.options.iter().map(NodeRef::Option));
                out.extend(n.enums.iter().map(NodeRef::Enum));
                out.extend(n.messages.iter().map(NodeRef::Message));
                out.extend(n.services.iter().map(NodeRef::Service));
                out.extend(n.extends.iter().map(NodeRef::Extend));
            }
        }
        out
    }

    /// Depth-first pre-order traversal, `self` first
    pub fn walk(&self, visit: &mut dyn FnMut(NodeRef<'a>, Option<NodeRef<'a>>)) {
        fn go<'n>(
            node: NodeRef<'n>,
            parent: Option<NodeRef<'n>>,
            visit: &mut dyn FnMut(NodeRef<'n>, Option<NodeRef<'n>>),
        ) {
            visit(node, parent);
            for child in node.children() {
                go(child, Some(node), visit);
            }
        }
        go(*self, None, visit);
    }
}

fn constant_ref(value: &Constant) -> NodeRef<'_> {
    match value {
        Constant::String(s) => NodeRef::StringLiteral(s),
        Constant::Number(n) => NodeRef::NumberLiteral(n),
        Constant::Boolean(b) => NodeRef::BooleanLiteral(b),
    }
}

fn range_end_ref(end: &RangeEnd) -> NodeRef<'_> {
    match end {
        RangeEnd::Number(n) => NodeRef::NumberLiteral(n),
        RangeEnd::Max(ident) => NodeRef::Identifier(ident),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(raw: &str, start: usize) -> NumberLiteral {
        NumberLiteral {
            value: raw.parse().unwrap(),
            raw: raw.to_string(),
            position: Position::new(1, start + 1, start, start + raw.len()),
        }
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(number("42", 0).as_integer(), Some(42));
        assert_eq!(number("-7", 0).as_integer(), Some(-7));
        assert_eq!(number("1.5", 0).as_integer(), None);
    }

    #[test]
    fn test_range_children() {
        let range = Range {
            start: number("9", 0),
            end: RangeEnd::Number(number("11", 5)),
            position: Position::new(1, 1, 0, 7),
        };
        let node = NodeRef::Range(&range);
        assert_eq!(node.kind(), NodeKind::Range);
        let kinds: Vec<NodeKind> = node.children().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::NumberLiteral, NodeKind::NumberLiteral]);
    }

    #[test]
    fn test_walk_visits_every_node() {
        let file = File {
            package: Some(Package {
                name: Identifier {
                    name: "example".to_string(),
                    position: Position::new(1, 9, 8, 15),
                },
                position: Position::new(1, 1, 0, 16),
            }),
            position: Position::new(1, 1, 0, 16),
            ..Default::default()
        };

        let mut seen = Vec::new();
        NodeRef::File(&file).walk(&mut |node, parent| {
            seen.push((node.kind(), parent.map(|p| p.kind())));
        });

        assert_eq!(
            seen,
            vec![
                (NodeKind::File, None),
                (NodeKind::Package, Some(NodeKind::File)),
                (NodeKind::Identifier, Some(NodeKind::Package)),
            ]
        );
    }
}
