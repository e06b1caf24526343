//! TypeScript declaration generation for parsed protobuf files
//!
//! [`generate`] walks a file AST and emits, in order: imports, enums,
//! message interfaces (with a namespace for nested declarations), extend
//! blocks as interface merges, and service interfaces. Generation is a pure
//! function of the AST and [`GeneratorOptions`] and cannot fail.

mod type_mapper;
mod writer;

pub use type_mapper::TypeMapper;

use proto2ts_common::ast::{Enum, Extend, File, Import, ImportModifier, Message, Rpc, Service};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use writer::TsWriter;

/// Maps an import's path, as written, to the module specifier emitted for it
pub type PathResolver = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Generator configuration
#[derive(Clone)]
pub struct GeneratorOptions {
    /// Spaces per nesting level
    pub indent_size: usize,
    pub path_resolver: PathResolver,
}

impl GeneratorOptions {
    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }

    pub fn with_path_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.path_resolver = Arc::new(resolver);
        self
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            indent_size: 2,
            path_resolver: Arc::new(|path: &str| path.to_string()),
        }
    }
}

impl fmt::Debug for GeneratorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorOptions")
            .field("indent_size", &self.indent_size)
            .finish_non_exhaustive()
    }
}

/// Generate TypeScript declarations for `file`.
pub fn generate(file: &File, options: &GeneratorOptions) -> String {
    TypeScriptGenerator::new(options).generate(file)
}

/// Single-use generator; holds the output buffer for one file
pub struct TypeScriptGenerator<'o> {
    options: &'o GeneratorOptions,
    writer: TsWriter,
    aliases: HashSet<String>,
}

impl<'o> TypeScriptGenerator<'o> {
    pub fn new(options: &'o GeneratorOptions) -> Self {
        Self {
            options,
            writer: TsWriter::new(options.indent_size),
            aliases: HashSet::new(),
        }
    }

    pub fn generate(mut self, file: &File) -> String {
        if !file.imports.is_empty() {
            self.writer.begin_declaration();
            for import in &file.imports {
                self.generate_import(import);
            }
        }
        for decl in &file.enums {
            self.generate_enum(decl);
        }
        for message in &file.messages {
            self.generate_message(message);
        }
        for extend in &file.extends {
            self.generate_extend(extend);
        }
        for service in &file.services {
            self.generate_service(service);
        }

        let output = self.writer.finish();
        log::debug!("generated {} bytes of TypeScript", output.len());
        output
    }

    fn generate_import(&mut self, import: &Import) {
        let resolved = (self.options.path_resolver)(&import.path.value);
        let line = match import.modifier {
            Some(ImportModifier::Public) => format!("export * from \"{}\";", resolved),
            Some(ImportModifier::Weak) | None => format!(
                "import type * as {} from \"{}\";",
                self.unique_alias(&import.path.value),
                resolved
            ),
        };
        self.writer.line(&line);
    }

    /// Alias for an import, numbered (`types2`, `types3`) when an earlier
    /// import in this file already took it
    fn unique_alias(&mut self, path: &str) -> String {
        let base = import_alias(path);
        let mut alias = base.clone();
        let mut n = 1;
        while self.aliases.contains(&alias) {
            n += 1;
            alias = format!("{}{}", base, n);
        }
        self.aliases.insert(alias.clone());
        alias
    }

    fn generate_enum(&mut self, decl: &Enum) {
        log::trace!("enum {}", decl.name.name);
        self.writer.begin_declaration();

        let header = format!("export enum {}", decl.name.name);
        if decl.values.is_empty() {
            self.writer.line(&format!("{} {{}}", header));
            return;
        }

        self.writer.open(&header);
        for value in &decl.values {
            self.writer
                .line(&format!("{} = {},", value.name.name, value.value.raw));
        }
        self.writer.close();
    }

    fn generate_message(&mut self, message: &Message) {
        log::trace!("message {}", message.name.name);
        self.writer.begin_declaration();

        let header = format!("export interface {}", message.name.name);
        let has_members =
            !message.fields.is_empty() || message.oneofs.iter().any(|o| !o.fields.is_empty());
        if has_members {
            self.writer.open(&header);
            for field in &message.fields {
                self.writer.line(&TypeMapper::member(field, false));
            }
            for field in message.oneofs.iter().flat_map(|o| &o.fields) {
                self.writer.line(&TypeMapper::member(field, true));
            }
            self.writer.close();
        } else {
            self.writer.line(&format!("{} {{}}", header));
        }

        if message.has_nested() {
            self.writer.begin_declaration();
            self.writer
                .open(&format!("export namespace {}", message.name.name));
            for decl in &message.enums {
                self.generate_enum(decl);
            }
            for nested in &message.messages {
                self.generate_message(nested);
            }
            for extend in &message.extends {
                self.generate_extend(extend);
            }
            self.writer.close();
        }
    }

    /// Extensions surface as optional members merged into the extended
    /// interface.
    fn generate_extend(&mut self, extend: &Extend) {
        let name = extendee_name(&extend.extendee.name);
        log::trace!("extend {}", name);
        self.writer.begin_declaration();

        let header = format!("export interface {}", name);
        if extend.fields.is_empty() {
            self.writer.line(&format!("{} {{}}", header));
            return;
        }

        self.writer.open(&header);
        for field in &extend.fields {
            self.writer.line(&TypeMapper::member(field, true));
        }
        self.writer.close();
    }

    fn generate_service(&mut self, service: &Service) {
        log::trace!("service {}", service.name.name);
        self.writer.begin_declaration();

        let header = format!("export interface {}", service.name.name);
        if service.methods.is_empty() {
            self.writer.line(&format!("{} {{}}", header));
            return;
        }

        self.writer.open(&header);
        for rpc in &service.methods {
            self.writer.line(&method_signature(rpc));
        }
        self.writer.close();
    }
}

/// `sayHello(request: HelloRequest): Promise<HelloReply>;`
fn method_signature(rpc: &Rpc) -> String {
    let request = TypeMapper::reference(&rpc.request_type.name);
    let response = TypeMapper::reference(&rpc.response_type.name);

    let request = if rpc.request_stream {
        format!("AsyncIterable<{}>", request)
    } else {
        request
    };
    let response = if rpc.response_stream {
        format!("AsyncIterable<{}>", response)
    } else {
        format!("Promise<{}>", response)
    };

    format!(
        "{}(request: {}): {};",
        lower_first(&rpc.name.name),
        request,
        response
    )
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Last segment of a (possibly qualified) extendee: interface declarations
/// cannot use dotted names.
fn extendee_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Namespace alias for an import: the file stem in snake_case,
/// e.g. `google/type/LatLng.proto` -> `lat_lng`
fn import_alias(path: &str) -> String {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = file_name
        .strip_suffix(".proto")
        .unwrap_or(file_name);

    let mut alias = String::with_capacity(stem.len() + 1);
    let mut prev_lower = false;
    for c in stem.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                alias.push('_');
            }
            alias.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else if c.is_ascii_alphanumeric() {
            alias.push(c);
            prev_lower = true;
        } else {
            alias.push('_');
            prev_lower = false;
        }
    }

    match alias.chars().next() {
        None => "_".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{}", alias),
        Some(_) => alias,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_alias() {
        assert_eq!(import_alias("google/protobuf/timestamp.proto"), "timestamp");
        assert_eq!(import_alias("google/type/LatLng.proto"), "lat_lng");
        assert_eq!(import_alias("v1/user-profile.proto"), "user_profile");
        assert_eq!(import_alias("3d.proto"), "_3d");
        assert_eq!(import_alias(""), "_");
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("SayHello"), "sayHello");
        assert_eq!(lower_first("get"), "get");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn test_extendee_name() {
        assert_eq!(extendee_name("google.protobuf.FieldOptions"), "FieldOptions");
        assert_eq!(extendee_name(".Foo"), "Foo");
        assert_eq!(extendee_name("Foo"), "Foo");
    }

    #[test]
    fn test_options_debug_hides_resolver() {
        let options = GeneratorOptions::default().with_indent_size(4);
        assert_eq!(
            format!("{:?}", options),
            "GeneratorOptions { indent_size: 4, .. }"
        );
    }
}
