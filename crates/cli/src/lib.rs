//! proto2ts: compile Protocol Buffers definitions into TypeScript declarations
//!
//! [`compile`] runs the whole pipeline (tokenize, parse, generate) over one
//! source text and returns either the generated code or the diagnostics that
//! stopped it. It does no I/O; the `proto2ts` binary adds file handling,
//! project configuration and diagnostic rendering on top.
//!
//! ```rust
//! use proto2ts::{compile, CompileOptions};
//!
//! let output = compile("message Ping { string id = 1; }", &CompileOptions::default());
//! assert!(output.errors.is_empty());
//! assert_eq!(output.code, "export interface Ping {\n  id: string;\n}\n");
//! ```

pub mod report;

pub use proto2ts_common::{LexicalError, Position, ProjectConfig, SyntaxError, TokenKind};
pub use proto2ts_generator::PathResolver;

use proto2ts_common::ast::File;
use proto2ts_generator::{generate, GeneratorOptions};
use proto2ts_parser::{parse, tokenize};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Options accepted by [`compile`]
#[derive(Clone)]
pub struct CompileOptions {
    /// Spaces per nesting level in generated code
    pub indent_size: usize,
    /// Maps import paths to the module specifiers emitted for them
    pub path_resolver: PathResolver,
}

impl CompileOptions {
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

    /// Options described by a project config: its indent size when set, and
    /// [`ProjectConfig::resolve_import`] for import paths
    pub fn from_config(config: &ProjectConfig) -> Self {
        let defaults = Self::default();
        let resolver = config.clone();
        Self {
            indent_size: config.indent_size.unwrap_or(defaults.indent_size),
            path_resolver: Arc::new(move |path: &str| resolver.resolve_import(path)),
        }
    }

    fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            indent_size: self.indent_size,
            path_resolver: Arc::clone(&self.path_resolver),
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        let generator = GeneratorOptions::default();
        Self {
            indent_size: generator.indent_size,
            path_resolver: generator.path_resolver,
        }
    }
}

impl fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("indent_size", &self.indent_size)
            .finish_non_exhaustive()
    }
}

/// One lexical or syntax error, positioned against the compiled source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub position: Position,
    /// Token kinds that would have been accepted, when the parser knows
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expected: Vec<TokenKind>,
}

impl From<&LexicalError> for Diagnostic {
    fn from(error: &LexicalError) -> Self {
        Self {
            message: error.message.clone(),
            position: error.position(),
            expected: Vec::new(),
        }
    }
}

impl From<&SyntaxError> for Diagnostic {
    fn from(error: &SyntaxError) -> Self {
        Self {
            message: error.message.clone(),
            position: error.position,
            expected: error.expected.clone(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}

/// Result of [`compile`]: generated code, or the errors that prevented it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileOutput {
    pub code: String,
    pub errors: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn failed(errors: Vec<Diagnostic>) -> Self {
        Self {
            code: String::new(),
            errors,
        }
    }
}

/// Compile protobuf source text to TypeScript declarations.
///
/// Lexical errors stop the pipeline before parsing and are the only errors
/// returned. Otherwise every syntax error the parser recovered from is
/// returned and nothing is generated. Code is produced only for a file with
/// no errors at all.
pub fn compile(input: &str, options: &CompileOptions) -> CompileOutput {
    match parse_source(input) {
        Ok(file) => CompileOutput {
            code: generate(&file, &options.generator_options()),
            errors: Vec::new(),
        },
        Err(errors) => CompileOutput::failed(errors),
    }
}

/// Tokenize and parse `input`, returning the AST only when both stages were
/// clean.
pub fn parse_source(input: &str) -> Result<File, Vec<Diagnostic>> {
    let lexed = tokenize(input);
    if !lexed.errors.is_empty() {
        log::debug!("{} lexical errors, skipping parse", lexed.errors.len());
        return Err(lexed.errors.iter().map(Diagnostic::from).collect());
    }

    let parsed = parse(lexed.tokens);
    if !parsed.errors.is_empty() {
        return Err(parsed.errors.iter().map(Diagnostic::from).collect());
    }

    Ok(parsed.file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_diagnostic_spans_one_byte() {
        let error = LexicalError::new("Unknown character: @", 1, 3, 2);
        let diagnostic = Diagnostic::from(&error);
        assert_eq!(diagnostic.position, Position::new(1, 3, 2, 3));
        assert!(diagnostic.expected.is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = ProjectConfig::from_yaml("indent_size: 4\nimport_prefix: \"./\"").unwrap();
        let options = CompileOptions::from_config(&config);
        assert_eq!(options.indent_size, 4);
        assert_eq!((options.path_resolver)("a/b.proto"), "./a/b");

        let options = CompileOptions::from_config(&ProjectConfig::default());
        assert_eq!(options.indent_size, 2);
        assert_eq!((options.path_resolver)("a/b.proto"), "a/b.proto");
    }

    #[test]
    fn test_options_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompileOptions>();
        assert_send_sync::<CompileOutput>();
    }

    #[test]
    fn test_diagnostic_display() {
        let output = compile("message M { string name = ; }", &CompileOptions::default());
        assert_eq!(output.errors[0].to_string(), format!("{} at 1:27", output.errors[0].message));
    }
}
