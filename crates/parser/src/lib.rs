//! Protocol Buffers front end
//!
//! This crate turns `.proto` source text into the AST defined in
//! `proto2ts-common`:
//!
//! - [`tokenize`] scans text into tokens, comments included
//! - [`parse`] builds the file AST from tokens, recovering from errors
//! - [`descriptor`] exports a parsed file as a protobuf `FileDescriptorProto`
//!
//! Both stages report problems as data rather than failing, so a single run
//! surfaces every error it can find.
//!
//! ## Example
//! ```rust
//! use proto2ts_parser::{parse, tokenize};
//!
//! let lexed = tokenize("message Ping { string id = 1; }");
//! assert!(lexed.errors.is_empty());
//!
//! let parsed = parse(lexed.tokens);
//! assert!(parsed.errors.is_empty());
//! assert_eq!(parsed.file.messages[0].name.name, "Ping");
//! ```

pub mod descriptor;
pub mod grammar;
mod lexer;
mod parser;

pub use lexer::{tokenize, LexResult, Lexer};
pub use parser::{parse, ParseResult, Parser};
