//! Common types and utilities for proto2ts
//!
//! This crate contains the data structures shared by the lexer, parser,
//! generator and CLI: source positions, tokens, the AST node model,
//! diagnostics, and project configuration.

pub mod ast;
mod config;
mod diagnostics;
mod position;
mod token;

pub use config::{ImportMapping, ProjectConfig};
pub use diagnostics::{LexicalError, SyntaxError};
pub use position::Position;
pub use token::{Token, TokenKind};

use thiserror::Error;

/// Errors that can occur outside the compile pipeline itself
#[derive(Error, Debug)]
pub enum Proto2TsError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for proto2ts operations
pub type Result<T> = std::result::Result<T, Proto2TsError>;
