//! Error records produced by the lexer and parser

use crate::{Position, TokenKind};
use serde::Serialize;
use thiserror::Error;

/// A problem found while scanning characters into tokens
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message} at {line}:{column}")]
pub struct LexicalError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// Byte offset of the offending character
    pub offset: usize,
}

impl LexicalError {
    pub fn new(message: impl Into<String>, line: usize, column: usize, offset: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            offset,
        }
    }

    /// One-character span at the error offset
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column, self.offset, self.offset + 1)
    }
}

/// A problem found while parsing the token stream
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message} at {position}")]
pub struct SyntaxError {
    pub message: String,
    pub position: Position,
    /// Token kinds that would have been accepted here
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expected: Vec<TokenKind>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
            expected: Vec::new(),
        }
    }

    pub fn expected(mut self, kinds: &[TokenKind]) -> Self {
        self.expected = kinds.to_vec();
        self
    }
}
