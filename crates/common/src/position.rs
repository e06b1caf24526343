//! Source positions

use serde::Serialize;
use std::fmt;

/// A span of source text.
///
/// `line` and `column` are 1-based and describe where the span starts;
/// `column` counts characters. `start` and `end` are byte offsets into the
/// source, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, start: usize, end: usize) -> Self {
        Self {
            line,
            column,
            start,
            end,
        }
    }

    /// Span covering `self` through the end of `other`
    pub fn to(self, other: Position) -> Position {
        Position {
            end: other.end.max(self.end),
            ..self
        }
    }

    /// Whether `other` lies entirely inside this span
    pub fn contains(&self, other: &Position) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
