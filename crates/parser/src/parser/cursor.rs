//! Token cursor: lookahead, consumption and error reporting helpers.
//!
//! The cursor always rests on a non-comment token. Comments stay in the
//! token vector but are stepped over by every helper here.

use super::Parser;
use proto2ts_common::ast::{Identifier, NumberLiteral, StringLiteral};
use proto2ts_common::{Position, SyntaxError, Token, TokenKind};

impl Parser {
    /// The current non-comment token
    pub(super) fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// The `n`th non-comment token from the cursor; `peek(0)` is the current
    /// token. Past the end this is the end-of-file token.
    pub(super) fn peek(&self, n: usize) -> &Token {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .nth(n)
            .unwrap_or_else(|| self.eof_token())
    }

    fn eof_token(&self) -> &Token {
        // `Parser::new` guarantees a trailing end-of-file token
        &self.tokens[self.tokens.len() - 1]
    }

    pub(super) fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    pub(super) fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Steps over comment tokens so the cursor rests on real input.
    pub(super) fn skip_comments(&mut self) {
        while self.pos + 1 < self.tokens.len() && self.tokens[self.pos].kind == TokenKind::Comment
        {
            self.pos += 1;
        }
    }

    /// Consumes and returns the current token. At end of input the cursor
    /// stays on the end-of-file token.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.last_end = token.position.end;
            self.pos += 1;
            self.skip_comments();
        }
        token
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consumes a token of `kind`, or records `message` and leaves the
    /// cursor where it is.
    pub(super) fn expect(&mut self, kind: TokenKind, message: &str) -> Option<Token> {
        if self.at(kind) {
            return Some(self.advance());
        }
        self.error_here(message, &[kind]);
        None
    }

    /// Consumes an identifier, accepting keywords used as names.
    pub(super) fn expect_name(&mut self, what: &str) -> Option<Identifier> {
        if self.current().kind.is_name() {
            let token = self.advance();
            return Some(Identifier {
                name: token.value,
                position: token.position,
            });
        }
        self.error_here(&format!("Expected {}", what), &[TokenKind::Identifier]);
        None
    }

    /// Description of the current token for diagnostics
    pub(super) fn found(&self) -> String {
        let token = self.current();
        match token.kind {
            TokenKind::Identifier | TokenKind::NumberLiteral => {
                format!("{} '{}'", token.kind, token.value)
            }
            TokenKind::StringLiteral => format!("string literal {:?}", token.value),
            kind => kind.to_string(),
        }
    }

    /// Records an error at the current token; `message` is completed with
    /// what was found instead.
    pub(super) fn error_here(&mut self, message: &str, expected: &[TokenKind]) {
        let message = format!("{}, found {}", message, self.found());
        let position = self.current().position;
        self.errors
            .push(SyntaxError::new(message, position).expected(expected));
    }

    pub(super) fn error_at(&mut self, message: String, position: Position) {
        self.errors.push(SyntaxError::new(message, position));
    }

    /// Skips exactly one token during error recovery.
    pub(super) fn skip_token(&mut self) {
        let token = self.advance();
        log::trace!(
            "recovery: skipped {} '{}' at {}",
            token.kind,
            token.value,
            token.position
        );
    }

    /// Span from `start` through the last consumed token
    pub(super) fn span_from(&self, start: Position) -> Position {
        Position {
            end: self.last_end.max(start.end),
            ..start
        }
    }
}

pub(super) fn string_literal(token: Token) -> StringLiteral {
    StringLiteral {
        value: token.value,
        position: token.position,
    }
}

pub(super) fn number_literal(token: Token) -> NumberLiteral {
    NumberLiteral {
        value: token.value.parse().unwrap_or(f64::NAN),
        raw: token.value,
        position: token.position,
    }
}

pub(super) fn keyword_identifier(token: Token) -> Identifier {
    Identifier {
        name: token.value.to_ascii_lowercase(),
        position: token.position,
    }
}
