//! Enum declarations

use super::cursor::number_literal;
use super::Parser;
use proto2ts_common::ast::{Enum, EnumField};
use proto2ts_common::TokenKind;

impl Parser {
    /// `enum Name { VALUE = 0; ... }`
    pub(super) fn parse_enum(&mut self) -> Option<Enum> {
        let start = self.advance().position;
        let name = self.expect_name("enum name")?;
        let mut decl = Enum {
            name,
            values: Vec::new(),
            options: Vec::new(),
            reserved: Vec::new(),
            position: start,
        };

        if self
            .expect(TokenKind::LBrace, "Expected '{' after enum name")
            .is_some()
        {
            loop {
                let before = self.pos;

                match self.current().kind {
                    TokenKind::RBrace => {
                        self.advance();
                        break;
                    }
                    TokenKind::Eof => {
                        let msg = format!("Expected '}}' to close enum '{}'", decl.name.name);
                        self.error_here(&msg, &[TokenKind::RBrace]);
                        break;
                    }
                    TokenKind::Semicolon => {
                        self.advance();
                    }
                    TokenKind::Option => decl.options.extend(self.parse_option_statement()),
                    TokenKind::Reserved
                        if matches!(
                            self.peek(1).kind,
                            TokenKind::NumberLiteral | TokenKind::StringLiteral
                        ) =>
                    {
                        decl.reserved.push(self.parse_reserved());
                    }
                    _ => decl.values.extend(self.parse_enum_field()),
                }

                if self.pos == before {
                    self.skip_token();
                }
            }
        }

        decl.position = self.span_from(start);
        Some(decl)
    }

    /// `NAME = number [options];`
    fn parse_enum_field(&mut self) -> Option<EnumField> {
        let start = self.current().position;
        let name = self.expect_name("enum value name")?;
        self.expect(TokenKind::Equals, "Expected '=' after enum value name")?;

        if !self.at(TokenKind::NumberLiteral) {
            self.error_here("Expected enum value number", &[TokenKind::NumberLiteral]);
            return None;
        }
        let value = number_literal(self.advance());
        if value.as_integer().is_none() {
            self.error_at(
                format!("Enum value must be an integer, found '{}'", value.raw),
                value.position,
            );
            return None;
        }

        let options = if self.at(TokenKind::LBracket) {
            self.parse_field_options()
        } else {
            Vec::new()
        };
        self.expect(TokenKind::Semicolon, "Expected ';' after enum value");

        Some(EnumField {
            name,
            value,
            options,
            position: self.span_from(start),
        })
    }
}
