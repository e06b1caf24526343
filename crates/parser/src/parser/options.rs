//! Option statements, bracketed field options and option values

use super::cursor::{number_literal, string_literal};
use super::Parser;
use proto2ts_common::ast::{BooleanLiteral, Constant, Identifier, OptionNode};
use proto2ts_common::TokenKind;

const OPTION_VALUE: [TokenKind; 4] = [
    TokenKind::StringLiteral,
    TokenKind::NumberLiteral,
    TokenKind::True,
    TokenKind::False,
];

impl Parser {
    /// `option name = value;`
    pub(super) fn parse_option_statement(&mut self) -> Option<OptionNode> {
        self.advance();
        let option = self.parse_option_assignment()?;
        self.expect(TokenKind::Semicolon, "Expected ';' after option");
        Some(option)
    }

    /// `name = value`, shared by option statements and field option lists
    fn parse_option_assignment(&mut self) -> Option<OptionNode> {
        let start = self.current().position;
        let name = self.parse_option_name()?;
        self.expect(TokenKind::Equals, "Expected '=' after option name")?;
        let value = self.parse_option_value();

        Some(OptionNode {
            name,
            value,
            position: self.span_from(start),
        })
    }

    /// `foo.bar` or the extension form `(foo.bar).baz`
    fn parse_option_name(&mut self) -> Option<Identifier> {
        if !self.at(TokenKind::LParen) {
            return self.parse_qualified_identifier("option name", false);
        }

        let start = self.advance().position;
        let extension = self.parse_qualified_identifier("extension name", true)?;
        self.expect(TokenKind::RParen, "Expected ')' after extension name")?;
        let mut name = format!("({})", extension.name);

        while self.at(TokenKind::Dot) {
            self.advance();
            if self.current().kind.is_name() {
                let segment = self.advance();
                name.push('.');
                name.push_str(&segment.value);
            } else {
                self.error_here(
                    "Expected identifier after '.' in option name",
                    &[TokenKind::Identifier],
                );
                break;
            }
        }

        Some(Identifier {
            name,
            position: self.span_from(start),
        })
    }

    /// A string, number or boolean. Anything else is reported and yields no
    /// value; the offending token is skipped unless it ends the option.
    fn parse_option_value(&mut self) -> Option<Constant> {
        match self.current().kind {
            TokenKind::StringLiteral => Some(Constant::String(string_literal(self.advance()))),
            TokenKind::NumberLiteral => Some(Constant::Number(number_literal(self.advance()))),
            TokenKind::True | TokenKind::False => {
                let token = self.advance();
                Some(Constant::Boolean(BooleanLiteral {
                    value: token.kind == TokenKind::True,
                    position: token.position,
                }))
            }
            _ => {
                self.error_here(
                    "Expected option value (string, number or boolean)",
                    &OPTION_VALUE,
                );
                if !matches!(
                    self.current().kind,
                    TokenKind::Semicolon
                        | TokenKind::Comma
                        | TokenKind::RBracket
                        | TokenKind::RBrace
                        | TokenKind::Eof
                ) {
                    self.skip_token();
                }
                None
            }
        }
    }

    /// `[name = value, ...]` after a field or enum value
    pub(super) fn parse_field_options(&mut self) -> Vec<OptionNode> {
        let mut options = Vec::new();
        self.advance();

        loop {
            let before = self.pos;

            match self.current().kind {
                TokenKind::RBracket => {
                    self.advance();
                    break;
                }
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => {
                    self.error_here("Expected ']' to close field options", &[TokenKind::RBracket]);
                    break;
                }
                _ => {
                    options.extend(self.parse_option_assignment());
                    if self.pos == before {
                        // already reported by the assignment
                        self.skip_token();
                        continue;
                    }
                    if self.eat(TokenKind::Comma).is_none()
                        && !matches!(
                            self.current().kind,
                            TokenKind::RBracket
                                | TokenKind::Semicolon
                                | TokenKind::RBrace
                                | TokenKind::Eof
                        )
                    {
                        self.error_here(
                            "Expected ',' or ']' in field options",
                            &[TokenKind::Comma, TokenKind::RBracket],
                        );
                        self.skip_token();
                    }
                }
            }
        }

        options
    }
}
