//! Messages and everything that can appear in a message body: fields,
//! oneofs, extend blocks, reserved lists and extension ranges.

use super::cursor::{keyword_identifier, number_literal, string_literal};
use super::Parser;
use proto2ts_common::ast::{
    Extend, ExtensionRange, Extensions, Field, FieldLabel, FieldType, Label, Message,
    NumberLiteral, Oneof, Range, RangeEnd, Reserved, ReservedItem,
};
use proto2ts_common::TokenKind;

impl Parser {
    /// `message Name { ... }`
    pub(super) fn parse_message(&mut self) -> Option<Message> {
        let start = self.advance().position;
        let name = self.expect_name("message name")?;
        let mut message = Message {
            name,
            fields: Vec::new(),
            oneofs: Vec::new(),
            enums: Vec::new(),
            messages: Vec::new(),
            extends: Vec::new(),
            reserved: Vec::new(),
            extensions: None,
            options: Vec::new(),
            position: start,
        };

        if self
            .expect(TokenKind::LBrace, "Expected '{' after message name")
            .is_some()
        {
            self.parse_message_body(&mut message);
        }

        message.position = self.span_from(start);
        Some(message)
    }

    fn parse_message_body(&mut self, message: &mut Message) {
        loop {
            let before = self.pos;

            match self.current().kind {
                TokenKind::RBrace => {
                    self.advance();
                    return;
                }
                TokenKind::Eof => {
                    let msg = format!("Expected '}}' to close message '{}'", message.name.name);
                    self.error_here(&msg, &[TokenKind::RBrace]);
                    return;
                }
                TokenKind::Semicolon => {
                    self.advance();
                }
                TokenKind::Message if self.starts_nested_declaration() => {
                    message.messages.extend(self.parse_message());
                }
                TokenKind::Enum if self.starts_nested_declaration() => {
                    message.enums.extend(self.parse_enum());
                }
                TokenKind::Oneof if self.starts_nested_declaration() => {
                    message.oneofs.extend(self.parse_oneof());
                }
                TokenKind::Extend if self.starts_extend_block() => {
                    message.extends.extend(self.parse_extend());
                }
                TokenKind::Option => {
                    message.options.extend(self.parse_option_statement());
                }
                TokenKind::Extensions if self.peek(1).kind == TokenKind::NumberLiteral => {
                    self.parse_extensions(&mut message.extensions);
                }
                TokenKind::Reserved
                    if matches!(
                        self.peek(1).kind,
                        TokenKind::NumberLiteral | TokenKind::StringLiteral
                    ) =>
                {
                    message.reserved.push(self.parse_reserved());
                }
                _ => {
                    message.fields.extend(self.parse_field());
                }
            }

            if self.pos == before {
                self.skip_token();
            }
        }
    }

    /// `[label] type name = number [options];`
    ///
    /// Returns `None` when the declaration is too malformed to describe a
    /// field; the error has been recorded by then.
    pub(super) fn parse_field(&mut self) -> Option<Field> {
        let start = self.current().position;

        let label = match self.current().kind {
            TokenKind::Optional => Some(Label::Optional),
            TokenKind::Required => Some(Label::Required),
            TokenKind::Repeated => Some(Label::Repeated),
            _ => None,
        }
        .map(|label| FieldLabel {
            label,
            position: self.advance().position,
        });

        let field_type = self.parse_field_type()?;
        let name = self.expect_name("field name")?;
        self.expect(TokenKind::Equals, "Expected '=' after field name")?;
        let number = self.parse_field_number()?;

        let options = if self.at(TokenKind::LBracket) {
            self.parse_field_options()
        } else {
            Vec::new()
        };
        self.expect(TokenKind::Semicolon, "Expected ';' after field declaration");

        Some(Field {
            label,
            field_type,
            name,
            number,
            options,
            position: self.span_from(start),
        })
    }

    /// `map<K, V>` or a (possibly fully qualified) type name
    fn parse_field_type(&mut self) -> Option<FieldType> {
        let start = self.current().position;

        if self.at(TokenKind::Map) && self.peek(1).kind == TokenKind::LAngle {
            let name = keyword_identifier(self.advance());
            self.advance();
            let key = self.parse_field_type()?;
            self.expect(TokenKind::Comma, "Expected ',' between map key and value types")?;
            let value = self.parse_field_type()?;
            self.expect(TokenKind::RAngle, "Expected '>' to close map type")?;

            return Some(FieldType {
                name,
                arguments: vec![key, value],
                position: self.span_from(start),
            });
        }

        let name = self.parse_qualified_identifier("field type", true)?;
        Some(FieldType {
            position: name.position,
            name,
            arguments: Vec::new(),
        })
    }

    fn parse_field_number(&mut self) -> Option<NumberLiteral> {
        if !self.at(TokenKind::NumberLiteral) {
            self.error_here("Expected field number", &[TokenKind::NumberLiteral]);
            return None;
        }

        let number = number_literal(self.advance());
        if number.as_integer().is_none() {
            self.error_at(
                format!("Field number must be an integer, found '{}'", number.raw),
                number.position,
            );
            return None;
        }
        Some(number)
    }

    /// `oneof name { fields }`
    fn parse_oneof(&mut self) -> Option<Oneof> {
        let start = self.advance().position;
        let name = self.expect_name("oneof name")?;
        let mut oneof = Oneof {
            name,
            fields: Vec::new(),
            options: Vec::new(),
            position: start,
        };

        if self
            .expect(TokenKind::LBrace, "Expected '{' after oneof name")
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
                        let msg = format!("Expected '}}' to close oneof '{}'", oneof.name.name);
                        self.error_here(&msg, &[TokenKind::RBrace]);
                        break;
                    }
                    TokenKind::Semicolon => {
                        self.advance();
                    }
                    TokenKind::Option => oneof.options.extend(self.parse_option_statement()),
                    _ => oneof.fields.extend(self.parse_field()),
                }

                if self.pos == before {
                    self.skip_token();
                }
            }
        }

        oneof.position = self.span_from(start);
        Some(oneof)
    }

    /// `extend Extendee { fields }`, at top level or inside a message
    pub(super) fn parse_extend(&mut self) -> Option<Extend> {
        let start = self.advance().position;
        let extendee = self.parse_qualified_identifier("extended type name", true)?;
        let mut extend = Extend {
            extendee,
            fields: Vec::new(),
            position: start,
        };

        if self
            .expect(TokenKind::LBrace, "Expected '{' after extended type name")
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
                        let msg = format!(
                            "Expected '}}' to close extend block for '{}'",
                            extend.extendee.name
                        );
                        self.error_here(&msg, &[TokenKind::RBrace]);
                        break;
                    }
                    TokenKind::Semicolon => {
                        self.advance();
                    }
                    _ => extend.fields.extend(self.parse_field()),
                }

                if self.pos == before {
                    self.skip_token();
                }
            }
        }

        extend.position = self.span_from(start);
        Some(extend)
    }

    /// `reserved 2, 15, 9 to 11, "foo";`, in messages and enums
    pub(super) fn parse_reserved(&mut self) -> Reserved {
        let start = self.advance().position;
        let mut items = Vec::new();
        let mut expecting_item = true;

        loop {
            match self.current().kind {
                TokenKind::Semicolon => {
                    if expecting_item {
                        self.error_here(
                            "Expected field number or name after ',' in reserved list",
                            &[TokenKind::NumberLiteral, TokenKind::StringLiteral],
                        );
                    }
                    self.advance();
                    break;
                }
                TokenKind::RBrace | TokenKind::Eof => {
                    self.error_here("Expected ';' after reserved list", &[TokenKind::Semicolon]);
                    break;
                }
                TokenKind::Comma if !expecting_item => {
                    self.advance();
                    expecting_item = true;
                }
                TokenKind::StringLiteral if expecting_item => {
                    items.push(ReservedItem::Name(string_literal(self.advance())));
                    expecting_item = false;
                }
                TokenKind::NumberLiteral if expecting_item => {
                    items.push(match self.parse_number_or_range() {
                        NumberOrRange::Number(n) => ReservedItem::Number(n),
                        NumberOrRange::Range(r) => ReservedItem::Range(r),
                    });
                    expecting_item = false;
                }
                _ => {
                    if expecting_item {
                        self.error_here(
                            "Expected field number or name in reserved list",
                            &[TokenKind::NumberLiteral, TokenKind::StringLiteral],
                        );
                    } else {
                        self.error_here(
                            "Expected ',' or ';' in reserved list",
                            &[TokenKind::Comma, TokenKind::Semicolon],
                        );
                    }
                    self.skip_token();
                }
            }
        }

        Reserved {
            items,
            position: self.span_from(start),
        }
    }

    /// `extensions 100 to 199, 1000 to max [options];`, merged into the
    /// message's single extension range set
    fn parse_extensions(&mut self, target: &mut Option<Extensions>) {
        let start = self.advance().position;
        let mut ranges = Vec::new();
        let mut options = Vec::new();
        let mut expecting_item = true;

        loop {
            match self.current().kind {
                TokenKind::Semicolon => {
                    if expecting_item {
                        self.error_here(
                            "Expected field number after ',' in extension ranges",
                            &[TokenKind::NumberLiteral],
                        );
                    }
                    self.advance();
                    break;
                }
                TokenKind::RBrace | TokenKind::Eof => {
                    self.error_here("Expected ';' after extension ranges", &[TokenKind::Semicolon]);
                    break;
                }
                TokenKind::Comma if !expecting_item => {
                    self.advance();
                    expecting_item = true;
                }
                TokenKind::LBracket if !expecting_item => {
                    options.extend(self.parse_field_options());
                }
                TokenKind::NumberLiteral if expecting_item => {
                    ranges.push(match self.parse_number_or_range() {
                        NumberOrRange::Number(n) => ExtensionRange::Number(n),
                        NumberOrRange::Range(r) => ExtensionRange::Range(r),
                    });
                    expecting_item = false;
                }
                _ => {
                    if expecting_item {
                        self.error_here(
                            "Expected field number in extension ranges",
                            &[TokenKind::NumberLiteral],
                        );
                    } else {
                        self.error_here(
                            "Expected ',' or ';' in extension ranges",
                            &[TokenKind::Comma, TokenKind::Semicolon],
                        );
                    }
                    self.skip_token();
                }
            }
        }

        let position = self.span_from(start);
        match target {
            Some(existing) => {
                existing.ranges.extend(ranges);
                existing.options.extend(options);
                existing.position = existing.position.to(position);
            }
            None => {
                *target = Some(Extensions {
                    ranges,
                    options,
                    position,
                });
            }
        }
    }

    /// A number, or `number to (number | max)` when the next token is `to`
    fn parse_number_or_range(&mut self) -> NumberOrRange {
        let start = number_literal(self.advance());
        if !self.at(TokenKind::To) {
            return NumberOrRange::Number(start);
        }
        self.advance();

        let end = match self.current().kind {
            TokenKind::NumberLiteral => RangeEnd::Number(number_literal(self.advance())),
            TokenKind::Max => RangeEnd::Max(keyword_identifier(self.advance())),
            _ => {
                self.error_here(
                    "Expected number or 'max' after 'to'",
                    &[TokenKind::NumberLiteral, TokenKind::Max],
                );
                return NumberOrRange::Number(start);
            }
        };

        let position = self.span_from(start.position);
        NumberOrRange::Range(Range {
            start,
            end,
            position,
        })
    }
}

enum NumberOrRange {
    Number(NumberLiteral),
    Range(Range),
}
