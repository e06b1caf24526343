//! Service and rpc declarations

use super::Parser;
use proto2ts_common::ast::{Identifier, Rpc, Service};
use proto2ts_common::TokenKind;

impl Parser {
    /// `service Name { rpc ...; }`
    pub(super) fn parse_service(&mut self) -> Option<Service> {
        let start = self.advance().position;
        let name = self.expect_name("service name")?;
        let mut service = Service {
            name,
            methods: Vec::new(),
            options: Vec::new(),
            position: start,
        };

        if self
            .expect(TokenKind::LBrace, "Expected '{' after service name")
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
                        let msg = format!("Expected '}}' to close service '{}'", service.name.name);
                        self.error_here(&msg, &[TokenKind::RBrace]);
                        break;
                    }
                    TokenKind::Semicolon => {
                        self.advance();
                    }
                    TokenKind::Option => service.options.extend(self.parse_option_statement()),
                    TokenKind::Rpc => service.methods.extend(self.parse_rpc()),
                    _ => {
                        self.error_here(
                            "Unexpected token in service body",
                            &[TokenKind::Rpc, TokenKind::Option, TokenKind::RBrace],
                        );
                        self.skip_token();
                    }
                }

                if self.pos == before {
                    self.skip_token();
                }
            }
        }

        service.position = self.span_from(start);
        Some(service)
    }

    /// `rpc Name (Request) returns (Response);` with optional `stream`
    /// markers and an optional `{ option ...; }` body
    fn parse_rpc(&mut self) -> Option<Rpc> {
        let start = self.advance().position;
        let name = self.expect_name("rpc name")?;

        let (request_stream, request_type) = self.parse_rpc_message_type("request")?;
        self.expect(TokenKind::Returns, "Expected 'returns' after rpc request type")?;
        let (response_stream, response_type) = self.parse_rpc_message_type("response")?;

        let mut options = Vec::new();
        if self.eat(TokenKind::LBrace).is_some() {
            loop {
                let before = self.pos;

                match self.current().kind {
                    TokenKind::RBrace => {
                        self.advance();
                        break;
                    }
                    TokenKind::Eof => {
                        let msg = format!("Expected '}}' to close rpc '{}'", name.name);
                        self.error_here(&msg, &[TokenKind::RBrace]);
                        break;
                    }
                    TokenKind::Semicolon => {
                        self.advance();
                    }
                    TokenKind::Option => options.extend(self.parse_option_statement()),
                    _ => {
                        self.error_here(
                            "Unexpected token in rpc body",
                            &[TokenKind::Option, TokenKind::RBrace],
                        );
                        self.skip_token();
                    }
                }

                if self.pos == before {
                    self.skip_token();
                }
            }
        } else {
            self.expect(TokenKind::Semicolon, "Expected ';' or '{' after rpc declaration");
        }

        Some(Rpc {
            name,
            request_type,
            request_stream,
            response_type,
            response_stream,
            options,
            position: self.span_from(start),
        })
    }

    /// `( [stream] Type )`
    fn parse_rpc_message_type(&mut self, what: &str) -> Option<(bool, Identifier)> {
        self.expect(
            TokenKind::LParen,
            &format!("Expected '(' before rpc {} type", what),
        )?;
        let stream = self.at(TokenKind::Stream)
            && (self.peek(1).kind.is_name() || self.peek(1).kind == TokenKind::Dot);
        if stream {
            self.advance();
        }
        let message_type =
            self.parse_qualified_identifier(&format!("rpc {} type", what), true)?;
        self.expect(
            TokenKind::RParen,
            &format!("Expected ')' after rpc {} type", what),
        )?;
        Some((stream, message_type))
    }
}
