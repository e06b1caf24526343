//! Recursive-descent parser for protobuf sources.
//!
//! One method per grammar production. The parser never stops at the first
//! problem: each malformed construct is reported as a [`SyntaxError`] and
//! parsing resumes, either with a best-effort partial node or by skipping
//! one token. Every loop in the parser consumes at least one token per
//! iteration or exits, so parsing terminates on any token stream.

mod cursor;
mod enums;
mod message;
mod options;
mod service;

use cursor::string_literal;
use proto2ts_common::ast::{File, Identifier, Import, ImportModifier, Package, Syntax};
use proto2ts_common::{Position, SyntaxError, Token, TokenKind};

/// Output of [`parse`]
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub file: File,
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a token stream (as produced by [`crate::tokenize`]) into a file AST.
pub fn parse(tokens: Vec<Token>) -> ParseResult {
    Parser::new(tokens).parse_file()
}

pub struct Parser {
    tokens: Vec<Token>,
    /// Index of the current non-comment token
    pos: usize,
    /// Byte offset just past the last consumed token
    last_end: usize,
    errors: Vec<SyntaxError>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let end = tokens.last().map_or(Position::new(1, 1, 0, 0), |t| {
                Position::new(t.position.line, t.position.column, t.position.end, t.position.end)
            });
            tokens.push(Token::new(TokenKind::Eof, "", end));
        }

        let mut parser = Self {
            tokens,
            pos: 0,
            last_end: 0,
            errors: Vec::new(),
        };
        parser.skip_comments();
        parser
    }

    /// Parses the whole token stream.
    pub fn parse_file(mut self) -> ParseResult {
        let mut file = File::default();
        let mut statements = 0usize;

        while !self.at_eof() {
            let before = self.pos;

            match self.current().kind {
                TokenKind::Syntax => {
                    let syntax = self.parse_syntax();
                    if statements == 0 {
                        file.syntax = syntax;
                    } else if let Some(syntax) = syntax {
                        self.error_at(
                            "Syntax declaration must be the first statement".to_string(),
                            syntax.position,
                        );
                    }
                }
                TokenKind::Package => {
                    if let Some(package) = self.parse_package() {
                        if file.package.is_some() {
                            self.error_at(
                                format!("Multiple package declarations ('{}')", package.name.name),
                                package.position,
                            );
                        } else {
                            file.package = Some(package);
                        }
                    }
                }
                TokenKind::Import => file.imports.extend(self.parse_import()),
                TokenKind::Option => file.options.extend(self.parse_option_statement()),
                TokenKind::Enum => file.enums.extend(self.parse_enum()),
                TokenKind::Message => file.messages.extend(self.parse_message()),
                TokenKind::Service => file.services.extend(self.parse_service()),
                TokenKind::Extend => file.extends.extend(self.parse_extend()),
                TokenKind::Semicolon => {
                    self.advance();
                }
                _ => {
                    self.error_here("Unexpected token at top level", &TOP_LEVEL);
                    self.skip_token();
                }
            }

            statements += 1;
            if self.pos == before && !self.at_eof() {
                self.skip_token();
            }
        }

        let end = self.current().position.end;
        file.position = Position::new(1, 1, 0, end);

        log::debug!(
            "parsed {} messages, {} enums, {} services ({} errors)",
            file.messages.len(),
            file.enums.len(),
            file.services.len(),
            self.errors.len()
        );

        ParseResult {
            file,
            errors: self.errors,
        }
    }

    /// `syntax = "proto3";`
    fn parse_syntax(&mut self) -> Option<Syntax> {
        let start = self.advance().position;
        self.expect(TokenKind::Equals, "Expected '=' after 'syntax'")?;
        let version = self.expect(
            TokenKind::StringLiteral,
            "Expected syntax version string",
        )?;
        self.expect(TokenKind::Semicolon, "Expected ';' after syntax declaration");

        Some(Syntax {
            version: string_literal(version),
            position: self.span_from(start),
        })
    }

    /// `package foo.bar;`
    fn parse_package(&mut self) -> Option<Package> {
        let start = self.advance().position;
        let name = self.parse_qualified_identifier("package name", false)?;
        self.expect(TokenKind::Semicolon, "Expected ';' after package name");

        Some(Package {
            name,
            position: self.span_from(start),
        })
    }

    /// `import [weak | public] "path";`
    fn parse_import(&mut self) -> Option<Import> {
        let start = self.advance().position;
        let modifier = if self.eat(TokenKind::Weak).is_some() {
            Some(ImportModifier::Weak)
        } else if self.eat(TokenKind::Public).is_some() {
            Some(ImportModifier::Public)
        } else {
            None
        };
        let path = self.expect(TokenKind::StringLiteral, "Expected import path string")?;
        self.expect(TokenKind::Semicolon, "Expected ';' after import");

        Some(Import {
            path: string_literal(path),
            modifier,
            position: self.span_from(start),
        })
    }

    /// A dotted name such as `foo.bar.Baz`, optionally fully qualified with a
    /// leading dot when `allow_leading_dot` is set.
    fn parse_qualified_identifier(
        &mut self,
        what: &str,
        allow_leading_dot: bool,
    ) -> Option<Identifier> {
        let start = self.current().position;
        let mut name = String::new();

        if allow_leading_dot && self.eat(TokenKind::Dot).is_some() {
            name.push('.');
        }

        let first = self.expect_name(what)?;
        name.push_str(&first.name);

        while self.at(TokenKind::Dot) {
            self.advance();
            if self.current().kind.is_name() {
                let segment = self.advance();
                name.push('.');
                name.push_str(&segment.value);
            } else {
                self.error_here(
                    &format!("Expected identifier after '.' in {}", what),
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

    /// Whether the cursor is on `keyword Name {`
    fn starts_nested_declaration(&self) -> bool {
        self.peek(1).kind.is_name() && self.peek(2).kind == TokenKind::LBrace
    }

    /// Whether the cursor is on `extend a.b.C {`
    fn starts_extend_block(&self) -> bool {
        let mut i = 1;
        if self.peek(i).kind == TokenKind::Dot {
            i += 1;
        }
        loop {
            if !self.peek(i).kind.is_name() {
                return false;
            }
            i += 1;
            if self.peek(i).kind != TokenKind::Dot {
                break;
            }
            i += 1;
        }
        self.peek(i).kind == TokenKind::LBrace
    }
}

const TOP_LEVEL: [TokenKind; 8] = [
    TokenKind::Syntax,
    TokenKind::Package,
    TokenKind::Import,
    TokenKind::Option,
    TokenKind::Enum,
    TokenKind::Message,
    TokenKind::Service,
    TokenKind::Extend,
];
