//! Lexer for protobuf source text.
//!
//! The lexer makes a single forward pass over the input and produces every
//! token, including comments, followed by a final end-of-file token.
//! Malformed input never stops the scan: each problem is recorded as a
//! [`LexicalError`] and scanning resumes after it. Every iteration of the
//! main loop consumes at least one character, so the scan always terminates.

use crate::grammar;
use proto2ts_common::{LexicalError, Position, Token, TokenKind};

/// Output of [`tokenize`]
#[derive(Debug, Clone, PartialEq)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexicalError>,
}

/// Tokenize a complete source text.
pub fn tokenize(source: &str) -> LexResult {
    Lexer::new(source).tokenize()
}

/// Where a token started: line, column and byte offset
#[derive(Debug, Clone, Copy)]
struct Mark {
    line: usize,
    column: usize,
    offset: usize,
}

/// The lexer for protobuf input.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    errors: Vec<LexicalError>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenizes the entire input.
    pub fn tokenize(mut self) -> LexResult {
        while let Some(c) = self.peek() {
            let before = self.pos;

            if c.is_whitespace() {
                self.bump();
            } else if c == '/' && self.peek_nth(1) == Some('/') {
                self.lex_line_comment();
            } else if c == '/' && self.peek_nth(1) == Some('*') {
                self.lex_block_comment();
            } else if c == '"' {
                self.lex_string();
            } else if c.is_ascii_digit()
                || (c == '-' && self.peek_nth(1).is_some_and(|d| d.is_ascii_digit()))
            {
                self.lex_number();
            } else if c.is_ascii_alphabetic() || c == '_' {
                self.lex_word();
            } else if let Some(kind) = grammar::symbol(c) {
                let mark = self.mark();
                self.bump();
                self.push(kind, c.to_string(), mark);
            } else {
                let mark = self.mark();
                self.error(format!("Unknown character: {}", c), mark);
                self.bump();
            }

            debug_assert!(self.pos > before, "lexer made no progress at {}", before);
        }

        let eof = Position::new(self.line, self.column, self.pos, self.pos);
        self.tokens.push(Token::new(TokenKind::Eof, "", eof));

        log::debug!(
            "tokenized {} bytes into {} tokens ({} errors)",
            self.input.len(),
            self.tokens.len(),
            self.errors.len()
        );

        LexResult {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consumes one character, keeping line and column in step.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, pred: F) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            line: self.line,
            column: self.column,
            offset: self.pos,
        }
    }

    fn span_from(&self, mark: Mark) -> Position {
        Position::new(mark.line, mark.column, mark.offset, self.pos)
    }

    fn push(&mut self, kind: TokenKind, value: String, mark: Mark) {
        let position = self.span_from(mark);
        self.tokens.push(Token::new(kind, value, position));
    }

    fn error(&mut self, message: String, mark: Mark) {
        self.errors
            .push(LexicalError::new(message, mark.line, mark.column, mark.offset));
    }

    fn lex_line_comment(&mut self) {
        let mark = self.mark();
        self.consume_while(|c| c != '\n');
        let text = self.input[mark.offset..self.pos].to_string();
        self.push(TokenKind::Comment, text, mark);
    }

    fn lex_block_comment(&mut self) {
        let mark = self.mark();
        self.bump();
        self.bump();
        loop {
            if self.remaining().starts_with("*/") {
                self.bump();
                self.bump();
                let text = self.input[mark.offset..self.pos].to_string();
                self.push(TokenKind::Comment, text, mark);
                return;
            }
            if self.bump().is_none() {
                self.error("Unterminated block comment".to_string(), mark);
                return;
            }
        }
    }

    /// Lexes a double-quoted string, decoding escapes into the token value.
    ///
    /// A raw newline ends an unterminated string without being consumed, so
    /// scanning resumes on the next line.
    fn lex_string(&mut self) {
        let mark = self.mark();
        self.bump();
        let mut value = String::new();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error("Unterminated string literal".to_string(), mark);
                    return;
                }
                Some('"') => {
                    self.bump();
                    self.push(TokenKind::StringLiteral, value, mark);
                    return;
                }
                Some('\\') => {
                    self.bump();
                    match self.bump() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some(other) => value.push(other),
                        None => {
                            self.error("Unterminated string literal".to_string(), mark);
                            return;
                        }
                    }
                }
                Some(c) => {
                    self.bump();
                    value.push(c);
                }
            }
        }
    }

    fn lex_number(&mut self) {
        let mark = self.mark();
        if self.peek() == Some('-') {
            self.bump();
        }
        self.consume_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.consume_while(|c| c.is_ascii_digit());
        }
        let text = self.input[mark.offset..self.pos].to_string();
        self.push(TokenKind::NumberLiteral, text, mark);
    }

    fn lex_word(&mut self) {
        let mark = self.mark();
        self.consume_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = &self.input[mark.offset..self.pos];
        let kind = grammar::keyword(text).unwrap_or(TokenKind::Identifier);
        self.push(kind, text.to_string(), mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input_yields_eof() {
        let result = tokenize("");
        assert!(result.errors.is_empty());
        assert_eq!(result.tokens.len(), 1);
        assert_eq!(result.tokens[0].kind, TokenKind::Eof);
        assert_eq!(result.tokens[0].position, Position::new(1, 1, 0, 0));
    }

    #[test]
    fn test_field_declaration() {
        assert_eq!(
            kinds("optional int32 id = 2;"),
            vec![
                TokenKind::Optional,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::NumberLiteral,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            kinds("Message MESSAGE message"),
            vec![
                TokenKind::Message,
                TokenKind::Message,
                TokenKind::Message,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_positions_track_lines() {
        let result = tokenize("syntax\n  = \"proto3\";");
        let tokens = &result.tokens;
        assert_eq!(tokens[0].position, Position::new(1, 1, 0, 6));
        assert_eq!(tokens[1].position, Position::new(2, 3, 9, 10));
        assert_eq!(tokens[2].position, Position::new(2, 5, 11, 19));
        assert_eq!(tokens[2].value, "proto3");
    }

    #[test]
    fn test_string_escapes() {
        let result = tokenize(r#""a\nb\t\"q\"\\\x""#);
        assert!(result.errors.is_empty());
        assert_eq!(result.tokens[0].value, "a\nb\t\"q\"\\x");
    }

    #[test]
    fn test_unterminated_string() {
        let result = tokenize("message M { string name = \"abc");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Unterminated string literal");
        assert_eq!(result.errors[0].offset, 26);
        assert!(!result
            .tokens
            .iter()
            .any(|t| t.kind == TokenKind::StringLiteral));
    }

    #[test]
    fn test_unterminated_string_resumes_on_next_line() {
        let result = tokenize("\"abc\nfoo");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.tokens[0].kind, TokenKind::Identifier);
        assert_eq!(result.tokens[0].value, "foo");
        assert_eq!(result.tokens[0].position.line, 2);
    }

    #[test]
    fn test_numbers() {
        let result = tokenize("42 -7 3.14 1. -x");
        let values: Vec<(&TokenKind, &str)> = result
            .tokens
            .iter()
            .map(|t| (&t.kind, t.value.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![
                (&TokenKind::NumberLiteral, "42"),
                (&TokenKind::NumberLiteral, "-7"),
                (&TokenKind::NumberLiteral, "3.14"),
                (&TokenKind::NumberLiteral, "1"),
                (&TokenKind::Dot, "."),
                (&TokenKind::Minus, "-"),
                (&TokenKind::Identifier, "x"),
                (&TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_comments_are_tokens() {
        let result = tokenize("// hello\nmessage /* inline */ M");
        assert!(result.errors.is_empty());
        assert_eq!(
            result.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Comment,
                TokenKind::Message,
                TokenKind::Comment,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
        assert_eq!(result.tokens[0].value, "// hello");
        assert_eq!(result.tokens[2].value, "/* inline */");
    }

    #[test]
    fn test_unterminated_block_comment() {
        let result = tokenize("message /* never closed");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Unterminated block comment");
        assert_eq!(result.errors[0].column, 9);
    }

    #[test]
    fn test_unknown_character() {
        let result = tokenize("a @ b");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Unknown character: @");
        assert_eq!(result.errors[0].offset, 2);
        assert_eq!(
            kinds("a @ b"),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_multibyte_characters() {
        let result = tokenize("\"héllo\" é x");
        assert_eq!(result.tokens[0].value, "héllo");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].column, 9);
        let x = &result.tokens[1];
        assert_eq!(x.value, "x");
        assert_eq!(x.position.column, 11);
        assert_eq!(x.position.start, 12);
    }
}
