//! Tokens produced by the lexer

use crate::Position;
use serde::Serialize;
use std::fmt;

/// All token kinds in the protobuf grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Literals
    Identifier,
    StringLiteral,
    NumberLiteral,

    // Keywords
    Syntax,
    Package,
    Import,
    Option,
    Message,
    Enum,
    Service,
    Rpc,
    Returns,
    Stream,
    Repeated,
    Optional,
    Required,
    Oneof,
    Map,
    Reserved,
    Extensions,
    Extend,
    To,
    Max,
    True,
    False,
    Weak,
    Public,
    Group,

    // Symbols
    /// `=`
    Equals,
    /// `;`
    Semicolon,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `<`
    LAngle,
    /// `>`
    RAngle,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `:`
    Colon,
    /// `-`
    Minus,
    /// `+`
    Plus,

    // Trivia
    Comment,
    Eof,
}

impl TokenKind {
    /// Whether this kind is one of the reserved words
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Syntax
                | TokenKind::Package
                | TokenKind::Import
                | TokenKind::Option
                | TokenKind::Message
                | TokenKind::Enum
                | TokenKind::Service
                | TokenKind::Rpc
                | TokenKind::Returns
                | TokenKind::Stream
                | TokenKind::Repeated
                | TokenKind::Optional
                | TokenKind::Required
                | TokenKind::Oneof
                | TokenKind::Map
                | TokenKind::Reserved
                | TokenKind::Extensions
                | TokenKind::Extend
                | TokenKind::To
                | TokenKind::Max
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Weak
                | TokenKind::Public
                | TokenKind::Group
        )
    }

    /// Identifiers and keywords; protobuf allows keywords as names
    pub fn is_name(self) -> bool {
        self == TokenKind::Identifier || self.is_keyword()
    }

    /// Human-readable description used in diagnostics
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::StringLiteral => "string literal",
            TokenKind::NumberLiteral => "number literal",
            TokenKind::Syntax => "'syntax'",
            TokenKind::Package => "'package'",
            TokenKind::Import => "'import'",
            TokenKind::Option => "'option'",
            TokenKind::Message => "'message'",
            TokenKind::Enum => "'enum'",
            TokenKind::Service => "'service'",
            TokenKind::Rpc => "'rpc'",
            TokenKind::Returns => "'returns'",
            TokenKind::Stream => "'stream'",
            TokenKind::Repeated => "'repeated'",
            TokenKind::Optional => "'optional'",
            TokenKind::Required => "'required'",
            TokenKind::Oneof => "'oneof'",
            TokenKind::Map => "'map'",
            TokenKind::Reserved => "'reserved'",
            TokenKind::Extensions => "'extensions'",
            TokenKind::Extend => "'extend'",
            TokenKind::To => "'to'",
            TokenKind::Max => "'max'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Weak => "'weak'",
            TokenKind::Public => "'public'",
            TokenKind::Group => "'group'",
            TokenKind::Equals => "'='",
            TokenKind::Semicolon => "';'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LAngle => "'<'",
            TokenKind::RAngle => "'>'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Colon => "':'",
            TokenKind::Minus => "'-'",
            TokenKind::Plus => "'+'",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A single token with its kind, literal text and source span.
///
/// For string literals `value` holds the decoded contents without quotes;
/// for every other kind it is the source text of the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_names() {
        assert!(TokenKind::Message.is_name());
        assert!(TokenKind::Identifier.is_name());
        assert!(!TokenKind::LBrace.is_name());
        assert!(!TokenKind::StringLiteral.is_name());
    }

    #[test]
    fn test_describe() {
        assert_eq!(TokenKind::NumberLiteral.to_string(), "number literal");
        assert_eq!(TokenKind::Semicolon.to_string(), "';'");
    }
}
