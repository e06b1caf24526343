//! Static keyword and symbol tables consulted by the lexer

use proto2ts_common::TokenKind;

/// Reserved words, matched case-insensitively
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("syntax", TokenKind::Syntax),
    ("package", TokenKind::Package),
    ("import", TokenKind::Import),
    ("option", TokenKind::Option),
    ("message", TokenKind::Message),
    ("enum", TokenKind::Enum),
    ("service", TokenKind::Service),
    ("rpc", TokenKind::Rpc),
    ("returns", TokenKind::Returns),
    ("stream", TokenKind::Stream),
    ("repeated", TokenKind::Repeated),
    ("optional", TokenKind::Optional),
    ("required", TokenKind::Required),
    ("oneof", TokenKind::Oneof),
    ("map", TokenKind::Map),
    ("reserved", TokenKind::Reserved),
    ("extensions", TokenKind::Extensions),
    ("extend", TokenKind::Extend),
    ("to", TokenKind::To),
    ("max", TokenKind::Max),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("weak", TokenKind::Weak),
    ("public", TokenKind::Public),
    ("group", TokenKind::Group),
];

/// Single-character punctuation
pub const SYMBOLS: &[(char, TokenKind)] = &[
    ('=', TokenKind::Equals),
    (';', TokenKind::Semicolon),
    ('{', TokenKind::LBrace),
    ('}', TokenKind::RBrace),
    ('[', TokenKind::LBracket),
    (']', TokenKind::RBracket),
    ('(', TokenKind::LParen),
    (')', TokenKind::RParen),
    ('<', TokenKind::LAngle),
    ('>', TokenKind::RAngle),
    (',', TokenKind::Comma),
    ('.', TokenKind::Dot),
    (':', TokenKind::Colon),
    ('-', TokenKind::Minus),
    ('+', TokenKind::Plus),
];

/// Keyword kind for a word, or `None` for a plain identifier
pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(text, _)| text.eq_ignore_ascii_case(word))
        .map(|&(_, kind)| kind)
}

pub fn symbol(c: char) -> Option<TokenKind> {
    SYMBOLS
        .iter()
        .find(|&&(sym, _)| sym == c)
        .map(|&(_, kind)| kind)
}

/// The protobuf scalar type names
pub const SCALAR_TYPES: &[&str] = &[
    "double", "float", "int32", "int64", "uint32", "uint64", "sint32", "sint64", "fixed32",
    "fixed64", "sfixed32", "sfixed64", "bool", "string", "bytes",
];

pub fn is_scalar(name: &str) -> bool {
    SCALAR_TYPES.contains(&name)
}
