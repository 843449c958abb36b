//! Token types for the filter expression lexer
//!
//! Tokens carry no position; only their order is significant.

use phf::phf_map;
use std::fmt;

/// Reserved words and operator symbols
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub enum Keyword {
    And,
    Or,
    Not,
    Equal,          // =
    DoubleEqual,    // ==
    NotEqual,       // <>
    BangEqual,      // !=
    LessThan,       // <
    LessOrEqual,    // <=
    GreaterThan,    // >
    GreaterOrEqual, // >=
    Like,
    Regexp,
    Between,
    Escape,
    Is,
    Null,
}

/// Operator table, keyed by upper-cased spelling
static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "AND" => Keyword::And,
    "OR" => Keyword::Or,
    "NOT" => Keyword::Not,
    "=" => Keyword::Equal,
    "==" => Keyword::DoubleEqual,
    "<>" => Keyword::NotEqual,
    "!=" => Keyword::BangEqual,
    "<" => Keyword::LessThan,
    "<=" => Keyword::LessOrEqual,
    ">" => Keyword::GreaterThan,
    ">=" => Keyword::GreaterOrEqual,
    "LIKE" => Keyword::Like,
    "REGEXP" => Keyword::Regexp,
    "BETWEEN" => Keyword::Between,
    "ESCAPE" => Keyword::Escape,
    "IS" => Keyword::Is,
    "NULL" => Keyword::Null,
};

impl Keyword {
    /// Case-insensitive lookup of a word or symbol
    pub fn lookup(text: &str) -> Option<Self> {
        if text.bytes().all(|b| !b.is_ascii_lowercase()) {
            return KEYWORDS.get(text).copied();
        }
        KEYWORDS.get(text.to_ascii_uppercase().as_str()).copied()
    }
}

/// Literal flavours; they only matter when an expression is rendered back
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub enum LiteralKind {
    /// `'quoted'`
    String,
    /// `/pattern/`
    Regex,
    Number,
    Null,
    /// Any other unrecognized text
    Bare,
}

/// Token types for the filter lexer
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum TokenType {
    Identifier,
    Literal(LiteralKind),
    Operator(Keyword),
    OpenParen,
    CloseParen,
}

/// A token in a filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
}

impl Token {
    pub fn new(token_type: TokenType, value: impl Into<String>) -> Self {
        Self {
            token_type,
            value: value.into(),
        }
    }

    pub fn identifier(value: impl Into<String>) -> Self {
        Self::new(TokenType::Identifier, value)
    }

    pub fn literal(kind: LiteralKind, value: impl Into<String>) -> Self {
        Self::new(TokenType::Literal(kind), value)
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.token_type {
            TokenType::Operator(k) => Some(k),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token_type {
            TokenType::Literal(LiteralKind::String) => write!(f, "'{}'", self.value),
            TokenType::Literal(LiteralKind::Regex) => write!(f, "/{}/", self.value),
            _ => f.write_str(&self.value),
        }
    }
}
