//! Filter expression lexer - tokenizes input strings
//!
//! Lexing is lenient: any text that is not a keyword, symbol, quoted
//! literal or identifier is passed through as a bare literal and left for
//! the parser to reject. The only lexical errors are unterminated quotes.

use crate::error::{Error, Result};
use crate::token::{Keyword, LiteralKind, Token, TokenType};

/// The filter expression lexer
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

fn is_symbol_char(c: char) -> bool {
    matches!(c, '=' | '<' | '>' | '!')
}

fn is_word_break(c: char) -> bool {
    c.is_whitespace() || is_symbol_char(c) || matches!(c, '(' | ')' | '\'' | '"' | '`' | '[')
}

/// Optional sign, digits, optional fraction
pub(crate) fn is_number_text(text: &str) -> bool {
    let unsigned = text.strip_prefix(|c| c == '-' || c == '+').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (unsigned, None),
    };
    !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.map_or(true, |f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
}

fn is_identifier_text(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    !text.ends_with('.') && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '$'))
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            chars,
            position: 0,
            current_char,
        }
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.chars.get(self.position).copied();
    }

    /// Peek at the next character without advancing
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read a delimited run where the closing delimiter is escaped by
    /// doubling it: `'it''s'`, `"odd ""name"""`
    fn read_doubled(&mut self, close: char, what: &str) -> Result<String> {
        self.advance(); // Skip opening delimiter

        let mut value = String::new();
        while let Some(c) = self.current_char {
            if c == close {
                if self.peek() == Some(close) {
                    value.push(close);
                    self.advance();
                    self.advance();
                } else {
                    self.advance(); // Skip closing delimiter
                    return Ok(value);
                }
            } else {
                value.push(c);
                self.advance();
            }
        }

        Err(Error::LexError(format!("Unterminated {}", what)))
    }

    /// Read a regex literal: /pattern/ with `\/` for a literal slash
    fn read_regex(&mut self) -> Result<String> {
        self.advance(); // Skip opening slash

        let mut value = String::new();
        while let Some(c) = self.current_char {
            match c {
                '/' => {
                    self.advance();
                    return Ok(value);
                }
                '\\' if self.peek() == Some('/') => {
                    value.push('/');
                    self.advance();
                    self.advance();
                }
                '\\' => {
                    // Other escapes belong to the regex syntax itself
                    value.push('\\');
                    self.advance();
                    if let Some(next) = self.current_char {
                        value.push(next);
                        self.advance();
                    }
                }
                _ => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        Err(Error::LexError("Unterminated regex literal".into()))
    }

    /// Read a quoted identifier in any SQLite quoting style, joining
    /// dotted segments: `"Games"."name"` -> `Games.name`
    fn read_quoted_identifier(&mut self) -> Result<String> {
        let mut ident = String::new();
        loop {
            let segment = match self.current_char {
                Some('"') => self.read_doubled('"', "quoted identifier")?,
                Some('`') => self.read_doubled('`', "quoted identifier")?,
                Some('[') => self.read_bracketed()?,
                _ => self.read_word(),
            };
            ident.push_str(&segment);

            let continues = self.current_char == Some('.')
                && self
                    .peek()
                    .is_some_and(|c| matches!(c, '"' | '`' | '[') || c.is_alphabetic() || c == '_');
            if !continues {
                return Ok(ident);
            }
            ident.push('.');
            self.advance();
        }
    }

    /// Read a bracketed identifier: [name]
    fn read_bracketed(&mut self) -> Result<String> {
        self.advance(); // Skip '['

        let mut value = String::new();
        while let Some(c) = self.current_char {
            self.advance();
            if c == ']' {
                return Ok(value);
            }
            value.push(c);
        }

        Err(Error::LexError("Unterminated bracketed identifier".into()))
    }

    /// Read a run of characters up to the next break
    fn read_word(&mut self) -> String {
        let start_pos = self.position;

        while let Some(c) = self.current_char {
            if is_word_break(c) {
                break;
            }
            self.advance();
        }

        self.chars[start_pos..self.position].iter().collect()
    }

    /// Read a one or two character symbol, preferring the longer one
    fn read_symbol(&mut self) -> Token {
        let first = self.current_char.unwrap_or_default();
        if let Some(second) = self.peek() {
            let pair: String = [first, second].iter().collect();
            if let Some(keyword) = Keyword::lookup(&pair) {
                self.advance();
                self.advance();
                return Token::new(TokenType::Operator(keyword), pair);
            }
        }

        self.advance();
        let single = first.to_string();
        match Keyword::lookup(&single) {
            Some(keyword) => Token::new(TokenType::Operator(keyword), single),
            None => Token::literal(LiteralKind::Bare, single),
        }
    }

    fn classify_word(word: String) -> Token {
        match Keyword::lookup(&word) {
            Some(Keyword::Null) => Token::literal(LiteralKind::Null, "NULL"),
            Some(keyword) => Token::new(TokenType::Operator(keyword), word.to_ascii_uppercase()),
            None if is_number_text(&word) => Token::literal(LiteralKind::Number, word),
            None if is_identifier_text(&word) => Token::identifier(word),
            None => Token::literal(LiteralKind::Bare, word),
        }
    }

    /// Get the next token from the input, `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();

        let Some(c) = self.current_char else {
            return Ok(None);
        };

        let token = match c {
            '(' => {
                self.advance();
                Token::new(TokenType::OpenParen, "(")
            }
            ')' => {
                self.advance();
                Token::new(TokenType::CloseParen, ")")
            }
            '\'' => Token::literal(
                LiteralKind::String,
                self.read_doubled('\'', "string literal")?,
            ),
            '/' => Token::literal(LiteralKind::Regex, self.read_regex()?),
            '"' | '`' | '[' => Token::identifier(self.read_quoted_identifier()?),
            c if is_symbol_char(c) => self.read_symbol(),
            _ => {
                let word = self.read_word();
                let quoted_field_follows = matches!(self.current_char, Some('"' | '`' | '['));
                match word.strip_suffix('.') {
                    // Bare table name followed by a quoted field
                    Some(table) if quoted_field_follows && is_identifier_text(table) => {
                        let mut ident = word;
                        ident.push_str(&self.read_quoted_identifier()?);
                        Token::identifier(ident)
                    }
                    _ => Self::classify_word(word),
                }
            }
        };

        Ok(Some(token))
    }

    /// Tokenize the whole input. Blank input yields no tokens.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// Tokenize an expression
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}
