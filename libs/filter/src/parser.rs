//! Filter expression parser - converts token streams to AST
//!
//! Recursive descent parser for the WHERE-clause subset.
//! Precedence (lowest to highest):
//! 1. or
//! 2. and
//! 3. not
//! 4. comparison (=, <>, ==, !=, <, <=, >, >=, like, regexp, is [not]),
//!    between ... and ..., with an optional trailing escape
//! 5. primary (identifier, literal, parenthesized expression)
//!
//! `OR` and `AND` chains are built left-associative as binary nodes; the
//! flattener collapses them afterwards. Any malformed input is an error;
//! no partial tree is ever returned.

use crate::ast::{AstNode, Operator};
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::token::{Keyword, Token, TokenType};

/// Parser for filter expressions
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    recursion_depth: usize,
}

const MAX_RECURSION_DEPTH: usize = 200;

impl Parser {
    /// Create a parser over an already tokenized expression
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            recursion_depth: 0,
        }
    }

    /// Tokenize and wrap `input`
    pub fn from_str(input: &str) -> Result<Self> {
        Ok(Self::new(Lexer::new(input).tokenize()?))
    }

    /// Advance to the next token
    fn advance(&mut self) {
        self.position += 1;
    }

    fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn current_keyword(&self) -> Option<Keyword> {
        self.current_token().and_then(Token::keyword)
    }

    fn current_token_is(&self, token_type: TokenType) -> bool {
        self.current_token()
            .map(|t| t.token_type == token_type)
            .unwrap_or(false)
    }

    fn describe_current(&self) -> String {
        match self.current_token() {
            Some(token) => format!("'{}' (token {})", token, self.position + 1),
            None => "end of input".to_string(),
        }
    }

    /// Expect a specific token type and advance
    fn expect(&mut self, token_type: TokenType, what: &str) -> Result<()> {
        if self.current_token_is(token_type) {
            self.advance();
            Ok(())
        } else {
            Err(Error::ParseError(format!(
                "Expected {}, got {}",
                what,
                self.describe_current()
            )))
        }
    }

    /// Parse the entire expression (top-level entry point)
    pub fn parse(&mut self) -> Result<AstNode> {
        if self.tokens.is_empty() {
            return Err(Error::Empty);
        }

        let expr = self.parse_or_expression()?;

        // Ensure we've consumed all input
        if self.current_token().is_some() {
            return Err(Error::ParseError(format!(
                "Unexpected {}",
                self.describe_current()
            )));
        }

        Ok(expr)
    }

    /// Check recursion depth and increment
    fn check_recursion_depth(&mut self) -> Result<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            return Err(Error::ParseError(format!(
                "Expression too deeply nested (max depth: {})",
                MAX_RECURSION_DEPTH
            )));
        }
        Ok(())
    }

    /// Parse or expression: expression 'OR' expression
    fn parse_or_expression(&mut self) -> Result<AstNode> {
        let mut left = self.parse_and_expression()?;

        while self.current_keyword() == Some(Keyword::Or) {
            self.advance(); // Skip 'OR'
            let right = self.parse_and_expression()?;
            left = AstNode::binary(Operator::Or, left, right);
        }

        Ok(left)
    }

    /// Parse and expression: expression 'AND' expression
    fn parse_and_expression(&mut self) -> Result<AstNode> {
        let mut left = self.parse_not_expression()?;

        while self.current_keyword() == Some(Keyword::And) {
            self.advance(); // Skip 'AND'
            let right = self.parse_not_expression()?;
            left = AstNode::binary(Operator::And, left, right);
        }

        Ok(left)
    }

    /// Parse not expression: ['NOT'] comparison
    fn parse_not_expression(&mut self) -> Result<AstNode> {
        if self.current_keyword() == Some(Keyword::Not) {
            self.advance(); // Skip 'NOT'
            let operand = self.parse_comparison_expression()?;
            return Ok(AstNode::operator(Operator::Not, vec![operand]));
        }
        self.parse_comparison_expression()
    }

    /// Parse comparison expression:
    /// primary (op primary | 'BETWEEN' primary 'AND' primary) ['ESCAPE' primary]
    fn parse_comparison_expression(&mut self) -> Result<AstNode> {
        let left = self.parse_primary()?;

        let op = match self.current_keyword() {
            Some(Keyword::Equal) => Operator::Equal,
            Some(Keyword::DoubleEqual) => Operator::DoubleEqual,
            Some(Keyword::NotEqual) => Operator::NotEqual,
            Some(Keyword::BangEqual) => Operator::BangEqual,
            Some(Keyword::LessThan) => Operator::LessThan,
            Some(Keyword::LessOrEqual) => Operator::LessOrEqual,
            Some(Keyword::GreaterThan) => Operator::GreaterThan,
            Some(Keyword::GreaterOrEqual) => Operator::GreaterOrEqual,
            Some(Keyword::Like) => Operator::Like,
            Some(Keyword::Regexp) => Operator::Regexp,
            Some(Keyword::Is) => Operator::Is,
            Some(Keyword::Between) => return self.parse_between(left),
            _ => return Ok(left),
        };
        self.advance();

        let op = if op == Operator::Is && self.current_keyword() == Some(Keyword::Not) {
            self.advance(); // Skip 'NOT'
            Operator::IsNot
        } else {
            op
        };

        let right = self.parse_primary()?;
        let comparison = AstNode::binary(op, left, right);
        self.parse_escape(comparison)
    }

    /// Parse the tail of: value 'BETWEEN' low 'AND' high
    fn parse_between(&mut self, value: AstNode) -> Result<AstNode> {
        self.advance(); // Skip 'BETWEEN'
        let low = self.parse_primary()?;
        if self.current_keyword() != Some(Keyword::And) {
            return Err(Error::ParseError(format!(
                "Expected AND in BETWEEN, got {}",
                self.describe_current()
            )));
        }
        self.advance(); // Skip 'AND'
        let high = self.parse_primary()?;

        let bounds = AstNode::binary(Operator::And, low, high);
        let between = AstNode::binary(Operator::Between, value, bounds);
        self.parse_escape(between)
    }

    /// Parse an optional trailing: 'ESCAPE' primary
    fn parse_escape(&mut self, comparison: AstNode) -> Result<AstNode> {
        if self.current_keyword() != Some(Keyword::Escape) {
            return Ok(comparison);
        }
        self.advance(); // Skip 'ESCAPE'
        let escape = self.parse_primary()?;
        Ok(AstNode::binary(Operator::Escape, comparison, escape))
    }

    /// Parse primary: identifier | literal | '(' expression ')'
    fn parse_primary(&mut self) -> Result<AstNode> {
        let Some(token) = self.current_token() else {
            return Err(Error::ParseError(
                "Expected operand, but reached end of input".into(),
            ));
        };

        match token.token_type {
            TokenType::Identifier => {
                let node = AstNode::identifier(token.value.clone());
                self.advance();
                Ok(node)
            }
            TokenType::Literal(kind) => {
                let node = AstNode::literal(kind, token.value.clone());
                self.advance();
                Ok(node)
            }
            TokenType::OpenParen => {
                self.check_recursion_depth()?;
                self.advance(); // Skip '('
                let expr = self.parse_or_expression()?;
                self.expect(TokenType::CloseParen, "')'")?;
                self.recursion_depth -= 1;
                Ok(expr)
            }
            TokenType::Operator(_) | TokenType::CloseParen => Err(Error::ParseError(format!(
                "Expected operand, got {}",
                self.describe_current()
            ))),
        }
    }
}

/// Parse an expression into an AST
pub fn parse(input: &str) -> Result<AstNode> {
    Parser::from_str(input)?.parse()
}
