//! Abstract Syntax Tree (AST) representation
//!
//! Every node is either an operator applied to an ordered list of children
//! or a leaf (identifier or literal). Nodes own their children; there is no
//! sharing between trees.
//!
//! `BETWEEN` keeps the SQL surface shape: its second child is an `AND` node
//! holding the two bounds. `ESCAPE` wraps the `LIKE` it applies to.

use crate::escape::{quote_identifier, quote_literal};
use crate::lexer::is_number_text;
use crate::token::LiteralKind;
use std::fmt;

/// Operators, in the spelling they are rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Or,
    And,
    Not,
    Equal,
    DoubleEqual,
    NotEqual,
    BangEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Like,
    Regexp,
    Is,
    IsNot,
    Between,
    Escape,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::And => "AND",
            Self::Not => "NOT",
            Self::Equal => "=",
            Self::DoubleEqual => "==",
            Self::NotEqual => "<>",
            Self::BangEqual => "!=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::Like => "LIKE",
            Self::Regexp => "REGEXP",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::Between => "BETWEEN",
            Self::Escape => "ESCAPE",
        }
    }

    /// Binding strength when rendering; higher binds tighter
    fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Not => 3,
            _ => 4,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Identifier,
    Literal(LiteralKind),
}

/// AST node representing a filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    Operator { op: Operator, children: Vec<AstNode> },
    Leaf { kind: LeafKind, value: String },
}

const LEAF_PRECEDENCE: u8 = 5;

impl AstNode {
    pub fn operator(op: Operator, children: Vec<AstNode>) -> Self {
        Self::Operator { op, children }
    }

    pub fn binary(op: Operator, left: AstNode, right: AstNode) -> Self {
        Self::Operator {
            op,
            children: vec![left, right],
        }
    }

    pub fn identifier(value: impl Into<String>) -> Self {
        Self::Leaf {
            kind: LeafKind::Identifier,
            value: value.into(),
        }
    }

    pub fn literal(kind: LiteralKind, value: impl Into<String>) -> Self {
        Self::Leaf {
            kind: LeafKind::Literal(kind),
            value: value.into(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::literal(LiteralKind::String, value)
    }

    pub fn number(value: impl Into<String>) -> Self {
        Self::literal(LiteralKind::Number, value)
    }

    pub fn null() -> Self {
        Self::literal(LiteralKind::Null, "NULL")
    }

    /// Identifier text, if this is an identifier leaf
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Leaf {
                kind: LeafKind::Identifier,
                value,
            } => Some(value),
            _ => None,
        }
    }

    /// Literal text and kind, if this is a literal leaf
    pub fn as_literal(&self) -> Option<(LiteralKind, &str)> {
        match self {
            Self::Leaf {
                kind: LeafKind::Literal(kind),
                value,
            } => Some((*kind, value)),
            _ => None,
        }
    }

    pub fn op(&self) -> Option<Operator> {
        match self {
            Self::Operator { op, .. } => Some(*op),
            Self::Leaf { .. } => None,
        }
    }

    pub fn children(&self) -> &[AstNode] {
        match self {
            Self::Operator { children, .. } => children,
            Self::Leaf { .. } => &[],
        }
    }

    /// All identifiers referenced anywhere in the tree, in order
    pub fn identifiers(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_identifiers(&mut out);
        out
    }

    fn collect_identifiers<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Operator { children, .. } => {
                for child in children {
                    child.collect_identifiers(out);
                }
            }
            Self::Leaf {
                kind: LeafKind::Identifier,
                value,
            } => out.push(value),
            Self::Leaf { .. } => {}
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Operator { op, .. } => op.precedence(),
            Self::Leaf { .. } => LEAF_PRECEDENCE,
        }
    }

    /// Render a child, parenthesized if it binds looser than `min`
    fn fmt_child(child: &AstNode, min: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if child.precedence() < min {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }

    fn fmt_joined(
        children: &[AstNode],
        sep: &str,
        min: u8,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            Self::fmt_child(child, min, f)?;
        }
        Ok(())
    }
}

fn fmt_identifier(value: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, segment) in value.split('.').enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        f.write_str(&quote_identifier(segment))?;
    }
    Ok(())
}

/// Renders canonical SQL text. Regex and bare literals come out as quoted
/// strings so the text is valid SQL and re-parses to an equivalent tree.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf {
                kind: LeafKind::Identifier,
                value,
            } => fmt_identifier(value, f),
            Self::Leaf {
                kind: LeafKind::Literal(kind),
                value,
            } => match kind {
                LiteralKind::Null => f.write_str("NULL"),
                LiteralKind::Number if is_number_text(value) => f.write_str(value),
                _ => f.write_str(&quote_literal(value)),
            },
            Self::Operator { op, children } => match (op, children.as_slice()) {
                (Operator::Or, _) => Self::fmt_joined(children, " OR ", 1, f),
                (Operator::And, _) => Self::fmt_joined(children, " AND ", 2, f),
                (Operator::Not, [operand]) => {
                    f.write_str("NOT ")?;
                    Self::fmt_child(operand, 4, f)
                }
                (Operator::Between, [value, bounds]) => {
                    Self::fmt_child(value, LEAF_PRECEDENCE, f)?;
                    f.write_str(" BETWEEN ")?;
                    match bounds.children() {
                        [low, high] if bounds.op() == Some(Operator::And) => {
                            Self::fmt_child(low, LEAF_PRECEDENCE, f)?;
                            f.write_str(" AND ")?;
                            Self::fmt_child(high, LEAF_PRECEDENCE, f)
                        }
                        _ => Self::fmt_child(bounds, LEAF_PRECEDENCE, f),
                    }
                }
                (Operator::Escape, [pattern, escape]) => {
                    Self::fmt_child(pattern, 4, f)?;
                    f.write_str(" ESCAPE ")?;
                    Self::fmt_child(escape, LEAF_PRECEDENCE, f)
                }
                (_, [left, right]) => {
                    Self::fmt_child(left, LEAF_PRECEDENCE, f)?;
                    write!(f, " {} ", op)?;
                    Self::fmt_child(right, LEAF_PRECEDENCE, f)
                }
                _ => {
                    // Malformed arity; render function-style so nothing is hidden
                    write!(f, "{}(", op)?;
                    Self::fmt_joined(children, ", ", 0, f)?;
                    f.write_str(")")
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_quotes_literals() {
        let node = AstNode::binary(
            Operator::Equal,
            AstNode::identifier("Games.name"),
            AstNode::string("O'Brien"),
        );
        assert_eq!(node.to_string(), "Games.name = 'O''Brien'");
    }

    #[test]
    fn test_render_parenthesizes_or_under_and() {
        let a = AstNode::binary(Operator::Equal, AstNode::identifier("a"), AstNode::number("1"));
        let b = AstNode::binary(Operator::Equal, AstNode::identifier("b"), AstNode::number("2"));
        let c = AstNode::binary(Operator::Equal, AstNode::identifier("c"), AstNode::number("3"));
        let node = AstNode::operator(
            Operator::And,
            vec![AstNode::operator(Operator::Or, vec![a, b]), c],
        );
        assert_eq!(node.to_string(), "(a = 1 OR b = 2) AND c = 3");
    }

    #[test]
    fn test_render_between() {
        let node = AstNode::binary(
            Operator::Between,
            AstNode::identifier("year"),
            AstNode::binary(Operator::And, AstNode::number("1980"), AstNode::number("1989")),
        );
        assert_eq!(node.to_string(), "year BETWEEN 1980 AND 1989");
    }

    #[test]
    fn test_render_quoted_identifier() {
        assert_eq!(AstNode::identifier("My Field").to_string(), "\"My Field\"");
    }

    #[test]
    fn test_identifiers() {
        let node = AstNode::binary(
            Operator::Or,
            AstNode::binary(Operator::Equal, AstNode::identifier("a"), AstNode::number("1")),
            AstNode::binary(Operator::Is, AstNode::identifier("b"), AstNode::null()),
        );
        assert_eq!(node.identifiers(), vec!["a", "b"]);
    }
}
