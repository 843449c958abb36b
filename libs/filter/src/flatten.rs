//! Structural normalisation of associative `AND` / `OR` chains
//!
//! `AND(AND(a, b), c)` becomes `AND(a, b, c)`. The bounds of a `BETWEEN`
//! are an `AND` node too, but they are never merged into a surrounding
//! chain because they sit below the `BETWEEN` operator.

use crate::ast::{AstNode, Operator};

/// Collapse nested `target` nodes into their parent `target` node.
///
/// Idempotent: flattening an already flat tree returns an equal tree.
pub fn flatten(node: AstNode, target: Operator) -> AstNode {
    match node {
        AstNode::Operator { op, children } => {
            let mut flat = Vec::with_capacity(children.len());
            for child in children {
                let child = flatten(child, target);
                match child {
                    AstNode::Operator {
                        op: child_op,
                        children: grandchildren,
                    } if op == target && child_op == target => flat.extend(grandchildren),
                    other => flat.push(other),
                }
            }
            AstNode::Operator { op, children: flat }
        }
        leaf => leaf,
    }
}

/// Flatten both `AND` and `OR` chains
pub fn flatten_all(node: AstNode) -> AstNode {
    flatten(flatten(node, Operator::And), Operator::Or)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(field: &str, value: &str) -> AstNode {
        AstNode::binary(Operator::Equal, AstNode::identifier(field), AstNode::number(value))
    }

    #[test]
    fn test_left_nested_chain() {
        let node = AstNode::binary(
            Operator::And,
            AstNode::binary(Operator::And, eq("a", "1"), eq("b", "2")),
            eq("c", "3"),
        );
        let flat = flatten(node, Operator::And);
        assert_eq!(flat.op(), Some(Operator::And));
        assert_eq!(flat.children().len(), 3);
    }

    #[test]
    fn test_other_operator_untouched() {
        let node = AstNode::binary(
            Operator::Or,
            AstNode::binary(Operator::Or, eq("a", "1"), eq("b", "2")),
            eq("c", "3"),
        );
        assert_eq!(flatten(node.clone(), Operator::And), node);
    }

    #[test]
    fn test_between_bounds_are_kept() {
        let between = AstNode::binary(
            Operator::Between,
            AstNode::identifier("year"),
            AstNode::binary(Operator::And, AstNode::number("1"), AstNode::number("2")),
        );
        let node = AstNode::binary(Operator::And, between.clone(), eq("a", "1"));
        let flat = flatten(node, Operator::And);
        assert_eq!(flat.children()[0], between);
    }
}
