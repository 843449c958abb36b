//! AST -> criteria translation
//!
//! The inverse of [`FilterSet::to_sql_where`]. Translation is lossy on
//! purpose: a term that does not decompose into exactly one catalog column
//! and one value is left out of the criteria, while the WHERE text it came
//! from stays authoritative.

use crate::ast::{AstNode, Operator};
use crate::criteria::{CompareOp, CriteriaRow, FilterSet, Predicate};
use crate::flatten::flatten_all;
use crate::token::LiteralKind;
use arcadex_schema::ColumnCatalog;

/// Translate a parsed expression into criteria rows.
///
/// The top-level `OR` (if any) yields the rows, and each row's `AND` (if
/// any) yields its entries. When a row names a column twice only the first
/// term is kept. Rows left without entries are dropped.
pub fn interpret_expression(ast: AstNode, catalog: &ColumnCatalog) -> FilterSet {
    let ast = flatten_all(ast);
    let rows = match ast {
        AstNode::Operator {
            op: Operator::Or,
            children,
        } => children,
        other => vec![other],
    };

    let mut set = FilterSet::new();
    for row_node in rows {
        let terms = match row_node {
            AstNode::Operator {
                op: Operator::And,
                children,
            } => children,
            other => vec![other],
        };

        let mut row = CriteriaRow::new();
        for term in &terms {
            let Some((column, criterion)) = interpret_column_operation(term, catalog) else {
                tracing::debug!(term = %term, "term has no criterion form; dropped");
                continue;
            };
            if row.contains(&column) {
                tracing::debug!(column = %column, term = %term, "column repeated in row; dropped");
                continue;
            }
            row.set(column, criterion);
        }

        if !row.is_empty() {
            set.push(row);
        }
    }
    set
}

/// Translate one comparison node into `(column id, criterion text)`.
///
/// Returns `None` when the node is not a supported operator over exactly
/// one identifier and one value, when the identifier does not resolve to a
/// filterable column, or when the criterion text would not classify back
/// to the same predicate.
pub fn interpret_column_operation(
    node: &AstNode,
    catalog: &ColumnCatalog,
) -> Option<(String, String)> {
    let (identifier, predicate) = node_predicate(node)?;

    let Some(column) = catalog.resolve_identifier(identifier) else {
        tracing::debug!(identifier, "identifier does not name a filterable column");
        return None;
    };

    let criterion = predicate.to_criterion();
    if Predicate::classify(&criterion).as_ref() != Some(&predicate) {
        return None;
    }
    Some((column.id.clone(), criterion))
}

fn node_predicate(node: &AstNode) -> Option<(&str, Predicate)> {
    let op = node.op()?;
    match (op, node.children()) {
        (Operator::Escape, [like, escape]) => {
            let (_, escape) = escape.as_literal()?;
            like_predicate(like, Some(escape))
        }
        (Operator::Like, _) => like_predicate(node, None),
        (Operator::Regexp, [left, right]) => {
            let identifier = left.as_identifier()?;
            let (_, pattern) = value_literal(right)?;
            Some((identifier, Predicate::Regexp(pattern.to_string())))
        }
        (Operator::Between, [left, bounds]) => {
            let identifier = left.as_identifier()?;
            if bounds.op() != Some(Operator::And) {
                return None;
            }
            let [low, high] = bounds.children() else {
                return None;
            };
            let (_, low) = value_literal(low)?;
            let (_, high) = value_literal(high)?;
            Some((
                identifier,
                Predicate::Between {
                    low: low.to_string(),
                    high: high.to_string(),
                },
            ))
        }
        (Operator::Is, [left, right]) => {
            let identifier = left.as_identifier()?;
            matches!(right.as_literal(), Some((LiteralKind::Null, _)))
                .then_some((identifier, Predicate::IsNull))
        }
        (Operator::IsNot, [left, right]) => {
            let identifier = left.as_identifier()?;
            matches!(right.as_literal(), Some((LiteralKind::Null, _)))
                .then_some((identifier, Predicate::IsNotNull))
        }
        (op, [left, right]) => {
            let op = compare_op(op)?;
            let (identifier, value, op) = match (left.as_identifier(), right.as_identifier()) {
                (Some(identifier), None) => (identifier, right, op),
                (None, Some(identifier)) => (identifier, left, op.mirrored()),
                _ => return None,
            };
            let predicate = match (value.as_literal()?, op) {
                ((LiteralKind::Null, _), CompareOp::Eq) => Predicate::IsNull,
                ((LiteralKind::Null, _), CompareOp::Ne) => Predicate::IsNotNull,
                ((LiteralKind::Null, _), _) => return None,
                ((_, value), op) => Predicate::Compare {
                    op,
                    value: value.to_string(),
                },
            };
            Some((identifier, predicate))
        }
        _ => None,
    }
}

fn like_predicate<'a>(node: &'a AstNode, escape: Option<&str>) -> Option<(&'a str, Predicate)> {
    if node.op() != Some(Operator::Like) {
        return None;
    }
    let [left, right] = node.children() else {
        return None;
    };
    let identifier = left.as_identifier()?;
    let (_, pattern) = value_literal(right)?;
    Some((identifier, Predicate::from_like(pattern, escape)?))
}

/// A literal operand other than NULL
fn value_literal(node: &AstNode) -> Option<(LiteralKind, &str)> {
    node.as_literal()
        .filter(|(kind, _)| *kind != LiteralKind::Null)
}

fn compare_op(op: Operator) -> Option<CompareOp> {
    Some(match op {
        Operator::Equal | Operator::DoubleEqual => CompareOp::Eq,
        Operator::NotEqual | Operator::BangEqual => CompareOp::Ne,
        Operator::LessThan => CompareOp::Lt,
        Operator::LessOrEqual => CompareOp::Le,
        Operator::GreaterThan => CompareOp::Gt,
        Operator::GreaterOrEqual => CompareOp::Ge,
        _ => return None,
    })
}
