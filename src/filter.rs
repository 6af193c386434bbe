//! Filter rows and the flatten/build pair.
//!
//! The wizard edits a filter as a flat, ordered list of simple conditions
//! ([`FilterRow`]); the persisted form is a left-nested chain of AND-combined
//! [`Condition`](crate::expr::Expression::Condition) nodes. `flatten` and
//! `build` convert between the two. Both only ever operate on the canonical
//! chain shape `AND(AND(...(first, second), ...), last)` - OR-containing
//! trees built elsewhere are displayed read-only (see
//! [`render_tree`](crate::expr::render_tree)) and are not guaranteed to
//! round-trip here.
//!
//! `build` stores every right-hand value as a string literal regardless of
//! its apparent type. This is a deliberate, known limitation of the filter
//! form, not something to repair during conversion; `flatten` mirrors it by
//! degrading non-string literals to their display text.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::expr::{ops, Expression, Literal};

/// One simple condition as edited in a filter form row.
///
/// Rows are ephemeral: they are materialized from the persisted chain on
/// load, and the whole chain is rebuilt from the rows on every edit. The
/// `id` exists only so the form can track rows across re-renders; it is
/// regenerated by every `flatten` call and takes no part in round-trip
/// equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRow {
    pub id: String,
    /// Table/entity of the left-hand lookup.
    pub entity: String,
    /// Column of the left-hand lookup; `None` until the user picks one.
    pub column: Option<String>,
    /// Comparison operator, kept verbatim.
    pub op: String,
    /// Right-hand value, always edited and stored as text.
    pub value: String,
}

impl FilterRow {
    pub fn new(
        entity: impl Into<String>,
        column: Option<String>,
        op: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            entity: entity.into(),
            column,
            op: op.into(),
            value: value.into(),
        }
    }
}

/// Flatten a persisted filter chain into ordered form rows.
///
/// Walks the canonical chain top-down: each `AND` level contributes the
/// simple condition in its `right` branch, then descent continues into
/// `left`. The chain nests newest-at-the-top, so the accumulated rows are
/// reversed before returning - the result lists filters oldest first, the
/// order the user added them.
///
/// Malformed shapes degrade instead of failing: a missing expression yields
/// an empty list, a non-lookup left side yields empty entity/column fields,
/// and a non-condition link is skipped with a warning.
pub fn flatten(expr: Option<&Expression>) -> Vec<FilterRow> {
    let mut rows = Vec::new();
    let Some(mut node) = expr else {
        return rows;
    };

    loop {
        match node {
            Expression::Condition { op, left, right } if op.eq_ignore_ascii_case(ops::AND) => {
                match right.as_ref() {
                    Expression::Condition { .. } => rows.push(row_from_condition(right)),
                    other => {
                        warn!(?other, "filter chain link is not a condition; skipping");
                    }
                }
                node = left.as_ref();
            }
            Expression::Condition { .. } => {
                // Deepest (oldest) simple filter in the chain.
                rows.push(row_from_condition(node));
                break;
            }
            other => {
                warn!(?other, "filter expression is not a condition chain");
                break;
            }
        }
    }

    rows.reverse();
    rows
}

/// Rebuild the persisted chain from ordered form rows.
///
/// Folds left-to-right with `AND`, producing exactly the left-nested shape
/// `flatten` expects, so `flatten(build(rows))` recovers the rows (ids
/// aside) for any list of string-valued, AND-combined filters.
pub fn build(rows: &[FilterRow]) -> Option<Expression> {
    let mut iter = rows.iter();
    let first = iter.next()?;

    let mut chain = simple_condition(first);
    for row in iter {
        chain = Expression::condition(ops::AND, chain, simple_condition(row));
    }
    Some(chain)
}

fn simple_condition(row: &FilterRow) -> Expression {
    Expression::Condition {
        op: row.op.clone(),
        left: Box::new(Expression::Lookup {
            entity: row.entity.clone(),
            field: row.column.clone(),
        }),
        // Always a string literal; see the module docs.
        right: Box::new(Expression::Literal(Literal::String(row.value.clone()))),
    }
}

fn row_from_condition(expr: &Expression) -> FilterRow {
    let Expression::Condition { op, left, right } = expr else {
        // Callers only hand us conditions; keep the degraded shape anyway.
        return FilterRow::new("", None, "", "");
    };

    let (entity, column) = match left.as_ref() {
        Expression::Lookup { entity, field } => (entity.clone(), field.clone()),
        other => {
            warn!(?other, "filter left side is not a lookup");
            (String::new(), None)
        }
    };

    let value = match right.as_ref() {
        Expression::Literal(Literal::String(s)) => s.clone(),
        Expression::Literal(Literal::Integer(n)) => n.to_string(),
        Expression::Literal(Literal::Float(f)) => f.to_string(),
        Expression::Literal(Literal::Boolean(true)) => "TRUE".to_string(),
        Expression::Literal(Literal::Boolean(false)) => "FALSE".to_string(),
        Expression::Literal(Literal::Null) => String::new(),
        other => {
            warn!(?other, "filter right side is not a literal");
            String::new()
        }
    };

    FilterRow::new(entity, column, op.clone(), value)
}
