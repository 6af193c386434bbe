//! Expression AST for migration filters, join conditions, and column mappings.
//!
//! This module defines a closed, strongly-typed expression tree. The backend
//! persists expressions as a key-presence union; the internal representation
//! is an enum so every consumer matches exhaustively (see `api::protocol` for
//! the wire mapping).

use serde::{Deserialize, Serialize};

pub mod render;

pub use render::{render, render_tree, FilterTreeNode, NOT_AVAILABLE, UNKNOWN_EXPRESSION};

/// Well-known operator spellings.
///
/// `Arithmetic` and `Condition` carry their operator as a string because the
/// console round-trips whatever spelling the backend or the form produced
/// (`"="` and `"Equal"` both occur in persisted documents). Rendering
/// normalizes to the symbolic form; nothing else interprets the operator.
pub mod ops {
    pub const AND: &str = "AND";
    pub const OR: &str = "OR";

    /// True for the logical connectives, case-insensitive.
    pub fn is_logical(op: &str) -> bool {
        op.eq_ignore_ascii_case(AND) || op.eq_ignore_ascii_case(OR)
    }
}

/// A migration expression.
///
/// Every variant must be handled in `render()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Reference to a column (`field`) on a named table/entity.
    ///
    /// `field` is `None` while the user has picked a table but not yet a
    /// column; renderers show `?` in that state.
    Lookup {
        entity: String,
        field: Option<String>,
    },

    /// Literal value.
    Literal(Literal),

    /// Arithmetic operation: left operator right.
    Arithmetic {
        left: Box<Expression>,
        operator: String,
        right: Box<Expression>,
    },

    /// Function call: name(arguments...).
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },

    /// Binary predicate: a comparison (`=`, `!=`, `IN`, ...) or a logical
    /// connective (`AND`, `OR`).
    Condition {
        op: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

/// Literal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// SQL NULL. On the wire this is a literal object with no payload set.
    Null,
}

impl Expression {
    /// Create a column lookup.
    pub fn lookup(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Expression::Lookup {
            entity: entity.into(),
            field: Some(field.into()),
        }
    }

    /// Create a lookup with no column picked yet.
    pub fn lookup_entity(entity: impl Into<String>) -> Self {
        Expression::Lookup {
            entity: entity.into(),
            field: None,
        }
    }

    /// Create a string literal.
    pub fn lit_str(value: impl Into<String>) -> Self {
        Expression::Literal(Literal::String(value.into()))
    }

    /// Create an integer literal.
    pub fn lit_int(value: i64) -> Self {
        Expression::Literal(Literal::Integer(value))
    }

    /// Create a float literal.
    pub fn lit_float(value: f64) -> Self {
        Expression::Literal(Literal::Float(value))
    }

    /// Create a boolean literal.
    pub fn lit_bool(value: bool) -> Self {
        Expression::Literal(Literal::Boolean(value))
    }

    /// Create a NULL literal.
    pub fn lit_null() -> Self {
        Expression::Literal(Literal::Null)
    }

    /// Create a function call.
    pub fn func(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            arguments,
        }
    }

    /// Create an arithmetic operation.
    pub fn arith(left: Expression, operator: impl Into<String>, right: Expression) -> Self {
        Expression::Arithmetic {
            left: Box::new(left),
            operator: operator.into(),
            right: Box::new(right),
        }
    }

    /// Create a binary condition.
    pub fn condition(op: impl Into<String>, left: Expression, right: Expression) -> Self {
        Expression::Condition {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// self AND other.
    pub fn and(self, other: Expression) -> Self {
        Self::condition(ops::AND, self, other)
    }

    /// self OR other.
    pub fn or(self, other: Expression) -> Self {
        Self::condition(ops::OR, self, other)
    }

    /// True if this node is a condition whose operator is a logical
    /// connective (`AND`/`OR`, case-insensitive).
    pub fn is_logical_condition(&self) -> bool {
        matches!(self, Expression::Condition { op, .. } if ops::is_logical(op))
    }
}
