//! Human-readable rendering of expressions.
//!
//! Rendering is total: every expression shape produces a string, missing
//! expressions render as `"N/A"`, and wire payloads with no recognized tag
//! display as [`UNKNOWN_EXPRESSION`]. Nothing in this module panics.

use super::{ops, Expression, Literal};

/// Shown for a payload that matches no known expression shape.
pub const UNKNOWN_EXPRESSION: &str = "Unknown Expression";

/// Shown when no expression is present at all.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a lookup whose column has not been picked yet.
const MISSING_FIELD: &str = "?";

/// Render an expression as display text.
pub fn render(expr: Option<&Expression>) -> String {
    let Some(expr) = expr else {
        return NOT_AVAILABLE.to_string();
    };

    match expr {
        Expression::Lookup { entity, field } => {
            format!("{}.{}", entity, field.as_deref().unwrap_or(MISSING_FIELD))
        }

        Expression::Literal(lit) => render_literal(lit),

        Expression::Arithmetic {
            left,
            operator,
            right,
        } => format!(
            "({} {} {})",
            render(Some(left.as_ref())),
            arithmetic_symbol(operator),
            render(Some(right.as_ref())),
        ),

        Expression::FunctionCall { name, arguments } => {
            let args: Vec<String> = arguments.iter().map(|a| render(Some(a))).collect();
            format!("{}({})", name, args.join(", "))
        }

        Expression::Condition { op, left, right } => format!(
            "({} {} {})",
            render(Some(left.as_ref())),
            condition_symbol(op),
            render(Some(right.as_ref())),
        ),
    }
}

fn render_literal(lit: &Literal) -> String {
    match lit {
        Literal::String(s) => format!("'{}'", s),
        Literal::Integer(n) => n.to_string(),
        Literal::Float(f) => f.to_string(),
        Literal::Boolean(true) => "TRUE".to_string(),
        Literal::Boolean(false) => "FALSE".to_string(),
        Literal::Null => "NULL".to_string(),
    }
}

/// Map a named arithmetic operator to its symbol; symbolic spellings pass
/// through unchanged.
fn arithmetic_symbol(op: &str) -> &str {
    match op {
        "Add" => "+",
        "Subtract" => "-",
        "Multiply" => "*",
        "Divide" => "/",
        other => other,
    }
}

/// Map a named comparison operator to its symbol. Logical connectives are
/// shown as uppercase keywords; anything else passes through unchanged.
fn condition_symbol(op: &str) -> String {
    match op {
        "Equal" => "=".to_string(),
        "NotEqual" => "!=".to_string(),
        "GreaterThan" => ">".to_string(),
        "GreaterThanOrEqual" => ">=".to_string(),
        "LessThan" => "<".to_string(),
        "LessThanOrEqual" => "<=".to_string(),
        other if ops::is_logical(other) => other.to_ascii_uppercase(),
        other => other.to_string(),
    }
}

// =============================================================================
// Filter Tree Presentation
// =============================================================================

/// A displayable filter tree.
///
/// Logical connectives become labeled branches, everything else becomes a
/// single leaf line. Used by the wizard's read-only filter view, which must
/// present OR-containing trees the builder itself never produces.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterTreeNode {
    /// A logical connective with its two operand subtrees.
    Branch {
        op: String,
        children: Vec<FilterTreeNode>,
    },
    /// A single rendered condition or expression.
    Leaf(String),
}

/// Build the displayable tree for an expression.
pub fn render_tree(expr: &Expression) -> FilterTreeNode {
    match expr {
        Expression::Condition { op, left, right } if ops::is_logical(op) => {
            FilterTreeNode::Branch {
                op: op.to_ascii_uppercase(),
                children: vec![render_tree(left), render_tree(right)],
            }
        }
        Expression::Condition { op, left, right } => FilterTreeNode::Leaf(format!(
            "{} {} {}",
            render(Some(left.as_ref())),
            op,
            render(Some(right.as_ref())),
        )),
        other => FilterTreeNode::Leaf(render(Some(other))),
    }
}

impl FilterTreeNode {
    /// Format the tree as indented text, two spaces per level.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, 0);
        out
    }

    fn write(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        match self {
            FilterTreeNode::Branch { op, children } => {
                out.push_str(&indent);
                out.push_str(op);
                out.push('\n');
                for child in children {
                    child.write(out, depth + 1);
                }
            }
            FilterTreeNode::Leaf(line) => {
                out.push_str(&indent);
                out.push_str(line);
                out.push('\n');
            }
        }
    }
}
