//! Load step: the join chain hanging off a migrate item's source table.
//!
//! A load step keeps two positionally aligned sequences: `entities`, the join
//! target table names, and `matches`, the join conditions connecting them.
//! `entities[i]` names the table referenced by `matches[i]`'s right-hand
//! lookup. Editing operations keep the two in lockstep; the chain-ordering
//! invariant (a join may only reference the source table or an earlier join
//! target on its left side) is checked by [`validation`](crate::validation).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::expr::Expression;

/// One join condition; both sides are conventionally lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinCondition {
    pub left: Expression,
    pub right: Expression,
}

/// Which side of a join condition an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    Left,
    Right,
}

/// The ordered join chain of a migrate item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadStep {
    /// Join target table names, aligned with `matches`.
    pub entities: Vec<String>,
    /// Join conditions, aligned with `entities`.
    pub matches: Vec<JoinCondition>,
}

impl LoadStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of joins in the chain.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Tables from `tables` that are neither the source nor already a join
    /// target. The wizard uses this to decide whether "add join" is enabled.
    pub fn available_targets<'a>(&self, source_table: &str, tables: &'a [String]) -> Vec<&'a str> {
        tables
            .iter()
            .map(String::as_str)
            .filter(|t| *t != source_table && !self.entities.iter().any(|e| e == t))
            .collect()
    }

    /// Append a join against the first table not yet used.
    ///
    /// Both sides start as column-less lookups; the user picks matching
    /// columns afterwards. When every table is already in use this is a
    /// logged no-op - the caller disables the action in that state, so a
    /// hard error would only duplicate the guard.
    pub fn add_join(&mut self, source_table: &str, tables: &[String]) -> bool {
        let Some(target) = self
            .available_targets(source_table, tables)
            .first()
            .map(|t| t.to_string())
        else {
            warn!(source_table, "no unused join target available; add_join skipped");
            return false;
        };

        self.matches.push(JoinCondition {
            left: Expression::lookup_entity(source_table),
            right: Expression::lookup_entity(target.as_str()),
        });
        self.entities.push(target);
        true
    }

    /// Point the join at `index` at a different target table.
    ///
    /// Resets the column selection on both sides: a column picked for the
    /// old table may not exist on the new one, so the user must re-pick.
    pub fn set_join_table(&mut self, index: usize, new_table: &str) {
        if index >= self.len() {
            warn!(index, "set_join_table index out of range");
            return;
        }

        self.entities[index] = new_table.to_string();
        self.matches[index].right = Expression::lookup_entity(new_table);
        clear_lookup_field(&mut self.matches[index].left);
    }

    /// Change the entity of one side of the join at `index`.
    ///
    /// Same stale-column rule as [`set_join_table`](Self::set_join_table):
    /// the side's column resets to unpicked.
    pub fn set_join_entity(&mut self, index: usize, side: JoinSide, entity: &str) {
        let Some(cond) = self.matches.get_mut(index) else {
            warn!(index, "set_join_entity index out of range");
            return;
        };
        *side_mut(cond, side) = Expression::lookup_entity(entity);
    }

    /// Pick the column for one side of the join at `index`.
    pub fn set_join_column(&mut self, index: usize, side: JoinSide, column: &str) {
        let Some(cond) = self.matches.get_mut(index) else {
            warn!(index, "set_join_column index out of range");
            return;
        };
        match side_mut(cond, side) {
            Expression::Lookup { field, .. } => *field = Some(column.to_string()),
            other => warn!(?other, "join side is not a lookup; column not set"),
        }
    }

    /// Remove the join at `index`, keeping the two sequences aligned.
    pub fn remove_join(&mut self, index: usize) {
        if index >= self.len() || index >= self.matches.len() {
            warn!(index, "remove_join index out of range");
            return;
        }
        self.entities.remove(index);
        self.matches.remove(index);
    }
}

fn side_mut(cond: &mut JoinCondition, side: JoinSide) -> &mut Expression {
    match side {
        JoinSide::Left => &mut cond.left,
        JoinSide::Right => &mut cond.right,
    }
}

fn clear_lookup_field(expr: &mut Expression) {
    match expr {
        Expression::Lookup { field, .. } => *field = None,
        other => warn!(?other, "join side is not a lookup; field not cleared"),
    }
}
