//! Schema metadata and the diagram-feed closure.
//!
//! Table metadata comes from the backend's introspection endpoint
//! (`metadata.get`) with one-hop neighbor maps already attached; this module
//! only models the shapes and walks them. Field names match the wire's
//! snake_case one-to-one.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Column description within a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,
    /// Database-specific type name.
    pub data_type: String,
    /// Whether NULL values are allowed.
    #[serde(default)]
    pub is_nullable: bool,
    /// Maximum length for string types.
    #[serde(default)]
    pub max_length: Option<i32>,
}

/// Foreign key description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyMetadata {
    /// Constraint name.
    pub name: String,
    /// Columns in the foreign key (ordered).
    pub columns: Vec<String>,
    /// Schema of the referenced table.
    #[serde(default)]
    pub referenced_schema: Option<String>,
    /// Name of the referenced table.
    pub referenced_table: String,
    /// Columns in the referenced table (ordered).
    pub referenced_columns: Vec<String>,
}

/// A table node in the schema graph.
///
/// `referenced_tables` and `referencing_tables` are the backend-provided
/// one-hop neighbor maps, used as adjacency for traversal. Self-referencing
/// and mutually-referencing foreign keys are legal real-world schemas, so
/// the same table (by id) can occur at several places in the nesting;
/// traversal dedups by qualified id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub name: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub columns: HashMap<String, ColumnMetadata>,
    #[serde(default)]
    pub primary_keys: Vec<String>,
    #[serde(default)]
    pub foreign_keys: HashMap<String, ForeignKeyMetadata>,
    #[serde(default)]
    pub referenced_tables: HashMap<String, TableMetadata>,
    #[serde(default)]
    pub referencing_tables: HashMap<String, TableMetadata>,
}

impl TableMetadata {
    /// Fully qualified id: `schema.name` when a schema is set, else `name`.
    pub fn qualified_id(&self) -> String {
        match self.schema.as_deref() {
            Some(schema) if !schema.is_empty() => format!("{}.{}", schema, self.name),
            _ => self.name.clone(),
        }
    }
}

/// Compute the set of tables transitively reachable from `tables` via
/// foreign-key references in either direction, keyed by qualified id.
///
/// Feeds the schema diagram: every reachable table appears exactly once, in
/// no particular order. Uses an explicit work stack and visited set so
/// cyclic or deeply nested neighbor maps cannot overflow the call stack.
pub fn flatten_table_metadata(
    tables: &HashMap<String, TableMetadata>,
) -> HashMap<String, TableMetadata> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut reachable: HashMap<String, TableMetadata> = HashMap::new();
    let mut stack: Vec<&TableMetadata> = tables.values().collect();

    while let Some(table) = stack.pop() {
        let id = table.qualified_id();
        if !visited.insert(id.clone()) {
            continue;
        }

        stack.extend(table.referenced_tables.values());
        stack.extend(table.referencing_tables.values());
        reachable.insert(id, table.clone());
    }

    reachable
}
