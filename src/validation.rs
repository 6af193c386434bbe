//! Validation of migration configurations.
//!
//! The wizard keeps its inputs mostly well-formed; validation is the final
//! gate before a config is handed to the backend, and the one place the
//! join-chain ordering rules are actually enforced. All findings are
//! collected - validation never stops at the first problem and never
//! mutates the config.

use crate::expr::Expression;
use crate::job::{MigrateItem, MigrationConfig};

/// Validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The job has no name.
    MissingJobName,
    /// A migrate item has no source table selection.
    MissingSource { item: usize },
    /// A migrate item has no destination table selection.
    MissingDestination { item: usize },
    /// `entities` and `matches` have drifted out of alignment.
    JoinMisaligned {
        item: usize,
        entities: usize,
        matches: usize,
    },
    /// A join condition's side is not a column lookup.
    JoinSideNotLookup { item: usize, join: usize },
    /// `entities[join]` does not name the entity of the join's right side.
    JoinTargetMismatch {
        item: usize,
        join: usize,
        entity: String,
        expected: String,
    },
    /// A join's left side references a table that is neither the source nor
    /// an earlier join target.
    JoinForwardReference {
        item: usize,
        join: usize,
        entity: String,
    },
    /// A mapping has an empty target column.
    EmptyMappingTarget { item: usize, mapping: usize },
    /// Two mappings write the same target column.
    DuplicateMappingTarget { item: usize, target: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingJobName => write!(f, "Job has no name"),
            ValidationError::MissingSource { item } => {
                write!(f, "Item {}: no source table selected", item)
            }
            ValidationError::MissingDestination { item } => {
                write!(f, "Item {}: no destination table selected", item)
            }
            ValidationError::JoinMisaligned {
                item,
                entities,
                matches,
            } => write!(
                f,
                "Item {}: join chain has {} target(s) but {} condition(s)",
                item, entities, matches
            ),
            ValidationError::JoinSideNotLookup { item, join } => {
                write!(f, "Item {}, join {}: condition side is not a column lookup", item, join)
            }
            ValidationError::JoinTargetMismatch {
                item,
                join,
                entity,
                expected,
            } => write!(
                f,
                "Item {}, join {}: condition references '{}' but the join target is '{}'",
                item, join, entity, expected
            ),
            ValidationError::JoinForwardReference { item, join, entity } => write!(
                f,
                "Item {}, join {}: left side references '{}', which is not the source or an earlier join target",
                item, join, entity
            ),
            ValidationError::EmptyMappingTarget { item, mapping } => {
                write!(f, "Item {}, mapping {}: target column is empty", item, mapping)
            }
            ValidationError::DuplicateMappingTarget { item, target } => {
                write!(f, "Item {}: target column '{}' is mapped more than once", item, target)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a config, returning every finding.
pub fn validate(config: &MigrationConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.name.trim().is_empty() {
        errors.push(ValidationError::MissingJobName);
    }

    for (index, item) in config.migration.migrate_items.iter().enumerate() {
        validate_item(index, item, &mut errors);
    }

    errors
}

fn validate_item(index: usize, item: &MigrateItem, errors: &mut Vec<ValidationError>) {
    if item.source.names.is_empty() {
        errors.push(ValidationError::MissingSource { item: index });
    }
    if item.destination.names.is_empty() {
        errors.push(ValidationError::MissingDestination { item: index });
    }

    validate_joins(index, item, errors);
    validate_mappings(index, item, errors);
}

fn validate_joins(index: usize, item: &MigrateItem, errors: &mut Vec<ValidationError>) {
    let load = &item.load;

    if load.entities.len() != load.matches.len() {
        errors.push(ValidationError::JoinMisaligned {
            item: index,
            entities: load.entities.len(),
            matches: load.matches.len(),
        });
        // Positional checks below assume alignment.
        return;
    }

    for (join, (target, cond)) in load.entities.iter().zip(&load.matches).enumerate() {
        match lookup_entity(&cond.right) {
            Some(entity) if entity == target => {}
            Some(entity) => errors.push(ValidationError::JoinTargetMismatch {
                item: index,
                join,
                entity: entity.to_string(),
                expected: target.clone(),
            }),
            None => errors.push(ValidationError::JoinSideNotLookup { item: index, join }),
        }

        // A join may only reach back: its left side must reference the
        // source table or a join target earlier in the chain.
        match lookup_entity(&cond.left) {
            Some(entity) => {
                let reaches_back = item.source.names.iter().any(|n| n == entity)
                    || load.entities[..join].iter().any(|e| e == entity);
                if !reaches_back {
                    errors.push(ValidationError::JoinForwardReference {
                        item: index,
                        join,
                        entity: entity.to_string(),
                    });
                }
            }
            None => errors.push(ValidationError::JoinSideNotLookup { item: index, join }),
        }
    }
}

fn validate_mappings(index: usize, item: &MigrateItem, errors: &mut Vec<ValidationError>) {
    let mut seen = std::collections::HashSet::new();

    for (mapping, m) in item.map.mappings.iter().enumerate() {
        if m.target.trim().is_empty() {
            errors.push(ValidationError::EmptyMappingTarget {
                item: index,
                mapping,
            });
            continue;
        }
        if !seen.insert(m.target.as_str()) {
            errors.push(ValidationError::DuplicateMappingTarget {
                item: index,
                target: m.target.clone(),
            });
        }
    }
}

fn lookup_entity(expr: &Expression) -> Option<&str> {
    match expr {
        Expression::Lookup { entity, .. } => Some(entity.as_str()),
        _ => None,
    }
}
