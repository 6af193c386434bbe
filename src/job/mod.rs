//! The migration configuration aggregate.
//!
//! A [`MigrationConfig`] is the document the wizard edits: job identity, the
//! source/destination connection pair, global settings, and an ordered list
//! of migrate items. The wizard holds the sole mutable copy and replaces it
//! wholesale on every edit through [`patch::apply`]; once saved, the backend
//! owns the durable copy.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::expr::Expression;
use crate::load::LoadStep;

pub mod patch;

pub use patch::{apply, ConfigPatch};

/// Connection summary as listed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSummary {
    pub id: String,
    pub name: String,
    pub driver: String,
}

/// The source/destination connection pair of a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPair {
    pub source: ConnectionSummary,
    pub destination: ConnectionSummary,
}

/// Table/file selection on one side of a migrate item.
///
/// `kind` is a backend-owned vocabulary (`"table"`, `"query"`, ...); the
/// console passes it through without interpreting it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub kind: String,
    pub names: Vec<String>,
}

/// One column mapping: a source expression written to a target column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub source: Expression,
    pub target: String,
}

/// The column mappings of a migrate item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapStep {
    pub mappings: Vec<Mapping>,
}

/// The row filter of a migrate item; `None` migrates every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterStep {
    pub expression: Option<Expression>,
}

/// Migration settings, global or per item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationSettings {
    /// Rows per batch; backend default when unset.
    pub batch_size: Option<u32>,
    /// Truncate the destination before loading.
    pub truncate_destination: bool,
    /// Abort the item on the first row error instead of skipping.
    pub stop_on_error: bool,
}

/// One source-table-to-destination-table migration unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrateItem {
    pub source: DataSource,
    pub destination: DataSource,
    pub load: LoadStep,
    pub map: MapStep,
    pub filter: FilterStep,
    pub settings: MigrationSettings,
}

/// The migration section: global settings plus the ordered items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Migration {
    pub settings: MigrationSettings,
    pub migrate_items: Vec<MigrateItem>,
}

/// The root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationConfig {
    pub name: String,
    pub description: String,
    /// ISO-8601 timestamp; the backend owns the format.
    pub creation_date: String,
    pub connections: ConnectionPair,
    pub migration: Migration,
}

impl MigrationConfig {
    /// Fresh config at wizard start.
    pub fn new(name: impl Into<String>, creation_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creation_date: creation_date.into(),
            ..Self::default()
        }
    }

    /// SHA-256 over the canonical JSON serialization, for draft dedup and
    /// change detection.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("config should always serialize");
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
