//! Protocol types for backend communication.
//!
//! These types mirror the backend service's wire format exactly. Two shapes
//! differ from the internal model and are mapped here, losslessly in both
//! directions:
//!
//! - expressions travel as a key-presence union (`{"lookup": ...}`,
//!   `{"literal": {"string": ...}}`), mirrored by [`ExpressionWire`] and
//!   decoded into the internal [`Expression`] enum;
//! - lookups may carry the legacy `key` spelling next to `field`; decoding
//!   prefers `field` and falls back to `key`, encoding writes `field` only.
//!
//! Everything else (table metadata, connection summaries, settings) already
//! shares its snake_case shape with the internal model and is reused as-is.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::expr::{render, Expression, Literal, UNKNOWN_EXPRESSION};
use crate::job::{
    ConnectionPair, ConnectionSummary, DataSource, FilterStep, MapStep, Mapping, MigrateItem,
    Migration, MigrationConfig, MigrationSettings,
};
use crate::load::{JoinCondition, LoadStep};
use crate::schema::TableMetadata;

// ============================================================================
// Request/Response Envelope
// ============================================================================

/// Request envelope sent to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    /// Unique request ID for correlation.
    pub id: String,
    /// Method name (e.g., "connections.list").
    pub method: String,
    /// Session token, once logged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Method-specific parameters.
    pub params: serde_json::Value,
}

/// Response envelope received from the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    /// Request ID this response corresponds to.
    pub id: String,
    /// Whether the request succeeded.
    pub success: bool,
    /// Result data (present if success = true).
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Error information (present if success = false).
    #[serde(default)]
    pub error: Option<ErrorInfo>,
}

/// Error information in a failed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorInfo {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

// ============================================================================
// Method Names
// ============================================================================

/// Backend method names.
pub mod methods {
    pub const LOGIN: &str = "auth.login";
    pub const LOGOUT: &str = "auth.logout";
    pub const LIST_CONNECTIONS: &str = "connections.list";
    pub const GET_METADATA: &str = "metadata.get";
    pub const CREATE_JOB: &str = "jobs.create";
    pub const LIST_JOBS: &str = "jobs.list";
    pub const LIST_EXECUTIONS: &str = "executions.list";
    pub const EXECUTION_STATS: &str = "executions.stats";
}

// ============================================================================
// Request Parameters
// ============================================================================

/// Parameters for `auth.login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

/// Parameters for `auth.logout`.
#[derive(Debug, Clone, Serialize)]
pub struct LogoutParams {}

/// Parameters for `connections.list`.
#[derive(Debug, Clone, Serialize)]
pub struct ListConnectionsParams {}

/// Parameters for `metadata.get`.
#[derive(Debug, Clone, Serialize)]
pub struct GetMetadataParams {
    /// Connection to introspect.
    pub connection_id: String,
}

/// Parameters for `jobs.create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateJobParams {
    pub definition: MigrationConfigWire,
}

/// Parameters for `jobs.list`.
#[derive(Debug, Clone, Serialize)]
pub struct ListJobsParams {}

/// Parameters for `executions.list`.
#[derive(Debug, Clone, Serialize)]
pub struct ListExecutionsParams {
    /// Maximum number of executions to return, newest first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
}

/// Parameters for `executions.stats`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionStatsParams {}

// ============================================================================
// Response Types
// ============================================================================

/// Response from `auth.login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Session token to attach to subsequent requests.
    pub token: String,
}

/// Response from `connections.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListConnectionsResponse {
    pub connections: Vec<ConnectionSummary>,
}

/// Response from `metadata.get`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetMetadataResponse {
    /// Table metadata keyed by table name, neighbor maps attached.
    pub tables: HashMap<String, TableMetadata>,
}

/// Response from `jobs.create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobResponse {
    /// Id assigned to the stored job definition.
    pub id: String,
}

/// Job definition summary as listed by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDefinitionSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub creation_date: String,
}

/// Response from `jobs.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListJobsResponse {
    pub definitions: Vec<JobDefinitionSummary>,
}

/// One migration run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobExecution {
    pub id: String,
    pub job_id: String,
    pub job_name: String,
    /// Backend-owned vocabulary: "pending", "running", "succeeded", "failed".
    pub status: String,
    pub started_at: String,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub rows_migrated: i64,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from `executions.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListExecutionsResponse {
    pub executions: Vec<JobExecution>,
}

/// Response from `executions.stats`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExecutionStats {
    pub total: i64,
    pub succeeded: i64,
    pub failed: i64,
    pub running: i64,
    pub rows_migrated: i64,
}

// ============================================================================
// Expression Wire Format
// ============================================================================

/// Wire form of a lookup. `key` is the legacy spelling of `field`; see the
/// module docs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupWire {
    pub entity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Wire form of a literal: at most one payload field set, none meaning NULL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiteralWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
}

/// Wire form of an arithmetic operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArithmeticWire {
    pub left: Box<ExpressionWire>,
    pub right: Box<ExpressionWire>,
    pub operator: String,
}

/// Wire form of a function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallWire {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<ExpressionWire>,
}

/// Wire form of a binary condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionWire {
    pub op: String,
    pub left: Box<ExpressionWire>,
    pub right: Box<ExpressionWire>,
}

/// Wire form of an expression: a key-presence union. Exactly one tag is set
/// on well-formed payloads; decoding checks tags in declaration order, so a
/// payload that accidentally carries two resolves deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpressionWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LookupWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<LiteralWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arithmetic: Option<ArithmeticWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionWire>,
}

impl ExpressionWire {
    /// Decode into the internal model. `None` when no tag is recognized.
    pub fn decode(&self) -> Option<Expression> {
        if let Some(lookup) = &self.lookup {
            return Some(Expression::Lookup {
                entity: lookup.entity.clone(),
                // Prefer the canonical spelling, fall back to the legacy one.
                field: lookup.field.clone().or_else(|| lookup.key.clone()),
            });
        }
        if let Some(lit) = &self.literal {
            return Some(Expression::Literal(lit.decode()));
        }
        if let Some(arith) = &self.arithmetic {
            return Some(Expression::Arithmetic {
                left: Box::new(arith.left.decode_or_null()),
                operator: arith.operator.clone(),
                right: Box::new(arith.right.decode_or_null()),
            });
        }
        if let Some(call) = &self.function_call {
            return Some(Expression::FunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.iter().map(Self::decode_or_null).collect(),
            });
        }
        if let Some(cond) = &self.condition {
            return Some(Expression::Condition {
                op: cond.op.clone(),
                left: Box::new(cond.left.decode_or_null()),
                right: Box::new(cond.right.decode_or_null()),
            });
        }
        None
    }

    /// Decode a nested expression, degrading an unrecognized payload to a
    /// NULL literal so one bad node never fails a whole document.
    fn decode_or_null(&self) -> Expression {
        self.decode().unwrap_or_else(|| {
            warn!("expression payload matches no known shape; decoding as NULL");
            Expression::Literal(Literal::Null)
        })
    }

    /// Display text for a raw wire expression.
    pub fn display(&self) -> String {
        match self.decode() {
            Some(expr) => render(Some(&expr)),
            None => UNKNOWN_EXPRESSION.to_string(),
        }
    }
}

impl LiteralWire {
    /// Decode in payload priority order; no payload means NULL.
    fn decode(&self) -> Literal {
        if let Some(s) = &self.string {
            Literal::String(s.clone())
        } else if let Some(n) = self.integer {
            Literal::Integer(n)
        } else if let Some(f) = self.float {
            Literal::Float(f)
        } else if let Some(b) = self.boolean {
            Literal::Boolean(b)
        } else {
            Literal::Null
        }
    }
}

impl From<&Expression> for ExpressionWire {
    fn from(expr: &Expression) -> Self {
        match expr {
            Expression::Lookup { entity, field } => ExpressionWire {
                lookup: Some(LookupWire {
                    entity: entity.clone(),
                    field: field.clone(),
                    key: None,
                }),
                ..ExpressionWire::default()
            },
            Expression::Literal(lit) => ExpressionWire {
                literal: Some(lit.into()),
                ..ExpressionWire::default()
            },
            Expression::Arithmetic {
                left,
                operator,
                right,
            } => ExpressionWire {
                arithmetic: Some(ArithmeticWire {
                    left: Box::new(left.as_ref().into()),
                    right: Box::new(right.as_ref().into()),
                    operator: operator.clone(),
                }),
                ..ExpressionWire::default()
            },
            Expression::FunctionCall { name, arguments } => ExpressionWire {
                function_call: Some(FunctionCallWire {
                    name: name.clone(),
                    arguments: arguments.iter().map(Into::into).collect(),
                }),
                ..ExpressionWire::default()
            },
            Expression::Condition { op, left, right } => ExpressionWire {
                condition: Some(ConditionWire {
                    op: op.clone(),
                    left: Box::new(left.as_ref().into()),
                    right: Box::new(right.as_ref().into()),
                }),
                ..ExpressionWire::default()
            },
        }
    }
}

impl From<&Literal> for LiteralWire {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::String(s) => LiteralWire {
                string: Some(s.clone()),
                ..LiteralWire::default()
            },
            Literal::Integer(n) => LiteralWire {
                integer: Some(*n),
                ..LiteralWire::default()
            },
            Literal::Float(f) => LiteralWire {
                float: Some(*f),
                ..LiteralWire::default()
            },
            Literal::Boolean(b) => LiteralWire {
                boolean: Some(*b),
                ..LiteralWire::default()
            },
            Literal::Null => LiteralWire::default(),
        }
    }
}

// ============================================================================
// Config Document Wire Format
// ============================================================================

/// Wire form of a column mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingWire {
    pub source: ExpressionWire,
    pub target: String,
}

/// Wire form of the map step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapStepWire {
    #[serde(default)]
    pub mappings: Vec<MappingWire>,
}

/// Wire form of the filter step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<ExpressionWire>,
}

/// Wire form of a join condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinConditionWire {
    pub left: ExpressionWire,
    pub right: ExpressionWire,
}

/// Wire form of the load step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadStepWire {
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub matches: Vec<JoinConditionWire>,
}

/// Wire form of a migrate item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrateItemWire {
    #[serde(default)]
    pub source: DataSource,
    #[serde(default)]
    pub destination: DataSource,
    #[serde(default)]
    pub load: LoadStepWire,
    #[serde(default)]
    pub map: MapStepWire,
    #[serde(default)]
    pub filter: FilterWire,
    #[serde(default)]
    pub settings: MigrationSettings,
}

/// Wire form of the migration section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationWire {
    #[serde(default)]
    pub settings: MigrationSettings,
    #[serde(default)]
    pub migrate_items: Vec<MigrateItemWire>,
}

/// Wire form of the root config document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationConfigWire {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creation_date: String,
    #[serde(default)]
    pub connections: ConnectionPair,
    #[serde(default)]
    pub migration: MigrationWire,
}

impl MigrationConfigWire {
    /// Decode the whole document into the internal model.
    pub fn decode(&self) -> MigrationConfig {
        MigrationConfig {
            name: self.name.clone(),
            description: self.description.clone(),
            creation_date: self.creation_date.clone(),
            connections: self.connections.clone(),
            migration: Migration {
                settings: self.migration.settings.clone(),
                migrate_items: self
                    .migration
                    .migrate_items
                    .iter()
                    .map(MigrateItemWire::decode)
                    .collect(),
            },
        }
    }
}

impl MigrateItemWire {
    fn decode(&self) -> MigrateItem {
        MigrateItem {
            source: self.source.clone(),
            destination: self.destination.clone(),
            load: LoadStep {
                entities: self.load.entities.clone(),
                matches: self
                    .load
                    .matches
                    .iter()
                    .map(|m| JoinCondition {
                        left: m.left.decode_or_null(),
                        right: m.right.decode_or_null(),
                    })
                    .collect(),
            },
            map: MapStep {
                mappings: self
                    .map
                    .mappings
                    .iter()
                    .map(|m| Mapping {
                        source: m.source.decode_or_null(),
                        target: m.target.clone(),
                    })
                    .collect(),
            },
            filter: FilterStep {
                expression: self.filter.expression.as_ref().and_then(ExpressionWire::decode),
            },
            settings: self.settings.clone(),
        }
    }
}

impl From<&MigrationConfig> for MigrationConfigWire {
    fn from(config: &MigrationConfig) -> Self {
        MigrationConfigWire {
            name: config.name.clone(),
            description: config.description.clone(),
            creation_date: config.creation_date.clone(),
            connections: config.connections.clone(),
            migration: MigrationWire {
                settings: config.migration.settings.clone(),
                migrate_items: config
                    .migration
                    .migrate_items
                    .iter()
                    .map(Into::into)
                    .collect(),
            },
        }
    }
}

impl From<&MigrateItem> for MigrateItemWire {
    fn from(item: &MigrateItem) -> Self {
        MigrateItemWire {
            source: item.source.clone(),
            destination: item.destination.clone(),
            load: LoadStepWire {
                entities: item.load.entities.clone(),
                matches: item
                    .load
                    .matches
                    .iter()
                    .map(|m| JoinConditionWire {
                        left: (&m.left).into(),
                        right: (&m.right).into(),
                    })
                    .collect(),
            },
            map: MapStepWire {
                mappings: item
                    .map
                    .mappings
                    .iter()
                    .map(|m| MappingWire {
                        source: (&m.source).into(),
                        target: m.target.clone(),
                    })
                    .collect(),
            },
            filter: FilterWire {
                expression: item.filter.expression.as_ref().map(Into::into),
            },
            settings: item.settings.clone(),
        }
    }
}
