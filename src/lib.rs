//! # Ferry
//!
//! Console core for configuring and monitoring data-migration jobs.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Wizard / Dashboard / CLI                 │
//! │        (edit steps, diagram feed, job monitoring)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [patches]
//! ┌─────────────────────────────────────────────────────────┐
//! │              MigrationConfig (Rust Types)                │
//! │     expressions + filters + joins + mappings + settings  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [wire mirror]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Backend Protocol (JSON)                 │
//! │          introspection, persistence, execution           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend service owns execution, schema introspection, and durable
//! storage; this crate owns the configuration document, the expression
//! model around it, and the client plumbing.

pub mod api;
pub mod config;
pub mod expr;
pub mod filter;
pub mod job;
pub mod load;
pub mod logging;
pub mod monitor;
pub mod schema;
pub mod validation;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::api::{ApiClient, ApiError, MigrationBackend, MigrationBackendExt, RemoteBackend};
    pub use crate::expr::{render, render_tree, Expression, FilterTreeNode, Literal};
    pub use crate::filter::{build, flatten, FilterRow};
    pub use crate::job::{
        apply, ConfigPatch, ConnectionPair, ConnectionSummary, DataSource, FilterStep, MapStep,
        Mapping, MigrateItem, Migration, MigrationConfig, MigrationSettings,
    };
    pub use crate::load::{JoinCondition, JoinSide, LoadStep};
    pub use crate::schema::{flatten_table_metadata, TableMetadata};
    pub use crate::validation::{validate, ValidationError};
}

// Also export the everyday types at the crate root.
pub use expr::{render, Expression, Literal};
pub use filter::{build, flatten, FilterRow};
pub use job::{apply, ConfigPatch, MigrationConfig};
pub use load::LoadStep;
pub use schema::{flatten_table_metadata, TableMetadata};
