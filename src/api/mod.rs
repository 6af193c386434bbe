//! Backend API layer.
//!
//! The console delegates all execution, introspection, and persistence to a
//! remote backend service. This module holds the client, the wire protocol
//! mirror, and the [`MigrationBackend`] abstraction the rest of the crate is
//! written against.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   MigrationBackend                       │
//! │  login / list_connections / get_metadata / jobs / stats  │
//! └──────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                       ApiClient                          │
//! │                 (NDJSON over TCP)                        │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod backend;
mod client;
mod error;
pub mod protocol;

pub use backend::{MigrationBackend, MigrationBackendExt, RemoteBackend};
pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
