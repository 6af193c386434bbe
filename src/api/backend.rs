//! The backend abstraction used by the console.
//!
//! [`MigrationBackend`] is the async surface the wizard and dashboard are
//! written against; [`RemoteBackend`] is the production implementation over
//! an [`ApiClient`]. Tests substitute their own implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::client::ApiClient;
use super::error::ApiResult;
use super::protocol::{
    self, methods, ExecutionStats, JobDefinitionSummary, JobExecution,
};
use crate::job::{ConnectionSummary, MigrationConfig};
use crate::schema::{flatten_table_metadata, TableMetadata};

/// Async surface of the migration backend.
#[async_trait]
pub trait MigrationBackend: Send + Sync {
    /// Log in; implementations hold the session afterwards.
    async fn login(&self, username: &str, password: &str) -> ApiResult<()>;

    /// Log out, invalidating the session.
    async fn logout(&self) -> ApiResult<()>;

    /// List the configured connections.
    async fn list_connections(&self) -> ApiResult<Vec<ConnectionSummary>>;

    /// Introspect a connection's schema: table metadata keyed by name, with
    /// one-hop neighbor maps attached.
    async fn get_metadata(&self, connection_id: &str)
        -> ApiResult<HashMap<String, TableMetadata>>;

    /// Persist a job definition; returns the id the backend assigned.
    async fn create_job_definition(&self, config: &MigrationConfig) -> ApiResult<String>;

    /// List stored job definitions.
    async fn get_job_definitions(&self) -> ApiResult<Vec<JobDefinitionSummary>>;

    /// List recent executions, newest first.
    async fn get_job_executions(&self, limit: Option<i32>) -> ApiResult<Vec<JobExecution>>;

    /// Aggregate execution counters for the dashboard.
    async fn get_execution_stats(&self) -> ApiResult<ExecutionStats>;
}

/// Extension methods shared by every backend implementation.
#[async_trait]
pub trait MigrationBackendExt: MigrationBackend {
    /// Fetch metadata for several connections in parallel.
    async fn get_metadata_batch(
        &self,
        connection_ids: &[String],
    ) -> ApiResult<Vec<HashMap<String, TableMetadata>>> {
        let futures: Vec<_> = connection_ids
            .iter()
            .map(|id| self.get_metadata(id))
            .collect();

        let results = futures::future::join_all(futures).await;
        results.into_iter().collect()
    }

    /// Metadata prefetch that degrades instead of failing.
    ///
    /// Used where metadata is optional enrichment (diagram preview while the
    /// user is still picking tables); a failure is logged and the caller
    /// proceeds without.
    async fn try_get_metadata(
        &self,
        connection_id: &str,
    ) -> Option<HashMap<String, TableMetadata>> {
        match self.get_metadata(connection_id).await {
            Ok(tables) => Some(tables),
            Err(e) => {
                debug!(connection_id, error = %e, "metadata prefetch failed");
                None
            }
        }
    }

    /// Fetch a connection's metadata and expand it to the full foreign-key
    /// closure for the schema diagram.
    async fn get_schema_closure(
        &self,
        connection_id: &str,
    ) -> ApiResult<HashMap<String, TableMetadata>> {
        let tables = self.get_metadata(connection_id).await?;
        Ok(flatten_table_metadata(&tables))
    }
}

// Blanket implementation for all MigrationBackend implementations.
impl<T: MigrationBackend + ?Sized> MigrationBackendExt for T {}

/// MigrationBackend implementation over the NDJSON client.
pub struct RemoteBackend {
    client: Arc<ApiClient>,
}

impl RemoteBackend {
    /// Wrap a shared client.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Wrap an owned client.
    pub fn with_client(client: ApiClient) -> Self {
        Self::new(Arc::new(client))
    }

    /// The underlying client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl MigrationBackend for RemoteBackend {
    async fn login(&self, username: &str, password: &str) -> ApiResult<()> {
        self.client.login(username, password).await
    }

    async fn logout(&self) -> ApiResult<()> {
        self.client.logout().await
    }

    async fn list_connections(&self) -> ApiResult<Vec<ConnectionSummary>> {
        let response: protocol::ListConnectionsResponse = self
            .client
            .request(methods::LIST_CONNECTIONS, protocol::ListConnectionsParams {})
            .await?;
        Ok(response.connections)
    }

    async fn get_metadata(
        &self,
        connection_id: &str,
    ) -> ApiResult<HashMap<String, TableMetadata>> {
        let response: protocol::GetMetadataResponse = self
            .client
            .request(
                methods::GET_METADATA,
                protocol::GetMetadataParams {
                    connection_id: connection_id.to_string(),
                },
            )
            .await?;
        Ok(response.tables)
    }

    async fn create_job_definition(&self, config: &MigrationConfig) -> ApiResult<String> {
        let response: protocol::CreateJobResponse = self
            .client
            .request(
                methods::CREATE_JOB,
                protocol::CreateJobParams {
                    definition: config.into(),
                },
            )
            .await?;
        Ok(response.id)
    }

    async fn get_job_definitions(&self) -> ApiResult<Vec<JobDefinitionSummary>> {
        let response: protocol::ListJobsResponse = self
            .client
            .request(methods::LIST_JOBS, protocol::ListJobsParams {})
            .await?;
        Ok(response.definitions)
    }

    async fn get_job_executions(&self, limit: Option<i32>) -> ApiResult<Vec<JobExecution>> {
        let response: protocol::ListExecutionsResponse = self
            .client
            .request(
                methods::LIST_EXECUTIONS,
                protocol::ListExecutionsParams { limit },
            )
            .await?;
        Ok(response.executions)
    }

    async fn get_execution_stats(&self) -> ApiResult<ExecutionStats> {
        self.client
            .request(methods::EXECUTION_STATS, protocol::ExecutionStatsParams {})
            .await
    }
}
