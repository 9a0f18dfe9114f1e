//! Connector traits shared by the MySQL and SQLite backends

use async_trait::async_trait;
use biodash_core::{BackendKind, ConnectError, ConnectionParameters, Param, QueryResult, Result};
use std::sync::Arc;

use crate::mysql::MySqlStore;
use crate::sqlite::SqliteStore;

/// Opens connections to the research database
#[async_trait]
pub trait Store: Send + Sync {
    /// Database system name reported in telemetry ("mysql", "sqlite")
    fn system(&self) -> &'static str;

    /// Open one connection. Failure is returned as a value, never a panic.
    async fn connect(
        &self,
        params: &ConnectionParameters,
    ) -> std::result::Result<Box<dyn StoreConnection>, ConnectError>;
}

/// A single open connection, used for one query and then closed
#[async_trait]
pub trait StoreConnection: Send {
    /// Run `sql` with `params` bound positionally and materialize every row.
    async fn fetch_all(&mut self, sql: &str, params: &[Param]) -> Result<QueryResult>;

    /// Release the connection. Further queries on it fail.
    async fn close(&mut self) -> Result<()>;
}

/// Store implementation for the configured backend
pub fn store_for(backend: BackendKind) -> Arc<dyn Store> {
    match backend {
        BackendKind::Mysql => Arc::new(MySqlStore::new()),
        BackendKind::Sqlite => Arc::new(SqliteStore::new()),
    }
}

/// Open a connection and close it straight away, reporting whether the
/// parameters are usable.
pub async fn check_connection(
    store: &dyn Store,
    params: &ConnectionParameters,
) -> std::result::Result<(), ConnectError> {
    let mut conn = store.connect(params).await?;
    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "Failed to close connection after connectivity check");
    }
    Ok(())
}
