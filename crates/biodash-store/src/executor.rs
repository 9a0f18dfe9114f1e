//! Single-shot query execution
//!
//! Every call opens its own connection, runs one statement, materializes the
//! rows and closes the connection before returning. There is no pooling and
//! no reuse between calls.

use crate::store::Store;
use biodash_core::{ConnectionParameters, QueryResult, Result, SqlQuery};
use biodash_telemetry::{
    QuerySpanAttributes, query_span, record_error, record_row_count, safe_serialize,
};
use std::sync::Arc;
use tracing::{Instrument, Span};

/// Runs catalog queries against the store with fixed connection parameters
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn Store>,
    params: ConnectionParameters,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn Store>, params: ConnectionParameters) -> Self {
        Self { store, params }
    }

    pub fn params(&self) -> &ConnectionParameters {
        &self.params
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Execute `query` on a fresh connection.
    ///
    /// A connection failure is logged and yields the empty result without
    /// running the query. A failure after connecting (bad SQL, missing view)
    /// is returned as an error once the connection has been closed.
    ///
    /// The whole call, connect included, runs inside one query span.
    pub async fn execute(&self, label: &str, query: &SqlQuery) -> Result<QueryResult> {
        let span = query_span(&QuerySpanAttributes {
            system: self.store.system().to_string(),
            database: self.params.database.clone(),
            statement: query.sql().to_string(),
            label: label.to_string(),
            param_count: query.params().len(),
        });

        let result = self.run(label, query, &span).instrument(span.clone()).await;
        match &result {
            Ok(rows) => record_row_count(&span, rows.row_count()),
            Err(e) => record_error(&span, e),
        }
        result
    }

    async fn run(&self, label: &str, query: &SqlQuery, span: &Span) -> Result<QueryResult> {
        let mut conn = match self.store.connect(&self.params).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    host = %self.params.hostname,
                    database = %self.params.database,
                    query = %label,
                    "Connection failed, returning empty result"
                );
                record_error(span, &e);
                return Ok(QueryResult::empty());
            }
        };

        tracing::debug!(
            query = %label,
            sql = %query.sql(),
            params = %safe_serialize(&query.params()),
            "Executing query"
        );

        let result = conn.fetch_all(query.sql(), query.params()).await;

        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, query = %label, "Failed to close connection");
        }

        result
    }
}
