//! SQLite connector
//!
//! Serves the same catalog from a local file carrying the research schema.
//! `ConnectionParameters::database` is the file path; host and credentials
//! are ignored.

use crate::store::{Store, StoreConnection};
use async_trait::async_trait;
use biodash_core::{ConnectError, ConnectionParameters, Error, Param, QueryResult, Result, Value};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, ConnectOptions, Connection, Executor, Row, Statement, ValueRef};

/// Opens read-only connections to a SQLite database file
#[derive(Debug, Clone, Default)]
pub struct SqliteStore;

impl SqliteStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn system(&self) -> &'static str {
        "sqlite"
    }

    async fn connect(
        &self,
        params: &ConnectionParameters,
    ) -> std::result::Result<Box<dyn StoreConnection>, ConnectError> {
        tracing::debug!(path = %params.database, "Opening SQLite database");

        let options = SqliteConnectOptions::new()
            .filename(&params.database)
            .create_if_missing(false)
            .read_only(true);

        let conn = options.connect().await.map_err(|e| match e {
            sqlx::Error::Database(db) => ConnectError::UnknownDatabase(format!(
                "{}: {}",
                params.database,
                db.message()
            )),
            sqlx::Error::Io(io) => ConnectError::Unreachable(io.to_string()),
            other => ConnectError::Other(other.to_string()),
        })?;

        Ok(Box::new(SqliteStoreConnection { conn: Some(conn) }))
    }
}

struct SqliteStoreConnection {
    conn: Option<SqliteConnection>,
}

#[async_trait]
impl StoreConnection for SqliteStoreConnection {
    async fn fetch_all(&mut self, sql: &str, params: &[Param]) -> Result<QueryResult> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| Error::message("SQLite connection already closed"))?;

        let statement = (&mut *conn)
            .prepare(sql)
            .await
            .map_err(|e| Error::query_failed(sql, e))?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut query = statement.query();
        for param in params {
            query = bind_param(query, param);
        }

        let rows = query
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| Error::query_failed(sql, e))?;

        let rows: Vec<Vec<Value>> = rows
            .iter()
            .map(|row| (0..columns.len()).map(|i| decode_cell(row, i)).collect())
            .collect();

        Ok(QueryResult::new(columns, rows))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().await.map_err(|e| {
                Error::Other(anyhow::anyhow!("Failed to close SQLite connection: {}", e))
            })?;
        }
        Ok(())
    }
}

fn bind_param<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    param: &Param,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match param {
        Param::Int(v) => query.bind(*v),
        Param::Float(v) => query.bind(*v),
        Param::Text(s) => query.bind(s.clone()),
    }
}

fn decode_cell(row: &SqliteRow, index: usize) -> Value {
    match row.try_get_raw(index) {
        Ok(raw) if !raw.is_null() => {}
        _ => return Value::Null,
    }

    if let Ok(v) = row.try_get::<i64, _>(index) {
        return Value::Int(v);
    }
    if let Ok(v) = row.try_get::<f64, _>(index) {
        return Value::Float(v);
    }
    if let Ok(v) = row.try_get::<String, _>(index) {
        return Value::Text(v);
    }
    if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
        return Value::Bytes(v);
    }

    Value::Null
}
