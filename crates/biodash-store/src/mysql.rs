//! MySQL connector

use crate::store::{Store, StoreConnection};
use async_trait::async_trait;
use biodash_core::{ConnectError, ConnectionParameters, Error, Param, QueryResult, Result, Value};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::mysql::{
    MySql, MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlDatabaseError, MySqlRow,
};
use sqlx::query::Query;
use sqlx::types::Decimal;
use sqlx::{Column, ConnectOptions, Connection, Executor, Row, Statement, TypeInfo, ValueRef};

// Server error numbers that identify a connection-time failure
const ER_DBACCESS_DENIED: u16 = 1044;
const ER_ACCESS_DENIED: u16 = 1045;
const ER_BAD_DB: u16 = 1049;
const ER_ACCESS_DENIED_NO_PASSWORD: u16 = 1698;

/// Connects to a MySQL server over TCP
#[derive(Debug, Clone, Default)]
pub struct MySqlStore;

impl MySqlStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Store for MySqlStore {
    fn system(&self) -> &'static str {
        "mysql"
    }

    async fn connect(
        &self,
        params: &ConnectionParameters,
    ) -> std::result::Result<Box<dyn StoreConnection>, ConnectError> {
        tracing::debug!(
            host = %params.hostname,
            port = params.port,
            user = %params.user,
            database = %params.database,
            "Connecting to MySQL"
        );

        let options = MySqlConnectOptions::new()
            .host(&params.hostname)
            .port(params.port)
            .username(&params.user)
            .password(&params.password)
            .database(&params.database);

        let conn = options.connect().await.map_err(classify_connect_error)?;

        Ok(Box::new(MySqlStoreConnection { conn: Some(conn) }))
    }
}

/// Map a driver error raised while connecting to the failure kinds users see
pub(crate) fn classify_connect_error(err: sqlx::Error) -> ConnectError {
    match &err {
        sqlx::Error::Database(db) => {
            let number = db
                .try_downcast_ref::<MySqlDatabaseError>()
                .map(|e| e.number());
            match number {
                Some(ER_ACCESS_DENIED | ER_DBACCESS_DENIED | ER_ACCESS_DENIED_NO_PASSWORD) => {
                    ConnectError::AuthRejected(db.message().to_string())
                }
                Some(ER_BAD_DB) => ConnectError::UnknownDatabase(db.message().to_string()),
                _ => ConnectError::Other(err.to_string()),
            }
        }
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut => {
            ConnectError::Unreachable(err.to_string())
        }
        _ => ConnectError::Other(err.to_string()),
    }
}

struct MySqlStoreConnection {
    conn: Option<MySqlConnection>,
}

#[async_trait]
impl StoreConnection for MySqlStoreConnection {
    async fn fetch_all(&mut self, sql: &str, params: &[Param]) -> Result<QueryResult> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| Error::message("MySQL connection already closed"))?;

        // Preparing first gives column names even when no row comes back
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
            conn.close()
                .await
                .map_err(|e| Error::Other(anyhow::anyhow!("Failed to close MySQL connection: {}", e)))?;
        }
        Ok(())
    }
}

fn bind_param<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    param: &Param,
) -> Query<'q, MySql, MySqlArguments> {
    match param {
        Param::Int(v) => query.bind(*v),
        Param::Float(v) => query.bind(*v),
        Param::Text(s) => query.bind(s.clone()),
    }
}

fn decode_cell(row: &MySqlRow, index: usize) -> Value {
    match row.try_get_raw(index) {
        Ok(raw) if !raw.is_null() => {}
        _ => return Value::Null,
    }

    let type_name = row.column(index).type_info().name();
    if type_name.contains("UNSIGNED")
        && let Ok(v) = row.try_get::<u64, _>(index)
    {
        return i64::try_from(v).map(Value::Int).unwrap_or(Value::UInt(v));
    }
    if let Ok(v) = row.try_get::<i64, _>(index) {
        return Value::Int(v);
    }
    if let Ok(v) = row.try_get::<bool, _>(index) {
        return Value::Bool(v);
    }
    if let Ok(v) = row.try_get::<f64, _>(index) {
        return Value::Float(v);
    }
    if let Ok(v) = row.try_get::<f32, _>(index) {
        return Value::Float(f64::from(v));
    }
    if let Ok(v) = row.try_get::<Decimal, _>(index) {
        return Value::Decimal(v.to_string());
    }
    if let Ok(v) = row.try_get::<NaiveDate, _>(index) {
        return Value::Date(v);
    }
    if let Ok(v) = row.try_get::<NaiveDateTime, _>(index) {
        return Value::DateTime(v);
    }
    if let Ok(v) = row.try_get::<NaiveTime, _>(index) {
        return Value::Text(v.to_string());
    }
    if let Ok(v) = row.try_get::<String, _>(index) {
        return Value::Text(v);
    }
    if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
        return Value::Bytes(v);
    }

    tracing::debug!(column = index, type_name, "Unsupported MySQL column type");
    Value::Null
}
