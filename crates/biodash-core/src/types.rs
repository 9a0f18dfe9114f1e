//! Shared value types for queries and their results

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Port the MySQL server listens on unless configured otherwise
pub const DEFAULT_PORT: u16 = 3306;

/// Parameters needed to open a connection to the research database
///
/// Supplied by the user for each session and never persisted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParameters {
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
}

impl ConnectionParameters {
    pub fn new(
        hostname: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            port: DEFAULT_PORT,
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// A single cell of a query result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned integer columns that do not fit the signed representation
    UInt(u64),
    Float(f64),
    /// Exact numeric kept in its textual form
    Decimal(String),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Decimal(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => i64::try_from(*v).ok(),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Decimal(s) => integral_decimal(s),
            _ => None,
        }
    }

    /// Numeric view used for chart axes
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::UInt(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Decimal(s) => s.parse().ok(),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Decimal(s) | Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

/// Parse a decimal literal such as `"42"` or `"42.000"` that carries no fraction.
fn integral_decimal(text: &str) -> Option<i64> {
    let text = text.trim();
    match text.split_once('.') {
        None => text.parse().ok(),
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole.parse().ok(),
        Some(_) => None,
    }
}

/// A positional parameter handed to the driver separately from the SQL text
///
/// Integers of every width are normalized to `Int(i64)`, the store's native
/// integer type, before they reach the driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Param {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Param {
    /// Turn a value read from one query into a parameter for the next one.
    pub fn from_value(value: &Value) -> Result<Param> {
        match value {
            Value::Int(v) => Ok(Param::Int(*v)),
            Value::UInt(v) => Param::try_from(*v),
            Value::Bool(b) => Ok(Param::Int(i64::from(*b))),
            Value::Float(v) => Ok(Param::Float(*v)),
            Value::Decimal(s) => match integral_decimal(s) {
                Some(v) => Ok(Param::Int(v)),
                None => s
                    .parse()
                    .map(Param::Float)
                    .map_err(|_| Error::InvalidParameter(format!("'{}' is not a number", s))),
            },
            Value::Text(s) => Ok(Param::Text(s.clone())),
            Value::Date(_) | Value::DateTime(_) => Ok(Param::Text(value.to_string())),
            Value::Null => Err(Error::InvalidParameter(
                "NULL cannot be used as a lookup key".to_string(),
            )),
            Value::Bytes(_) => Err(Error::InvalidParameter(
                "binary values cannot be bound".to_string(),
            )),
        }
    }

    /// SQL literal equivalent of the bound value, used for logging and tests.
    pub fn bound_literal(&self) -> String {
        match self {
            Param::Int(v) => v.to_string(),
            Param::Float(v) => v.to_string(),
            Param::Text(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }
}

macro_rules! lossless_int_param {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Param {
                fn from(value: $ty) -> Self {
                    Param::Int(i64::from(value))
                }
            }
        )*
    };
}

lossless_int_param!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! checked_int_param {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<$ty> for Param {
                type Error = Error;

                fn try_from(value: $ty) -> Result<Self> {
                    i64::try_from(value).map(Param::Int).map_err(|_| {
                        Error::InvalidParameter(format!("{} does not fit a 64-bit integer", value))
                    })
                }
            }
        )*
    };
}

checked_int_param!(u64, i128, u128, usize);

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Float(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<&String> for Param {
    fn from(value: &String) -> Self {
        Param::Text(value.clone())
    }
}

/// SQL text plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    sql: Cow<'static, str>,
    params: Vec<Param>,
}

impl SqlQuery {
    pub fn new(sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Number of `?` placeholders in the SQL text
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// Rows materialized from a query, with column names in SELECT order
///
/// The empty result (no columns, no rows) stands for "nothing could be read",
/// which is what a failed connection produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of `name`, or `MissingColumn`.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// All values of one column, top to bottom
    pub fn column_values(&self, name: &str) -> Result<Vec<&Value>> {
        let index = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Copy of this result keeping only the rows matching `predicate`
    pub fn filter_rows(&self, predicate: impl Fn(&[Value]) -> bool) -> QueryResult {
        QueryResult {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row))
                .cloned()
                .collect(),
        }
    }
}
