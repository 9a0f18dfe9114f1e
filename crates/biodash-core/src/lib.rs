//! Core types for the biodash dashboard
//!
//! This crate provides the shared vocabulary of the workspace: connection
//! parameters, bound parameters, tabular query results, configuration and
//! the error type every other crate returns.

pub mod config;
pub mod error;
pub mod types;

// Re-exports
pub use config::{BackendKind, DashConfig, DatabaseConfig, ServerConfig};
pub use error::{ConnectError, Error, Result};
pub use types::{ConnectionParameters, DEFAULT_PORT, Param, QueryResult, SqlQuery, Value};
