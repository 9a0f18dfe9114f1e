//! Database access for the biodash dashboard
//!
//! This crate opens single-use connections to the research database (MySQL,
//! or a SQLite file with the same schema) and runs parameterized read-only
//! queries through them. Every value reaches the driver as a bound
//! parameter; nothing is interpolated into SQL text.

pub mod executor;
pub mod mysql;
pub mod sqlite;
pub mod store;

// Re-exports
pub use executor::QueryExecutor;
pub use mysql::MySqlStore;
pub use sqlite::SqliteStore;
pub use store::{Store, StoreConnection, check_connection, store_for};
