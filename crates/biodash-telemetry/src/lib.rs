//! # biodash telemetry
//!
//! Structured logging and OpenTelemetry tracing for dashboard queries.
//!
//! Every executed query runs inside a span carrying the database system,
//! the statement text and the catalog label that produced it. The span gets
//! the number of rows returned, or the error, once the query finishes.

mod spans;
mod tracer;

pub use spans::{QuerySpanAttributes, query_span, record_error, record_row_count, safe_serialize};
pub use tracer::{init_telemetry, shutdown_telemetry, tracer_provider};

/// OpenTelemetry span attribute constants for database observability.
///
/// Names follow the OpenTelemetry semantic conventions for database clients,
/// plus a few dashboard-specific attributes.
pub mod attributes {
    pub const DB_SYSTEM: &str = "db.system";
    pub const DB_NAME: &str = "db.name";
    pub const DB_STATEMENT: &str = "db.statement";
    pub const DB_OPERATION: &str = "db.operation";

    pub const OTEL_STATUS_CODE: &str = "otel.status_code";
    pub const ERROR_MESSAGE: &str = "error.message";

    pub const BIODASH_QUERY_LABEL: &str = "biodash.query.label";
    pub const BIODASH_PARAM_COUNT: &str = "biodash.query.param_count";
    pub const BIODASH_ROW_COUNT: &str = "biodash.result.row_count";

    pub const SYSTEM_NAME: &str = "biodash";
}
