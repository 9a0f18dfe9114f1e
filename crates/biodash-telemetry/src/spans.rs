//! Span creation helpers for query execution

use crate::attributes::*;
use std::fmt::Display;
use tracing::Span;
use tracing::field::Empty;

/// Attributes known before a query runs
#[derive(Debug, Clone)]
pub struct QuerySpanAttributes {
    /// Driver name, e.g. "mysql"
    pub system: String,
    pub database: String,
    pub statement: String,
    /// Catalog label, or a fixed name for the search/profile queries
    pub label: String,
    pub param_count: usize,
}

/// Open the span that encloses one query execution.
///
/// The row count and any error are left empty here and filled in with
/// [`record_row_count`] and [`record_error`] once the query has finished.
/// Bound parameter values are not recorded, only their count.
pub fn query_span(attrs: &QuerySpanAttributes) -> Span {
    tracing::info_span!(
        "execute_query",
        { DB_SYSTEM } = %attrs.system,
        { DB_NAME } = %attrs.database,
        { DB_OPERATION } = "SELECT",
        { DB_STATEMENT } = %attrs.statement,
        { BIODASH_QUERY_LABEL } = %attrs.label,
        { BIODASH_PARAM_COUNT } = attrs.param_count,
        { BIODASH_ROW_COUNT } = Empty,
        { OTEL_STATUS_CODE } = Empty,
        { ERROR_MESSAGE } = Empty,
    )
}

pub fn record_row_count(span: &Span, rows: usize) {
    span.record(BIODASH_ROW_COUNT, rows);
}

/// Mark the query span as failed
pub fn record_error(span: &Span, error: &dyn Display) {
    span.record(OTEL_STATUS_CODE, "ERROR");
    span.record(ERROR_MESSAGE, tracing::field::display(error));
}

/// Helper to safely serialize to JSON string
pub fn safe_serialize<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<not serializable>".to_string())
}
