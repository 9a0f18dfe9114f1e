//! Substring search across organism names and project titles

use biodash_core::SqlQuery;

pub const SEARCH_SQL: &str = "SELECT 'Organism' AS Type, Name AS Result FROM Organism WHERE Name LIKE ? \
     UNION \
     SELECT 'Project' AS Type, Title AS Result FROM ProjectInfo WHERE Title LIKE ?";

/// Search statement for `term`, or `None` for the empty string.
///
/// The term is bound exactly as typed, surrounding spaces included, as the
/// same `%term%` pattern on both halves of the union.
pub fn search_query(term: &str) -> Option<SqlQuery> {
    if term.is_empty() {
        return None;
    }
    let pattern = format!("%{}%", term);
    Some(SqlQuery::new(SEARCH_SQL).bind(pattern.clone()).bind(pattern))
}
