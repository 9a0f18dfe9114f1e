//! IN-list filters with one bound placeholder per selected value

use biodash_core::{Param, SqlQuery};

/// `count` comma-separated `?` placeholders
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Appends `WHERE <column> IN (?, ...)` to a base query.
///
/// Selected values are always bound as parameters, never spliced into the
/// SQL text.
#[derive(Debug, Clone, Copy)]
pub struct InListFilter {
    base: &'static str,
    column: &'static str,
}

impl InListFilter {
    pub const fn new(base: &'static str, column: &'static str) -> Self {
        Self { base, column }
    }

    /// Build the statement for `values`. Duplicate values are bound once, in
    /// first-seen order; an empty selection yields the unfiltered base query.
    pub fn build(&self, values: impl IntoIterator<Item = Param>) -> SqlQuery {
        let mut selected: Vec<Param> = Vec::new();
        for value in values {
            if !selected.contains(&value) {
                selected.push(value);
            }
        }

        if selected.is_empty() {
            return SqlQuery::new(self.base);
        }

        let sql = format!(
            "{} WHERE {} IN ({})",
            self.base,
            self.column,
            placeholders(selected.len())
        );
        SqlQuery::new(sql).with_params(selected)
    }
}
