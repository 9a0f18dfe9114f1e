//! Aggregations over materialized results
//!
//! The high-funded projects view returns one row per (project, organism)
//! pair. It is collapsed here into one summary per project for the chart and
//! one detail block per project listing its organisms.

use biodash_core::{QueryResult, Result, Value};
use serde::Serialize;
use std::collections::BTreeMap;

pub const PROJECT_TITLE: &str = "ProjectTitle";
pub const TOTAL_FUNDING: &str = "TotalFunding";
pub const PROJECT_STATUS: &str = "ProjectStatus";
pub const ORGANISM_NAME: &str = "OrganismName";
pub const ORGANISM_COUNT: &str = "OrganismCount";
pub const DOMAIN: &str = "Domain";
pub const ECOSYSTEM_NAME: &str = "EcosystemName";
pub const COUNT: &str = "Count";

/// Number of rows per distinct value of `column`, most frequent first.
///
/// Ties keep the order in which values first appear. NULL cells are not
/// counted.
pub fn count_by(result: &QueryResult, column: &str) -> Result<QueryResult> {
    let columns = vec![column.to_string(), COUNT.to_string()];
    if result.columns().is_empty() {
        return Ok(QueryResult::new(columns, Vec::new()));
    }

    let mut counts: Vec<(&Value, i64)> = Vec::new();
    for value in result.column_values(column)? {
        if value.is_null() {
            continue;
        }
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }
    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let rows = counts
        .into_iter()
        .map(|(value, n)| vec![value.clone(), Value::Int(n)])
        .collect();
    Ok(QueryResult::new(columns, rows))
}

/// One project of the high-funded view, as plotted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub title: String,
    /// First non-null funding value of the project's rows
    pub total_funding: Value,
    /// First non-null status of the project's rows
    pub status: Value,
    /// Rows with a non-null organism name
    pub organism_count: usize,
}

/// An organism listed under a project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganismEntry {
    pub name: Value,
    pub domain: Value,
    pub ecosystem: Value,
}

/// Detail block for one project of the high-funded view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDetail {
    pub title: String,
    /// Funding of the project's first row
    pub total_funding: Value,
    /// Status of the project's first row
    pub status: Value,
    /// Number of rows the project has in the view
    pub organism_count: usize,
    pub organisms: Vec<OrganismEntry>,
}

impl ProjectDetail {
    pub fn heading(&self) -> String {
        format!("Project: {}", self.title)
    }

    /// "Total Funding: $X.XX million". The view reports funding in millions.
    pub fn funding_text(&self) -> String {
        match self.total_funding.as_f64() {
            Some(millions) => format!("Total Funding: ${:.2} million", millions),
            None => format!("Total Funding: {}", self.total_funding),
        }
    }
}

/// Row indices per project title, ordered by title. Rows without a title are
/// left out.
fn group_by_title(result: &QueryResult) -> Result<BTreeMap<String, Vec<usize>>> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (row, title) in result.column_values(PROJECT_TITLE)?.into_iter().enumerate() {
        if title.is_null() {
            continue;
        }
        groups.entry(title.to_string()).or_default().push(row);
    }
    Ok(groups)
}

fn first_non_null(result: &QueryResult, rows: &[usize], column: usize) -> Value {
    rows.iter()
        .map(|&r| &result.rows()[r][column])
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}

/// Collapse the high-funded view into one summary per project title.
pub fn summarize_projects(result: &QueryResult) -> Result<Vec<ProjectSummary>> {
    if result.columns().is_empty() {
        return Ok(Vec::new());
    }

    let funding = result.require_column(TOTAL_FUNDING)?;
    let status = result.require_column(PROJECT_STATUS)?;
    let organism = result.require_column(ORGANISM_NAME)?;

    Ok(group_by_title(result)?
        .into_iter()
        .map(|(title, rows)| ProjectSummary {
            total_funding: first_non_null(result, &rows, funding),
            status: first_non_null(result, &rows, status),
            organism_count: rows
                .iter()
                .filter(|&&r| !result.rows()[r][organism].is_null())
                .count(),
            title,
        })
        .collect())
}

/// Chart data for the project summaries
pub fn summary_table(summaries: &[ProjectSummary]) -> QueryResult {
    let columns = [PROJECT_TITLE, TOTAL_FUNDING, PROJECT_STATUS, ORGANISM_COUNT]
        .into_iter()
        .map(String::from)
        .collect();
    let rows = summaries
        .iter()
        .map(|s| {
            let count = i64::try_from(s.organism_count).unwrap_or(i64::MAX);
            vec![
                Value::Text(s.title.clone()),
                s.total_funding.clone(),
                s.status.clone(),
                Value::Int(count),
            ]
        })
        .collect();
    QueryResult::new(columns, rows)
}

/// One detail block per project title, with every row listed as an organism.
pub fn project_details(result: &QueryResult) -> Result<Vec<ProjectDetail>> {
    if result.columns().is_empty() {
        return Ok(Vec::new());
    }

    let funding = result.require_column(TOTAL_FUNDING)?;
    let status = result.require_column(PROJECT_STATUS)?;
    let organism = result.require_column(ORGANISM_NAME)?;
    let domain = result.require_column(DOMAIN)?;
    let ecosystem = result.require_column(ECOSYSTEM_NAME)?;

    Ok(group_by_title(result)?
        .into_iter()
        .map(|(title, rows)| {
            let first = &result.rows()[rows[0]];
            ProjectDetail {
                total_funding: first[funding].clone(),
                status: first[status].clone(),
                organism_count: rows.len(),
                organisms: rows
                    .iter()
                    .map(|&r| {
                        let row = &result.rows()[r];
                        OrganismEntry {
                            name: row[organism].clone(),
                            domain: row[domain].clone(),
                            ecosystem: row[ecosystem].clone(),
                        }
                    })
                    .collect(),
                title,
            }
        })
        .collect())
}
