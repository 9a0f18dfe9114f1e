//! Terminal rendering of views: box-drawn tables, horizontal bar charts and
//! project detail lists, or the JSON document with `--format json`.

use crate::args::OutputFormat;
use anyhow::Result;
use biodash_catalog::{CatalogEntry, Chart, ProjectDetail, Role, Section, ViewOutput};
use biodash_core::QueryResult;
use serde::Serialize;

/// Maximum column width before truncation
const MAX_COLUMN_WIDTH: usize = 32;

/// Width of the longest bar in a chart
const BAR_WIDTH: usize = 40;

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_view(&self, view: &ViewOutput) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Self::json(view);
        }

        let mut output = String::new();
        output.push_str(&view.heading);
        output.push('\n');
        output.push_str(&"=".repeat(view.heading.chars().count()));
        output.push('\n');
        if let Some(subheading) = &view.subheading {
            output.push_str(subheading);
            output.push('\n');
        }

        for section in &view.sections {
            output.push('\n');
            match section {
                Section::Table { title, data } => {
                    if let Some(title) = title {
                        output.push_str(title);
                        output.push('\n');
                    }
                    output.push_str(&Self::table(data));
                }
                Section::Chart(chart) => output.push_str(&Self::bar_chart(chart)?),
                Section::ProjectDetails { title, projects } => {
                    output.push_str(&Self::project_details(title, projects))
                }
            }
        }

        Ok(output)
    }

    pub fn format_result(&self, result: &QueryResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::json(result),
            OutputFormat::Table => Ok(Self::table(result)),
        }
    }

    pub fn format_names(&self, names: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::json(&names),
            OutputFormat::Table => Ok(names.iter().map(|n| format!("{}\n", n)).collect()),
        }
    }

    pub fn format_catalog(&self, roles: &[Role]) -> Result<String> {
        if self.format == OutputFormat::Json {
            #[derive(Serialize)]
            struct RoleQueries<'a> {
                role: Role,
                queries: &'a [&'static CatalogEntry],
            }
            let listing: Vec<_> = roles
                .iter()
                .map(|&role| RoleQueries {
                    role,
                    queries: role.entries(),
                })
                .collect();
            return Self::json(&listing);
        }

        let mut output = String::new();
        for role in roles {
            output.push_str(role.view_title());
            output.push('\n');
            let key_width = role
                .entries()
                .iter()
                .map(|e| e.key.len())
                .max()
                .unwrap_or(0);
            for entry in role.entries() {
                output.push_str(&format!(
                    "  {:width$}  {}\n",
                    entry.key,
                    entry.label,
                    width = key_width
                ));
            }
            output.push('\n');
        }
        Ok(output)
    }

    pub fn format_message(&self, message: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::json(&serde_json::json!({ "message": message })),
            OutputFormat::Table => Ok(format!("{}\n", message)),
        }
    }

    fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
        let mut text = serde_json::to_string_pretty(value)?;
        text.push('\n');
        Ok(text)
    }

    /// Truncate a string to max width with ellipsis
    fn truncate_value(value: &str, max_width: usize) -> String {
        if value.chars().count() <= max_width {
            value.to_string()
        } else if max_width <= 3 {
            value.chars().take(max_width).collect()
        } else {
            let take = max_width - 3;
            format!("{}...", value.chars().take(take).collect::<String>())
        }
    }

    fn pad(value: &str, width: usize) -> String {
        let len = value.chars().count();
        format!("{}{}", value, " ".repeat(width.saturating_sub(len)))
    }

    fn border(widths: &[usize], left: char, middle: char, right: char) -> String {
        let mut line = String::new();
        line.push(left);
        for (idx, width) in widths.iter().enumerate() {
            line.push_str(&"─".repeat(width + 2));
            line.push(if idx == widths.len() - 1 { right } else { middle });
        }
        line.push('\n');
        line
    }

    fn table(result: &QueryResult) -> String {
        if result.columns().is_empty() {
            return "(no results)\n".to_string();
        }

        let rows: Vec<Vec<String>> = result
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|v| Self::truncate_value(&v.to_string(), MAX_COLUMN_WIDTH))
                    .collect()
            })
            .collect();
        let headers: Vec<String> = result
            .columns()
            .iter()
            .map(|c| Self::truncate_value(c, MAX_COLUMN_WIDTH))
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut output = Self::border(&widths, '┌', '┬', '┐');
        output.push_str(&Self::table_row(&headers, &widths));
        output.push_str(&Self::border(&widths, '├', '┼', '┤'));
        for row in &rows {
            output.push_str(&Self::table_row(row, &widths));
        }
        output.push_str(&Self::border(&widths, '└', '┴', '┘'));

        let count = result.row_count();
        output.push_str(&format!(
            "({} row{})\n",
            count,
            if count == 1 { "" } else { "s" }
        ));
        output
    }

    fn table_row(cells: &[String], widths: &[usize]) -> String {
        let mut line = String::from("│");
        for (cell, width) in cells.iter().zip(widths) {
            line.push(' ');
            line.push_str(&Self::pad(cell, *width));
            line.push_str(" │");
        }
        line.push('\n');
        line
    }

    fn bar_chart(chart: &Chart) -> Result<String> {
        let mut output = format!("{}  ({} by {})\n", chart.title, chart.y, chart.x);
        let bars = chart.bars()?;
        if bars.is_empty() {
            output.push_str("(no data)\n");
            return Ok(output);
        }

        let labels: Vec<String> = bars
            .iter()
            .map(|(label, _)| Self::truncate_value(label, MAX_COLUMN_WIDTH))
            .collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max = bars
            .iter()
            .filter_map(|(_, v)| *v)
            .fold(0.0_f64, f64::max);

        for (row, (label, (_, value))) in labels.iter().zip(&bars).enumerate() {
            let (bar, text) = match value {
                Some(v) if max > 0.0 && *v > 0.0 => {
                    let len = ((v / max) * BAR_WIDTH as f64).round().max(1.0) as usize;
                    ("█".repeat(len), format!("{}", v))
                }
                Some(v) => (String::new(), format!("{}", v)),
                None => (String::new(), "-".to_string()),
            };

            let hover: Vec<String> = chart
                .hover_values(row)
                .into_iter()
                .map(|(name, v)| format!("{}={}", name, v))
                .collect();

            output.push_str(&format!(
                "  {} │{} {}",
                Self::pad(label, label_width),
                bar,
                text
            ));
            if !hover.is_empty() {
                output.push_str(&format!("  [{}]", hover.join(", ")));
            }
            output.push('\n');
        }
        Ok(output)
    }

    fn project_details(title: &str, projects: &[ProjectDetail]) -> String {
        let mut output = format!("{}\n", title);
        for project in projects {
            output.push_str(&format!("  {}\n", project.heading()));
            output.push_str(&format!("    {}\n", project.funding_text()));
            output.push_str(&format!("    Status: {}\n", project.status));
            output.push_str(&format!(
                "    Number of Organisms: {}\n",
                project.organism_count
            ));
            output.push_str("    Associated Organisms:\n");
            for organism in &project.organisms {
                output.push_str(&format!(
                    "      - {} ({}, {})\n",
                    organism.name, organism.domain, organism.ecosystem
                ));
            }
        }
        output
    }
}
