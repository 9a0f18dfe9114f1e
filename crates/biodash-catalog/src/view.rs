//! Render-ready output of a dashboard view

use crate::aggregate::ProjectDetail;
use crate::catalog::ChartRecipe;
use biodash_core::{QueryResult, Result, Value};
use serde::Serialize;

/// Everything a front end needs to draw one page
#[derive(Debug, Clone, Serialize)]
pub struct ViewOutput {
    pub heading: String,
    /// Label of the query that produced the sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    pub sections: Vec<Section>,
}

impl ViewOutput {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            subheading: None,
            sections: Vec::new(),
        }
    }

    pub fn with_subheading(mut self, subheading: impl Into<String>) -> Self {
        self.subheading = Some(subheading.into());
        self
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// First untitled table, the main result of a catalog query
    pub fn primary_table(&self) -> Option<&QueryResult> {
        self.sections.iter().find_map(|s| match s {
            Section::Table { title: None, data } => Some(data),
            _ => None,
        })
    }

    pub fn table(&self, title: &str) -> Option<&QueryResult> {
        self.sections.iter().find_map(|s| match s {
            Section::Table {
                title: Some(t),
                data,
            } if t == title => Some(data),
            _ => None,
        })
    }

    pub fn chart(&self) -> Option<&Chart> {
        self.sections.iter().find_map(|s| match s {
            Section::Chart(chart) => Some(chart),
            _ => None,
        })
    }

    pub fn project_details(&self) -> Option<&[ProjectDetail]> {
        self.sections.iter().find_map(|s| match s {
            Section::ProjectDetails { projects, .. } => Some(projects.as_slice()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Table {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        data: QueryResult,
    },
    Chart(Chart),
    ProjectDetails {
        title: String,
        projects: Vec<ProjectDetail>,
    },
}

impl Section {
    pub fn table(data: QueryResult) -> Self {
        Section::Table { title: None, data }
    }

    pub fn titled_table(title: impl Into<String>, data: QueryResult) -> Self {
        Section::Table {
            title: Some(title.into()),
            data,
        }
    }
}

/// A bar chart over the columns of `data`
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    pub title: String,
    pub x: String,
    pub y: String,
    pub hover: Vec<String>,
    pub data: QueryResult,
}

impl Chart {
    pub fn from_recipe(recipe: &ChartRecipe, data: QueryResult) -> Self {
        Self {
            title: recipe.title.to_string(),
            x: recipe.x.to_string(),
            y: recipe.y.to_string(),
            hover: recipe.hover.iter().map(|h| h.to_string()).collect(),
            data,
        }
    }

    /// `(x label, y value)` pairs. Non-numeric y values come back as `None`.
    pub fn bars(&self) -> Result<Vec<(String, Option<f64>)>> {
        if self.data.columns().is_empty() {
            return Ok(Vec::new());
        }
        let xs = self.data.column_values(&self.x)?;
        let ys = self.data.column_values(&self.y)?;
        Ok(xs
            .into_iter()
            .zip(ys)
            .map(|(x, y)| (x.to_string(), y.as_f64()))
            .collect())
    }

    /// Hover values of one bar, paired with their column names
    pub fn hover_values(&self, row: usize) -> Vec<(&str, &Value)> {
        self.hover
            .iter()
            .filter_map(|h| self.data.value(row, h).map(|v| (h.as_str(), v)))
            .collect()
    }
}
