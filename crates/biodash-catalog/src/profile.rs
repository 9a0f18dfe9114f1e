//! Organism profile page: one lookup by name and two dependent queries

use crate::view::{Section, ViewOutput};
use biodash_core::{Error, Param, QueryResult, Result, SqlQuery, Value};
use biodash_store::QueryExecutor;
use serde::Serialize;

pub const ORGANISM_NAMES_SQL: &str = "SELECT Name FROM Organism";
pub const PROFILE_SQL: &str = "SELECT * FROM Organism_Profile WHERE Name = ?";
pub const CONDITIONS_SQL: &str = "SELECT * FROM EnvironmentalCondition WHERE OrganismID = ?";
pub const PROJECTS_SQL: &str = "SELECT pi.Title, pi.Description, pi.StartDate, pi.EndDate, ps.Status \
     FROM ProjectInfo pi \
     JOIN Organism_ResearchProject orp ON pi.ProjectID = orp.ProjectID \
     JOIN ProjectStatus ps ON pi.ProjectID = ps.ProjectID \
     JOIN Organism o ON orp.OrganismID = o.OrganismID \
     WHERE o.Name = ?";

pub const PAGE_TITLE: &str = "Organism Profiles";
pub const CONDITIONS_TITLE: &str = "Environmental Conditions";
pub const PROJECTS_TITLE: &str = "Associated Projects";

const ORGANISM_ID: &str = "OrganismID";

#[derive(Debug, Clone, Serialize)]
pub struct OrganismProfile {
    pub name: String,
    pub organism_id: i64,
    pub profile: QueryResult,
    pub environmental_conditions: QueryResult,
    pub projects: QueryResult,
}

impl OrganismProfile {
    /// Look the organism up by name, then fetch its conditions by numeric id
    /// and its projects by name.
    ///
    /// A name with no profile row is `OrganismNotFound`; the dependent
    /// queries are not run in that case.
    pub async fn load(executor: &QueryExecutor, name: &str) -> Result<Self> {
        let profile = executor
            .execute("organism-profile", &SqlQuery::new(PROFILE_SQL).bind(name))
            .await?;

        let Some(id_value) = profile.value(0, ORGANISM_ID) else {
            if profile.is_empty() {
                return Err(Error::OrganismNotFound(name.to_string()));
            }
            return Err(Error::MissingColumn(ORGANISM_ID.to_string()));
        };
        let organism_id = organism_id(id_value)?;

        let environmental_conditions = executor
            .execute(
                "environmental-conditions",
                &SqlQuery::new(CONDITIONS_SQL).bind(organism_id),
            )
            .await?;
        let projects = executor
            .execute("associated-projects", &SqlQuery::new(PROJECTS_SQL).bind(name))
            .await?;

        tracing::debug!(
            organism = %name,
            organism_id,
            conditions = environmental_conditions.row_count(),
            projects = projects.row_count(),
            "Loaded organism profile"
        );

        Ok(Self {
            name: name.to_string(),
            organism_id,
            profile,
            environmental_conditions,
            projects,
        })
    }

    pub fn heading(&self) -> String {
        format!("Organism Profile: {}", self.name)
    }

    pub fn into_view(self) -> ViewOutput {
        let mut view = ViewOutput::new(PAGE_TITLE);
        view.push(Section::titled_table(self.heading(), self.profile));
        view.push(Section::titled_table(
            CONDITIONS_TITLE,
            self.environmental_conditions,
        ));
        view.push(Section::titled_table(PROJECTS_TITLE, self.projects));
        view
    }
}

/// Native integer form of the id cell, whatever width or textual form the
/// driver returned it in.
fn organism_id(value: &Value) -> Result<i64> {
    match Param::from_value(value)? {
        Param::Int(id) => Ok(id),
        Param::Text(text) => text.trim().parse().map_err(|_| {
            Error::InvalidParameter(format!("OrganismID '{}' is not an integer", text))
        }),
        // 2^63 is exact in f64; anything at or past it would saturate
        Param::Float(f) if f.fract() == 0.0 && f >= -(2f64.powi(63)) && f < 2f64.powi(63) => {
            Ok(f as i64)
        }
        Param::Float(f) => Err(Error::InvalidParameter(format!(
            "OrganismID {} is not an integer in range",
            f
        ))),
    }
}

/// Names offered by the organism selector, in query order
pub async fn organism_names(executor: &QueryExecutor) -> Result<Vec<String>> {
    let result = executor
        .execute("organism-names", &SqlQuery::new(ORGANISM_NAMES_SQL))
        .await?;
    if result.columns().is_empty() {
        return Ok(Vec::new());
    }
    Ok(result
        .column_values("Name")?
        .into_iter()
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
        .collect())
}
