//! The static query catalog
//!
//! Each role exposes a fixed list of queries. A query is a typed variant;
//! the human-readable label shown in selectors and a short key for the
//! command line are attached to it here and nowhere else.

use crate::filter::InListFilter;
use biodash_core::{Error, Param, Result, SqlQuery};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User persona selecting which queries are offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Researcher,
    Administrator,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Researcher, Role::Administrator];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Researcher => "Researcher",
            Role::Administrator => "Administrator",
        }
    }

    pub fn view_title(&self) -> &'static str {
        match self {
            Role::Student => "Student View",
            Role::Researcher => "Researcher View",
            Role::Administrator => "Administrator View",
        }
    }

    /// Catalog entries offered to this role, in selector order
    pub fn entries(&self) -> &'static [&'static CatalogEntry] {
        match self {
            Role::Student => STUDENT_ENTRIES,
            Role::Researcher => RESEARCHER_ENTRIES,
            Role::Administrator => ADMIN_ENTRIES,
        }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.entries().iter().map(|e| e.label).collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "researcher" => Ok(Role::Researcher),
            "administrator" | "admin" => Ok(Role::Administrator),
            other => Err(Error::InvalidParameter(format!(
                "unknown role '{}', expected student, researcher or administrator",
                other
            ))),
        }
    }
}

/// Taxonomic domain offered by the organism filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Archaea,
    Bacteria,
    Eukarya,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Archaea, Domain::Bacteria, Domain::Eukarya];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Archaea => "Archaea",
            Domain::Bacteria => "Bacteria",
            Domain::Eukarya => "Eukarya",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "unknown domain '{}', expected Archaea, Bacteria or Eukarya",
                    s
                ))
            })
    }
}

impl From<Domain> for Param {
    fn from(domain: Domain) -> Self {
        Param::Text(domain.as_str().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentQuery {
    TaxonomyEcosystem,
    AvgOptimalTemperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResearcherQuery {
    ExtremeTemperature,
    AquaticFunding,
    DomainEcosystemAnalysis,
    TemperatureProjects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminQuery {
    ProjectStatusCounts,
    OrganismsWithoutProjects,
    ProjectDurations,
    TemperatureStats,
    HighFundedProjects,
}

/// One selectable query of one role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogQuery {
    Student(StudentQuery),
    Researcher(ResearcherQuery),
    Administrator(AdminQuery),
}

impl CatalogQuery {
    pub fn role(&self) -> Role {
        match self {
            CatalogQuery::Student(_) => Role::Student,
            CatalogQuery::Researcher(_) => Role::Researcher,
            CatalogQuery::Administrator(_) => Role::Administrator,
        }
    }

    pub fn entry(&self) -> &'static CatalogEntry {
        match self {
            CatalogQuery::Student(q) => match q {
                StudentQuery::TaxonomyEcosystem => &TAXONOMY_ECOSYSTEM,
                StudentQuery::AvgOptimalTemperature => &AVG_OPTIMAL_TEMPERATURE,
            },
            CatalogQuery::Researcher(q) => match q {
                ResearcherQuery::ExtremeTemperature => &EXTREME_TEMPERATURE,
                ResearcherQuery::AquaticFunding => &AQUATIC_FUNDING,
                ResearcherQuery::DomainEcosystemAnalysis => &DOMAIN_ECOSYSTEM_ANALYSIS,
                ResearcherQuery::TemperatureProjects => &TEMPERATURE_PROJECTS,
            },
            CatalogQuery::Administrator(q) => match q {
                AdminQuery::ProjectStatusCounts => &PROJECT_STATUS_COUNTS,
                AdminQuery::OrganismsWithoutProjects => &ORGANISMS_WITHOUT_PROJECTS,
                AdminQuery::ProjectDurations => &PROJECT_DURATIONS,
                AdminQuery::TemperatureStats => &TEMPERATURE_STATS,
                AdminQuery::HighFundedProjects => &HIGH_FUNDED_PROJECTS,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        self.entry().label
    }

    /// Find the query of `role` whose label or key is `selection`.
    ///
    /// Labels must match exactly; keys are compared case-insensitively.
    pub fn resolve(role: Role, selection: &str) -> Result<CatalogQuery> {
        role.entries()
            .iter()
            .find(|e| e.label == selection || e.key.eq_ignore_ascii_case(selection.trim()))
            .map(|e| e.query)
            .ok_or_else(|| Error::UnknownQuery {
                role: role.name().to_string(),
                label: selection.to_string(),
            })
    }
}

/// Where a chart's data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "column", rename_all = "snake_case")]
pub enum ChartSource {
    /// The result rows as returned
    Rows,
    /// Number of rows per distinct value of a column, most frequent first
    CountsBy(&'static str),
    /// One row per project from the high-funded aggregation
    ProjectSummary,
}

/// Bar chart description handed to the charting collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartRecipe {
    pub title: &'static str,
    pub x: &'static str,
    pub y: &'static str,
    pub hover: &'static [&'static str],
    pub source: ChartSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "chart", rename_all = "snake_case")]
pub enum RenderKind {
    Table,
    TableWithChart(ChartRecipe),
}

/// A static SQL template plus its rendering recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    #[serde(skip)]
    pub query: CatalogQuery,
    pub key: &'static str,
    pub label: &'static str,
    pub sql: &'static str,
    /// Column matched by the optional domain filter
    pub domain_filter: Option<&'static str>,
    pub render: RenderKind,
}

impl CatalogEntry {
    /// Statement for this entry with the selected domains bound.
    ///
    /// An empty selection runs the unfiltered template.
    pub fn statement(&self, domains: &[Domain]) -> Result<SqlQuery> {
        match self.domain_filter {
            Some(column) => Ok(InListFilter::new(self.sql, column)
                .build(domains.iter().copied().map(Param::from))),
            None if domains.is_empty() => Ok(SqlQuery::new(self.sql)),
            None => Err(Error::InvalidParameter(format!(
                "'{}' does not take a domain filter",
                self.label
            ))),
        }
    }
}

static TAXONOMY_ECOSYSTEM: CatalogEntry = CatalogEntry {
    query: CatalogQuery::Student(StudentQuery::TaxonomyEcosystem),
    key: "taxonomy-ecosystem",
    label: "List organisms with their taxonomic information and ecosystem",
    sql: "SELECT * FROM Student_Organism_Taxonomy_Ecosystem",
    domain_filter: Some("Domain"),
    render: RenderKind::TableWithChart(ChartRecipe {
        title: "Organism Count by Domain",
        x: "Domain",
        y: "Count",
        hover: &[],
        source: ChartSource::CountsBy("Domain"),
    }),
};

static AVG_OPTIMAL_TEMPERATURE: CatalogEntry = CatalogEntry {
    query: CatalogQuery::Student(StudentQuery::AvgOptimalTemperature),
    key: "avg-optimal-temperature",
    label: "Find average optimal temperature for organisms in each ecosystem",
    sql: "SELECT * FROM Student_Avg_Optimum_Temp_By_Ecosystem",
    domain_filter: None,
    render: RenderKind::TableWithChart(ChartRecipe {
        title: "Average Optimal Temperature by Ecosystem",
        x: "EcosystemName",
        y: "AverageOptimalTemp",
        hover: &[],
        source: ChartSource::Rows,
    }),
};

static EXTREME_TEMPERATURE: CatalogEntry = CatalogEntry {
    query: CatalogQuery::Researcher(ResearcherQuery::ExtremeTemperature),
    key: "extreme-temperature",
    label: "Organisms with extreme temperature requirements",
    sql: "SELECT * FROM Researcher_Extreme_Temperature_Organisms",
    domain_filter: None,
    render: RenderKind::Table,
};

static AQUATIC_FUNDING: CatalogEntry = CatalogEntry {
    query: CatalogQuery::Researcher(ResearcherQuery::AquaticFunding),
    key: "aquatic-funding",
    label: "Funding sources for projects related to aquatic ecosystems",
    sql: "SELECT * FROM Researcher_Funding_Aquatic_Projects",
    domain_filter: None,
    render: RenderKind::Table,
};

static DOMAIN_ECOSYSTEM_ANALYSIS: CatalogEntry = CatalogEntry {
    query: CatalogQuery::Researcher(ResearcherQuery::DomainEcosystemAnalysis),
    key: "domain-ecosystem-analysis",
    label: "Analysis organisms and projects by domain and ecosystem",
    sql: "SELECT * FROM Researcher_Organisms_Projects_Domain_Ecosystem",
    domain_filter: None,
    render: RenderKind::Table,
};

static TEMPERATURE_PROJECTS: CatalogEntry = CatalogEntry {
    query: CatalogQuery::Researcher(ResearcherQuery::TemperatureProjects),
    key: "temperature-projects",
    label: "Organism names, average optimum temperature, and associated project titles",
    sql: "SELECT * FROM Researcher_Organism_Temperature_Project",
    domain_filter: None,
    render: RenderKind::Table,
};

static PROJECT_STATUS_COUNTS: CatalogEntry = CatalogEntry {
    query: CatalogQuery::Administrator(AdminQuery::ProjectStatusCounts),
    key: "project-status",
    label: "List all projects with their status and count of associated organisms",
    sql: "SELECT * FROM Admin_Projects_Status_OrganismCount",
    domain_filter: None,
    render: RenderKind::Table,
};

static ORGANISMS_WITHOUT_PROJECTS: CatalogEntry = CatalogEntry {
    query: CatalogQuery::Administrator(AdminQuery::OrganismsWithoutProjects),
    key: "organisms-without-projects",
    label: "Find organisms without any associated projects",
    sql: "SELECT * FROM Admin_Organisms_Without_Projects",
    domain_filter: None,
    render: RenderKind::Table,
};

static PROJECT_DURATIONS: CatalogEntry = CatalogEntry {
    query: CatalogQuery::Administrator(AdminQuery::ProjectDurations),
    key: "project-duration",
    label: "Calculate the duration of each project and list associated organisms",
    sql: "SELECT * FROM Admin_Project_Duration_Organisms",
    domain_filter: None,
    render: RenderKind::Table,
};

static TEMPERATURE_STATS: CatalogEntry = CatalogEntry {
    query: CatalogQuery::Administrator(AdminQuery::TemperatureStats),
    key: "temperature-stats",
    label: "View temperature statistics for specific ecosystems",
    sql: "SELECT * FROM Admin_Temperature_Stats_By_Ecosystem",
    domain_filter: None,
    render: RenderKind::Table,
};

static HIGH_FUNDED_PROJECTS: CatalogEntry = CatalogEntry {
    query: CatalogQuery::Administrator(AdminQuery::HighFundedProjects),
    key: "high-funded-projects",
    label: "High-funded projects and associated organisms",
    sql: "SELECT * FROM Admin_High_Funded_Projects",
    domain_filter: None,
    render: RenderKind::TableWithChart(ChartRecipe {
        title: "High-Funded Projects (>$2 million)",
        x: "ProjectTitle",
        y: "TotalFunding",
        hover: &["OrganismCount", "ProjectStatus"],
        source: ChartSource::ProjectSummary,
    }),
};

static STUDENT_ENTRIES: &[&CatalogEntry] = &[&TAXONOMY_ECOSYSTEM, &AVG_OPTIMAL_TEMPERATURE];

static RESEARCHER_ENTRIES: &[&CatalogEntry] = &[
    &EXTREME_TEMPERATURE,
    &AQUATIC_FUNDING,
    &DOMAIN_ECOSYSTEM_ANALYSIS,
    &TEMPERATURE_PROJECTS,
];

static ADMIN_ENTRIES: &[&CatalogEntry] = &[
    &PROJECT_STATUS_COUNTS,
    &ORGANISMS_WITHOUT_PROJECTS,
    &PROJECT_DURATIONS,
    &TEMPERATURE_STATS,
    &HIGH_FUNDED_PROJECTS,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_labels_are_unique_within_role() {
        for role in Role::ALL {
            let labels: HashSet<_> = role.labels().into_iter().collect();
            assert_eq!(labels.len(), role.entries().len(), "{role}");
            let keys: HashSet<_> = role.entries().iter().map(|e| e.key).collect();
            assert_eq!(keys.len(), role.entries().len(), "{role}");
        }
    }

    #[test]
    fn test_entries_point_back_to_their_query() {
        for role in Role::ALL {
            for entry in role.entries() {
                assert_eq!(entry.query.entry(), *entry);
                assert_eq!(entry.query.role(), role);
            }
        }
    }

    #[test]
    fn test_resolve_by_label_and_key() {
        let by_label = CatalogQuery::resolve(
            Role::Administrator,
            "High-funded projects and associated organisms",
        )
        .unwrap();
        let by_key = CatalogQuery::resolve(Role::Administrator, "HIGH-FUNDED-PROJECTS").unwrap();

        assert_eq!(by_label, CatalogQuery::Administrator(AdminQuery::HighFundedProjects));
        assert_eq!(by_label, by_key);
    }

    #[test]
    fn test_resolve_does_not_cross_roles() {
        let err = CatalogQuery::resolve(Role::Student, "high-funded-projects").unwrap_err();
        assert!(matches!(err, Error::UnknownQuery { .. }));
    }

    #[test]
    fn test_resolve_has_no_fallback() {
        assert!(CatalogQuery::resolve(Role::Researcher, "").is_err());
        assert!(CatalogQuery::resolve(Role::Researcher, "organisms with extreme").is_err());
    }

    #[test]
    fn test_unfiltered_taxonomy_statement() {
        let entry = CatalogQuery::Student(StudentQuery::TaxonomyEcosystem).entry();
        let statement = entry.statement(&[]).unwrap();
        assert_eq!(statement.sql(), "SELECT * FROM Student_Organism_Taxonomy_Ecosystem");
        assert!(statement.params().is_empty());
    }

    #[test]
    fn test_filtered_taxonomy_statement_binds_each_domain() {
        let entry = CatalogQuery::Student(StudentQuery::TaxonomyEcosystem).entry();
        let statement = entry
            .statement(&[Domain::Eukarya, Domain::Archaea])
            .unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT * FROM Student_Organism_Taxonomy_Ecosystem WHERE Domain IN (?, ?)"
        );
        assert_eq!(
            statement.params(),
            &[Param::from("Eukarya"), Param::from("Archaea")]
        );
    }

    #[test]
    fn test_domain_filter_rejected_elsewhere() {
        let entry = CatalogQuery::Researcher(ResearcherQuery::AquaticFunding).entry();
        assert!(entry.statement(&[Domain::Bacteria]).is_err());
    }

    #[test]
    fn test_parse_role_and_domain() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Administrator);
        assert_eq!("bacteria".parse::<Domain>().unwrap(), Domain::Bacteria);
        assert!("Viruses".parse::<Domain>().is_err());
    }
}
