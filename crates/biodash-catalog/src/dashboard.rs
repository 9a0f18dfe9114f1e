//! View dispatcher
//!
//! Turns a page selection into the queries it needs and the sections the
//! page renders. Queries of one view run strictly one after another.

use crate::aggregate::{count_by, project_details, summarize_projects, summary_table};
use crate::catalog::{CatalogQuery, ChartSource, Domain, RenderKind, Role};
use crate::profile::{self, OrganismProfile};
use crate::search::search_query;
use crate::view::{Chart, Section, ViewOutput};
use biodash_core::{QueryResult, Result};
use biodash_store::QueryExecutor;

pub const PROJECT_DETAILS_TITLE: &str = "Project Details";

/// What the user picked on the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
    Catalog {
        query: CatalogQuery,
        domains: Vec<Domain>,
    },
    OrganismProfile {
        name: String,
    },
}

impl ViewRequest {
    pub fn catalog(query: CatalogQuery) -> Self {
        ViewRequest::Catalog {
            query,
            domains: Vec::new(),
        }
    }

    pub fn filtered(query: CatalogQuery, domains: Vec<Domain>) -> Self {
        ViewRequest::Catalog { query, domains }
    }

    pub fn organism(name: impl Into<String>) -> Self {
        ViewRequest::OrganismProfile { name: name.into() }
    }
}

/// Runs dashboard views against one set of connection parameters
#[derive(Clone)]
pub struct Dashboard {
    executor: QueryExecutor,
}

impl Dashboard {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    pub async fn render(&self, request: &ViewRequest) -> Result<ViewOutput> {
        match request {
            ViewRequest::Catalog { query, domains } => self.run_query(*query, domains).await,
            ViewRequest::OrganismProfile { name } => {
                Ok(self.organism_profile(name).await?.into_view())
            }
        }
    }

    /// Run one catalog query and shape its result the way its entry says.
    pub async fn run_query(&self, query: CatalogQuery, domains: &[Domain]) -> Result<ViewOutput> {
        let entry = query.entry();
        let statement = entry.statement(domains)?;

        tracing::info!(
            role = %query.role(),
            query = entry.key,
            domains = domains.len(),
            "Running catalog query"
        );

        let data = self.executor.execute(entry.key, &statement).await?;
        let mut view = ViewOutput::new(query.role().view_title()).with_subheading(entry.label);

        match entry.render {
            RenderKind::Table => view.push(Section::table(data)),
            RenderKind::TableWithChart(recipe) => match recipe.source {
                ChartSource::Rows => {
                    view.push(Section::table(data.clone()));
                    view.push(Section::Chart(Chart::from_recipe(&recipe, data)));
                }
                ChartSource::CountsBy(column) => {
                    let counts = count_by(&data, column)?;
                    view.push(Section::table(data));
                    view.push(Section::Chart(Chart::from_recipe(&recipe, counts)));
                }
                ChartSource::ProjectSummary => {
                    let summaries = summarize_projects(&data)?;
                    let details = project_details(&data)?;
                    view.push(Section::table(data));
                    view.push(Section::Chart(Chart::from_recipe(
                        &recipe,
                        summary_table(&summaries),
                    )));
                    view.push(Section::ProjectDetails {
                        title: PROJECT_DETAILS_TITLE.to_string(),
                        projects: details,
                    });
                }
            },
        }

        Ok(view)
    }

    /// Every query of a role, in catalog order
    pub async fn run_role(&self, role: Role) -> Result<Vec<ViewOutput>> {
        let mut views = Vec::with_capacity(role.entries().len());
        for entry in role.entries() {
            views.push(self.run_query(entry.query, &[]).await?);
        }
        Ok(views)
    }

    /// Organisms and projects whose name contains `term`.
    ///
    /// An empty term runs nothing and yields the empty result.
    pub async fn search(&self, term: &str) -> Result<QueryResult> {
        match search_query(term) {
            Some(query) => self.executor.execute("search", &query).await,
            None => Ok(QueryResult::empty()),
        }
    }

    pub async fn organism_names(&self) -> Result<Vec<String>> {
        profile::organism_names(&self.executor).await
    }

    pub async fn organism_profile(&self, name: &str) -> Result<OrganismProfile> {
        OrganismProfile::load(&self.executor, name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AdminQuery, ResearcherQuery, StudentQuery};
    use async_trait::async_trait;
    use biodash_core::{ConnectError, ConnectionParameters, Error, Param, Value};
    use biodash_store::{Store, StoreConnection};
    use std::sync::{Arc, Mutex};

    type Responder = Arc<dyn Fn(&str, &[Param]) -> Result<QueryResult> + Send + Sync>;

    /// Answers every query through `respond` and records what was asked
    struct ScriptedStore {
        respond: Responder,
        log: Arc<Mutex<Vec<(String, Vec<Param>)>>>,
        reachable: bool,
    }

    struct ScriptedConnection {
        respond: Responder,
        log: Arc<Mutex<Vec<(String, Vec<Param>)>>>,
    }

    #[async_trait]
    impl Store for ScriptedStore {
        fn system(&self) -> &'static str {
            "scripted"
        }

        async fn connect(
            &self,
            _params: &ConnectionParameters,
        ) -> std::result::Result<Box<dyn StoreConnection>, ConnectError> {
            if !self.reachable {
                return Err(ConnectError::Unreachable("connection refused".to_string()));
            }
            Ok(Box::new(ScriptedConnection {
                respond: self.respond.clone(),
                log: self.log.clone(),
            }))
        }
    }

    #[async_trait]
    impl StoreConnection for ScriptedConnection {
        async fn fetch_all(&mut self, sql: &str, params: &[Param]) -> Result<QueryResult> {
            self.log
                .lock()
                .unwrap()
                .push((sql.to_string(), params.to_vec()));
            (self.respond)(sql, params)
        }

        async fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn dashboard(
        reachable: bool,
        respond: impl Fn(&str, &[Param]) -> Result<QueryResult> + Send + Sync + 'static,
    ) -> (Dashboard, Arc<Mutex<Vec<(String, Vec<Param>)>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let store = ScriptedStore {
            respond: Arc::new(respond),
            log: log.clone(),
            reachable,
        };
        let executor = QueryExecutor::new(
            Arc::new(store),
            ConnectionParameters::new("127.0.0.1", "root", "password", "ProjectDB"),
        );
        (Dashboard::new(executor), log)
    }

    fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> QueryResult {
        QueryResult::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[tokio::test]
    async fn test_plain_table_entry() {
        let (dash, log) = dashboard(true, |_, _| {
            Ok(table(&["Name", "OptimalTemp"], vec![vec!["Pyrolobus".into(), Value::Float(106.0)]]))
        });

        let view = dash
            .run_query(
                CatalogQuery::Researcher(ResearcherQuery::ExtremeTemperature),
                &[],
            )
            .await
            .unwrap();

        assert_eq!(view.heading, "Researcher View");
        assert_eq!(view.sections.len(), 1);
        assert_eq!(view.primary_table().unwrap().row_count(), 1);
        assert_eq!(
            log.lock().unwrap()[0].0,
            "SELECT * FROM Researcher_Extreme_Temperature_Organisms"
        );
    }

    #[tokio::test]
    async fn test_domain_chart_counts_rows() {
        let (dash, log) = dashboard(true, |_, _| {
            Ok(table(
                &["Name", "Domain"],
                vec![
                    vec!["a".into(), "Archaea".into()],
                    vec!["b".into(), "Archaea".into()],
                ],
            ))
        });

        let view = dash
            .render(&ViewRequest::filtered(
                CatalogQuery::Student(StudentQuery::TaxonomyEcosystem),
                vec![Domain::Archaea],
            ))
            .await
            .unwrap();

        let chart = view.chart().unwrap();
        assert_eq!(chart.title, "Organism Count by Domain");
        assert_eq!(chart.bars().unwrap(), vec![("Archaea".to_string(), Some(2.0))]);
        assert_eq!(log.lock().unwrap()[0].1, vec![Param::from("Archaea")]);
    }

    #[tokio::test]
    async fn test_high_funded_view_has_chart_and_details() {
        let (dash, _) = dashboard(true, |_, _| {
            Ok(table(
                &[
                    "ProjectTitle",
                    "TotalFunding",
                    "ProjectStatus",
                    "OrganismName",
                    "Domain",
                    "EcosystemName",
                ],
                vec![
                    vec![
                        "P1".into(),
                        Value::Float(3.0),
                        "Active".into(),
                        "OrgA".into(),
                        "Archaea".into(),
                        "Vent".into(),
                    ],
                    vec![
                        "P1".into(),
                        Value::Float(3.0),
                        "Active".into(),
                        "OrgB".into(),
                        "Bacteria".into(),
                        "Vent".into(),
                    ],
                ],
            ))
        });

        let view = dash
            .run_query(
                CatalogQuery::Administrator(AdminQuery::HighFundedProjects),
                &[],
            )
            .await
            .unwrap();

        assert_eq!(view.primary_table().unwrap().row_count(), 2);
        let chart = view.chart().unwrap();
        assert_eq!(chart.hover, vec!["OrganismCount", "ProjectStatus"]);
        assert_eq!(chart.data.value(0, "OrganismCount"), Some(&Value::Int(2)));
        let details = view.project_details().unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].organisms.len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_store_renders_empty_view() {
        let (dash, log) = dashboard(false, |_, _| unreachable!());

        let view = dash
            .run_query(
                CatalogQuery::Administrator(AdminQuery::HighFundedProjects),
                &[],
            )
            .await
            .unwrap();

        assert!(view.primary_table().unwrap().is_empty());
        assert!(view.project_details().unwrap().is_empty());
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profile_binds_numeric_id() {
        let (dash, log) = dashboard(true, |sql, _| {
            if sql.contains("Organism_Profile") {
                Ok(table(
                    &["OrganismID", "Name"],
                    vec![vec![Value::UInt(7), "Thermus aquaticus".into()]],
                ))
            } else {
                Ok(table(&["Value"], Vec::new()))
            }
        });

        let profile = dash.organism_profile("Thermus aquaticus").await.unwrap();
        assert_eq!(profile.organism_id, 7);

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[1].1, vec![Param::Int(7)]);
        assert_eq!(log[2].1, vec![Param::from("Thermus aquaticus")]);
    }

    #[tokio::test]
    async fn test_unknown_organism_runs_no_dependent_query() {
        let (dash, log) = dashboard(true, |_, _| Ok(table(&["OrganismID", "Name"], Vec::new())));

        let err = dash.organism_profile("Nobody").await.unwrap_err();
        assert!(matches!(err, Error::OrganismNotFound(name) if name == "Nobody"));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_search_runs_nothing() {
        let (dash, log) = dashboard(true, |_, _| unreachable!());
        assert!(dash.search("").await.unwrap().is_empty());
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_search_still_runs() {
        let (dash, log) = dashboard(true, |_, _| Ok(table(&["Type", "Result"], Vec::new())));
        dash.search(" ").await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].1, vec![Param::from("% %"), Param::from("% %")]);
    }

    #[tokio::test]
    async fn test_query_errors_propagate() {
        let (dash, _) = dashboard(true, |sql, _| {
            Err(Error::query_failed(sql, std::io::Error::other("view missing")))
        });
        let err = dash
            .run_query(CatalogQuery::Student(StudentQuery::AvgOptimalTemperature), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::QueryExecution { .. }));
    }
}
