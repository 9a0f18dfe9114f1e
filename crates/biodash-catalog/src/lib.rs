//! Query catalog and view dispatch for the research dashboard
//!
//! Maps a role and a query selection to a fixed SQL template, runs it
//! through the [`QueryExecutor`](biodash_store::QueryExecutor) and shapes the
//! result into headings, tables, charts and project detail blocks.

pub mod aggregate;
pub mod catalog;
pub mod dashboard;
pub mod filter;
pub mod profile;
pub mod search;
pub mod view;

pub use aggregate::{
    OrganismEntry, ProjectDetail, ProjectSummary, count_by, project_details, summarize_projects,
    summary_table,
};
pub use catalog::{
    AdminQuery, CatalogEntry, CatalogQuery, ChartRecipe, ChartSource, Domain, RenderKind,
    ResearcherQuery, Role, StudentQuery,
};
pub use dashboard::{Dashboard, ViewRequest};
pub use filter::{InListFilter, placeholders};
pub use profile::OrganismProfile;
pub use search::search_query;
pub use view::{Chart, Section, ViewOutput};
