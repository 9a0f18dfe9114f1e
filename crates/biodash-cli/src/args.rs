use anyhow::Result;
use biodash_catalog::{Domain, Role};
use biodash_core::{BackendKind, DashConfig};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// biodash - browse the biological research database from the terminal
#[derive(Parser, Debug)]
#[command(name = "biodash")]
#[command(version)]
#[command(about = "Role-based views over the biological research database", long_about = None)]
pub struct Cli {
    /// Configuration file (default: biodash.toml in this or a parent directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database hostname
    #[arg(short = 'H', long, global = true)]
    pub host: Option<String>,

    /// Database port (default: 3306)
    #[arg(short = 'P', long, global = true)]
    pub port: Option<u16>,

    /// Database user
    #[arg(short = 'u', long, global = true)]
    pub user: Option<String>,

    /// Database password (or BIODASH_DB_PASSWORD)
    #[arg(short = 'p', long, global = true)]
    pub password: Option<String>,

    /// Database name, or the file path for the sqlite backend
    #[arg(short = 'd', long, global = true)]
    pub database: Option<String>,

    /// Database backend: mysql or sqlite
    #[arg(long, global = true, value_parser = parse_backend)]
    pub backend: Option<BackendKind>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the database accepts the connection parameters
    Connect,

    /// Find organisms and projects whose name contains TERM
    Search { term: String },

    /// List the queries each role can run
    Queries {
        /// Only this role
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
    },

    /// Run one query of a role's view
    View {
        #[arg(value_parser = parse_role)]
        role: Role,

        /// Query label or short key, e.g. high-funded-projects
        query: String,

        /// Restrict the taxonomy query to a domain (repeatable)
        #[arg(long = "domain", value_parser = parse_domain)]
        domains: Vec<Domain>,
    },

    /// List organism names
    Organisms,

    /// Show an organism's profile, environmental conditions and projects
    Profile { name: String },

    /// Serve the REST API
    Serve {
        /// Listen address (default: server.host:server.port from config)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

fn parse_backend(s: &str) -> std::result::Result<BackendKind, String> {
    s.parse().map_err(|e: biodash_core::Error| e.to_string())
}

fn parse_role(s: &str) -> std::result::Result<Role, String> {
    s.parse().map_err(|e: biodash_core::Error| e.to_string())
}

fn parse_domain(s: &str) -> std::result::Result<Domain, String> {
    s.parse().map_err(|e: biodash_core::Error| e.to_string())
}

impl Cli {
    /// Load the configuration file and apply command-line overrides
    pub fn load_config(&self) -> Result<DashConfig> {
        let mut config = match &self.config {
            Some(path) => DashConfig::load_from(path)?,
            None => DashConfig::load()?,
        };

        let db = &mut config.database;
        if let Some(host) = &self.host {
            db.hostname = host.clone();
        }
        if let Some(port) = self.port {
            db.port = port;
        }
        if let Some(user) = &self.user {
            db.user = user.clone();
        }
        if let Some(password) = &self.password {
            db.password = password.clone();
        }
        if let Some(database) = &self.database {
            db.database = database.clone();
        }
        if let Some(backend) = self.backend {
            db.backend = backend;
        }

        Ok(config)
    }
}
