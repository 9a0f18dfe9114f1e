//! Configuration management for biodash
//!
//! Loads configuration with priority:
//! 1. biodash.toml (or the file given explicitly)
//! 2. Environment variables referenced as `${VAR_NAME}`
//! 3. Defaults

use crate::error::{Error, Result};
use crate::types::{ConnectionParameters, DEFAULT_PORT};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "biodash.toml";

/// biodash configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Which driver the connector speaks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Mysql,
    /// Local SQLite file carrying the same schema; `database` is the file path
    Sqlite,
}

impl std::str::FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(BackendKind::Mysql),
            "sqlite" => Ok(BackendKind::Sqlite),
            other => Err(Error::config_error(format!(
                "unknown backend '{}', expected 'mysql' or 'sqlite'",
                other
            ))),
        }
    }
}

/// Connection defaults for the research database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "default_hostname")]
    pub hostname: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_user")]
    pub user: String,

    /// Password (can reference env var with ${VAR_NAME})
    #[serde(default)]
    pub password: String,

    #[serde(default = "default_database")]
    pub database: String,
}

/// REST server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            hostname: default_hostname(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            database: default_database(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_server_port(),
        }
    }
}

impl DatabaseConfig {
    pub fn connection_parameters(&self) -> ConnectionParameters {
        ConnectionParameters::new(
            self.hostname.clone(),
            self.user.clone(),
            self.password.clone(),
            self.database.clone(),
        )
        .with_port(self.port)
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DashConfig {
    /// Load configuration from biodash.toml in the current directory or a
    /// parent, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                let mut config = Self::default();
                config.resolve_env_vars();
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!("Loading configuration from: {:?}", path);

        let contents = fs::read_to_string(path).map_err(|e| {
            Error::config_error(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::parse(&contents)
            .map_err(|e| Error::config_error(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    /// Parse TOML text and resolve environment references
    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: DashConfig = toml::from_str(contents)?;
        config.resolve_env_vars();
        Ok(config)
    }

    /// Find biodash.toml by searching current directory and parents
    fn find_config_file() -> Option<PathBuf> {
        let mut current = env::current_dir().ok()?;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve ${VAR_NAME} references to environment variables
    fn resolve_env_vars(&mut self) {
        let db = &mut self.database;
        for field in [
            &mut db.hostname,
            &mut db.user,
            &mut db.password,
            &mut db.database,
        ] {
            if let Some(resolved) = Self::resolve_env_var(field) {
                *field = resolved;
            }
        }

        if db.password.is_empty() {
            // No password in config, try environment variable as fallback
            if let Ok(password) = env::var("BIODASH_DB_PASSWORD") {
                db.password = password;
            }
        }
    }

    /// Resolve a single ${VAR_NAME} reference; unset variables resolve to ""
    fn resolve_env_var(value: &str) -> Option<String> {
        if value.starts_with("${") && value.ends_with('}') {
            let var_name = &value[2..value.len() - 1];
            Some(env::var(var_name).unwrap_or_default())
        } else {
            None
        }
    }
}

fn default_hostname() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_user() -> String {
    "root".to_string()
}

fn default_database() -> String {
    "ProjectDB".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}
