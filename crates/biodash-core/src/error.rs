use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectError),

    #[error("Please connect to the database to proceed.")]
    NotConnected,

    #[error("Query failed: {source}")]
    QueryExecution {
        sql: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Organism not found: {0}")]
    OrganismNotFound(String),

    #[error("Unknown query '{label}' for the {role} view")]
    UnknownQuery { role: String, label: String },

    #[error("Column '{0}' is missing from the query result")]
    MissingColumn(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Helper for creating configuration errors
    ///
    /// # Example
    /// ```
    /// use biodash_core::Error;
    /// let err = Error::config_error("database.port must be a number");
    /// ```
    pub fn config_error(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Helper for creating general errors with a message
    ///
    /// # Example
    /// ```
    /// use biodash_core::Error;
    /// let err = Error::message("Something went wrong");
    /// ```
    pub fn message(msg: impl Into<String>) -> Self {
        Error::Other(anyhow::anyhow!("{}", msg.into()))
    }

    /// Wrap a driver failure that happened after the connection was open.
    pub fn query_failed(sql: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Error::QueryExecution {
            sql: sql.into(),
            source: source.into(),
        }
    }
}

/// Failure to open a connection to the store.
///
/// Never fatal: callers surface it to the user and keep the session
/// disconnected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("access denied: {0}")]
    AuthRejected(String),

    #[error("host unreachable: {0}")]
    Unreachable(String),

    #[error("unknown database: {0}")]
    UnknownDatabase(String),

    #[error("{0}")]
    Other(String),
}
