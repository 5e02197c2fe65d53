use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the SQLite layer. Every variant that came from a query
/// carries the SQL text so the fatal error message can echo it back.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database error: {source} Last query: {query}")]
    Query {
        query: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database error: no rows returned. Last query: {query}")]
    NotFound { query: String },

    #[error("unsupported language: {0}")]
    UnknownLanguage(String),
}

impl DbError {
    pub(crate) fn query(query: &str, source: rusqlite::Error) -> Self {
        DbError::Query {
            query: query.to_string(),
            source,
        }
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type DbResult<T> = std::result::Result<T, DbError>;
