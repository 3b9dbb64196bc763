//! Text sources feeding documents into the vector index.
//!
//! Includes the hardcoded sample source (`sample`) and the database backed source (`sql`),
//! with an Oracle connector behind the `oracle` feature.

#[cfg(feature = "oracle")]
pub mod oracle;
pub mod sample;
pub mod sql;

pub use sample::SampleTextSource;
pub use sql::{SqlConnection, SqlConnector, SqlTextSource};

use async_trait::async_trait;
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::{config::AppConfig, document::Document};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid SQL identifier `{0}`")]
    InvalidIdentifier(String),
    #[error("Unknown source kind `{0}`")]
    UnknownKind(String),
}

/// A finite, ordered collection of texts.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Fetches at most `limit` documents.
    async fn fetch(&self, limit: usize) -> Result<Vec<Document>, SourceError>;

    /// Label of the source, stored in the `source` metadata of fetched documents
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum SourceKind {
    #[default]
    Sample,
    Database,
}

impl FromStr for SourceKind {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sample" => Ok(Self::Sample),
            "database" | "db" | "oracle" => Ok(Self::Database),
            other => Err(SourceError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sample => f.write_str("sample"),
            Self::Database => f.write_str("database"),
        }
    }
}

/// Builds the text source for `kind` from the application config.
///
/// # Errors
/// `SourceError::Unavailable` when the database source is requested but its credentials
/// are not set in the environment, or the crate was built without the `oracle` feature.
pub fn open_source(
    kind: SourceKind,
    config: &AppConfig,
) -> Result<Box<dyn TextSource>, SourceError> {
    match kind {
        SourceKind::Sample => Ok(Box::new(SampleTextSource::default())),
        SourceKind::Database => open_database_source(config),
    }
}

#[cfg(feature = "oracle")]
fn open_database_source(config: &AppConfig) -> Result<Box<dyn TextSource>, SourceError> {
    let database = &config.database;
    let credentials = database
        .credentials()
        .map_err(|e| SourceError::Unavailable(format!("database credentials not set: {e}")))?;
    let connector = self::oracle::OracleConnector::new(credentials);
    Ok(Box::new(SqlTextSource::new(
        connector,
        &database.table,
        &database.column,
        &database.label,
    )?))
}

#[cfg(not(feature = "oracle"))]
fn open_database_source(_config: &AppConfig) -> Result<Box<dyn TextSource>, SourceError> {
    Err(SourceError::Unavailable(
        "simsearch was built without the `oracle` feature".to_string(),
    ))
}
