use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use super::{SourceError, TextSource};
use crate::document::Document;

/// Error reported by a database driver.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct SqlError(pub String);

/// An open database connection able to run the text query.
#[async_trait]
pub trait SqlConnection: Send {
    /// Runs `sql` with `max_rows` bound to its single `:max_rows` placeholder and returns the
    /// first column of every row.
    async fn query_texts(
        &mut self,
        sql: &str,
        max_rows: usize,
    ) -> Result<Vec<Option<String>>, SqlError>;

    /// Releases the connection.
    async fn close(self: Box<Self>) -> Result<(), SqlError>;
}

/// Opens connections to the database, connection settings are opaque to the caller.
#[async_trait]
pub trait SqlConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn SqlConnection>, SqlError>;
}

/// Reads up to `limit` non-null values of one column of one table.
///
/// A connection is opened per fetch and closed before returning, whatever the outcome
/// of the query.
pub struct SqlTextSource<C: SqlConnector> {
    connector: C,
    statement: String,
    label: String,
}

impl<C: SqlConnector> SqlTextSource<C> {
    /// # Errors
    /// `SourceError::InvalidIdentifier` if `table` or `column` isn't a plain SQL identifier,
    /// they get interpolated into the statement text.
    pub fn new(connector: C, table: &str, column: &str, label: &str) -> Result<Self, SourceError> {
        Ok(Self {
            connector,
            statement: select_statement(table, column)?,
            label: label.to_string(),
        })
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }
}

#[async_trait]
impl<C: SqlConnector> TextSource for SqlTextSource<C> {
    async fn fetch(&self, limit: usize) -> Result<Vec<Document>, SourceError> {
        if limit == 0 {
            return Ok(vec![]);
        }
        let mut connection = self
            .connector
            .connect()
            .await
            .map_err(|e| SourceError::Unavailable(format!("connect failed: {e}")))?;

        let rows = connection.query_texts(&self.statement, limit).await;
        if let Err(e) = connection.close().await {
            warn!(source = %self.label, "Failed to close database connection: {e}");
        }
        let rows = rows.map_err(|e| SourceError::Unavailable(format!("query failed: {e}")))?;

        debug!(source = %self.label, rows = rows.len(), "Fetched rows");
        Ok(rows
            .into_iter()
            .flatten()
            .take(limit)
            .map(|text| Document::from_source(text, &self.label))
            .collect())
    }

    fn name(&self) -> &str {
        &self.label
    }
}

fn select_statement(table: &str, column: &str) -> Result<String, SourceError> {
    let table = validate_identifier(table, true)?;
    let column = validate_identifier(column, false)?;
    Ok(format!(
        "SELECT {column} FROM {table} WHERE {column} IS NOT NULL AND ROWNUM <= :max_rows"
    ))
}

/// Accepts `name` or, when `qualified`, `schema.name`, each part starting with a letter
/// followed by letters, digits, `_`, `$` or `#`.
fn validate_identifier(identifier: &str, qualified: bool) -> Result<&str, SourceError> {
    let invalid = || SourceError::InvalidIdentifier(identifier.to_string());
    let parts: Vec<&str> = identifier.split('.').collect();
    if parts.len() > if qualified { 2 } else { 1 } {
        return Err(invalid());
    }
    for part in parts {
        let mut chars = part.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => {}
            _ => return Err(invalid()),
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#')) {
            return Err(invalid());
        }
    }
    Ok(identifier)
}
