//! Oracle Database connector, enabled with the `oracle` feature.
//!
//! Uses the ODPI-C based `oracle` crate, which needs the Oracle client libraries at runtime.
//! Two connection styles are supported:
//! - plain TLS: `dsn` is a full `(description=...(protocol=tcps)...)` connect descriptor
//! - wallet based mutual TLS: `config_dir` points at the unpacked wallet (`tnsnames.ora`,
//!   `sqlnet.ora`, `cwallet.sso`) and `dsn` is one of its TNS aliases
//!
//! Only auto-login wallets (`cwallet.sso`) work: there is no wallet password setting, so a
//! wallet that only ships a password protected `ewallet.p12` can't be opened.

use async_trait::async_trait;
use std::sync::OnceLock;
use tracing::{debug, info};

use super::sql::{SqlConnection, SqlConnector, SqlError};
use crate::config::DatabaseCredentials;

static CLIENT_INIT: OnceLock<Result<(), SqlError>> = OnceLock::new();

pub struct OracleConnector {
    credentials: DatabaseCredentials,
}

impl OracleConnector {
    pub fn new(credentials: DatabaseCredentials) -> Self {
        Self { credentials }
    }
}

/// The Oracle client can only be initialized once per process, the first config dir wins.
fn init_client(credentials: &DatabaseCredentials) -> Result<(), SqlError> {
    CLIENT_INIT
        .get_or_init(|| {
            let Some(dir) = &credentials.config_dir else {
                return Ok(());
            };
            let mut params = ::oracle::InitParams::new();
            params
                .oracle_client_config_dir(dir.as_os_str())
                .map_err(to_sql_error)?;
            params.init().map_err(to_sql_error)?;
            info!(config_dir = %dir.display(), "Oracle client initialized");
            Ok(())
        })
        .clone()
}

fn to_sql_error(e: ::oracle::Error) -> SqlError {
    SqlError(e.to_string())
}

fn join_error(e: tokio::task::JoinError) -> SqlError {
    SqlError(format!("database task failed: {e}"))
}

#[async_trait]
impl SqlConnector for OracleConnector {
    async fn connect(&self) -> Result<Box<dyn SqlConnection>, SqlError> {
        let credentials = self.credentials.clone();
        let connection = tokio::task::spawn_blocking(move || {
            init_client(&credentials)?;
            ::oracle::Connection::connect(
                &credentials.user,
                &credentials.password,
                &credentials.dsn,
            )
            .map_err(to_sql_error)
        })
        .await
        .map_err(join_error)??;
        debug!(dsn = %self.credentials.dsn, "Connected to Oracle");
        Ok(Box::new(OracleConnection {
            inner: Some(connection),
        }))
    }
}

/// The driver connection is moved onto a blocking thread for every call and handed back.
pub struct OracleConnection {
    inner: Option<::oracle::Connection>,
}

#[async_trait]
impl SqlConnection for OracleConnection {
    async fn query_texts(
        &mut self,
        sql: &str,
        max_rows: usize,
    ) -> Result<Vec<Option<String>>, SqlError> {
        let connection = self
            .inner
            .take()
            .ok_or_else(|| SqlError("connection already closed".to_string()))?;
        let sql = sql.to_string();
        let (connection, rows) = tokio::task::spawn_blocking(move || {
            let rows = read_texts(&connection, &sql, max_rows as u64);
            (connection, rows)
        })
        .await
        .map_err(join_error)?;
        self.inner = Some(connection);
        rows
    }

    async fn close(self: Box<Self>) -> Result<(), SqlError> {
        let Some(connection) = self.inner else {
            return Ok(());
        };
        tokio::task::spawn_blocking(move || connection.close().map_err(to_sql_error))
            .await
            .map_err(join_error)?
    }
}

fn read_texts(
    connection: &::oracle::Connection,
    sql: &str,
    max_rows: u64,
) -> Result<Vec<Option<String>>, SqlError> {
    let rows = connection
        .query_as::<Option<String>>(sql, &[&max_rows])
        .map_err(to_sql_error)?;
    rows.map(|row| row.map_err(to_sql_error)).collect()
}
