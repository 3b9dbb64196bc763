//! JSON configuration of the search workflow.
//!
//! Secrets are never stored in the config itself, the config names the environment
//! variables holding them.
//!
//! ```json
//! {
//!   "embedding": { "provider": "open_ai", "model": "text-embedding-3-small" },
//!   "database": { "table": "ASSETS", "column": "NOTES" },
//!   "max_rows": 500,
//!   "top_k": 3
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::{fmt, path::{Path, PathBuf}};
use thiserror::Error;

/// Largest number of results the user facing surface asks for.
pub const MAX_TOP_K: usize = 10;

const DEFAULT_MAX_ROWS: usize = 1000;
const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("Environment variable `{0}` is not set")]
    MissingEnvVar(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cap on the number of rows fetched from a text source
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    /// Default number of results per query, within `1..=MAX_TOP_K`
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            database: DatabaseConfig::default(),
            max_rows: DEFAULT_MAX_ROWS,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl AppConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// # Errors
    /// `ConfigError::Invalid` if `top_k` is outside `1..=MAX_TOP_K` or `max_rows` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TOP_K).contains(&self.top_k) {
            return Err(ConfigError::Invalid(format!(
                "top_k ({}) must be between 1 and {MAX_TOP_K}",
                self.top_k
            )));
        }
        if self.max_rows == 0 {
            return Err(ConfigError::Invalid("max_rows must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Which embedding provider to load, and its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum EmbeddingConfig {
    /// Local feature hashing embedder, a `dimension` of 0 means the default
    Hashing {
        #[serde(default)]
        dimension: usize,
    },
    /// OpenAI compatible embeddings endpoint
    OpenAi {
        model: String,
        /// Env var holding the API key, `OPENAI_API_KEY` if unset
        api_key_var: Option<String>,
        api_url: Option<String>,
        /// Vector length of `model`, looked up for known models if unset
        dimension: Option<usize>,
    },
    /// Local all-MiniLM-L6-v2 through fastembed, needs the `fastembed` feature
    FastEmbed {},
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self::Hashing { dimension: 0 }
    }
}

/// Where to read texts from when the database source is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub user_var: String,
    pub password_var: String,
    /// Env var holding the DSN, a TNS alias or a full TLS connect descriptor
    pub dsn_var: String,
    /// Env var holding the wallet / client config directory, optional
    pub config_dir_var: String,
    pub table: String,
    pub column: String,
    /// Value of the `source` metadata of fetched documents
    pub label: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user_var: "SIMSEARCH_DB_USER".to_string(),
            password_var: "SIMSEARCH_DB_PASSWORD".to_string(),
            dsn_var: "SIMSEARCH_DB_DSN".to_string(),
            config_dir_var: "SIMSEARCH_DB_CONFIG_DIR".to_string(),
            table: "ASSETS".to_string(),
            column: "NOTES".to_string(),
            label: "oracle".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Reads the connection settings from the environment.
    ///
    /// # Errors
    /// `ConfigError::MissingEnvVar` if the user, password or DSN variable is unset or empty
    pub fn credentials(&self) -> Result<DatabaseCredentials, ConfigError> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    fn credentials_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<DatabaseCredentials, ConfigError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };
        Ok(DatabaseCredentials {
            user: required(&self.user_var)?,
            password: required(&self.password_var)?,
            dsn: required(&self.dsn_var)?,
            config_dir: lookup(&self.config_dir_var)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        })
    }
}

/// Resolved connection settings.
#[derive(Clone)]
pub struct DatabaseCredentials {
    pub user: String,
    pub password: String,
    pub dsn: String,
    pub config_dir: Option<PathBuf>,
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("dsn", &self.dsn)
            .field("config_dir", &self.config_dir)
            .finish()
    }
}
