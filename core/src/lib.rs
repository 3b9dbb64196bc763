//! # simsearch
//!
//! Embedding based similarity search: fetch candidate texts, embed them, index them in
//! memory, then rank them against free text queries by cosine distance.
//!
//! ## Components
//!
//! - **Text sources** (`loader`): a hardcoded sample list or a database column, the latter
//!   through an opaque connector (Oracle behind the `oracle` feature)
//! - **Embedding models** (`embeddings`, `providers`): text to fixed length vectors, loaded
//!   once per process through [`embeddings::SharedModel`]
//! - **Vector index** (`vector_index`): immutable snapshot of embedded documents
//! - **Search session** (`session`): the `Empty` / `Ready` state machine tying them together
//!
//! ## Example
//!
//! ```rust,no_run
//! use simsearch::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::default();
//!     let session =
//!         SearchSession::with_shared_model(SharedModel::global(), &config.embedding).await?;
//!
//!     let load = session.load_source(SourceKind::Sample, &config).await;
//!     session.build_index(load.documents).await?;
//!
//!     for result in session.search("open an account", 2).await? {
//!         println!("{} {} ({:.3})", result.rank, result.document.content(), result.similarity());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature flags
//!
//! Name | Description | Default?
//! ---|---|---
//! `oracle` | database text source backed by Oracle Database | No
//! `fastembed` | local all-MiniLM-L6-v2 embeddings | No

/// JSON configuration, secrets are referenced by environment variable name
pub mod config;

/// Document type shared by sources, index and results
pub mod document;

/// Embedding model trait, the hashing embedder and the process-wide model cell
pub mod embeddings;

/// Error types for all library operations
pub mod error;

/// Text sources
pub mod loader;

/// Convenience prelude exports
pub mod prelude;

/// Builtin embedding model providers
pub mod providers;

/// Search workflow state machine
pub mod session;

/// In-memory index and the cosine distance it ranks by
pub mod vector_index;

pub use error::{Error, Result};
