use crate::{
    config::ConfigError, embeddings::EmbedderError, loader::SourceError, session::SessionError,
    vector_index::VectorIndexError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Embedder error: {0}")]
    Embedder(#[from] EmbedderError),
    #[error("VectorIndex error: {0}")]
    VectorIndex(#[from] VectorIndexError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
