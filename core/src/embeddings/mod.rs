pub mod hashing;
pub mod model;
pub mod shared;

pub use hashing::HashingEmbedding;
pub use model::EmbeddingModel;
pub use shared::SharedModel;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbedderError {
    #[error("RequestError: {0}")]
    RequestError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("Failed to load embedding model `{model}`: {message}")]
    ModelLoad { model: String, message: String },
}
