/// Embedding model providers
pub mod embeddings;

use std::sync::Arc;

use crate::{
    config::EmbeddingConfig,
    embeddings::{EmbedderError, EmbeddingModel, HashingEmbedding},
};

/// Constructs the embedding model described by `config`.
///
/// Loading is where provider problems surface (missing API key, model download failure,
/// provider not compiled in), always as `EmbedderError::ModelLoad`.
pub async fn load_model(
    config: &EmbeddingConfig,
) -> Result<Arc<dyn EmbeddingModel>, EmbedderError> {
    match config {
        EmbeddingConfig::Hashing { dimension } => Ok(Arc::new(HashingEmbedding::new(*dimension))),
        EmbeddingConfig::OpenAi {
            model,
            api_key_var,
            api_url,
            dimension,
        } => Ok(Arc::new(embeddings::OpenAIEmbedding::from_env(
            model,
            api_key_var.as_deref(),
            api_url.as_deref(),
            *dimension,
        )?)),
        EmbeddingConfig::FastEmbed {} => load_fastembed().await,
    }
}

#[cfg(feature = "fastembed")]
async fn load_fastembed() -> Result<Arc<dyn EmbeddingModel>, EmbedderError> {
    Ok(Arc::new(embeddings::FastEmbedEmbedding::load().await?))
}

#[cfg(not(feature = "fastembed"))]
async fn load_fastembed() -> Result<Arc<dyn EmbeddingModel>, EmbedderError> {
    Err(EmbedderError::ModelLoad {
        model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
        message: "simsearch was built without the `fastembed` feature".to_string(),
    })
}
