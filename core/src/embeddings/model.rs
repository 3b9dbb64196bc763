use crate::embeddings::EmbedderError;
use async_trait::async_trait;

/// Maps text to a fixed length vector.
///
/// Implementations must be deterministic: the same text embedded by the same model
/// configuration yields the same vector, and every vector has `dimension()` components.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    async fn embed(&self, data: &str) -> Result<Vec<f64>, EmbedderError>;

    /// Length of every vector returned by `embed`
    fn dimension(&self) -> usize;

    /// Identifier of the underlying model, used in logs
    fn model_name(&self) -> &str;
}
