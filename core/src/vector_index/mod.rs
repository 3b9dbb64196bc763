mod distance;

pub use distance::{cosine_distance, cosine_similarity};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    document::Document,
    embeddings::{EmbedderError, EmbeddingModel},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorIndexError {
    #[error("No documents to index")]
    EmptyInput,
    #[error("Embedding dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("Failed to embed document: {0}")]
    Embedding(#[from] EmbedderError),
}

/// A document together with its embedding, owned by the index that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub document: Document,
    pub embedding: Vec<f64>,
}

/// One ranked hit of a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub document: Document,
    /// Cosine distance to the query, lower is more similar
    pub distance: f64,
    /// 1-based position in the result list
    pub rank: usize,
}

impl SearchResult {
    /// Displayed score, `1 - distance`.
    pub fn similarity(&self) -> f64 {
        1.0 - self.distance
    }
}

/// Immutable in-memory snapshot of embedded documents.
///
/// Built in one go from a batch of documents, there is no insert or delete afterwards;
/// rebuilding means building a new index and dropping the old one.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimension: usize,
}

impl VectorIndex {
    /// Embeds every document once, in order, and stores the results.
    ///
    /// # Errors
    /// * `EmptyInput` if `documents` is empty
    /// * `DimensionMismatch` if the model returns a vector of the wrong length
    /// * `Embedding` if the model fails, no partial index is returned
    pub async fn build(
        documents: Vec<Document>,
        model: &dyn EmbeddingModel,
    ) -> Result<Self, VectorIndexError> {
        if documents.is_empty() {
            return Err(VectorIndexError::EmptyInput);
        }
        let dimension = model.dimension();
        let mut entries = Vec::with_capacity(documents.len());
        for document in documents {
            let embedding = model.embed(document.content()).await?;
            if embedding.len() != dimension {
                return Err(VectorIndexError::DimensionMismatch {
                    expected: dimension,
                    found: embedding.len(),
                });
            }
            entries.push(IndexEntry {
                document,
                embedding,
            });
        }
        info!(
            entries = entries.len(),
            dimension,
            model = model.model_name(),
            "Vector index built"
        );
        Ok(Self { entries, dimension })
    }

    /// Returns the `k` entries closest to `embedding`, ascending by cosine distance.
    ///
    /// `k` is clamped to `[1, len]`, ties keep insertion order.
    pub fn query(
        &self,
        embedding: &[f64],
        k: usize,
    ) -> Result<Vec<SearchResult>, VectorIndexError> {
        if embedding.len() != self.dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension,
                found: embedding.len(),
            });
        }
        let k = k.clamp(1, self.entries.len());

        let mut scored = self
            .entries
            .iter()
            .map(|entry| (cosine_distance(embedding, &entry.embedding), entry))
            .collect::<Vec<_>>();
        // stable, so equal distances stay in insertion order
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.truncate(k);
        debug!(k, best = scored.first().map(|(d, _)| *d), "Vector index queried");

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(i, (distance, entry))| SearchResult {
                document: entry.document.clone(),
                distance,
                rank: i + 1,
            })
            .collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true for a built index
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.entries.iter().map(|e| &e.document)
    }
}
