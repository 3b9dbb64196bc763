use async_trait::async_trait;

use super::{model::EmbeddingModel, EmbedderError};

pub const DEFAULT_DIMENSION: usize = 384;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Local bag-of-words embedding based on feature hashing.
///
/// Text is lowercased and split into alphanumeric tokens, each token is hashed (FNV-1a)
/// into one of `dimension` buckets and the resulting count vector is L2-normalized.
/// Texts sharing words end up close in cosine distance, text without any token embeds
/// to the all-zero vector.
///
/// It needs no network access nor model download, which makes it the default provider.
#[derive(Debug, Clone)]
pub struct HashingEmbedding {
    dimension: usize,
    name: String,
}

impl HashingEmbedding {
    /// Creates a hashing embedder, a `dimension` of 0 falls back to [`DEFAULT_DIMENSION`].
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        let dimension = if dimension == 0 {
            DEFAULT_DIMENSION
        } else {
            dimension
        };
        Self {
            dimension,
            name: format!("hashing-bow-{dimension}"),
        }
    }

    fn embed_sync(&self, data: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.dimension];
        for token in tokens(data) {
            let bucket = (fnv1a(token.as_bytes()) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

impl Default for HashingEmbedding {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingModel for HashingEmbedding {
    async fn embed(&self, data: &str) -> Result<Vec<f64>, EmbedderError> {
        Ok(self.embed_sync(data))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}
