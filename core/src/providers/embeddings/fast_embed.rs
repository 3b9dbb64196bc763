use async_trait::async_trait;
use fastembed::{EmbeddingModel as FastEmbedModel, InitOptions, TextEmbedding};
use std::sync::{Arc, Mutex};

use crate::embeddings::{model::EmbeddingModel, EmbedderError};

const MODEL_NAME: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DIMENSION: usize = 384;

/// Local all-MiniLM-L6-v2 sentence embeddings through the ONNX runtime.
///
/// The model files are downloaded to the fastembed cache on first load.
pub struct FastEmbedEmbedding {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedEmbedding {
    pub async fn load() -> Result<Self, EmbedderError> {
        let load_error = |message: String| EmbedderError::ModelLoad {
            model: MODEL_NAME.to_string(),
            message,
        };
        let model = tokio::task::spawn_blocking(|| {
            TextEmbedding::try_new(
                InitOptions::new(FastEmbedModel::AllMiniLML6V2).with_show_download_progress(false),
            )
        })
        .await
        .map_err(|e| load_error(e.to_string()))?
        .map_err(|e| load_error(e.to_string()))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

#[async_trait]
impl EmbeddingModel for FastEmbedEmbedding {
    async fn embed(&self, data: &str) -> Result<Vec<f64>, EmbedderError> {
        let model = Arc::clone(&self.model);
        let text = data.to_string();
        let mut vectors = tokio::task::spawn_blocking(move || {
            let model = model
                .lock()
                .map_err(|e| EmbedderError::ProviderError(e.to_string()))?;
            model
                .embed(vec![text], None)
                .map_err(|e| EmbedderError::ProviderError(e.to_string()))
        })
        .await
        .map_err(|e| EmbedderError::ProviderError(e.to_string()))??;

        vectors
            .pop()
            .map(|v| v.into_iter().map(f64::from).collect())
            .ok_or_else(|| EmbedderError::ParseError("model returned no embedding".to_string()))
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}
