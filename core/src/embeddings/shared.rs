use std::{future::Future, sync::Arc};
use tokio::sync::OnceCell;
use tracing::info;

use super::{model::EmbeddingModel, EmbedderError};
use crate::{config::EmbeddingConfig, providers::load_model};

static GLOBAL: SharedModel = SharedModel::new();

/// Lazily initialized embedding model shared for the lifetime of its owner.
///
/// The first successful `get_or_*` call loads the model, every later call gets the same
/// instance back regardless of the configuration it passes. Concurrent first calls wait
/// on a single initialization. A failed load leaves the cell empty so the error reaches
/// the caller that triggered it.
pub struct SharedModel {
    cell: OnceCell<Arc<dyn EmbeddingModel>>,
}

impl SharedModel {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    /// The process-wide instance.
    pub fn global() -> &'static SharedModel {
        &GLOBAL
    }

    /// Returns the loaded model, loading it from `config` on first use.
    pub async fn get_or_load(
        &self,
        config: &EmbeddingConfig,
    ) -> Result<Arc<dyn EmbeddingModel>, EmbedderError> {
        self.get_or_init_with(|| load_model(config)).await
    }

    /// Returns the loaded model, running `loader` on first use.
    pub async fn get_or_init_with<F, Fut>(
        &self,
        loader: F,
    ) -> Result<Arc<dyn EmbeddingModel>, EmbedderError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn EmbeddingModel>, EmbedderError>>,
    {
        let model = self
            .cell
            .get_or_try_init(|| async move {
                let model = loader().await?;
                info!(
                    model = model.model_name(),
                    dimension = model.dimension(),
                    "Embedding model loaded"
                );
                Ok::<_, EmbedderError>(model)
            })
            .await?;
        Ok(Arc::clone(model))
    }

    /// The model if it was already loaded.
    pub fn get(&self) -> Option<Arc<dyn EmbeddingModel>> {
        self.cell.get().cloned()
    }
}

impl Default for SharedModel {
    fn default() -> Self {
        Self::new()
    }
}
