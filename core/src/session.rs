use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    config::{AppConfig, EmbeddingConfig},
    document::Document,
    embeddings::{EmbedderError, EmbeddingModel, SharedModel},
    loader::{open_source, SourceError, SourceKind, TextSource},
    vector_index::{SearchResult, VectorIndex, VectorIndexError},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("The index hasn't been built yet, build it first")]
    NotReady,
    #[error("No documents to index")]
    EmptyInput,
    #[error("Embedding model failed to load: {0}")]
    ModelLoadFailure(EmbedderError),
    #[error("Failed to embed query: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("Index error: {0}")]
    Index(VectorIndexError),
}

impl From<VectorIndexError> for SessionError {
    fn from(e: VectorIndexError) -> Self {
        match e {
            VectorIndexError::EmptyInput => Self::EmptyInput,
            e => Self::Index(e),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SessionState {
    /// No index, searches fail with `NotReady`
    Empty,
    Ready,
}

/// Outcome of loading documents from a text source.
///
/// An unavailable source yields no documents and the reason in `warning`, the caller
/// decides whether to fall back to another source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceLoad {
    pub documents: Vec<Document>,
    pub warning: Option<SourceError>,
    /// Set when `documents` came from the sample texts instead of the requested source
    pub sample_fallback: bool,
}

impl SourceLoad {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Build-then-search workflow over one embedding model.
///
/// The index sits behind a `RwLock`: a rebuild holds the write half for its whole
/// duration so searches never observe a half built index, and the previous index is
/// dropped before the new one is built.
pub struct SearchSession {
    model: Arc<dyn EmbeddingModel>,
    index: RwLock<Option<VectorIndex>>,
}

impl SearchSession {
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        Self {
            model,
            index: RwLock::new(None),
        }
    }

    /// Creates a session on the model held by `shared`, loading it now if needed.
    ///
    /// # Errors
    /// `SessionError::ModelLoadFailure` if the model can't be loaded, no session exists then.
    pub async fn with_shared_model(
        shared: &SharedModel,
        config: &EmbeddingConfig,
    ) -> Result<Self, SessionError> {
        let model = shared
            .get_or_load(config)
            .await
            .map_err(SessionError::ModelLoadFailure)?;
        Ok(Self::new(model))
    }

    /// Loads documents from the source of the given kind, configured by `config`.
    pub async fn load_source(&self, kind: SourceKind, config: &AppConfig) -> SourceLoad {
        match open_source(kind, config) {
            Ok(source) => self.load_from(source.as_ref(), config.max_rows).await,
            Err(e) => {
                warn!(source = %kind, "Text source unavailable: {e}");
                SourceLoad {
                    warning: Some(e),
                    ..Default::default()
                }
            }
        }
    }

    /// Like [`load_source`](Self::load_source), but loads the sample texts instead when
    /// `fallback_sample` is set and `kind` yields no documents.
    ///
    /// The warning of the first load is kept so the caller can still report it.
    pub async fn load_source_or_sample(
        &self,
        kind: SourceKind,
        config: &AppConfig,
        fallback_sample: bool,
    ) -> SourceLoad {
        let load = self.load_source(kind, config).await;
        if !load.is_empty() || !fallback_sample || kind == SourceKind::Sample {
            return load;
        }
        info!(source = %kind, "No documents loaded, using the sample texts");
        let sample = self.load_source(SourceKind::Sample, config).await;
        SourceLoad {
            documents: sample.documents,
            warning: load.warning,
            sample_fallback: true,
        }
    }

    /// Fetches at most `limit` documents from `source`, never failing.
    pub async fn load_from(&self, source: &dyn TextSource, limit: usize) -> SourceLoad {
        match source.fetch(limit).await {
            Ok(documents) => {
                info!(source = source.name(), documents = documents.len(), "Loaded documents");
                SourceLoad {
                    documents,
                    ..Default::default()
                }
            }
            Err(e) => {
                warn!(source = source.name(), "Text source unavailable: {e}");
                SourceLoad {
                    warning: Some(e),
                    ..Default::default()
                }
            }
        }
    }

    /// Replaces the index with one built from `documents`, returning its size.
    ///
    /// The previous index is discarded first, on any error the session is left `Empty`.
    pub async fn build_index(&self, documents: Vec<Document>) -> Result<usize, SessionError> {
        let mut index = self.index.write().await;
        *index = None;
        let built = VectorIndex::build(documents, self.model.as_ref())
            .await
            .inspect_err(|e| warn!("Index build failed: {e}"))?;
        let size = built.len();
        *index = Some(built);
        Ok(size)
    }

    /// Returns the `k` indexed documents closest to `query`, ranked from 1.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>, SessionError> {
        let guard = self.index.read().await;
        let index = guard.as_ref().ok_or(SessionError::NotReady)?;
        let embedding = self.model.embed(query).await?;
        let results = index.query(&embedding, k)?;
        debug!(query, k, results = results.len(), "Search done");
        Ok(results)
    }

    pub async fn state(&self) -> SessionState {
        if self.index.read().await.is_some() {
            SessionState::Ready
        } else {
            SessionState::Empty
        }
    }

    /// Documents of the current index, in insertion order.
    pub async fn indexed_documents(&self) -> Vec<Document> {
        self.index
            .read()
            .await
            .as_ref()
            .map(|index| index.documents().cloned().collect())
            .unwrap_or_default()
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DatabaseConfig, embeddings::HashingEmbedding, loader::SampleTextSource};
    use async_trait::async_trait;
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        time::Duration,
    };
    use tokio::sync::Notify;

    fn session() -> SearchSession {
        SearchSession::new(Arc::new(HashingEmbedding::default()))
    }

    struct DownSource;

    #[async_trait]
    impl TextSource for DownSource {
        async fn fetch(&self, _limit: usize) -> Result<Vec<Document>, SourceError> {
            Err(SourceError::Unavailable("DPY-6005: cannot connect to database".to_string()))
        }
        fn name(&self) -> &str {
            "down"
        }
    }

    struct FailingModel;

    #[async_trait]
    impl EmbeddingModel for FailingModel {
        async fn embed(&self, _data: &str) -> Result<Vec<f64>, EmbedderError> {
            Err(EmbedderError::ProviderError("rate limited".to_string()))
        }
        fn dimension(&self) -> usize {
            4
        }
        fn model_name(&self) -> &str {
            "failing"
        }
    }

    /// Hashing model whose next `embed` call parks until `release` once `hold` is set.
    #[derive(Default)]
    struct GatedModel {
        inner: HashingEmbedding,
        hold: AtomicBool,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl EmbeddingModel for GatedModel {
        async fn embed(&self, data: &str) -> Result<Vec<f64>, EmbedderError> {
            if self.hold.swap(false, Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            self.inner.embed(data).await
        }
        fn dimension(&self) -> usize {
            self.inner.dimension()
        }
        fn model_name(&self) -> &str {
            "gated"
        }
    }

    /// Database settings pointing at env vars that are never set.
    fn unreachable_database() -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                user_var: "SIMSEARCH_TEST_UNSET_DB_USER".to_string(),
                password_var: "SIMSEARCH_TEST_UNSET_DB_PASSWORD".to_string(),
                dsn_var: "SIMSEARCH_TEST_UNSET_DB_DSN".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_search_before_build() {
        let session = session();
        assert_eq!(session.state().await, SessionState::Empty);
        assert_eq!(session.search("balance", 3).await.unwrap_err(), SessionError::NotReady);
    }

    #[tokio::test]
    async fn test_build_then_search() {
        let session = session();
        let load = session.load_from(&SampleTextSource::default(), 100).await;
        assert!(load.warning.is_none());

        assert_eq!(session.build_index(load.documents).await.unwrap(), 6);
        assert_eq!(session.state().await, SessionState::Ready);

        let results = session.search("I lost my debit card", 3).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].document.content(), "I lost my debit card.");
        assert_eq!(results[0].rank, 1);
        assert!(results[0].similarity() > 0.99);
    }

    #[tokio::test]
    async fn test_build_empty_keeps_session_empty() {
        let session = session();
        assert_eq!(session.build_index(vec![]).await.unwrap_err(), SessionError::EmptyInput);
        assert_eq!(session.state().await, SessionState::Empty);
        assert_eq!(session.search("loan", 1).await.unwrap_err(), SessionError::NotReady);
    }

    #[tokio::test]
    async fn test_failed_rebuild_discards_previous_index() {
        let session = session();
        let docs = SampleTextSource::default().fetch(10).await.unwrap();
        session.build_index(docs).await.unwrap();

        assert_eq!(session.build_index(vec![]).await.unwrap_err(), SessionError::EmptyInput);
        assert_eq!(session.state().await, SessionState::Empty);
        assert!(session.indexed_documents().await.is_empty());
    }

    #[tokio::test]
    async fn test_rebuild_replaces_index() {
        let session = session();
        session
            .build_index(SampleTextSource::default().fetch(10).await.unwrap())
            .await
            .unwrap();
        session
            .build_index(SampleTextSource::new(["only one"]).fetch(10).await.unwrap())
            .await
            .unwrap();

        let docs = session.indexed_documents().await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content(), "only one");
    }

    #[tokio::test]
    async fn test_unavailable_source_is_a_warning() {
        let load = session().load_from(&DownSource, 10).await;
        assert!(load.is_empty());
        assert!(matches!(load.warning, Some(SourceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_load_source_by_kind() {
        let load = session().load_source(SourceKind::Sample, &AppConfig::default()).await;
        assert_eq!(load.documents.len(), 6);
    }

    #[tokio::test]
    async fn test_embedding_failure_leaves_session_empty() {
        let session = SearchSession::new(Arc::new(FailingModel));
        let docs = SampleTextSource::default().fetch(10).await.unwrap();
        assert!(matches!(
            session.build_index(docs).await,
            Err(SessionError::Index(VectorIndexError::Embedding(_)))
        ));
        assert_eq!(session.state().await, SessionState::Empty);
    }

    #[tokio::test]
    async fn test_model_load_failure_is_immediate() {
        let shared = SharedModel::new();
        let config = EmbeddingConfig::OpenAi {
            model: "text-embedding-3-small".to_string(),
            api_key_var: Some("SIMSEARCH_TEST_UNSET_SESSION_KEY".to_string()),
            api_url: None,
            dimension: None,
        };
        let result = SearchSession::with_shared_model(&shared, &config).await;
        assert!(matches!(result, Err(SessionError::ModelLoadFailure(_))));
        assert!(shared.get().is_none());
    }

    #[tokio::test]
    async fn test_unavailable_database_falls_back_to_sample() {
        let load = session()
            .load_source_or_sample(SourceKind::Database, &unreachable_database(), true)
            .await;
        assert_eq!(load.documents.len(), 6);
        assert!(load.sample_fallback);
        assert!(matches!(load.warning, Some(SourceError::Unavailable(_))));
        assert_eq!(load.documents[0].source(), Some("sample"));
    }

    #[tokio::test]
    async fn test_no_fallback_without_flag() {
        let load = session()
            .load_source_or_sample(SourceKind::Database, &unreachable_database(), false)
            .await;
        assert!(load.is_empty());
        assert!(!load.sample_fallback);
        assert!(matches!(load.warning, Some(SourceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_sample_source_never_falls_back() {
        let load = session()
            .load_source_or_sample(SourceKind::Sample, &AppConfig::default(), true)
            .await;
        assert_eq!(load.documents.len(), 6);
        assert!(!load.sample_fallback);
        assert!(load.warning.is_none());
    }

    #[tokio::test]
    async fn test_search_waits_for_rebuild() {
        let model = Arc::new(GatedModel::default());
        let session = Arc::new(SearchSession::new(model.clone()));
        session
            .build_index(SampleTextSource::new(["old balance statement"]).fetch(10).await.unwrap())
            .await
            .unwrap();

        model.hold.store(true, Ordering::SeqCst);
        let rebuild = tokio::spawn({
            let session = session.clone();
            async move {
                let docs = SampleTextSource::new(["new loan rates", "new debit card"])
                    .fetch(10)
                    .await
                    .unwrap();
                session.build_index(docs).await
            }
        });
        model.entered.notified().await;

        let search = tokio::spawn({
            let session = session.clone();
            async move { session.search("balance statement", 10).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!search.is_finished());

        model.release.notify_one();
        assert_eq!(rebuild.await.unwrap().unwrap(), 2);

        let results = search.await.unwrap().unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.document.content().starts_with("new")));
    }
}
