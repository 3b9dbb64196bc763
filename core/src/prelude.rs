pub use crate::{
    config::{AppConfig, EmbeddingConfig, MAX_TOP_K},
    document::Document,
    embeddings::{EmbeddingModel, HashingEmbedding, SharedModel},
    error::{Error, Result},
    loader::{SampleTextSource, SourceError, SourceKind, TextSource},
    session::{SearchSession, SessionError, SessionState, SourceLoad},
    vector_index::{cosine_distance, SearchResult, VectorIndex},
};
