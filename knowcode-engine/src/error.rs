//! Error taxonomy (spec §7), mirroring `rag-store::RagError`'s
//! per-kind enum shape so callers can match on kind without downcasting.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("io error: {0}")]
    Io(String),
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("embedding failure: {0}")]
    EmbeddingFailure(String),
    #[error("index inconsistent: {0}")]
    IndexInconsistent(String),
    #[error("budget overflow: {0}")]
    BudgetOverflow(String),
    #[error("retrieval empty")]
    RetrievalEmpty,
    #[error("deadline exceeded after {0:?}")]
    DeadlineExceeded(std::time::Duration),
}

impl From<knowledge_store::StoreError> for EngineError {
    fn from(e: knowledge_store::StoreError) -> Self {
        match e {
            knowledge_store::StoreError::Io(err) => EngineError::Io(err.to_string()),
            knowledge_store::StoreError::Serde(err) => EngineError::Io(err.to_string()),
            knowledge_store::StoreError::SchemaMismatch { found, reader } => {
                EngineError::SchemaMismatch(format!("store schema {found} newer than reader {reader}"))
            }
            knowledge_store::StoreError::NotAForest(msg) => EngineError::IndexInconsistent(msg),
        }
    }
}

impl From<vector_store::VectorError> for EngineError {
    fn from(e: vector_store::VectorError) -> Self {
        match e {
            vector_store::VectorError::Io(err) => EngineError::Io(err.to_string()),
            vector_store::VectorError::Serde(err) => EngineError::Io(err.to_string()),
            vector_store::VectorError::DimensionMismatch { got, want } => {
                EngineError::IndexInconsistent(format!("vector dimension {got} != manifest {want}"))
            }
            vector_store::VectorError::SchemaMismatch => {
                EngineError::SchemaMismatch("vector index manifest disagrees with configuration".into())
            }
        }
    }
}

impl From<search_engine::SearchError> for EngineError {
    fn from(e: search_engine::SearchError) -> Self {
        match e {
            search_engine::SearchError::RetrievalEmpty => EngineError::RetrievalEmpty,
        }
    }
}

impl From<context_synthesizer::ContextError> for EngineError {
    fn from(e: context_synthesizer::ContextError) -> Self {
        match e {
            context_synthesizer::ContextError::NoEntities => EngineError::RetrievalEmpty,
        }
    }
}

impl From<embeddings::EmbedError> for EngineError {
    fn from(e: embeddings::EmbedError) -> Self {
        EngineError::EmbeddingFailure(e.to_string())
    }
}
