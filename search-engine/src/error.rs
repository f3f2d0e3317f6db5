use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("retrieval returned no candidates")]
    RetrievalEmpty,
}
