use thiserror::Error;

#[derive(Debug, Error)]
pub enum HybridError {
    #[error("reranker error: {0}")]
    Reranker(String),
    #[error("reranker timed out after {0:?}")]
    Timeout(std::time::Duration),
}
