use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("config error: {0}")]
    Config(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },
    #[error("embedding_failed for {count} chunk(s): {reason}")]
    EmbeddingFailed { count: usize, reason: String },
}
