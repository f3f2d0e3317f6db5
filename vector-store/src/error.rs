use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("dimension mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },
    #[error("manifest does not match configuration (model/dimension/provider changed) — rebuild required")]
    SchemaMismatch,
}
