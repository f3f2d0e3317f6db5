use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexicalError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
