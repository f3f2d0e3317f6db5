use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("schema mismatch: document schema_version {found} is newer than reader {reader}")]
    SchemaMismatch { found: u32, reader: u32 },

    #[error("contains relation is not a forest: entity {0} has more than one parent")]
    NotAForest(String),
}
