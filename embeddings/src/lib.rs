pub mod backoff;
pub mod error;
pub mod pool;
pub mod provider;

pub use error::EmbedError;
pub use pool::{embed_chunks, outcome_to_result, EmbedOutcome};
pub use provider::{EmbeddingConfig, EmbeddingProvider, HttpEmbeddingProvider, ProviderKind};
