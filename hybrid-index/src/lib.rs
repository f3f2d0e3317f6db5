pub mod error;
pub mod rerank;
pub mod rrf;

pub use error::HybridError;
pub use rerank::{rerank_or_fallback, Reranker};
pub use rrf::{reciprocal_rank_fusion, FusedHit, DEFAULT_RRF_K};
