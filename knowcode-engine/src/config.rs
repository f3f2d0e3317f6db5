//! Engine configuration (spec §6): embedding/reranking model catalogs plus
//! retrieval defaults, loadable from environment variables the way the
//! teacher's `ai-llm-service`/`rag-store` configs are (credentials named
//! by an env-var key, never embedded literally).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelConfig {
    pub name: String,
    pub provider: String,
    pub api_key_env: String,
    pub dimensions: usize,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankingModelConfig {
    pub name: String,
    pub provider: String,
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalDefaults {
    pub rrf_k: u32,
    pub top_n: usize,
    pub expand_deps: bool,
}

impl Default for RetrievalDefaults {
    fn default() -> Self {
        Self { rrf_k: hybrid_index::DEFAULT_RRF_K, top_n: 40, expand_deps: false }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub embedding_models: Vec<EmbeddingModelConfig>,
    pub reranking_models: Vec<RerankingModelConfig>,
    pub retrieval: RetrievalDefaults,
}

impl EngineConfig {
    /// Builds a config from environment variables, matching the single
    /// active embedding model against `KNOWCODE_EMBEDDING_MODEL`/
    /// `KNOWCODE_EMBEDDING_PROVIDER`/`KNOWCODE_EMBEDDING_API_KEY_ENV`/
    /// `KNOWCODE_EMBEDDING_DIM`/`KNOWCODE_EMBEDDING_BATCH_SIZE`. Missing
    /// credentials degrade the feature rather than fail config loading
    /// (spec §6: "missing credentials degrade the feature").
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let (Ok(name), Ok(provider), Ok(api_key_env)) = (
            std::env::var("KNOWCODE_EMBEDDING_MODEL"),
            std::env::var("KNOWCODE_EMBEDDING_PROVIDER"),
            std::env::var("KNOWCODE_EMBEDDING_API_KEY_ENV"),
        ) {
            let dimensions = std::env::var("KNOWCODE_EMBEDDING_DIM").ok().and_then(|s| s.parse().ok()).unwrap_or(1536);
            let batch_size =
                std::env::var("KNOWCODE_EMBEDDING_BATCH_SIZE").ok().and_then(|s| s.parse().ok()).unwrap_or(64);
            cfg.embedding_models.push(EmbeddingModelConfig { name, provider, api_key_env, dimensions, batch_size });
        }

        if let (Ok(name), Ok(provider), Ok(api_key_env)) = (
            std::env::var("KNOWCODE_RERANK_MODEL"),
            std::env::var("KNOWCODE_RERANK_PROVIDER"),
            std::env::var("KNOWCODE_RERANK_API_KEY_ENV"),
        ) {
            cfg.reranking_models.push(RerankingModelConfig { name, provider, api_key_env });
        }

        if let Ok(rrf_k) = std::env::var("KNOWCODE_RRF_K").and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            cfg.retrieval.rrf_k = rrf_k;
        }
        if let Ok(top_n) = std::env::var("KNOWCODE_TOP_N").and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            cfg.retrieval.top_n = top_n;
        }
        if let Ok(expand) = std::env::var("KNOWCODE_EXPAND_DEPS") {
            cfg.retrieval.expand_deps = expand == "1" || expand.eq_ignore_ascii_case("true");
        }

        cfg
    }

    /// True when at least one embedding model has a credential present —
    /// semantic search is enabled only then (spec §6).
    pub fn semantic_search_available(&self) -> bool {
        self.embedding_models.iter().any(|m| std::env::var(&m.api_key_env).is_ok())
    }
}
