//! Embedding provider abstraction (spec §4.6). Mirrors the teacher's
//! `rag-store::embed::EmbeddingsProvider` — a boxed-future trait method
//! rather than `async-trait`, so the crate avoids an extra dependency for
//! a single trait.

use crate::error::EmbedError;
use std::future::Future;
use std::pin::Pin;

pub trait EmbeddingProvider: Send + Sync {
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, EmbedError>> + Send + 'a>>;

    fn dimension(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAiCompatible,
    VoyageAiCompatible,
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: ProviderKind,
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
    pub batch_size: usize,
    /// Name of the environment variable holding the credential (spec §4.6).
    pub api_key_env: String,
    pub max_attempts: u32,
}

impl EmbeddingConfig {
    pub fn credential(&self) -> Result<String, EmbedError> {
        std::env::var(&self.api_key_env)
            .map_err(|_| EmbedError::Config(format!("missing credential env var {}", self.api_key_env)))
    }
}

/// HTTP embedding provider speaking the OpenAI-compatible or
/// VoyageAI-compatible embeddings endpoint shape, chosen by `ProviderKind`.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    cfg: EmbeddingConfig,
}

impl HttpEmbeddingProvider {
    pub fn new(cfg: EmbeddingConfig) -> Self {
        Self { client: reqwest::Client::new(), cfg }
    }
}

#[derive(serde::Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(serde::Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiEmbedding>,
}

#[derive(serde::Deserialize)]
struct OpenAiEmbedding {
    embedding: Vec<f32>,
}

#[derive(serde::Serialize)]
struct VoyageRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(serde::Deserialize)]
struct VoyageResponse {
    data: Vec<VoyageEmbedding>,
}

#[derive(serde::Deserialize)]
struct VoyageEmbedding {
    embedding: Vec<f32>,
}

impl EmbeddingProvider for HttpEmbeddingProvider {
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, EmbedError>> + Send + 'a>> {
        Box::pin(async move {
            let key = self.cfg.credential()?;
            let (url, body) = match self.cfg.provider {
                ProviderKind::OpenAiCompatible => (
                    format!("{}/embeddings", self.cfg.base_url),
                    serde_json::to_value(OpenAiRequest { model: &self.cfg.model, input: texts })
                        .map_err(|e| EmbedError::Provider(e.to_string()))?,
                ),
                ProviderKind::VoyageAiCompatible => (
                    format!("{}/v1/embeddings", self.cfg.base_url),
                    serde_json::to_value(VoyageRequest { model: &self.cfg.model, input: texts })
                        .map_err(|e| EmbedError::Provider(e.to_string()))?,
                ),
            };

            let resp = self
                .client
                .post(&url)
                .bearer_auth(key)
                .json(&body)
                .send()
                .await
                .map_err(|e| EmbedError::Provider(format!("request failed: {e}")))?
                .error_for_status()
                .map_err(|e| EmbedError::Provider(format!("http error: {e}")))?;

            let vectors = match self.cfg.provider {
                ProviderKind::OpenAiCompatible => {
                    let parsed: OpenAiResponse = resp.json().await.map_err(|e| EmbedError::Provider(e.to_string()))?;
                    parsed.data.into_iter().map(|d| d.embedding).collect::<Vec<_>>()
                }
                ProviderKind::VoyageAiCompatible => {
                    let parsed: VoyageResponse = resp.json().await.map_err(|e| EmbedError::Provider(e.to_string()))?;
                    parsed.data.into_iter().map(|d| d.embedding).collect::<Vec<_>>()
                }
            };

            for v in &vectors {
                if v.len() != self.cfg.dimension {
                    return Err(EmbedError::VectorSizeMismatch { got: v.len(), want: self.cfg.dimension });
                }
            }
            Ok(vectors)
        })
    }

    fn dimension(&self) -> usize {
        self.cfg.dimension
    }
}
