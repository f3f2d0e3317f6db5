//! Optional cross-encoder reranking over the fused candidate set (spec
//! §4.9). Mirrors the embedding provider's manual-future-boxing shape so
//! both "external model call" interfaces in this engine look the same.

use crate::error::HybridError;
use crate::rrf::FusedHit;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub trait Reranker: Send + Sync {
    /// Scores each `(chunk_id, text)` pair against `query`; returns
    /// `(chunk_id, score)` pairs in arbitrary order — the caller re-sorts.
    fn rerank<'a>(
        &'a self,
        query: &'a str,
        candidates: &'a [(String, String)],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<(String, f32)>, HybridError>> + Send + 'a>>;
}

/// Reranks `fused` using `reranker`, bounded by `deadline`. On timeout or
/// provider error, spec §5 requires falling back to the fused order
/// rather than failing the whole query — so this never returns `Err`.
pub async fn rerank_or_fallback(
    reranker: &dyn Reranker,
    query: &str,
    fused: Vec<FusedHit>,
    candidate_text: &[(String, String)],
    deadline: Duration,
) -> Vec<FusedHit> {
    let attempt = tokio::time::timeout(deadline, reranker.rerank(query, candidate_text)).await;

    let scores = match attempt {
        Ok(Ok(scores)) => scores,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "hybrid_index::rerank: provider failed, falling back to fused order");
            return fused;
        }
        Err(_) => {
            tracing::warn!(?deadline, "hybrid_index::rerank: timed out, falling back to fused order");
            return fused;
        }
    };

    let mut by_id: std::collections::HashMap<String, f32> = scores.into_iter().collect();
    let mut out: Vec<FusedHit> = fused
        .into_iter()
        .map(|mut h| {
            h.rerank_score = by_id.remove(&h.chunk_id);
            h
        })
        .collect();
    out.sort_by(|a, b| {
        let sa = a.rerank_score.unwrap_or(a.fused_score);
        let sb = b.rerank_score.unwrap_or(b.fused_score);
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowReranker;
    impl Reranker for SlowReranker {
        fn rerank<'a>(
            &'a self,
            _query: &'a str,
            _candidates: &'a [(String, String)],
        ) -> Pin<Box<dyn Future<Output = Result<Vec<(String, f32)>, HybridError>> + Send + 'a>> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(vec![])
            })
        }
    }

    struct FailingReranker;
    impl Reranker for FailingReranker {
        fn rerank<'a>(
            &'a self,
            _query: &'a str,
            _candidates: &'a [(String, String)],
        ) -> Pin<Box<dyn Future<Output = Result<Vec<(String, f32)>, HybridError>> + Send + 'a>> {
            Box::pin(async move { Err(HybridError::Reranker("boom".into())) })
        }
    }

    #[tokio::test]
    async fn timeout_falls_back_to_fused_order() {
        let fused = vec![FusedHit { chunk_id: "a".into(), fused_score: 0.9, rerank_score: None }];
        let out = rerank_or_fallback(&SlowReranker, "q", fused.clone(), &[], Duration::from_millis(5)).await;
        assert_eq!(out, fused);
    }

    #[tokio::test]
    async fn provider_error_falls_back_to_fused_order() {
        let fused = vec![FusedHit { chunk_id: "a".into(), fused_score: 0.9, rerank_score: None }];
        let out = rerank_or_fallback(&FailingReranker, "q", fused.clone(), &[], Duration::from_secs(1)).await;
        assert_eq!(out, fused);
    }
}
