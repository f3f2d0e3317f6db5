//! Batch embedding executor (spec §4.6), grounded on
//! `rag-store::embed_pool::embed_missing`'s concurrency-bounded stream
//! idiom. Unlike the teacher's pool, a failure on one batch must not
//! abort the whole run — the spec requires `EmbeddingFailed` to name
//! just the affected chunks while the rest of the index stays usable.

use crate::backoff::retry_with_backoff;
use crate::error::EmbedError;
use crate::provider::EmbeddingProvider;
use futures::stream::{self, StreamExt};
use knowcode_model::VectorRecord;
use tracing::{debug, info, warn};

pub struct EmbedOutcome {
    pub vectors: Vec<VectorRecord>,
    pub failed_chunk_ids: Vec<String>,
}

/// Embeds `(chunk_id, text)` pairs in batches of `batch_size`, running up
/// to `concurrency` batches concurrently. A batch that exhausts its
/// retries is recorded in `failed_chunk_ids` rather than aborting the
/// whole call.
pub async fn embed_chunks(
    provider: &dyn EmbeddingProvider,
    chunks: &[(String, String)],
    batch_size: usize,
    concurrency: usize,
    max_attempts: u32,
) -> EmbedOutcome {
    info!(total = chunks.len(), batch_size, concurrency, "embeddings::pool: starting batch embed");

    let batches: Vec<&[(String, String)]> = chunks.chunks(batch_size.max(1)).collect();

    let results: Vec<Result<Vec<VectorRecord>, (Vec<String>, EmbedError)>> = stream::iter(batches.into_iter())
        .map(|batch| async move {
            let ids: Vec<String> = batch.iter().map(|(id, _)| id.clone()).collect();
            let texts: Vec<String> = batch.iter().map(|(_, t)| t.clone()).collect();
            let attempt_result = retry_with_backoff(max_attempts, || {
                let texts = texts.clone();
                async { provider.embed_batch(&texts).await }
            })
            .await;
            match attempt_result {
                Ok(vectors) => Ok(ids
                    .into_iter()
                    .zip(vectors.into_iter())
                    .map(|(chunk_id, vector)| VectorRecord { chunk_id, vector })
                    .collect::<Vec<_>>()),
                Err(e) => Err((ids, e)),
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut vectors = Vec::new();
    let mut failed_chunk_ids = Vec::new();
    for r in results {
        match r {
            Ok(mut v) => vectors.append(&mut v),
            Err((ids, e)) => {
                warn!(count = ids.len(), error = %e, "embeddings::pool: batch failed after retries");
                failed_chunk_ids.extend(ids);
            }
        }
    }

    debug!(embedded = vectors.len(), failed = failed_chunk_ids.len(), "embeddings::pool: done");
    EmbedOutcome { vectors, failed_chunk_ids }
}

pub fn outcome_to_result(outcome: EmbedOutcome) -> Result<Vec<VectorRecord>, EmbedError> {
    if outcome.failed_chunk_ids.is_empty() {
        Ok(outcome.vectors)
    } else {
        Err(EmbedError::EmbeddingFailed {
            count: outcome.failed_chunk_ids.len(),
            reason: format!("chunks: {}", outcome.failed_chunk_ids.join(", ")),
        })
    }
}
