//! Facade tying the retrieval stack together (spec §6's logical API),
//! generalized from the teacher's `run.rs`-style top-level orchestration
//! of independently-testable crates.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::sections::build_entity_context;
use context_synthesizer::{synthesize, SynthesizeInput};
use embeddings::EmbeddingProvider;
use hybrid_index::{reciprocal_rank_fusion, rerank_or_fallback, Reranker};
use knowcode_model::{Chunk, ContextBundle, RetrievalMode, TaskType};
use knowledge_store::{ImpactReport, KnowledgeStore, TraceDirection, TraceHit};
use lexical_index::LexicalIndex;
use search_engine::{search as run_search, SearchOptions};
use std::collections::HashMap;
use std::time::Duration;
use vector_store::VectorStore;

pub struct Engine {
    pub store: KnowledgeStore,
    pub lexical: LexicalIndex,
    pub vectors: Option<VectorStore>,
    pub chunks: HashMap<String, Chunk>,
    pub config: EngineConfig,
    embedder: Option<Box<dyn EmbeddingProvider>>,
    reranker: Option<Box<dyn Reranker>>,
}

pub struct RetrieveOptions {
    pub task_type: Option<TaskType>,
    pub max_tokens: usize,
    pub limit_entities: usize,
    pub expand_deps: bool,
    pub deadline: Duration,
}

impl Default for RetrieveOptions {
    fn default() -> Self {
        Self { task_type: None, max_tokens: 4000, limit_entities: 8, expand_deps: false, deadline: Duration::from_secs(10) }
    }
}

impl Engine {
    pub fn new(
        store: KnowledgeStore,
        lexical: LexicalIndex,
        vectors: Option<VectorStore>,
        chunks: HashMap<String, Chunk>,
        config: EngineConfig,
        embedder: Option<Box<dyn EmbeddingProvider>>,
        reranker: Option<Box<dyn Reranker>>,
    ) -> Self {
        Self { store, lexical, vectors, chunks, config, embedder, reranker }
    }

    pub fn search_codebase(&self, pattern: &str, limit: usize) -> Vec<String> {
        self.store.search(pattern).into_iter().take(limit).map(|e| e.id.clone()).collect()
    }

    pub fn trace_calls(&self, entity_id: &str, direction: TraceDirection, depth: u32) -> Vec<TraceHit> {
        self.store.trace_calls(entity_id, direction, depth, usize::MAX)
    }

    pub fn get_impact(&self, entity_id: &str, max_depth: u32) -> ImpactReport {
        self.store.get_impact(entity_id, max_depth)
    }

    pub async fn get_entity_context(
        &self,
        entity_id: &str,
        max_tokens: usize,
        task_type: Option<TaskType>,
    ) -> Result<ContextBundle, EngineError> {
        let input = build_entity_context(entity_id, &self.store, &self.chunk_text_by_entity())
            .ok_or(EngineError::RetrievalEmpty)?;
        let bundle = synthesize(SynthesizeInput {
            query: String::new(),
            entities: vec![input],
            evidence: vec![],
            max_tokens,
            task_type,
            retrieval_mode: RetrievalMode::Lexical,
        })?;
        Ok(bundle)
    }

    pub async fn retrieve_context_for_query(
        &self,
        query: &str,
        opts: RetrieveOptions,
    ) -> Result<ContextBundle, EngineError> {
        let lexical_hits: Vec<String> = self.lexical.search(query, self.config.retrieval.top_n).into_iter().map(|(id, _)| id).collect();

        let mut lists = vec![lexical_hits];
        let mut retrieval_mode = RetrievalMode::Lexical;

        if let (Some(embedder), Some(vectors)) = (&self.embedder, &self.vectors) {
            match tokio::time::timeout(opts.deadline, embedder.embed_batch(&[query.to_string()])).await {
                Ok(Ok(vecs)) => {
                    if let Some(qvec) = vecs.into_iter().next() {
                        if let Ok(dense_hits) = vectors.search(&qvec, self.config.retrieval.top_n) {
                            lists.push(dense_hits.into_iter().map(|(id, _)| id).collect());
                            retrieval_mode = RetrievalMode::Hybrid;
                        }
                    }
                }
                Ok(Err(e)) => tracing::warn!(error = %e, "retrieve_context_for_query: embedding failed, falling back to lexical-only"),
                Err(_) => tracing::warn!("retrieve_context_for_query: embedding timed out, falling back to lexical-only"),
            }
        }

        let mut fused = reciprocal_rank_fusion(&lists, self.config.retrieval.rrf_k);
        if fused.is_empty() {
            return Ok(empty_bundle(query, retrieval_mode));
        }

        if let Some(reranker) = &self.reranker {
            let candidate_text: Vec<(String, String)> = fused
                .iter()
                .filter_map(|h| self.chunks.get(&h.chunk_id).map(|c| (h.chunk_id.clone(), c.text.clone())))
                .collect();
            fused = rerank_or_fallback(reranker.as_ref(), query, fused, &candidate_text, opts.deadline).await;
        }

        let search_result = run_search(
            &fused,
            &self.chunks,
            &self.store,
            SearchOptions { limit_entities: opts.limit_entities, expand_deps: opts.expand_deps },
        )?;

        if search_result.entities.is_empty() {
            return Ok(empty_bundle(query, retrieval_mode));
        }

        let chunk_text_by_entity = self.chunk_text_by_entity();
        let entities: Vec<_> = search_result
            .entities
            .iter()
            .filter_map(|e| build_entity_context(&e.entity_id, &self.store, &chunk_text_by_entity))
            .collect();

        let evidence: Vec<knowcode_model::Evidence> = search_result
            .evidence
            .iter()
            .filter_map(|ev| {
                let chunk = self.chunks.get(&ev.chunk_id)?;
                Some(knowcode_model::Evidence {
                    chunk_id: ev.chunk_id.clone(),
                    entity_id: Some(ev.entity_id.clone()),
                    file: chunk.file.clone(),
                    start_line: chunk.span.start_line,
                    end_line: chunk.span.end_line,
                    score: ev.score,
                })
            })
            .collect();

        let bundle = synthesize(SynthesizeInput {
            query: query.to_string(),
            entities,
            evidence,
            max_tokens: opts.max_tokens,
            task_type: opts.task_type,
            retrieval_mode,
        })?;
        Ok(bundle)
    }

    fn chunk_text_by_entity(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for chunk in self.chunks.values() {
            if let Some(entity_id) = &chunk.entity_id {
                map.entry(entity_id.clone()).or_insert_with(|| chunk.text.clone());
            }
        }
        map
    }
}

fn empty_bundle(query: &str, retrieval_mode: RetrievalMode) -> ContextBundle {
    ContextBundle {
        sections: vec![],
        total_tokens: 0,
        evidence: vec![],
        task_type: context_synthesizer::classify(query),
        retrieval_mode,
        sufficiency_score: 0.0,
        selected_entities: vec![],
        context_text: String::new(),
    }
}
