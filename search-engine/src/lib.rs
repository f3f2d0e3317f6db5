//! Query -> retrieve -> anchor-to-entity -> score -> expand pipeline
//! (spec §4.10), generalized from `contextor::retrieve`/`rag-store`'s
//! retrieve path (chunk hits feeding an entity-level rollup) and from
//! `contextor::select`'s ranking-candidate shape.

pub mod error;

pub use error::SearchError;

use hybrid_index::FusedHit;
use knowcode_model::{Chunk, Entity, EntityKind};
use knowledge_store::KnowledgeStore;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    pub limit_entities: usize,
    pub expand_deps: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkEvidence {
    pub chunk_id: String,
    pub entity_id: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntity {
    pub entity_id: String,
    pub score: f32,
    /// True when this entity was admitted via one-hop dependency
    /// expansion rather than direct chunk match (spec §4.10 step 4).
    pub expanded: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub entities: Vec<ScoredEntity>,
    pub evidence: Vec<ChunkEvidence>,
}

/// Weight applied to entities admitted through dependency expansion
/// rather than direct chunk match (spec §4.10 step 4: "reduced weight").
pub const EXPANSION_WEIGHT: f32 = 0.35;

fn anchor_entity_id(chunk: &Chunk, store: &KnowledgeStore) -> Option<String> {
    if let Some(id) = &chunk.entity_id {
        return Some(id.clone());
    }
    store
        .entities()
        .find(|e| e.kind == EntityKind::Module && e.location.file == chunk.file)
        .map(|e| e.id.clone())
}

fn kind_rank(kind: EntityKind) -> u8 {
    match kind {
        EntityKind::Function | EntityKind::Method => 0,
        EntityKind::Class => 1,
        EntityKind::Module => 2,
        _ => 3,
    }
}

/// Runs the full search pipeline given the already-fused hybrid hits and
/// the chunk records they refer to (the caller owns chunk lookup since
/// it may span multiple files/indices).
pub fn search(
    fused: &[FusedHit],
    chunks_by_id: &HashMap<String, Chunk>,
    store: &KnowledgeStore,
    opts: SearchOptions,
) -> Result<SearchResult, SearchError> {
    if fused.is_empty() {
        return Err(SearchError::RetrievalEmpty);
    }

    let mut entity_scores: HashMap<String, f32> = HashMap::new();
    let mut evidence = Vec::new();

    for hit in fused {
        let Some(chunk) = chunks_by_id.get(&hit.chunk_id) else { continue };
        let Some(entity_id) = anchor_entity_id(chunk, store) else { continue };
        let match_score = hit.rerank_score.unwrap_or(hit.fused_score);
        *entity_scores.entry(entity_id.clone()).or_insert(0.0) += match_score;
        evidence.push(ChunkEvidence { chunk_id: hit.chunk_id.clone(), entity_id, score: match_score });
    }

    let mut ranked = rank_entities(entity_scores, store);
    ranked.truncate(opts.limit_entities.max(1));

    if opts.expand_deps {
        expand_dependencies(&mut ranked, store);
    }

    Ok(SearchResult { entities: ranked, evidence })
}

fn rank_entities(scores: HashMap<String, f32>, store: &KnowledgeStore) -> Vec<ScoredEntity> {
    let mut ranked: Vec<ScoredEntity> =
        scores.into_iter().map(|(entity_id, score)| ScoredEntity { entity_id, score, expanded: false }).collect();
    ranked.sort_by(|a, b| tie_break(a, b, store));
    ranked
}

fn tie_break(a: &ScoredEntity, b: &ScoredEntity, store: &KnowledgeStore) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal) {
        Ordering::Equal => {}
        other => return other,
    }
    let ka = store.get_entity(&a.entity_id).map(|e| kind_rank(e.kind)).unwrap_or(u8::MAX);
    let kb = store.get_entity(&b.entity_id).map(|e| kind_rank(e.kind)).unwrap_or(u8::MAX);
    match ka.cmp(&kb) {
        Ordering::Equal => {}
        other => return other,
    }
    let qa = qname_len(&a.entity_id, store);
    let qb = qname_len(&b.entity_id, store);
    qa.cmp(&qb)
}

fn qname_len(entity_id: &str, store: &KnowledgeStore) -> usize {
    store.get_entity(entity_id).map(|e: &Entity| e.qualified_name.len()).unwrap_or(usize::MAX)
}

/// Pulls one hop of callers/callees for each selected entity and admits
/// any not already selected, at `EXPANSION_WEIGHT` of its neighbor's score.
fn expand_dependencies(selected: &mut Vec<ScoredEntity>, store: &KnowledgeStore) {
    let mut seen: std::collections::HashSet<String> = selected.iter().map(|e| e.entity_id.clone()).collect();
    let base: Vec<(String, f32)> = selected.iter().map(|e| (e.entity_id.clone(), e.score)).collect();

    let mut additions = Vec::new();
    for (entity_id, score) in base {
        let mut neighbors = store.get_callers(&entity_id);
        neighbors.extend(store.get_callees(&entity_id));
        for n in neighbors {
            if seen.insert(n.clone()) {
                additions.push(ScoredEntity { entity_id: n, score: score * EXPANSION_WEIGHT, expanded: true });
            }
        }
    }
    selected.extend(additions);
    selected.sort_by(|a, b| tie_break(a, b, store));
}
