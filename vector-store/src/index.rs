//! In-process, locally-persisted vector index. REDESIGN of the teacher's
//! `rag-store::qdrant_facade` (a remote Qdrant adapter) into a
//! self-contained library with the same facade shape — `ensure_collection`
//! becomes a plain construction, `upsert_points`/`search` keep their
//! names in spirit as `add`/`search` (spec §4.7, SPEC_FULL.md §C).
//!
//! Similarity search is a brute-force scan over all live vectors. At the
//! chunk-count scale this engine targets (a single repository's chunks,
//! not a multi-tenant corpus), a linear scan is fast enough that an
//! approximate index would only add complexity without a measurable win.

use crate::error::VectorError;
use knowcode_model::{DistanceKind, IndexManifest, VectorRecord};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredChunk {
    pub chunk_id_idx: usize,
    pub score: f32,
}

pub struct VectorStore {
    manifest: IndexManifest,
    /// Slot-indexed records; `None` marks a removed (tombstoned) slot so
    /// that slot indices used elsewhere stay stable across removals.
    records: Vec<Option<VectorRecord>>,
    /// chunk_id -> slot, kept in lockstep with `records` at all times —
    /// this is the map that must be rebuilt correctly from `records` on
    /// load, not trusted as a separately-persisted artifact that could
    /// drift out of sync with it.
    slot_of: HashMap<String, usize>,
}

impl VectorStore {
    pub fn new(manifest: IndexManifest) -> Self {
        Self { manifest, records: Vec::new(), slot_of: HashMap::new() }
    }

    pub fn manifest(&self) -> &IndexManifest {
        &self.manifest
    }

    pub fn len(&self) -> usize {
        self.slot_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_of.is_empty()
    }

    /// Inserts or replaces the vector for `record.chunk_id`.
    pub fn add(&mut self, record: VectorRecord) -> Result<(), VectorError> {
        if record.vector.len() != self.manifest.dimension {
            return Err(VectorError::DimensionMismatch { got: record.vector.len(), want: self.manifest.dimension });
        }
        if let Some(&slot) = self.slot_of.get(&record.chunk_id) {
            self.records[slot] = Some(record);
        } else {
            let slot = self.records.len();
            self.slot_of.insert(record.chunk_id.clone(), slot);
            self.records.push(Some(record));
        }
        self.manifest.chunk_count = self.slot_of.len();
        Ok(())
    }

    pub fn add_batch(&mut self, records: Vec<VectorRecord>) -> Result<(), VectorError> {
        for r in records {
            self.add(r)?;
        }
        Ok(())
    }

    /// Removes the vector for `chunk_id`, if present. Tombstones the slot
    /// rather than shifting later slots, so concurrent readers never see
    /// an index whose slot numbering moved under them mid-read.
    pub fn remove(&mut self, chunk_id: &str) -> bool {
        if let Some(slot) = self.slot_of.remove(chunk_id) {
            self.records[slot] = None;
            self.manifest.chunk_count = self.slot_of.len();
            true
        } else {
            false
        }
    }

    pub fn contains(&self, chunk_id: &str) -> bool {
        self.slot_of.contains_key(chunk_id)
    }

    /// Returns the `k` nearest chunk ids to `query`, scored by the
    /// manifest's configured distance kind (higher score is always
    /// better — Euclid is returned as a negated distance so callers
    /// never need to know the metric direction).
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(String, f32)>, VectorError> {
        if query.len() != self.manifest.dimension {
            return Err(VectorError::DimensionMismatch { got: query.len(), want: self.manifest.dimension });
        }
        let mut scored: Vec<(String, f32)> = self
            .records
            .iter()
            .flatten()
            .map(|r| (r.chunk_id.clone(), score(&r.vector, query, self.manifest.distance_kind())))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    pub fn records(&self) -> impl Iterator<Item = &VectorRecord> {
        self.records.iter().flatten()
    }
}

fn score(a: &[f32], b: &[f32], kind: DistanceKind) -> f32 {
    match kind {
        DistanceKind::Cosine => cosine(a, b),
        DistanceKind::Dot => dot(a, b),
        DistanceKind::Euclid => -euclid(a, b),
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot(a, b) / (na * nb)
    }
}

fn euclid(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> IndexManifest {
        IndexManifest {
            embedding_model: "test-model".into(),
            dimension: 3,
            provider: "openai-compatible".into(),
            chunk_count: 0,
            source_hash: "abc".into(),
            schema_version: 1,
        }
    }

    #[test]
    fn add_then_search_returns_closest() {
        let mut store = VectorStore::new(manifest());
        store.add(VectorRecord { chunk_id: "a".into(), vector: vec![1.0, 0.0, 0.0] }).unwrap();
        store.add(VectorRecord { chunk_id: "b".into(), vector: vec![0.0, 1.0, 0.0] }).unwrap();
        let hits = store.search(&[1.0, 0.0, 0.0], 1).unwrap();
        assert_eq!(hits[0].0, "a");
    }

    #[test]
    fn remove_then_search_excludes_it() {
        let mut store = VectorStore::new(manifest());
        store.add(VectorRecord { chunk_id: "a".into(), vector: vec![1.0, 0.0, 0.0] }).unwrap();
        store.remove("a");
        let hits = store.search(&[1.0, 0.0, 0.0], 5).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let mut store = VectorStore::new(manifest());
        let err = store.add(VectorRecord { chunk_id: "a".into(), vector: vec![1.0, 0.0] }).unwrap_err();
        assert!(matches!(err, VectorError::DimensionMismatch { .. }));
    }

    #[test]
    fn readd_after_remove_reuses_freed_slot() {
        let mut store = VectorStore::new(manifest());
        store.add(VectorRecord { chunk_id: "a".into(), vector: vec![1.0, 0.0, 0.0] }).unwrap();
        store.remove("a");
        store.add(VectorRecord { chunk_id: "b".into(), vector: vec![0.0, 1.0, 0.0] }).unwrap();
        assert_eq!(store.len(), 1);
        let hits = store.search(&[0.0, 1.0, 0.0], 5).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "b");
    }
}
