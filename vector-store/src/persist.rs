//! Atomic persistence for the vector index, mirroring
//! `knowledge_store::persist`'s write-to-`.tmp`-then-rename pattern.

use crate::error::VectorError;
use crate::index::VectorStore;
use knowcode_model::{IndexManifest, VectorRecord};
use std::fs;
use std::path::Path;

#[derive(serde::Serialize, serde::Deserialize)]
struct OnDisk {
    manifest: IndexManifest,
    records: Vec<VectorRecord>,
}

pub fn save(store: &VectorStore, path: &Path) -> Result<(), VectorError> {
    let on_disk = OnDisk { manifest: store.manifest().clone(), records: store.records().cloned().collect() };
    let json = serde_json::to_vec_pretty(&on_disk)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a persisted index, rejecting it if its manifest no longer
/// matches `embedding_model`/`dimension`/`provider` (spec §4.4/§4.7: a
/// stale manifest must force a rebuild, not a silent stale load).
///
/// The `chunk_id -> slot` map is rebuilt purely from the loaded
/// `records` order — never trusted from a separately-serialized field —
/// so a hand-edited or corrupted map can't desynchronize from the data.
pub fn load(path: &Path, embedding_model: &str, dimension: usize, provider: &str) -> Result<VectorStore, VectorError> {
    let bytes = fs::read(path)?;
    let on_disk: OnDisk = serde_json::from_slice(&bytes)?;
    if !on_disk.manifest.matches_config(embedding_model, dimension, provider) {
        return Err(VectorError::SchemaMismatch);
    }
    let mut store = VectorStore::new(on_disk.manifest);
    store.add_batch(on_disk.records)?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use knowcode_model::DistanceKind;

    fn manifest() -> IndexManifest {
        IndexManifest {
            embedding_model: "m".into(),
            dimension: 2,
            provider: "openai-compatible".into(),
            chunk_count: 0,
            source_hash: "h".into(),
            schema_version: 1,
            distance: DistanceKind::Cosine,
        }
    }

    #[test]
    fn round_trip_preserves_vectors_and_slot_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let mut store = VectorStore::new(manifest());
        store.add(VectorRecord { chunk_id: "a".into(), vector: vec![1.0, 0.0] }).unwrap();
        store.add(VectorRecord { chunk_id: "b".into(), vector: vec![0.0, 1.0] }).unwrap();
        store.remove("a");
        save(&store, &path).unwrap();

        let loaded = load(&path, "m", 2, "openai-compatible").unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains("b"));
        assert!(!loaded.contains("a"));
    }

    #[test]
    fn stale_manifest_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let store = VectorStore::new(manifest());
        save(&store, &path).unwrap();
        let err = load(&path, "other-model", 2, "openai-compatible").unwrap_err();
        assert!(matches!(err, VectorError::SchemaMismatch));
    }
}
