use crate::error::StoreError;
use crate::store::KnowledgeStore;
use knowcode_model::{ScanMetadata, StoreDocument, CURRENT_STORE_SCHEMA_VERSION};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Persists the store as a single structured document (spec §6). The write
/// is a plain overwrite of the target path; callers that need atomicity
/// across a rebuild write to a temp path and rename (the common
/// write-then-rename idiom for "manifests are overwritten atomically").
pub fn save(store: &KnowledgeStore, path: &Path, metadata: ScanMetadata) -> Result<(), StoreError> {
    let doc = StoreDocument::new(
        store.entities().cloned().collect(),
        store.relationships().to_vec(),
        metadata,
    );
    let tmp = path.with_extension("tmp");
    let bytes = serde_json::to_vec_pretty(&doc)?;
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    info!(path = %path.display(), entities = doc.entities.len(), relationships = doc.relationships.len(), "store persisted");
    Ok(())
}

/// Loads a store document and rejects schema skew (spec §4.4: "Loading
/// rejects documents whose schema version is newer than the reader.").
/// Orphaned relationships (endpoints missing after a hand-edited document)
/// are pruned and logged rather than rejected, matching the
/// INDEX_INCONSISTENT recovery policy in spec §7.
pub fn load(path: &Path) -> Result<(KnowledgeStore, ScanMetadata), StoreError> {
    let bytes = fs::read(path)?;
    let doc: StoreDocument = serde_json::from_slice(&bytes)?;
    if doc.schema_version > CURRENT_STORE_SCHEMA_VERSION {
        return Err(StoreError::SchemaMismatch {
            found: doc.schema_version,
            reader: CURRENT_STORE_SCHEMA_VERSION,
        });
    }

    let entity_ids: std::collections::HashSet<&str> = doc.entities.iter().map(|e| e.id.as_str()).collect();
    let mut pruned = 0usize;
    let relationships: Vec<_> = doc
        .relationships
        .into_iter()
        .filter(|r| {
            let ok = r.unresolved || (entity_ids.contains(r.source_id.as_str()) && entity_ids.contains(r.target_id.as_str()));
            if !ok {
                pruned += 1;
            }
            ok
        })
        .collect();
    if pruned > 0 {
        warn!(pruned, "dropped relationships referencing missing entities on load");
    }

    let store = KnowledgeStore::build(doc.entities, relationships)?;
    Ok((store, doc.metadata))
}
