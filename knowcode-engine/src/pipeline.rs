//! Analyze + chunk + index build pipeline (spec §6: "analyze returns
//! success with counts; failure on I/O root access is fatal; per-file
//! parse errors are reported non-fatally").

use crate::error::EngineError;
use chunker::ChunkerConfig;
use graph_builder::analyze::{analyze, AnalyzeOptions};
use graph_builder::scan::scan_repo;
use knowcode_model::{Chunk, Entity, ScanMetadata};
use knowledge_store::KnowledgeStore;
use lexical_index::LexicalIndex;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

pub struct BuildOutcome {
    pub store: KnowledgeStore,
    pub lexical: LexicalIndex,
    pub chunks: HashMap<String, Chunk>,
    pub metadata: ScanMetadata,
}

/// Scans, extracts, resolves, chunks, and indexes `root`. I/O failure on
/// the root itself is fatal; per-file read/parse errors are accumulated
/// into `metadata.errors` and otherwise skipped.
pub fn build_from_repo(root: &Path, analyze_opts: &AnalyzeOptions, chunker_cfg: &ChunkerConfig) -> Result<BuildOutcome, EngineError> {
    let analyzed = analyze(root, analyze_opts).map_err(|e| EngineError::Io(e.to_string()))?;

    let scan = scan_repo(root, &analyze_opts.scan).map_err(|e| EngineError::Io(e.to_string()))?;

    let mut entities_by_file: HashMap<String, Vec<Entity>> = HashMap::new();
    for entity in &analyzed.entities {
        entities_by_file.entry(entity.location.file.clone()).or_default().push(entity.clone());
    }

    let mut chunks: HashMap<String, Chunk> = HashMap::new();
    let mut metadata = analyzed.metadata.clone();

    for file in &scan.files {
        if file.language.is_none() {
            continue;
        }
        let rel_path = file.path.strip_prefix(root).unwrap_or(&file.path).to_string_lossy().replace('\\', "/");
        let Some(file_entities) = entities_by_file.get(&rel_path) else { continue };

        let content = match std::fs::read_to_string(&file.path) {
            Ok(c) => c,
            Err(err) => {
                warn!(file = %rel_path, %err, "build_from_repo: unreadable during chunking, skipping");
                metadata.errors.push(format!("{rel_path}: {err}"));
                continue;
            }
        };

        for chunk in chunker::chunk_file(&rel_path, &content, file_entities, chunker_cfg) {
            chunks.insert(chunk.id.clone(), chunk);
        }
    }

    let store = KnowledgeStore::build(analyzed.entities, analyzed.relationships)?;

    let mut lexical = LexicalIndex::new();
    for chunk in chunks.values() {
        lexical.add(&chunk.id, &chunk.text);
    }

    Ok(BuildOutcome { store, lexical, chunks, metadata })
}
