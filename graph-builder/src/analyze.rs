//! Top-level orchestration: scan -> parse -> resolve, mirroring the
//! teacher's `run::prepare_qdrant_context` pipeline shape.

use crate::frontend::{frontend_for, LocalRelation};
use crate::graph::{coverage, resolve, temporal};
use crate::scan::{scan_repo, ScanConfig};
use anyhow::{Context, Result};
use knowcode_model::{Entity, EntityKind, Relationship, ScanMetadata};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub scan: ScanConfig,
    pub ingest_temporal: bool,
    pub max_commits: usize,
    pub coverage_report_path: Option<std::path::PathBuf>,
}

pub struct AnalyzeResult {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub metadata: ScanMetadata,
}

#[tracing::instrument(skip(opts))]
pub fn analyze(root: &Path, opts: &AnalyzeOptions) -> Result<AnalyzeResult> {
    let scan = scan_repo(root, &opts.scan).context("scanning repository")?;
    info!(files = scan.files.len(), "scan complete");

    let mut all_entities: Vec<Entity> = Vec::new();
    let mut all_local: Vec<(String, LocalRelation)> = Vec::new();
    let mut errors: Vec<String> = scan.errors.clone();

    for file in &scan.files {
        let Some(lang) = file.language else { continue };
        let rel_path = file
            .path
            .strip_prefix(root)
            .unwrap_or(&file.path)
            .to_string_lossy()
            .replace('\\', "/");

        let content = match std::fs::read_to_string(&file.path) {
            Ok(c) => c,
            Err(err) => {
                warn!(file = %rel_path, %err, "unreadable file, skipping");
                errors.push(format!("{rel_path}: {err}"));
                continue;
            }
        };

        let frontend = frontend_for(lang);
        let output = frontend.parse(&rel_path, &content);
        if !output.parse_errors.is_empty() {
            errors.extend(output.parse_errors.clone());
            // Spec §4.5 edge case (carried into §4.2 parsing too): partial
            // parse failure must not discard entities already collected.
            let mut parse_error_entity = Entity {
                id: String::new(),
                kind: EntityKind::ParseError,
                name: rel_path.clone(),
                qualified_name: rel_path.clone(),
                location: knowcode_model::Location::new(&rel_path, 1, 1),
                source_code: None,
                docstring: Some(output.parse_errors.join("; ")),
                signature: None,
                attributes: Default::default(),
            };
            parse_error_entity.compute_id();
            all_entities.push(parse_error_entity);
        }
        all_entities.extend(output.entities);
        for rel in output.local_relations {
            all_local.push((rel_path.clone(), rel));
        }
    }

    let mut relationships = resolve(&all_entities, all_local);

    if opts.ingest_temporal {
        let module_ids: HashMap<String, String> = all_entities
            .iter()
            .filter(|e| e.kind == EntityKind::Module)
            .map(|e| (e.location.file.clone(), e.id.clone()))
            .collect();
        let temporal_out = temporal::ingest(root, &module_ids, opts.max_commits.max(1));
        all_entities.extend(temporal_out.entities);
        relationships.extend(temporal_out.relationships);
    }

    if let Some(report_path) = &opts.coverage_report_path {
        let module_ids: HashMap<String, String> = all_entities
            .iter()
            .filter(|e| e.kind == EntityKind::Module)
            .map(|e| (e.location.file.clone(), e.id.clone()))
            .collect();
        let coverage_out = coverage::ingest(report_path, &module_ids);
        all_entities.extend(coverage_out.entities);
        relationships.extend(coverage_out.relationships);
    }

    let metadata = ScanMetadata {
        scan_time: chrono::Utc::now().to_rfc3339(),
        file_count: scan.files.len(),
        errors,
    };

    info!(entities = all_entities.len(), relationships = relationships.len(), "analyze complete");

    Ok(AnalyzeResult {
        entities: all_entities,
        relationships,
        metadata,
    })
}
