//! Optional coverage ingestion pass (spec §4.3, §B). Reads a simple
//! line-coverage JSON report (the common denominator most coverage tools
//! can emit or be converted to) and produces `coverage_report` entities
//! plus `covers`/`executed_by` edges against the module entity for each
//! covered file.

use knowcode_model::{AttrMap, AttrValue, Entity, EntityKind, Location, Relationship, RelationshipKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct CoverageReport {
    files: HashMap<String, FileCoverage>,
}

#[derive(Debug, Deserialize)]
struct FileCoverage {
    covered_lines: Vec<u32>,
    total_lines: u32,
}

pub struct CoverageIngest {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

pub fn ingest(report_path: &Path, known_module_ids: &HashMap<String, String>) -> CoverageIngest {
    let mut result = CoverageIngest { entities: Vec::new(), relationships: Vec::new() };

    let bytes = match std::fs::read(report_path) {
        Ok(b) => b,
        Err(err) => {
            warn!("coverage ingest: cannot read {}: {err}", report_path.display());
            return result;
        }
    };
    let report: CoverageReport = match serde_json::from_slice(&bytes) {
        Ok(r) => r,
        Err(err) => {
            warn!("coverage ingest: invalid report {}: {err}", report_path.display());
            return result;
        }
    };

    for (file, cov) in report.files {
        let pct = if cov.total_lines == 0 {
            0.0
        } else {
            cov.covered_lines.len() as f64 / cov.total_lines as f64
        };
        let mut attributes = AttrMap::new();
        attributes.insert("covered_lines".into(), AttrValue::Int(cov.covered_lines.len() as i64));
        attributes.insert("total_lines".into(), AttrValue::Int(cov.total_lines as i64));
        attributes.insert("coverage_pct".into(), AttrValue::Float(pct));

        let mut entity = Entity {
            id: String::new(),
            kind: EntityKind::CoverageReport,
            name: format!("coverage:{file}"),
            qualified_name: format!("coverage.{file}"),
            location: Location::new(&file, 1, cov.total_lines.max(1)),
            source_code: None,
            docstring: None,
            signature: None,
            attributes,
        };
        entity.compute_id();
        let report_id = entity.id.clone();
        result.entities.push(entity);

        if let Some(module_id) = known_module_ids.get(&file) {
            result.relationships.push(Relationship::new(report_id.clone(), module_id.clone(), RelationshipKind::Covers));
            result.relationships.push(Relationship::new(module_id.clone(), report_id, RelationshipKind::ExecutedBy));
        }
    }

    result
}
