//! In-memory knowledge graph with persistence, query helpers, and
//! impact/trace analysis (spec §4.4).

pub mod error;
pub mod persist;
pub mod store;

pub use error::StoreError;
pub use store::{ImpactReport, KnowledgeStore, TraceDirection, TraceHit};

#[cfg(test)]
mod tests {
    use super::*;
    use knowcode_model::{Entity, EntityKind, Location, Relationship, RelationshipKind, ScanMetadata};

    fn entity(kind: EntityKind, file: &str, qname: &str) -> Entity {
        let mut e = Entity {
            id: String::new(),
            kind,
            name: qname.rsplit('.').next().unwrap_or(qname).to_string(),
            qualified_name: qname.to_string(),
            location: Location::new(file, 1, 2),
            source_code: None,
            docstring: None,
            signature: None,
            attributes: Default::default(),
        };
        e.compute_id();
        e
    }

    #[test]
    fn scenario_one_module_class_method() {
        let m = entity(EntityKind::Module, "m.py", "m");
        let c = entity(EntityKind::Class, "m.py", "m.C");
        let f = entity(EntityKind::Method, "m.py", "m.C.f");
        let rels = vec![
            Relationship::new(m.id.clone(), c.id.clone(), RelationshipKind::Contains),
            Relationship::new(c.id.clone(), f.id.clone(), RelationshipKind::Contains),
        ];
        let store = KnowledgeStore::build(vec![m.clone(), c.clone(), f.clone()], rels).unwrap();
        assert_eq!(store.entity_count(), 3);
        assert!(store.trace_calls(&f.id, TraceDirection::Callers, 1, 100).is_empty());
        let impact = store.get_impact(&f.id, 3);
        assert!(impact.risk_score >= 0.0 && impact.risk_score <= 0.2);
    }

    #[test]
    fn scenario_two_calls_edge() {
        let c = entity(EntityKind::Class, "m.py", "m.C");
        let f = entity(EntityKind::Method, "m.py", "m.C.f");
        let g = entity(EntityKind::Function, "m.py", "m.g");
        let rels = vec![
            Relationship::new(c.id.clone(), f.id.clone(), RelationshipKind::Contains),
            Relationship::new(g.id.clone(), f.id.clone(), RelationshipKind::Calls),
        ];
        let store = KnowledgeStore::build(vec![c, f.clone(), g.clone()], rels).unwrap();
        assert_eq!(store.get_callers(&f.id), vec![g.id.clone()]);
        let impact = store.get_impact(&f.id, 3);
        assert_eq!(impact.direct_dependents, vec![g.id]);
    }

    #[test]
    fn contains_cycle_rejected() {
        let a = entity(EntityKind::Class, "m.py", "m.A");
        let b = entity(EntityKind::Class, "m.py", "m.B");
        let c = entity(EntityKind::Class, "m.py", "m.C");
        // c has two parents -> not a forest.
        let rels = vec![
            Relationship::new(a.id.clone(), c.id.clone(), RelationshipKind::Contains),
            Relationship::new(b.id.clone(), c.id.clone(), RelationshipKind::Contains),
        ];
        let result = KnowledgeStore::build(vec![a, b, c], rels);
        assert!(result.is_err());
    }

    #[test]
    fn missing_id_returns_empty_not_error() {
        let store = KnowledgeStore::new();
        assert!(store.get_entity("missing").is_none());
        assert!(store.get_callers("missing").is_empty());
        assert!(store.trace_calls("missing", TraceDirection::Callees, 5, 10).is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let m = entity(EntityKind::Module, "m.py", "m");
        let store = KnowledgeStore::build(vec![m], Vec::new()).unwrap();
        persist::save(&store, &path, ScanMetadata { scan_time: "2026-01-01T00:00:00Z".into(), file_count: 1, errors: Vec::new() }).unwrap();
        let (loaded, meta) = persist::load(&path).unwrap();
        assert_eq!(loaded.entity_count(), 1);
        assert_eq!(meta.file_count, 1);
    }

    #[test]
    fn schema_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let doc = serde_json::json!({
            "schema_version": knowcode_model::CURRENT_STORE_SCHEMA_VERSION + 1,
            "entities": [],
            "relationships": [],
            "metadata": {"scan_time": "", "file_count": 0, "errors": []}
        });
        std::fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();
        let result = persist::load(&path);
        assert!(matches!(result, Err(StoreError::SchemaMismatch { .. })));
    }
}
