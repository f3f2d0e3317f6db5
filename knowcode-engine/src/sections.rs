//! Builds per-entity section text for the context synthesizer from the
//! knowledge store/chunk set (spec §4.11's inputs).

use context_synthesizer::EntityContextInput;
use knowcode_model::{Entity, RelationshipKind, SectionKind};
use knowledge_store::KnowledgeStore;
use std::collections::HashMap;

pub fn build_entity_context(entity_id: &str, store: &KnowledgeStore, chunk_text_by_entity: &HashMap<String, String>) -> Option<EntityContextInput> {
    let entity = store.get_entity(entity_id)?;
    let mut sections = HashMap::new();

    sections.insert(SectionKind::Header, format!("{}:{}-{}", entity.location.file, entity.location.start_line, entity.location.end_line));

    if let Some(sig) = &entity.signature {
        sections.insert(SectionKind::Signature, sig.clone());
    }
    if let Some(doc) = &entity.docstring {
        sections.insert(SectionKind::Docstring, doc.clone());
    }
    let source = entity.source_code.clone().or_else(|| chunk_text_by_entity.get(entity_id).cloned());
    if let Some(source) = source {
        sections.insert(SectionKind::Source, source);
    }

    let callers = store.get_callers(entity_id);
    if !callers.is_empty() {
        sections.insert(SectionKind::Callers, format_refs(&callers, store));
    }
    let callees = store.get_callees(entity_id);
    if !callees.is_empty() {
        sections.insert(SectionKind::Callees, format_refs(&callees, store));
    }

    let inherits = related_targets(store, entity_id, RelationshipKind::Inherits);
    if !inherits.is_empty() {
        sections.insert(SectionKind::Inherits, format_refs(&inherits, store));
    }
    let imports = related_targets(store, entity_id, RelationshipKind::Imports);
    if !imports.is_empty() {
        sections.insert(SectionKind::Imports, format_refs(&imports, store));
    }

    let recent_changes = recent_changes_text(store, entity);
    if let Some(text) = recent_changes {
        sections.insert(SectionKind::RecentChanges, text);
    }

    let impact = store.get_impact(entity_id, 3);
    if !impact.direct_dependents.is_empty() || !impact.transitive_dependents.is_empty() {
        sections.insert(
            SectionKind::Impact,
            format!(
                "direct_dependents: {}\ntransitive_dependents: {}\nrisk_score: {:.2}",
                impact.direct_dependents.join(", "),
                impact.transitive_dependents.join(", "),
                impact.risk_score
            ),
        );
    }

    Some(EntityContextInput { entity_id: entity_id.to_string(), sections })
}

fn format_refs(ids: &[String], store: &KnowledgeStore) -> String {
    ids.iter()
        .map(|id| store.get_entity(id).map(|e| e.qualified_name.clone()).unwrap_or_else(|| id.clone()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn related_targets(store: &KnowledgeStore, entity_id: &str, kind: RelationshipKind) -> Vec<String> {
    store
        .relationships()
        .filter(|r| r.source_id == entity_id && r.kind == kind)
        .map(|r| r.target_id.clone())
        .collect()
}

fn recent_changes_text(store: &KnowledgeStore, entity: &Entity) -> Option<String> {
    let module_id = store
        .entities()
        .find(|e| e.kind == knowcode_model::EntityKind::Module && e.location.file == entity.location.file)
        .map(|e| e.id.clone())?;

    let commit_ids: Vec<String> = store
        .relationships()
        .filter(|r| r.target_id == module_id && r.kind == RelationshipKind::Modified)
        .map(|r| r.source_id.clone())
        .collect();
    if commit_ids.is_empty() {
        return None;
    }
    let mut lines: Vec<String> = commit_ids
        .iter()
        .filter_map(|id| store.get_entity(id))
        .map(|c| format!("{}: {}", c.name, c.source_code.clone().unwrap_or_default()))
        .collect();
    lines.truncate(10);
    Some(lines.join("\n"))
}
