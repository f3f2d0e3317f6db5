//! Cross-file reference resolution (spec §4.3). Generalizes the teacher's
//! per-language linker + generic same-file heuristics
//! (`codegraph-prep::graph::{generic, calls}`) into the scope-chain policy
//! the spec requires, with ambiguous calls resolved to a top candidate plus
//! a recorded `alternates` attribute rather than silently dropped (§9).

use crate::frontend::LocalRelation;
use knowcode_model::{AttrValue, Entity, EntityKind, Relationship, RelationshipKind};
use std::collections::HashMap;

struct GlobalIndex {
    by_file_qname: HashMap<(String, String), String>,
    modules_by_name: HashMap<String, Vec<String>>,
    classes_by_name: HashMap<String, Vec<String>>,
    callables_by_name: HashMap<String, Vec<String>>,
}

impl GlobalIndex {
    fn build(entities: &[Entity]) -> Self {
        let mut by_file_qname = HashMap::new();
        let mut modules_by_name: HashMap<String, Vec<String>> = HashMap::new();
        let mut classes_by_name: HashMap<String, Vec<String>> = HashMap::new();
        let mut callables_by_name: HashMap<String, Vec<String>> = HashMap::new();

        for e in entities {
            by_file_qname.insert((e.location.file.clone(), e.qualified_name.clone()), e.id.clone());
            match e.kind {
                EntityKind::Module => modules_by_name.entry(e.name.clone()).or_default().push(e.id.clone()),
                EntityKind::Class => classes_by_name.entry(e.name.clone()).or_default().push(e.id.clone()),
                EntityKind::Function | EntityKind::Method => {
                    callables_by_name.entry(e.name.clone()).or_default().push(e.id.clone())
                }
                _ => {}
            }
        }

        Self {
            by_file_qname,
            modules_by_name,
            classes_by_name,
            callables_by_name,
        }
    }

    fn by_id(&self, entities: &[Entity]) -> HashMap<String, &Entity> {
        entities.iter().map(|e| (e.id.clone(), e)).collect()
    }
}

/// Picks the best candidate per spec §4.3's tie-break: (a) same-module
/// match, (b) most-specific (longest) qualified name, (c) lexicographic id.
/// Returns the chosen id plus any remaining alternates.
fn rank_candidates<'a>(
    candidates: &[String],
    source_file: &str,
    by_id: &HashMap<String, &'a Entity>,
) -> (String, Vec<String>) {
    let mut sorted = candidates.to_vec();
    sorted.sort_by(|a, b| {
        let ea = by_id.get(a);
        let eb = by_id.get(b);
        let same_module_a = ea.map(|e| e.location.file == source_file).unwrap_or(false);
        let same_module_b = eb.map(|e| e.location.file == source_file).unwrap_or(false);
        let len_a = ea.map(|e| e.qualified_name.len()).unwrap_or(0);
        let len_b = eb.map(|e| e.qualified_name.len()).unwrap_or(0);
        (!same_module_a, std::cmp::Reverse(len_a), a.clone()).cmp(&(!same_module_b, std::cmp::Reverse(len_b), b.clone()))
    });
    let chosen = sorted.remove(0);
    (chosen, sorted)
}

/// Resolves per-file local relations (symbolic targets) into the global,
/// id-addressed relationship set.
pub fn resolve(entities: &[Entity], local_relations: Vec<(String, LocalRelation)>) -> Vec<Relationship> {
    let index = GlobalIndex::build(entities);
    let by_id = index.by_id(entities);
    let mut out = Vec::with_capacity(local_relations.len());

    for (file, rel) in local_relations {
        let Some(source_id) = index.by_file_qname.get(&(file.clone(), rel.source_qualified_name.clone())).cloned() else {
            continue;
        };

        match rel.kind {
            RelationshipKind::Contains => {
                if let Some(target_id) = index.by_file_qname.get(&(file.clone(), rel.target_symbol.clone())) {
                    out.push(Relationship::new(source_id, target_id.clone(), RelationshipKind::Contains));
                }
            }
            RelationshipKind::Calls => {
                let short = rel.target_symbol.rsplit('.').next().unwrap_or(&rel.target_symbol);
                match index.callables_by_name.get(short) {
                    Some(candidates) if !candidates.is_empty() => {
                        let (chosen, alternates) = rank_candidates(candidates, &file, &by_id);
                        let mut r = Relationship::new(source_id, chosen, RelationshipKind::Calls);
                        if let Some(line) = rel.line {
                            r.attributes.insert("call_site_line".into(), AttrValue::Int(line as i64));
                        }
                        if !alternates.is_empty() {
                            r.attributes.insert("alternates".into(), AttrValue::EntityRefList(alternates));
                        }
                        out.push(r);
                    }
                    _ => {
                        out.push(Relationship::new(source_id, rel.target_symbol, RelationshipKind::Calls).unresolved());
                    }
                }
            }
            RelationshipKind::Imports => {
                let needle = rel.target_symbol.rsplit(['.', '/']).next().unwrap_or(&rel.target_symbol);
                match index.modules_by_name.get(needle) {
                    Some(candidates) if !candidates.is_empty() => {
                        let (chosen, _alts) = rank_candidates(candidates, &file, &by_id);
                        out.push(Relationship::new(source_id, chosen, RelationshipKind::Imports));
                    }
                    _ => {
                        out.push(Relationship::new(source_id, rel.target_symbol, RelationshipKind::Imports).unresolved());
                    }
                }
            }
            RelationshipKind::Inherits => {
                match index.classes_by_name.get(&rel.target_symbol) {
                    Some(candidates) if !candidates.is_empty() => {
                        let (chosen, alternates) = rank_candidates(candidates, &file, &by_id);
                        let mut r = Relationship::new(source_id, chosen, RelationshipKind::Inherits);
                        if !alternates.is_empty() {
                            r.attributes.insert("alternates".into(), AttrValue::EntityRefList(alternates));
                        }
                        out.push(r);
                    }
                    _ => {
                        out.push(Relationship::new(source_id, rel.target_symbol, RelationshipKind::Inherits).unresolved());
                    }
                }
            }
            _ => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use knowcode_model::{AttrMap, Location};

    fn ent(kind: EntityKind, file: &str, name: &str, qname: &str) -> Entity {
        let mut e = Entity {
            id: String::new(),
            kind,
            name: name.into(),
            qualified_name: qname.into(),
            location: Location::new(file, 1, 1),
            source_code: None,
            docstring: None,
            signature: None,
            attributes: AttrMap::new(),
        };
        e.compute_id();
        e
    }

    #[test]
    fn ambiguous_call_keeps_alternates() {
        let f1 = ent(EntityKind::Function, "a.py", "helper", "a.helper");
        let f2 = ent(EntityKind::Function, "b.py", "helper", "b.helper");
        let caller = ent(EntityKind::Function, "a.py", "main", "a.main");
        let entities = vec![f1.clone(), f2.clone(), caller.clone()];
        let rel = LocalRelation {
            source_qualified_name: "a.main".into(),
            target_symbol: "helper".into(),
            kind: RelationshipKind::Calls,
            line: Some(3),
        };
        let resolved = resolve(&entities, vec![("a.py".to_string(), rel)]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].target_id, f1.id);
        assert!(resolved[0].attributes.contains_key("alternates"));
    }

    #[test]
    fn unresolved_import_is_marked() {
        let caller = ent(EntityKind::Module, "a.py", "a", "a");
        let rel = LocalRelation {
            source_qualified_name: "a".into(),
            target_symbol: "nonexistent_module".into(),
            kind: RelationshipKind::Imports,
            line: None,
        };
        let resolved = resolve(&[caller], vec![("a.py".to_string(), rel)]);
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].unresolved);
    }
}
