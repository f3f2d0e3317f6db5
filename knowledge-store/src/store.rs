use crate::error::StoreError;
use knowcode_model::{Entity, EntityKind, Relationship, RelationshipKind};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Risk-score calibration constants (spec §4.4): chosen so that an
/// isolated single-file leaf function scores near 0 and a widely-imported
/// core utility scores near 1. Exposed as constants per §9's calibration
/// guidance.
pub const RISK_SCORE_TRANSITIVE_WEIGHT: f32 = 0.22;
pub const RISK_SCORE_SPREAD_WEIGHT: f32 = 0.12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceDirection {
    Callers,
    Callees,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceHit {
    pub entity_id: String,
    pub call_depth: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactReport {
    pub direct_dependents: Vec<String>,
    pub transitive_dependents: Vec<String>,
    pub affected_files: Vec<String>,
    pub risk_score: f32,
}

/// In-memory knowledge store with O(1) id lookup and inverted adjacency
/// per relation kind (spec §4.4). Reads never error: a query for a missing
/// id returns an empty result.
#[derive(Debug, Default)]
pub struct KnowledgeStore {
    entities: HashMap<String, Entity>,
    relationships: Vec<Relationship>,
    /// source_id -> relationship indices, keyed by kind for cheap filtering.
    outgoing: HashMap<String, Vec<usize>>,
    /// target_id -> relationship indices.
    incoming: HashMap<String, Vec<usize>>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the store from a freshly-resolved entity/relationship set,
    /// verifying the `contains` forest invariant (spec §3, §8).
    pub fn build(entities: Vec<Entity>, relationships: Vec<Relationship>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for e in entities {
            store.entities.insert(e.id.clone(), e);
        }
        store.relationships = relationships;
        store.reindex();
        store.check_contains_forest()?;
        Ok(store)
    }

    fn reindex(&mut self) {
        self.outgoing.clear();
        self.incoming.clear();
        for (idx, rel) in self.relationships.iter().enumerate() {
            self.outgoing.entry(rel.source_id.clone()).or_default().push(idx);
            self.incoming.entry(rel.target_id.clone()).or_default().push(idx);
        }
    }

    fn check_contains_forest(&self) -> Result<(), StoreError> {
        let mut parent_of: HashMap<&str, &str> = HashMap::new();
        for rel in &self.relationships {
            if rel.kind == RelationshipKind::Contains && !rel.unresolved {
                if let Some(_existing) = parent_of.insert(rel.target_id.as_str(), rel.source_id.as_str()) {
                    return Err(StoreError::NotAForest(rel.target_id.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn get_entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_entities_by_kind(&self, kind: EntityKind) -> Vec<&Entity> {
        let mut out: Vec<&Entity> = self.entities.values().filter(|e| e.kind == kind).collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// Case-insensitive substring search over name and qualified name.
    /// Results sorted by (exact-name-match, prefix-match, length, id) — spec §4.4.
    pub fn search(&self, pattern: &str) -> Vec<&Entity> {
        let needle = pattern.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<&Entity> = self
            .entities
            .values()
            .filter(|e| {
                e.name.to_lowercase().contains(&needle) || e.qualified_name.to_lowercase().contains(&needle)
            })
            .collect();
        hits.sort_by(|a, b| {
            let key = |e: &&Entity| {
                let lname = e.name.to_lowercase();
                let exact = lname != needle;
                let prefix = !lname.starts_with(&needle);
                (exact, prefix, e.qualified_name.len(), e.id.clone())
            };
            key(a).cmp(&key(b))
        });
        hits
    }

    fn related(&self, id: &str, kind: RelationshipKind, outgoing: bool) -> Vec<String> {
        let index = if outgoing { &self.outgoing } else { &self.incoming };
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        if let Some(idxs) = index.get(id) {
            for &i in idxs {
                let rel = &self.relationships[i];
                if rel.kind != kind {
                    continue;
                }
                let other = if outgoing { &rel.target_id } else { &rel.source_id };
                if seen.insert(other.clone()) {
                    out.push(other.clone());
                }
            }
        }
        out
    }

    pub fn get_callers(&self, id: &str) -> Vec<String> {
        self.related(id, RelationshipKind::Calls, false)
    }

    pub fn get_callees(&self, id: &str) -> Vec<String> {
        self.related(id, RelationshipKind::Calls, true)
    }

    pub fn get_children(&self, id: &str) -> Vec<String> {
        self.related(id, RelationshipKind::Contains, true)
    }

    pub fn get_parent(&self, id: &str) -> Option<String> {
        self.related(id, RelationshipKind::Contains, false).into_iter().next()
    }

    pub fn get_dependencies(&self, id: &str) -> Vec<String> {
        self.related(id, RelationshipKind::Imports, true)
    }

    pub fn get_dependents(&self, id: &str) -> Vec<String> {
        self.related(id, RelationshipKind::Imports, false)
    }

    /// BFS traversal along `calls` edges, stopping at `depth` or when
    /// `max_results` entities have been emitted. Cycles are detected via a
    /// visited set keyed on id (spec §4.4).
    pub fn trace_calls(&self, id: &str, direction: TraceDirection, depth: u32, max_results: usize) -> Vec<TraceHit> {
        let mut out = Vec::new();
        if !self.entities.contains_key(id) {
            return out;
        }
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(id.to_string());
        let mut queue: VecDeque<(String, u32)> = VecDeque::new();
        queue.push_back((id.to_string(), 0));

        while let Some((current, current_depth)) = queue.pop_front() {
            if current_depth >= depth {
                continue;
            }
            let next_ids = match direction {
                TraceDirection::Callers => self.get_callers(&current),
                TraceDirection::Callees => self.get_callees(&current),
            };
            for next in next_ids {
                if out.len() >= max_results {
                    return out;
                }
                if visited.insert(next.clone()) {
                    out.push(TraceHit {
                        entity_id: next.clone(),
                        call_depth: current_depth + 1,
                    });
                    queue.push_back((next, current_depth + 1));
                }
            }
        }
        out
    }

    /// Spec §4.4: direct dependents (1-hop callers+importers), transitive
    /// dependents (BFS up to max_depth), affected files, and a risk_score.
    pub fn get_impact(&self, id: &str, max_depth: u32) -> ImpactReport {
        if !self.entities.contains_key(id) {
            return ImpactReport {
                direct_dependents: Vec::new(),
                transitive_dependents: Vec::new(),
                affected_files: Vec::new(),
                risk_score: 0.0,
            };
        }

        let mut direct: HashSet<String> = HashSet::new();
        direct.extend(self.get_callers(id));
        direct.extend(self.get_dependents(id));
        let mut direct: Vec<String> = direct.into_iter().collect();
        direct.sort();

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(id.to_string());
        let mut queue: VecDeque<(String, u32)> = direct.iter().map(|d| (d.clone(), 1)).collect();
        let mut transitive: Vec<String> = Vec::new();
        for d in &direct {
            visited.insert(d.clone());
        }

        while let Some((current, current_depth)) = queue.pop_front() {
            transitive.push(current.clone());
            if current_depth >= max_depth {
                continue;
            }
            let mut next_ids: HashSet<String> = HashSet::new();
            next_ids.extend(self.get_callers(&current));
            next_ids.extend(self.get_dependents(&current));
            for next in next_ids {
                if visited.insert(next.clone()) {
                    queue.push_back((next, current_depth + 1));
                }
            }
        }
        transitive.sort();

        let origin_file = self.entities.get(id).map(|e| e.location.file.clone());
        let mut affected_files: HashSet<String> = HashSet::new();
        for eid in transitive.iter().chain(direct.iter()) {
            if let Some(e) = self.entities.get(eid) {
                affected_files.insert(e.location.file.clone());
            }
        }
        if let Some(f) = &origin_file {
            affected_files.remove(f);
        }
        let mut affected_files: Vec<String> = affected_files.into_iter().collect();
        affected_files.sort();

        let n_transitive = transitive.len() as f32;
        let spread = affected_files.len() as f32;
        let risk_score = (RISK_SCORE_TRANSITIVE_WEIGHT * (1.0 + n_transitive).ln()
            + RISK_SCORE_SPREAD_WEIGHT * spread)
            .clamp(0.0, 1.0);

        ImpactReport {
            direct_dependents: direct,
            transitive_dependents: transitive,
            affected_files,
            risk_score,
        }
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn file_count(&self) -> usize {
        let files: BTreeMap<&str, ()> = self.entities.values().map(|e| (e.location.file.as_str(), ())).collect();
        files.len()
    }
}
