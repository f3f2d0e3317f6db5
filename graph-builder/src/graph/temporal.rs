//! Optional temporal ingestion pass (spec §4.3, §B): walks version-control
//! history and emits `commit`/`author` entities plus `authored`/`modified`/
//! `changed_by` edges. Grounded on `git2` (already present in the corpus via
//! the `services` crate's clone helper) but restyled onto `tracing` instead
//! of the teacher's `println!` diagnostics, and repurposed for a local
//! history walk rather than a remote clone.

use git2::Repository;
use knowcode_model::{AttrMap, Entity, EntityKind, Location, Relationship, RelationshipKind};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

pub struct TemporalIngest {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

/// Walks first-parent history up to `max_commits`, producing a commit
/// entity per commit, an author entity per distinct author, `authored`
/// edges (author -> commit) and `modified` edges (commit -> file-scoped
/// module entity, when that file is present in `known_files`).
pub fn ingest(root: &Path, known_module_ids: &HashMap<String, String>, max_commits: usize) -> TemporalIngest {
    let mut result = TemporalIngest { entities: Vec::new(), relationships: Vec::new() };

    let repo = match Repository::open(root) {
        Ok(r) => r,
        Err(err) => {
            warn!("temporal ingest: not a git repository ({err}); skipping");
            return result;
        }
    };

    let mut revwalk = match repo.revwalk() {
        Ok(w) => w,
        Err(err) => {
            warn!("temporal ingest: revwalk failed: {err}");
            return result;
        }
    };
    if revwalk.push_head().is_err() {
        return result;
    }
    revwalk.set_sorting(git2::Sort::TIME | git2::Sort::TOPOLOGICAL).ok();

    let mut author_ids: HashMap<String, String> = HashMap::new();

    for (count, oid) in revwalk.enumerate() {
        if count >= max_commits {
            break;
        }
        let Ok(oid) = oid else { continue };
        let Ok(commit) = repo.find_commit(oid) else { continue };

        let sha = oid.to_string();
        let author_sig = commit.author();
        let author_name = author_sig.name().unwrap_or("unknown").to_string();
        let author_email = author_sig.email().unwrap_or("").to_string();

        let author_id = author_ids.entry(author_email.clone()).or_insert_with(|| {
            let mut e = Entity {
                id: String::new(),
                kind: EntityKind::Author,
                name: author_name.clone(),
                qualified_name: author_email.clone(),
                location: Location::new("<git>", 1, 1),
                source_code: None,
                docstring: None,
                signature: None,
                attributes: AttrMap::new(),
            };
            e.compute_id();
            let id = e.id.clone();
            result.entities.push(e);
            id
        }).clone();

        let mut commit_entity = Entity {
            id: String::new(),
            kind: EntityKind::Commit,
            name: sha[..sha.len().min(8)].to_string(),
            qualified_name: sha.clone(),
            location: Location::new("<git>", 1, 1),
            source_code: Some(commit.message().unwrap_or_default().to_string()),
            docstring: None,
            signature: None,
            attributes: AttrMap::new(),
        };
        commit_entity.compute_id();
        let commit_id = commit_entity.id.clone();
        result.entities.push(commit_entity);

        result.relationships.push(Relationship::new(author_id, commit_id.clone(), RelationshipKind::Authored));

        if let (Ok(tree), Ok(parent)) = (commit.tree(), commit.parent(0)) {
            if let Ok(parent_tree) = parent.tree() {
                if let Ok(diff) = repo.diff_tree_to_tree(Some(&parent_tree), Some(&tree), None) {
                    diff.foreach(
                        &mut |delta, _| {
                            if let Some(path) = delta.new_file().path().and_then(|p| p.to_str()) {
                                if let Some(module_id) = known_module_ids.get(path) {
                                    result.relationships.push(Relationship::new(
                                        commit_id.clone(),
                                        module_id.clone(),
                                        RelationshipKind::Modified,
                                    ));
                                    result.relationships.push(Relationship::new(
                                        module_id.clone(),
                                        commit_id.clone(),
                                        RelationshipKind::ChangedBy,
                                    ));
                                }
                            }
                            true
                        },
                        None,
                        None,
                        None,
                    ).ok();
                }
            }
        }
    }

    result
}
