use crate::attrs::AttrMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Calls,
    Imports,
    Contains,
    Inherits,
    Authored,
    Modified,
    ChangedBy,
    Covers,
    ExecutedBy,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelationshipKind::Calls => "calls",
            RelationshipKind::Imports => "imports",
            RelationshipKind::Contains => "contains",
            RelationshipKind::Inherits => "inherits",
            RelationshipKind::Authored => "authored",
            RelationshipKind::Modified => "modified",
            RelationshipKind::ChangedBy => "changed_by",
            RelationshipKind::Covers => "covers",
            RelationshipKind::ExecutedBy => "executed_by",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source_id: String,
    pub target_id: String,
    pub kind: RelationshipKind,
    #[serde(default, skip_serializing_if = "AttrMap::is_empty")]
    pub attributes: AttrMap,
    /// Set when the target could not be resolved to a concrete entity id
    /// and `target_id` instead carries the unresolved symbolic name
    /// (spec §4.3: "unresolved imports are retained with a provenance marker").
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unresolved: bool,
}

impl Relationship {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, kind: RelationshipKind) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            kind,
            attributes: AttrMap::new(),
            unresolved: false,
        }
    }

    pub fn unresolved(mut self) -> Self {
        self.unresolved = true;
        self
    }
}
