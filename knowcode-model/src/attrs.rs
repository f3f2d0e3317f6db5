//! Typed attribute bags for entities and relationships.
//!
//! Spec §9 calls for a typed attribute map rather than an untyped blob, so a
//! downstream consumer can evolve fields with a migration instead of a guess.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    StrList(Vec<String>),
    /// Call-site alternates for an ambiguous `calls` edge (spec §4.3, §9):
    /// the top candidate is the edge target, the rest are recorded here so
    /// they are never silently dropped.
    EntityRefList(Vec<String>),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

pub type AttrMap = BTreeMap<String, AttrValue>;
