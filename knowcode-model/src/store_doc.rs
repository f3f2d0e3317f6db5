use crate::entity::Entity;
use crate::relationship::Relationship;
use serde::{Deserialize, Serialize};

/// Self-describing persisted document for the knowledge store (spec §4.4, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    pub schema_version: u32,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub metadata: ScanMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanMetadata {
    /// RFC3339 timestamp of the scan that produced this document.
    pub scan_time: String,
    pub file_count: usize,
    pub errors: Vec<String>,
}

pub const CURRENT_STORE_SCHEMA_VERSION: u32 = 1;

impl StoreDocument {
    pub fn new(entities: Vec<Entity>, relationships: Vec<Relationship>, metadata: ScanMetadata) -> Self {
        Self {
            schema_version: CURRENT_STORE_SCHEMA_VERSION,
            entities,
            relationships,
            metadata,
        }
    }
}
