use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceKind {
    Cosine,
    Dot,
    Euclid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub chunk_id: String,
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub embedding_model: String,
    pub dimension: usize,
    pub provider: String,
    pub chunk_count: usize,
    /// Content-hash of the full source set the index was built from.
    pub source_hash: String,
    pub schema_version: u32,
    #[serde(default = "default_distance_kind")]
    pub distance: DistanceKind,
}

fn default_distance_kind() -> DistanceKind {
    DistanceKind::Cosine
}

/// Current reader schema version. Per §4.4/§6, a persisted document whose
/// `schema_version` is newer than this must be rejected, not loaded.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

impl IndexManifest {
    /// Returns true when this manifest is compatible with `expected`
    /// (same model/dimension/provider/schema). Spec §4.4: "an index whose
    /// manifest disagrees with current configuration must be rebuilt, not
    /// loaded."
    pub fn matches_config(&self, embedding_model: &str, dimension: usize, provider: &str) -> bool {
        self.embedding_model == embedding_model
            && self.dimension == dimension
            && self.provider == provider
            && self.schema_version <= CURRENT_SCHEMA_VERSION
    }

    pub fn distance_kind(&self) -> DistanceKind {
        self.distance
    }
}
