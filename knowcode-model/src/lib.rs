//! Shared vocabulary for KnowCode: entities, relationships, chunks, vector
//! records, index manifests, and context bundles. Every engine crate depends
//! on this one so the data model only has to be agreed on once.

pub mod attrs;
pub mod chunk;
pub mod context;
pub mod entity;
pub mod ids;
pub mod relationship;
pub mod store_doc;
pub mod vector;

pub use attrs::{AttrMap, AttrValue};
pub use chunk::{Chunk, ChunkKind, Span};
pub use context::{ContextBundle, Evidence, RetrievalMode, Section, SectionKind, TaskType};
pub use entity::{Entity, EntityKind, Location};
pub use relationship::{Relationship, RelationshipKind};
pub use store_doc::{ScanMetadata, StoreDocument, CURRENT_STORE_SCHEMA_VERSION};
pub use vector::{DistanceKind, IndexManifest, VectorRecord, CURRENT_SCHEMA_VERSION};
