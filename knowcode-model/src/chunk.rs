use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    ModuleHeader,
    Imports,
    Entity,
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChunkKind::ModuleHeader => "module_header",
            ChunkKind::Imports => "imports",
            ChunkKind::Entity => "entity",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub end_line: u32,
    pub start_byte: u32,
    pub end_byte: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub kind: ChunkKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    pub text: String,
    pub span: Span,
    pub file: String,
    pub content_hash: String,
}

impl Chunk {
    pub fn new(file: &str, kind: ChunkKind, disambiguator: &str, text: String, span: Span, entity_id: Option<String>) -> Self {
        let content_hash = crate::ids::hash_content(text.as_bytes());
        let id = crate::ids::chunk_id(file, &kind.to_string(), disambiguator);
        Self {
            id,
            kind,
            entity_id,
            text,
            span,
            file: file.to_string(),
            content_hash,
        }
    }
}
