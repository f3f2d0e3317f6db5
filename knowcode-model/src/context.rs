use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Explain,
    Debug,
    Extend,
    Review,
    Locate,
    General,
    Auto,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskType::Explain => "explain",
            TaskType::Debug => "debug",
            TaskType::Extend => "extend",
            TaskType::Review => "review",
            TaskType::Locate => "locate",
            TaskType::General => "general",
            TaskType::Auto => "auto",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    Semantic,
    Lexical,
    Hybrid,
}

impl fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RetrievalMode::Semantic => "semantic",
            RetrievalMode::Lexical => "lexical",
            RetrievalMode::Hybrid => "hybrid",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Signature,
    Docstring,
    Source,
    Callers,
    Callees,
    Inherits,
    Imports,
    RecentChanges,
    Impact,
    EvidenceList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub text: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub chunk_id: String,
    pub entity_id: Option<String>,
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBundle {
    pub sections: Vec<Section>,
    pub total_tokens: usize,
    pub evidence: Vec<Evidence>,
    pub task_type: TaskType,
    pub retrieval_mode: RetrievalMode,
    pub sufficiency_score: f32,
    pub selected_entities: Vec<String>,
    pub context_text: String,
}
