use crate::attrs::AttrMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Module,
    Class,
    Function,
    Method,
    Variable,
    ConfigKey,
    ApiEndpoint,
    Commit,
    Author,
    CoverageReport,
    /// Not in the spec's closed kind list but required by §4.2: parser
    /// frontends must emit a parse_error entity instead of silently
    /// dropping unparseable regions.
    ParseError,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Module => "module",
            EntityKind::Class => "class",
            EntityKind::Function => "function",
            EntityKind::Method => "method",
            EntityKind::Variable => "variable",
            EntityKind::ConfigKey => "config_key",
            EntityKind::ApiEndpoint => "api_endpoint",
            EntityKind::Commit => "commit",
            EntityKind::Author => "author",
            EntityKind::CoverageReport => "coverage_report",
            EntityKind::ParseError => "parse_error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            file: file.into(),
            start_line: start_line.max(1),
            end_line: end_line.max(start_line.max(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub kind: EntityKind,
    pub name: String,
    pub qualified_name: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "AttrMap::is_empty")]
    pub attributes: AttrMap,
}

impl Entity {
    /// Builds the stable id per §3: kind + normalized file path + qualified name.
    pub fn compute_id(&mut self) {
        self.id = crate::ids::entity_id(
            &self.kind.to_string(),
            &self.location.file,
            &self.qualified_name,
        );
    }

    pub fn is_method_of(&self, class_qualified_name: &str) -> bool {
        self.kind == EntityKind::Method
            && self
                .qualified_name
                .starts_with(&format!("{class_qualified_name}."))
    }
}
