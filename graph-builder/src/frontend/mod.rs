//! Parser frontends (spec §4.2): polymorphic over the capability
//! `parse(file) -> (entities, local relations, parse errors)`. Each
//! frontend identifies modules, classes, functions/methods, imports, local
//! call sites and inheritance; local relations carry symbolic, unresolved
//! target names — resolution is the Graph Builder's job (§4.3).

mod common;
mod java;
mod js_ts;
mod markdown;
mod python;
mod yaml;

use crate::language::LanguageKind;
use knowcode_model::{Entity, RelationshipKind};

#[derive(Debug, Clone)]
pub struct LocalRelation {
    pub source_qualified_name: String,
    /// Unresolved, symbolic target — a bare name, dotted path, or module
    /// specifier, as written in source. The Graph Builder resolves this
    /// against the merged entity set.
    pub target_symbol: String,
    pub kind: RelationshipKind,
    pub line: Option<u32>,
}

#[derive(Debug, Default)]
pub struct FrontendOutput {
    pub entities: Vec<Entity>,
    pub local_relations: Vec<LocalRelation>,
    pub parse_errors: Vec<String>,
}

pub trait ParserFrontend: Send + Sync {
    fn language(&self) -> LanguageKind;
    fn parse(&self, file: &str, content: &str) -> FrontendOutput;
}

/// Registry keyed by language (spec §9: "capability polymorphism... with a
/// registry keyed by language/provider name").
pub fn frontend_for(lang: LanguageKind) -> Box<dyn ParserFrontend> {
    match lang {
        LanguageKind::Python => Box::new(python::PythonFrontend),
        LanguageKind::JavaScript => Box::new(js_ts::JsTsFrontend::javascript()),
        LanguageKind::TypeScript => Box::new(js_ts::JsTsFrontend::typescript()),
        LanguageKind::Java => Box::new(java::JavaFrontend),
        LanguageKind::Markdown => Box::new(markdown::MarkdownFrontend),
        LanguageKind::Yaml => Box::new(yaml::YamlFrontend),
    }
}
