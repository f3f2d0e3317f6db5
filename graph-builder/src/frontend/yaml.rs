//! YAML frontend: line/structure-oriented. Top-level keys become
//! `config_key` entities (spec §4.2's Markdown/YAML frontends), since a
//! plain key-value document has no functions or classes to extract.

use super::{FrontendOutput, ParserFrontend};
use crate::language::LanguageKind;
use knowcode_model::{AttrMap, Entity, EntityKind, Location};

pub struct YamlFrontend;

impl ParserFrontend for YamlFrontend {
    fn language(&self) -> LanguageKind {
        LanguageKind::Yaml
    }

    fn parse(&self, file: &str, content: &str) -> FrontendOutput {
        let mut out = FrontendOutput::default();
        let module_name = std::path::Path::new(file)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file.to_string());

        let lines: Vec<&str> = content.lines().collect();
        out.entities.push(make(EntityKind::Module, file, &module_name, &module_name, 1, lines.len().max(1) as u32));

        for (idx, line) in lines.iter().enumerate() {
            if line.starts_with(' ') || line.starts_with('\t') || line.trim_start().starts_with('#') {
                continue;
            }
            let trimmed = line.trim_end();
            if trimmed.is_empty() || trimmed.starts_with("---") {
                continue;
            }
            let Some(colon) = trimmed.find(':') else { continue };
            let key = trimmed[..colon].trim();
            if key.is_empty() || key.starts_with('-') {
                continue;
            }
            let qname = format!("{module_name}.{key}");
            out.entities.push(make(EntityKind::ConfigKey, file, key, &qname, idx as u32 + 1, idx as u32 + 1));
        }

        out
    }
}

fn make(kind: EntityKind, file: &str, name: &str, qualified_name: &str, start: u32, end: u32) -> Entity {
    let mut e = Entity {
        id: String::new(),
        kind,
        name: name.to_string(),
        qualified_name: qualified_name.to_string(),
        location: Location::new(file, start, end),
        source_code: None,
        docstring: None,
        signature: None,
        attributes: AttrMap::new(),
    };
    e.compute_id();
    e
}
