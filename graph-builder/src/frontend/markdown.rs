//! Markdown frontend: line/structure-oriented rather than tree-sitter-based
//! (spec §4.2 calls for parser frontends for Markdown alongside the
//! code languages; a doc has no functions/classes, so headings become
//! nested `module` entities and fenced code blocks are recorded as
//! attributes for downstream chunking).

use super::{FrontendOutput, LocalRelation};
use super::ParserFrontend;
use crate::language::LanguageKind;
use knowcode_model::{AttrMap, AttrValue, Entity, EntityKind, Location, RelationshipKind};

pub struct MarkdownFrontend;

struct HeadingFrame {
    level: usize,
    qname: String,
}

impl ParserFrontend for MarkdownFrontend {
    fn language(&self) -> LanguageKind {
        LanguageKind::Markdown
    }

    fn parse(&self, file: &str, content: &str) -> FrontendOutput {
        let mut out = FrontendOutput::default();
        let module_name = std::path::Path::new(file)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file.to_string());

        let lines: Vec<&str> = content.lines().collect();
        let mut module = entity(EntityKind::Module, file, &module_name, &module_name, 1, lines.len().max(1) as u32);
        let mut code_fence_count = 0usize;
        for line in &lines {
            if line.trim_start().starts_with("```") {
                code_fence_count += 1;
            }
        }
        module.attributes.insert("code_fences".into(), AttrValue::Int((code_fence_count / 2) as i64));
        out.entities.push(module);

        let mut stack: Vec<HeadingFrame> = Vec::new();
        let mut open: Vec<(usize, String, usize)> = Vec::new(); // (level, qname, start_line)

        for (idx, line) in lines.iter().enumerate() {
            let trimmed = line.trim_start();
            let level = trimmed.chars().take_while(|&c| c == '#').count();
            if level == 0 || level > 6 || !trimmed[level..].starts_with(' ') {
                continue;
            }
            let title = trimmed[level..].trim().to_string();
            if title.is_empty() {
                continue;
            }

            while let Some(last) = open.last() {
                if last.0 >= level {
                    let (_, qname, start) = open.pop().unwrap();
                    close_section(&mut out.entities, file, &qname, start, idx);
                } else {
                    break;
                }
            }

            let parent = stack.iter().rev().find(|f| f.level < level).map(|f| f.qname.clone());
            let qname = match &parent {
                Some(p) => format!("{p}/{title}"),
                None => format!("{module_name}/{title}"),
            };
            stack.retain(|f| f.level < level);
            stack.push(HeadingFrame { level, qname: qname.clone() });
            open.push((level, qname.clone(), idx));

            let parent_qname = parent.unwrap_or_else(|| module_name.clone());
            out.local_relations.push(LocalRelation {
                source_qualified_name: parent_qname,
                target_symbol: qname,
                kind: RelationshipKind::Contains,
                line: Some(idx as u32 + 1),
            });
        }
        for (_, qname, start) in open {
            close_section(&mut out.entities, file, &qname, start, lines.len());
        }

        out
    }
}

fn close_section(entities: &mut Vec<Entity>, file: &str, qname: &str, start_line: usize, end_line: usize) {
    let name = qname.rsplit('/').next().unwrap_or(qname).to_string();
    entities.push(entity(
        EntityKind::Module,
        file,
        &name,
        qname,
        start_line as u32 + 1,
        end_line.max(start_line + 1) as u32,
    ));
}

fn entity(kind: EntityKind, file: &str, name: &str, qualified_name: &str, start: u32, end: u32) -> Entity {
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
