//! Splits source into module/import/entity retrieval units (spec §4.5).
//!
//! Emits three chunk kinds per file: one `module_header`, one `imports`,
//! and one per top-level entity (a class carries its methods as a single
//! chunk when it fits `size_bound_chars`; oversize classes are split so
//! each method becomes its own chunk and the class header remains a
//! distinct chunk). The chunk buffer for a file is built up locally and
//! only appended to the caller's output once parsing succeeds for that
//! file — so a partial failure downstream never discards chunks already
//! collected for other files (the file-scoped atomic commit in §4.5's edge
//! case).

use knowcode_model::{Chunk, ChunkKind, Entity, EntityKind, Span};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy)]
pub struct ChunkerConfig {
    pub size_bound_chars: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self { size_bound_chars: 4000 }
    }
}

fn import_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(import\s|from\s.+\simport\b|require\(|#include\b|using\s)").unwrap())
}

/// Chunks a single file's already-extracted entities against its raw text.
/// `entities` must all belong to `file`.
pub fn chunk_file(file: &str, content: &str, entities: &[Entity], cfg: &ChunkerConfig) -> Vec<Chunk> {
    let lines: Vec<&str> = content.lines().collect();
    let mut out = Vec::new();

    let module = entities.iter().find(|e| e.kind == EntityKind::Module);
    out.push(module_header_chunk(file, content, module));

    if let Some(imports_text) = collect_import_lines(&lines) {
        out.push(Chunk::new(
            file,
            ChunkKind::Imports,
            "imports",
            with_metadata_header(file, "imports", "", &imports_text),
            Span { start_line: 1, end_line: lines.len().max(1) as u32, start_byte: 0, end_byte: content.len() as u32 },
            None,
        ));
    }

    for class in top_level(entities, EntityKind::Class) {
        let methods = members_of(entities, &class.qualified_name);
        let class_text = slice(&lines, class.location.start_line, class.location.end_line);
        if class_text.len() <= cfg.size_bound_chars || methods.is_empty() {
            out.push(entity_chunk(file, class, &class_text));
        } else {
            let header_end = methods
                .iter()
                .map(|m| m.location.start_line)
                .min()
                .unwrap_or(class.location.end_line)
                .saturating_sub(1)
                .max(class.location.start_line);
            let header_text = slice(&lines, class.location.start_line, header_end);
            out.push(entity_chunk(file, class, &header_text));
            for method in methods {
                let text = slice(&lines, method.location.start_line, method.location.end_line);
                out.push(entity_chunk(file, method, &text));
            }
        }
    }

    for func in top_level(entities, EntityKind::Function) {
        let text = slice(&lines, func.location.start_line, func.location.end_line);
        out.push(entity_chunk(file, func, &text));
    }

    out
}

fn top_level<'a>(entities: &'a [Entity], kind: EntityKind) -> Vec<&'a Entity> {
    entities
        .iter()
        .filter(|e| e.kind == kind && e.qualified_name.matches('.').count() == 1)
        .collect()
}

fn members_of<'a>(entities: &'a [Entity], class_qname: &str) -> Vec<&'a Entity> {
    let prefix = format!("{class_qname}.");
    let mut members: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.kind == EntityKind::Method && e.qualified_name.starts_with(&prefix))
        .collect();
    members.sort_by_key(|e| e.location.start_line);
    members
}

fn slice(lines: &[&str], start_line: u32, end_line: u32) -> String {
    let start = start_line.saturating_sub(1) as usize;
    let end = (end_line as usize).min(lines.len());
    if start >= end {
        return String::new();
    }
    lines[start..end].join("\n")
}

fn entity_chunk(file: &str, entity: &Entity, text: &str) -> Chunk {
    let body = with_metadata_header(file, &entity.kind.to_string(), &entity.qualified_name, text);
    let span = Span {
        start_line: entity.location.start_line,
        end_line: entity.location.end_line,
        start_byte: 0,
        end_byte: body.len() as u32,
    };
    Chunk::new(file, ChunkKind::Entity, &entity.qualified_name, body, span, Some(entity.id.clone()))
}

fn module_header_chunk(file: &str, content: &str, module: Option<&Entity>) -> Chunk {
    let doc = module.and_then(|m| m.docstring.clone()).unwrap_or_default();
    let header_lines: Vec<&str> = content.lines().take_while(|l| {
        let t = l.trim_start();
        t.is_empty() || t.starts_with('#') || t.starts_with("//") || t.starts_with("/*") || t.starts_with('*')
    }).collect();
    let body = with_metadata_header(file, "module_header", "", &format!("{}\n{}", doc, header_lines.join("\n")));
    let end_line = header_lines.len().max(1) as u32;
    Chunk::new(
        file,
        ChunkKind::ModuleHeader,
        "header",
        body,
        Span { start_line: 1, end_line, start_byte: 0, end_byte: 0 },
        None,
    )
}

fn collect_import_lines(lines: &[&str]) -> Option<String> {
    let re = import_line_re();
    let matched: Vec<&str> = lines.iter().filter(|l| re.is_match(l)).copied().collect();
    if matched.is_empty() {
        None
    } else {
        Some(matched.join("\n"))
    }
}

/// Prepends a light metadata comment block (file path, qualified name,
/// kind) to improve retrieval recall, per §4.5.
fn with_metadata_header(file: &str, kind: &str, qualified_name: &str, text: &str) -> String {
    if qualified_name.is_empty() {
        format!("# file: {file}\n# kind: {kind}\n{text}")
    } else {
        format!("# file: {file}\n# kind: {kind}\n# name: {qualified_name}\n{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knowcode_model::{AttrMap, Location};

    fn ent(kind: EntityKind, qname: &str, start: u32, end: u32) -> Entity {
        let mut e = Entity {
            id: String::new(),
            kind,
            name: qname.rsplit('.').next().unwrap().to_string(),
            qualified_name: qname.to_string(),
            location: Location::new("m.py", start, end),
            source_code: None,
            docstring: None,
            signature: None,
            attributes: AttrMap::new(),
        };
        e.compute_id();
        e
    }

    #[test]
    fn deterministic_chunk_ids() {
        let content = "import os\n\nclass C:\n    def f(self):\n        pass\n";
        let entities = vec![
            ent(EntityKind::Module, "m", 1, 5),
            ent(EntityKind::Class, "m.C", 3, 5),
            ent(EntityKind::Method, "m.C.f", 4, 5),
        ];
        let cfg = ChunkerConfig::default();
        let a = chunk_file("m.py", content, &entities, &cfg);
        let b = chunk_file("m.py", content, &entities, &cfg);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.content_hash, y.content_hash);
        }
    }

    #[test]
    fn oversize_class_splits_per_method() {
        let big_method_body = "x = 1\n".repeat(2000);
        let content = format!("class C:\n    def f(self):\n{big_method_body}\n    def g(self):\n{big_method_body}\n");
        let lines_count = content.lines().count() as u32;
        let entities = vec![
            ent(EntityKind::Module, "m", 1, lines_count),
            ent(EntityKind::Class, "m.C", 1, lines_count),
            ent(EntityKind::Method, "m.C.f", 2, 2001),
            ent(EntityKind::Method, "m.C.g", 2002, lines_count),
        ];
        let cfg = ChunkerConfig { size_bound_chars: 500 };
        let chunks = chunk_file("m.py", &content, &entities, &cfg);
        let entity_chunks: Vec<_> = chunks.iter().filter(|c| c.kind == ChunkKind::Entity).collect();
        // class header + 2 methods
        assert_eq!(entity_chunks.len(), 3);
    }
}
