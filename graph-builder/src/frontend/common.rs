//! Shared tree-sitter declaration walker, generalized from the teacher's
//! stack-based owner-path DFS (originally written for Dart) into a
//! language-parameterized walk any frontend can reuse.

use crate::language::LanguageKind;
use crate::frontend::LocalRelation;
use knowcode_model::{AttrMap, Entity, EntityKind, Location, RelationshipKind};
use std::collections::HashSet;
use tree_sitter::{Node, Tree};

#[derive(Clone, Copy)]
pub struct LangProfile {
    pub language: LanguageKind,
    pub class_kinds: &'static [&'static str],
    pub function_kinds: &'static [&'static str],
    pub import_kinds: &'static [&'static str],
    pub call_kinds: &'static [&'static str],
    pub variable_kinds: &'static [&'static str],
    pub doc_comment_prefixes: &'static [&'static str],
}

/// Walks the tree in a stack-based DFS carrying an "owner path" accumulator
/// for qualified names (mirrors the Dart `decls.rs` technique). Emits
/// class/function/method/variable entities plus symbolic `calls` and
/// `imports` local relations, and a module entity for the file itself.
pub fn walk_decls(tree: &Tree, code: &str, file: &str, profile: &LangProfile) -> (Vec<Entity>, Vec<LocalRelation>) {
    let mut entities = Vec::new();
    let mut relations = Vec::new();

    let module_name = module_name_from_path(file);
    let module = make_entity(EntityKind::Module, file, &module_name, &module_name, node_span(&tree.root_node()), module_doc(code, profile));
    entities.push(module);

    let root = tree.root_node();
    let mut stack: Vec<(Node, Vec<String>)> = vec![(root, Vec::new())];

    while let Some((node, owner)) = stack.pop() {
        let mut owner_for_children = owner.clone();
        let kind = node.kind();

        if profile.class_kinds.contains(&kind) {
            if let Some(name) = pick_name(&node, code) {
                let qname = build_qname(&owner, &name, &module_name);
                let doc = doc_above(code, &node, profile);
                let entity = make_entity(EntityKind::Class, file, &name, &qname, node_span(&node), doc);
                entities.push(entity);
                if let Some(target) = superclass_name(&node, code) {
                    relations.push(LocalRelation {
                        source_qualified_name: qname.clone(),
                        target_symbol: target,
                        kind: RelationshipKind::Inherits,
                        line: Some(node.start_position().row as u32 + 1),
                    });
                }
                relations.push(contains_relation(&owner, &module_name, &qname));
                owner_for_children = push_owner(owner, name);
            }
        } else if profile.function_kinds.contains(&kind) {
            if let Some(name) = pick_name(&node, code) {
                let qname = build_qname(&owner, &name, &module_name);
                let is_method = !owner.is_empty();
                let doc = doc_above(code, &node, profile);
                let sig = signature_line(&node, code);
                let mut entity = make_entity(
                    if is_method { EntityKind::Method } else { EntityKind::Function },
                    file,
                    &name,
                    &qname,
                    node_span(&node),
                    doc,
                );
                entity.signature = sig;
                entities.push(entity);
                relations.push(contains_relation(&owner, &module_name, &qname));
                for target in call_targets(&node, code, profile) {
                    relations.push(LocalRelation {
                        source_qualified_name: qname.clone(),
                        target_symbol: target,
                        kind: RelationshipKind::Calls,
                        line: None,
                    });
                }
            }
        } else if profile.import_kinds.contains(&kind) {
            for target in import_targets(&node, code) {
                relations.push(LocalRelation {
                    source_qualified_name: module_name.clone(),
                    target_symbol: target,
                    kind: RelationshipKind::Imports,
                    line: Some(node.start_position().row as u32 + 1),
                });
            }
        } else if profile.variable_kinds.contains(&kind) && owner.is_empty() {
            for name in variable_names(&node, code) {
                let qname = build_qname(&owner, &name, &module_name);
                let entity = make_entity(EntityKind::Variable, file, &name, &qname, node_span(&node), None);
                entities.push(entity);
                relations.push(contains_relation(&owner, &module_name, &qname));
            }
        }

        let mut w = node.walk();
        for child in node.children(&mut w) {
            stack.push((child, owner_for_children.clone()));
        }
    }

    (entities, relations)
}

fn contains_relation(owner: &[String], module_name: &str, child_qname: &str) -> LocalRelation {
    let parent_qname = if owner.is_empty() {
        module_name.to_string()
    } else {
        owner.join(".")
    };
    let parent_qname = if parent_qname.is_empty() { module_name.to_string() } else { parent_qname };
    LocalRelation {
        source_qualified_name: parent_qname,
        target_symbol: child_qname.to_string(),
        kind: RelationshipKind::Contains,
        line: None,
    }
}

fn make_entity(kind: EntityKind, file: &str, name: &str, qualified_name: &str, span: (u32, u32), doc: Option<String>) -> Entity {
    let mut e = Entity {
        id: String::new(),
        kind,
        name: name.to_string(),
        qualified_name: qualified_name.to_string(),
        location: Location::new(file, span.0, span.1),
        source_code: None,
        docstring: doc,
        signature: None,
        attributes: AttrMap::new(),
    };
    e.compute_id();
    e
}

fn module_name_from_path(file: &str) -> String {
    std::path::Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string())
}

fn build_qname(owner: &[String], name: &str, module_name: &str) -> String {
    if owner.is_empty() {
        format!("{module_name}.{name}")
    } else {
        format!("{module_name}.{}.{name}", owner.join("."))
    }
}

fn push_owner(mut owner: Vec<String>, name: String) -> Vec<String> {
    owner.push(name);
    owner
}

fn node_span(node: &Node) -> (u32, u32) {
    (node.start_position().row as u32 + 1, node.end_position().row as u32 + 1)
}

fn text(code: &str, range: std::ops::Range<usize>) -> String {
    let len = code.len();
    let s = range.start.min(len);
    let e = range.end.min(len);
    let (s, e) = if s <= e { (s, e) } else { (s, len) };
    String::from_utf8_lossy(&code.as_bytes()[s..e]).into_owned()
}

const NAME_CANDIDATES: &[&str] = &["identifier", "type_identifier", "property_identifier"];

fn pick_name(node: &Node, code: &str) -> Option<String> {
    if let Some(n) = node.child_by_field_name("name") {
        return Some(text(code, n.byte_range()));
    }
    let mut w = node.walk();
    for ch in node.children(&mut w) {
        if NAME_CANDIDATES.contains(&ch.kind()) {
            return Some(text(code, ch.byte_range()));
        }
    }
    None
}

fn superclass_name(node: &Node, code: &str) -> Option<String> {
    for field in ["superclass", "superclasses", "interfaces"] {
        if let Some(n) = node.child_by_field_name(field) {
            let mut w = n.walk();
            for ch in n.children(&mut w) {
                if NAME_CANDIDATES.contains(&ch.kind()) {
                    return Some(text(code, ch.byte_range()));
                }
            }
        }
    }
    None
}

fn signature_line(node: &Node, code: &str) -> Option<String> {
    let full = text(code, node.byte_range());
    full.lines().next().map(|l| l.trim().to_string())
}

fn doc_above(code: &str, node: &Node, profile: &LangProfile) -> Option<String> {
    let start_line = node.start_position().row;
    let lines: Vec<&str> = code.lines().collect();
    if start_line == 0 {
        return None;
    }
    let mut rows = Vec::new();
    let mut i = start_line - 1;
    loop {
        let trimmed = lines.get(i)?.trim_start();
        if profile.doc_comment_prefixes.iter().any(|p| trimmed.starts_with(p)) {
            rows.push(trimmed.to_string());
        } else if trimmed.is_empty() {
            // allow a single blank line
        } else {
            break;
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }
    if rows.is_empty() {
        None
    } else {
        rows.reverse();
        Some(rows.join("\n"))
    }
}

fn module_doc(code: &str, profile: &LangProfile) -> Option<String> {
    let mut rows = Vec::new();
    for line in code.lines() {
        let trimmed = line.trim_start();
        if profile.doc_comment_prefixes.iter().any(|p| trimmed.starts_with(p)) {
            rows.push(trimmed.to_string());
        } else if trimmed.is_empty() && rows.is_empty() {
            continue;
        } else {
            break;
        }
    }
    if rows.is_empty() {
        None
    } else {
        Some(rows.join("\n"))
    }
}

fn variable_names(node: &Node, code: &str) -> Vec<String> {
    let mut names = Vec::new();
    for field in ["left", "name"] {
        if let Some(n) = node.child_by_field_name(field) {
            if NAME_CANDIDATES.contains(&n.kind()) {
                names.push(text(code, n.byte_range()));
            }
        }
    }
    if names.is_empty() {
        let mut w = node.walk();
        for ch in node.children(&mut w) {
            if NAME_CANDIDATES.contains(&ch.kind()) {
                names.push(text(code, ch.byte_range()));
            }
        }
    }
    let mut seen = HashSet::new();
    names.retain(|n| seen.insert(n.clone()));
    names
}

fn import_targets(node: &Node, code: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut w = node.walk();
    for ch in node.children(&mut w) {
        match ch.kind() {
            "string" | "string_literal" => {
                let raw = text(code, ch.byte_range());
                out.push(raw.trim_matches(['"', '\'']).to_string());
            }
            "dotted_name" | "scoped_identifier" | "identifier" => {
                out.push(text(code, ch.byte_range()));
            }
            _ => {}
        }
    }
    out
}

fn call_targets(func_node: &Node, code: &str, profile: &LangProfile) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack = vec![*func_node];
    while let Some(node) = stack.pop() {
        if profile.call_kinds.contains(&node.kind()) {
            if let Some(callee) = node.child_by_field_name("function").or_else(|| node.child_by_field_name("name")) {
                let callee_text = text(code, callee.byte_range());
                let short_name = callee_text.rsplit('.').next().unwrap_or(&callee_text).to_string();
                out.push(short_name);
            }
        }
        let mut w = node.walk();
        for ch in node.children(&mut w) {
            stack.push(ch);
        }
    }
    let mut seen = HashSet::new();
    out.retain(|n| seen.insert(n.clone()));
    out
}
