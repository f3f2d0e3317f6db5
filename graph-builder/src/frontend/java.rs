use super::common::{walk_decls, LangProfile};
use super::{FrontendOutput, ParserFrontend};
use crate::language::LanguageKind;
use tree_sitter::Parser;

const PROFILE: LangProfile = LangProfile {
    language: LanguageKind::Java,
    class_kinds: &["class_declaration", "interface_declaration", "enum_declaration"],
    function_kinds: &["method_declaration", "constructor_declaration"],
    import_kinds: &["import_declaration"],
    call_kinds: &["method_invocation"],
    variable_kinds: &["field_declaration"],
    doc_comment_prefixes: &["//", "/**", "*"],
};

pub struct JavaFrontend;

impl ParserFrontend for JavaFrontend {
    fn language(&self) -> LanguageKind {
        LanguageKind::Java
    }

    fn parse(&self, file: &str, content: &str) -> FrontendOutput {
        let mut parser = Parser::new();
        let mut out = FrontendOutput::default();
        if parser.set_language(&tree_sitter_java::LANGUAGE.into()).is_err() {
            out.parse_errors.push(format!("{file}: failed to initialize java grammar"));
            return out;
        }
        let tree = match parser.parse(content, None) {
            Some(t) => t,
            None => {
                out.parse_errors.push(format!("{file}: tree-sitter returned no tree"));
                return out;
            }
        };
        let (entities, relations) = walk_decls(&tree, content, file, &PROFILE);
        out.entities = entities;
        out.local_relations = relations;
        out
    }
}
