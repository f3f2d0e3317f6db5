use super::common::{walk_decls, LangProfile};
use super::{FrontendOutput, ParserFrontend};
use crate::language::LanguageKind;
use tree_sitter::Parser;

const PROFILE: LangProfile = LangProfile {
    language: LanguageKind::Python,
    class_kinds: &["class_definition"],
    function_kinds: &["function_definition"],
    import_kinds: &["import_statement", "import_from_statement"],
    call_kinds: &["call"],
    variable_kinds: &["assignment"],
    doc_comment_prefixes: &["#"],
};

pub struct PythonFrontend;

impl ParserFrontend for PythonFrontend {
    fn language(&self) -> LanguageKind {
        LanguageKind::Python
    }

    fn parse(&self, file: &str, content: &str) -> FrontendOutput {
        let mut parser = Parser::new();
        let mut out = FrontendOutput::default();
        if parser.set_language(&tree_sitter_python::LANGUAGE.into()).is_err() {
            out.parse_errors.push(format!("{file}: failed to initialize python grammar"));
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
