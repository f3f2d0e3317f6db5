use super::common::{walk_decls, LangProfile};
use super::{FrontendOutput, ParserFrontend};
use crate::language::LanguageKind;
use tree_sitter::Parser;

const PROFILE: LangProfile = LangProfile {
    language: LanguageKind::JavaScript,
    class_kinds: &["class_declaration"],
    function_kinds: &["function_declaration", "method_definition"],
    import_kinds: &["import_statement"],
    call_kinds: &["call_expression"],
    variable_kinds: &["variable_declarator"],
    doc_comment_prefixes: &["//", "/**", "*"],
};

pub struct JsTsFrontend {
    language: LanguageKind,
}

impl JsTsFrontend {
    pub fn javascript() -> Self {
        Self { language: LanguageKind::JavaScript }
    }

    pub fn typescript() -> Self {
        Self { language: LanguageKind::TypeScript }
    }
}

impl ParserFrontend for JsTsFrontend {
    fn language(&self) -> LanguageKind {
        self.language
    }

    fn parse(&self, file: &str, content: &str) -> FrontendOutput {
        let mut parser = Parser::new();
        let mut out = FrontendOutput::default();
        let lang_result = match self.language {
            LanguageKind::TypeScript => parser.set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            _ => parser.set_language(&tree_sitter_javascript::LANGUAGE.into()),
        };
        if lang_result.is_err() {
            out.parse_errors.push(format!("{file}: failed to initialize {} grammar", self.language));
            return out;
        }
        let tree = match parser.parse(content, None) {
            Some(t) => t,
            None => {
                out.parse_errors.push(format!("{file}: tree-sitter returned no tree"));
                return out;
            }
        };
        let mut profile = PROFILE;
        profile.language = self.language;
        let (entities, relations) = walk_decls(&tree, content, file, &profile);
        out.entities = entities;
        out.local_relations = relations;
        out
    }
}
