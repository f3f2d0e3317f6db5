use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageKind {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Markdown,
    Yaml,
}

impl fmt::Display for LanguageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LanguageKind::Python => "python",
            LanguageKind::JavaScript => "javascript",
            LanguageKind::TypeScript => "typescript",
            LanguageKind::Java => "java",
            LanguageKind::Markdown => "markdown",
            LanguageKind::Yaml => "yaml",
        };
        f.write_str(s)
    }
}

impl LanguageKind {
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        Some(match ext.as_str() {
            "py" | "pyi" => LanguageKind::Python,
            "js" | "jsx" | "mjs" | "cjs" => LanguageKind::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => LanguageKind::TypeScript,
            "java" => LanguageKind::Java,
            "md" | "markdown" => LanguageKind::Markdown,
            "yaml" | "yml" => LanguageKind::Yaml,
            _ => return None,
        })
    }
}
