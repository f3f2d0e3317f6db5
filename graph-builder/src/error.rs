use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("root does not exist: {0}")]
    MissingRoot(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("io error reading {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("tree-sitter failed to set language for {0}")]
    LanguageSetup(String),
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("contains relation is not a forest at {0}")]
    NotAForest(String),
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}
