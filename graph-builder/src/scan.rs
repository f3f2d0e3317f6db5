//! Enumerates candidate files under a root honoring a layered ignore policy
//! (spec §4.1): a built-in denylist of VCS/build directories, user glob
//! patterns, and in-tree `.gitignore` semantics. Produces a stable, sorted
//! list with detected language tags. A single unreadable file is reported
//! and skipped rather than aborting the scan.

use crate::error::ScanError;
use crate::language::LanguageKind;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub language: Option<LanguageKind>,
    pub size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub files: Vec<ScannedFile>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Extra user ignore patterns, layered on top of `.gitignore` and the
    /// built-in denylist.
    pub extra_ignore_globs: Vec<String>,
    pub max_file_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extra_ignore_globs: Vec::new(),
            max_file_bytes: 2 * 1024 * 1024,
        }
    }
}

const BUILTIN_DENYLIST: &[&str] = &[
    ".git", "node_modules", "target", "build", "dist", ".idea", ".vscode", "__pycache__", ".venv",
];

pub fn scan_repo(root: &Path, cfg: &ScanConfig) -> Result<ScanResult, ScanError> {
    if !root.exists() {
        return Err(ScanError::MissingRoot(root.display().to_string()));
    }

    let mut builder = WalkBuilder::new(root);
    builder.hidden(false).git_ignore(true).git_exclude(true).follow_links(false);
    builder.filter_entry(|entry| {
        entry
            .file_name()
            .to_str()
            .map(|name| !BUILTIN_DENYLIST.contains(&name))
            .unwrap_or(true)
    });

    let extra_matcher = build_globset(&cfg.extra_ignore_globs);

    let mut files = Vec::new();
    let mut errors = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                errors.push(err.to_string());
                continue;
            }
        };
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        let path = entry.path();

        if let Some(matcher) = &extra_matcher {
            if matcher.is_match(path) {
                debug!("scan: ignored by user glob: {}", path.display());
                continue;
            }
        }

        let meta = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(err) => {
                warn!("scan: metadata failed for {}: {}", path.display(), err);
                errors.push(format!("{}: {}", path.display(), err));
                continue;
            }
        };
        if meta.len() > cfg.max_file_bytes {
            debug!("scan: skip oversize {} ({} bytes)", path.display(), meta.len());
            continue;
        }

        files.push(ScannedFile {
            path: path.to_path_buf(),
            language: LanguageKind::from_extension(path),
            size: meta.len(),
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(ScanResult { files, errors })
}

fn build_globset(patterns: &[String]) -> Option<globset_min::GlobSet> {
    globset_min::GlobSet::build(patterns)
}

/// A minimal glob-set: the scanner's only remaining glob need is the
/// caller-supplied extra-ignore list, so a small self-contained matcher
/// avoids pulling in a second globbing crate alongside `ignore`.
mod globset_min {
    pub struct GlobSet {
        patterns: Vec<String>,
    }

    impl GlobSet {
        pub fn build(patterns: &[String]) -> Option<Self> {
            if patterns.is_empty() {
                return None;
            }
            Some(Self {
                patterns: patterns.to_vec(),
            })
        }

        pub fn is_match(&self, path: &std::path::Path) -> bool {
            let s = path.to_string_lossy();
            self.patterns.iter().any(|p| glob_match(p, &s))
        }
    }

    /// Treats `*` (including `**`) as a wildcard run of any characters;
    /// sufficient for the simple suffix/prefix patterns callers pass (e.g.
    /// `*.generated.py`, `**/vendor/**`). Segments between wildcards must
    /// appear in order.
    fn glob_match(pattern: &str, text: &str) -> bool {
        let segments: Vec<&str> = pattern.split('*').collect();
        if segments.len() == 1 {
            return pattern == text;
        }
        let mut pos = 0usize;
        for (i, seg) in segments.iter().enumerate() {
            if seg.is_empty() {
                continue;
            }
            if i == 0 {
                if !text.starts_with(seg) {
                    return false;
                }
                pos = seg.len();
            } else if i == segments.len() - 1 {
                return text[pos..].ends_with(seg);
            } else {
                match text[pos..].find(seg) {
                    Some(found) => pos += found + seg.len(),
                    None => return false,
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_and_sorts_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.py"), "x = 1").unwrap();
        std::fs::write(dir.path().join("a.py"), "y = 2").unwrap();
        let result = scan_repo(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(result.files.len(), 2);
        assert!(result.files[0].path < result.files[1].path);
    }

    #[test]
    fn skips_denylisted_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("node_modules")).unwrap();
        std::fs::write(dir.path().join("node_modules/vendor.js"), "x").unwrap();
        std::fs::write(dir.path().join("app.js"), "x").unwrap();
        let result = scan_repo(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn missing_root_errors() {
        let result = scan_repo(Path::new("/does/not/exist"), &ScanConfig::default());
        assert!(result.is_err());
    }
}
