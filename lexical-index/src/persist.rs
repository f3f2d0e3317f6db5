use crate::error::LexicalError;
use crate::index::LexicalIndex;
use std::fs;
use std::path::Path;

pub fn save(index: &LexicalIndex, path: &Path) -> Result<(), LexicalError> {
    let json = serde_json::to_vec(index)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load(path: &Path) -> Result<LexicalIndex, LexicalError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_scoring() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexical.json");
        let mut idx = LexicalIndex::new();
        idx.add("a", "user profile loader");
        save(&idx, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.search("user", 5), idx.search("user", 5));
    }
}
