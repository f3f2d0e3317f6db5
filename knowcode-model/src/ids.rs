//! Stable identifiers and content hashing utilities.
//!
//! - UUID v5 (namespace/name-based) gives us deterministic ids so that
//!   re-analyzing an unchanged tree reproduces the same entity/chunk ids.
//! - FNV-1a 64-bit content hash is dependency-free and good enough for
//!   change detection (not for collision resistance).

use uuid::Uuid;

#[inline]
pub fn uuid_v5_from_key(key: &str) -> String {
    Uuid::new_v5(&Uuid::nil(), key.as_bytes()).to_string()
}

/// Stable entity id: kind + normalized repo-relative path + qualified name.
pub fn entity_id(kind: &str, file: &str, qualified_name: &str) -> String {
    let key = format!("entity|{}|{}|{}", kind, file, qualified_name);
    uuid_v5_from_key(&key)
}

/// Stable chunk id: a pure function of (file path, chunk kind, qualified-name-or-span).
pub fn chunk_id(file: &str, kind: &str, disambiguator: &str) -> String {
    let key = format!("chunk|{}|{}|{}", file, kind, disambiguator);
    uuid_v5_from_key(&key)
}

/// FNV-1a 64-bit content hash as a lowercase hex string.
pub fn hash_content(bytes: &[u8]) -> String {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("{:016x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_is_deterministic() {
        let a = entity_id("function", "src/lib.rs", "crate::foo");
        let b = entity_id("function", "src/lib.rs", "crate::foo");
        assert_eq!(a, b);
    }

    #[test]
    fn entity_id_distinguishes_kind() {
        let a = entity_id("function", "src/lib.rs", "crate::foo");
        let b = entity_id("class", "src/lib.rs", "crate::foo");
        assert_ne!(a, b);
    }

    #[test]
    fn hash_content_is_stable() {
        assert_eq!(hash_content(b"hello"), hash_content(b"hello"));
        assert_ne!(hash_content(b"hello"), hash_content(b"hellp"));
    }
}
