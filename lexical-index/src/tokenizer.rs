//! Tokenizer with camelCase/snake_case subtoken splitting (spec §4.8),
//! in the teacher's hand-rolled-scoring idiom (`contextor::select::cosine`,
//! `codegraph-prep::model::neighbors`) rather than pulling in a full NLP
//! tokenization crate for what is fundamentally splitting identifiers.

/// Splits `text` into lowercase tokens. Each identifier-like run is kept
/// whole AND exploded into its camelCase/snake_case/kebab-case parts, so a
/// query for `user` matches a chunk containing `getUserName` as well as
/// one containing `get_user_name`.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for raw in split_words(text) {
        let lower = raw.to_lowercase();
        if lower.len() > 1 {
            out.push(lower);
        }
        for sub in subtokens(&raw) {
            let sub_lower = sub.to_lowercase();
            if sub_lower.len() > 1 {
                out.push(sub_lower);
            }
        }
    }
    out
}

fn split_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

/// Splits `word` on `_`/`-` and on camelCase boundaries (lower→upper and
/// upper→upper-then-lower, e.g. `HTTPServer` -> `HTTP`, `Server`).
fn subtokens(word: &str) -> Vec<String> {
    let mut parts = Vec::new();
    for piece in word.split(['_', '-']) {
        if piece.is_empty() {
            continue;
        }
        parts.extend(split_camel(piece));
    }
    parts.retain(|p| !p.is_empty());
    parts
}

fn split_camel(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 1 {
        return vec![s.to_string()];
    }
    let mut parts = Vec::new();
    let mut start = 0;
    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let cur = chars[i];
        let boundary = (prev.is_lowercase() && cur.is_uppercase())
            || (prev.is_alphabetic() && cur.is_numeric())
            || (prev.is_numeric() && cur.is_alphabetic())
            || (i + 1 < chars.len() && prev.is_uppercase() && cur.is_uppercase() && chars[i + 1].is_lowercase());
        if boundary {
            parts.push(chars[start..i].iter().collect::<String>());
            start = i;
        }
    }
    parts.push(chars[start..].iter().collect::<String>());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_snake_case() {
        let toks = tokenize("get_user_name");
        assert!(toks.contains(&"user".to_string()));
        assert!(toks.contains(&"name".to_string()));
        assert!(toks.contains(&"get_user_name".to_string()));
    }

    #[test]
    fn splits_camel_case() {
        let toks = tokenize("getUserName");
        assert!(toks.contains(&"user".to_string()));
        assert!(toks.contains(&"name".to_string()));
    }

    #[test]
    fn splits_acronym_boundary() {
        let parts = split_camel("HTTPServer");
        assert_eq!(parts, vec!["HTTP".to_string(), "Server".to_string()]);
    }
}
