//! Lightweight keyword-based `task_type` classification for `auto`
//! (spec §4.11), in the spirit of `contextor`'s lightweight heuristics
//! rather than a learned classifier.

use knowcode_model::TaskType;

const EXPLAIN_WORDS: &[&str] = &["why", "how", "explain", "what does", "purpose"];
const DEBUG_WORDS: &[&str] = &["error", "bug", "fail", "failing", "trace", "crash", "exception", "panic"];
const EXTEND_WORDS: &[&str] = &["add", "extend", "implement", "support", "new feature"];
const REVIEW_WORDS: &[&str] = &["review", "audit", "risk", "impact", "safe to change"];
const LOCATE_WORDS: &[&str] = &["where is", "find", "locate", "which file"];

pub fn classify(query: &str) -> TaskType {
    let q = query.to_lowercase();
    if DEBUG_WORDS.iter().any(|w| q.contains(w)) {
        TaskType::Debug
    } else if REVIEW_WORDS.iter().any(|w| q.contains(w)) {
        TaskType::Review
    } else if LOCATE_WORDS.iter().any(|w| q.contains(w)) {
        TaskType::Locate
    } else if EXTEND_WORDS.iter().any(|w| q.contains(w)) {
        TaskType::Extend
    } else if EXPLAIN_WORDS.iter().any(|w| q.contains(w)) {
        TaskType::Explain
    } else {
        TaskType::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_debug_keywords() {
        assert_eq!(classify("why is this throwing an exception"), TaskType::Debug);
    }

    #[test]
    fn classifies_explain_keywords() {
        assert_eq!(classify("how does the scanner work"), TaskType::Explain);
    }

    #[test]
    fn defaults_to_general() {
        assert_eq!(classify("user authentication module"), TaskType::General);
    }
}
