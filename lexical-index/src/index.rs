//! Hand-rolled BM25 lexical index (spec §4.8). Persisted postings carry
//! everything scoring needs — term document frequencies, per-document
//! lengths, and the corpus average — so a reload never has to re-read
//! source text to answer a query.

use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const K1: f32 = 1.2;
const B: f32 = 0.75;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexicalIndex {
    /// term -> (chunk_id -> term frequency in that chunk)
    postings: HashMap<String, HashMap<String, u32>>,
    doc_len: HashMap<String, u32>,
    total_len: u64,
}

impl LexicalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc_count(&self) -> usize {
        self.doc_len.len()
    }

    fn avg_doc_len(&self) -> f32 {
        if self.doc_len.is_empty() {
            0.0
        } else {
            self.total_len as f32 / self.doc_len.len() as f32
        }
    }

    /// Indexes (or re-indexes) `chunk_id`'s text, first removing any
    /// previous entry for it so repeated calls stay idempotent.
    pub fn add(&mut self, chunk_id: &str, text: &str) {
        self.remove(chunk_id);

        let tokens = tokenize(text);
        self.total_len += tokens.len() as u64;
        self.doc_len.insert(chunk_id.to_string(), tokens.len() as u32);

        let mut tf: HashMap<String, u32> = HashMap::new();
        for t in tokens {
            *tf.entry(t).or_insert(0) += 1;
        }
        for (term, count) in tf {
            self.postings.entry(term).or_default().insert(chunk_id.to_string(), count);
        }
    }

    pub fn remove(&mut self, chunk_id: &str) -> bool {
        if let Some(len) = self.doc_len.remove(chunk_id) {
            self.total_len = self.total_len.saturating_sub(len as u64);
            for postings in self.postings.values_mut() {
                postings.remove(chunk_id);
            }
            self.postings.retain(|_, postings| !postings.is_empty());
            true
        } else {
            false
        }
    }

    /// Scores every chunk containing at least one query term and returns
    /// the top `k`, highest score first.
    pub fn search(&self, query: &str, k: usize) -> Vec<(String, f32)> {
        let n = self.doc_len.len() as f32;
        if n == 0.0 {
            return Vec::new();
        }
        let avgdl = self.avg_doc_len();

        let mut query_terms: Vec<String> = tokenize(query);
        query_terms.sort();
        query_terms.dedup();

        let mut scores: HashMap<String, f32> = HashMap::new();
        for term in &query_terms {
            let Some(postings) = self.postings.get(term) else { continue };
            let df = postings.len() as f32;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
            for (chunk_id, &tf) in postings {
                let dl = *self.doc_len.get(chunk_id).unwrap_or(&0) as f32;
                let tf = tf as f32;
                let denom = tf + K1 * (1.0 - B + B * dl / avgdl.max(1.0));
                let contribution = idf * (tf * (K1 + 1.0)) / denom.max(f32::EPSILON);
                *scores.entry(chunk_id.clone()).or_insert(0.0) += contribution;
            }
        }

        let mut ranked: Vec<(String, f32)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_term_match_outranks_unrelated_doc() {
        let mut idx = LexicalIndex::new();
        idx.add("a", "def get_user_name(): return user.name");
        idx.add("b", "def compute_checksum(data): return crc32(data)");
        let hits = idx.search("user name", 5);
        assert_eq!(hits[0].0, "a");
    }

    #[test]
    fn removed_doc_is_not_returned() {
        let mut idx = LexicalIndex::new();
        idx.add("a", "user profile loader");
        idx.remove("a");
        assert!(idx.search("user", 5).is_empty());
    }

    #[test]
    fn reindexing_same_chunk_id_replaces_not_duplicates() {
        let mut idx = LexicalIndex::new();
        idx.add("a", "alpha beta");
        idx.add("a", "gamma delta");
        assert_eq!(idx.doc_count(), 1);
        assert!(idx.search("alpha", 5).is_empty());
        assert!(!idx.search("gamma", 5).is_empty());
    }
}
