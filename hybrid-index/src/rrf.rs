//! Reciprocal Rank Fusion (spec §4.9): `score = Σ 1/(k + rank)` across
//! every ranked list a chunk appears in, generalized from
//! `contextor::select::mmr_select`'s candidate-ranking shape into a
//! rank-based (rather than vector-distance-based) combiner.

pub const DEFAULT_RRF_K: u32 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct FusedHit {
    pub chunk_id: String,
    pub fused_score: f32,
    pub rerank_score: Option<f32>,
}

/// Fuses any number of ranked (best-first) chunk-id lists into one
/// ranked list. A chunk absent from a list contributes nothing from it.
pub fn reciprocal_rank_fusion(lists: &[Vec<String>], k: u32) -> Vec<FusedHit> {
    use std::collections::HashMap;

    let mut scores: HashMap<String, f32> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for list in lists {
        for (rank, chunk_id) in list.iter().enumerate() {
            let contribution = 1.0 / (k as f32 + rank as f32 + 1.0);
            if !scores.contains_key(chunk_id) {
                order.push(chunk_id.clone());
            }
            *scores.entry(chunk_id.clone()).or_insert(0.0) += contribution;
        }
    }

    let mut hits: Vec<FusedHit> = order
        .into_iter()
        .map(|chunk_id| {
            let fused_score = scores[&chunk_id];
            FusedHit { chunk_id, fused_score, rerank_score: None }
        })
        .collect();
    hits.sort_by(|a, b| b.fused_score.partial_cmp(&a.fused_score).unwrap_or(std::cmp::Ordering::Equal));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appearing_in_both_lists_outranks_single_list() {
        let lexical = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let dense = vec!["b".to_string(), "a".to_string(), "d".to_string()];
        let fused = reciprocal_rank_fusion(&[lexical, dense], DEFAULT_RRF_K);
        assert!(fused[0].chunk_id == "a" || fused[0].chunk_id == "b");
        assert!(fused.iter().find(|h| h.chunk_id == "a").unwrap().fused_score > fused.iter().find(|h| h.chunk_id == "c").unwrap().fused_score);
    }

    #[test]
    fn empty_lists_produce_no_hits() {
        let fused = reciprocal_rank_fusion(&[], DEFAULT_RRF_K);
        assert!(fused.is_empty());
    }
}
