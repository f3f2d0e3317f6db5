//! Quantitative sufficiency score (spec §4.11), exposed as named weight
//! constants per the spec's explicit calibration requirement.

pub const SUFFICIENCY_W1_RETRIEVAL: f32 = 0.5;
pub const SUFFICIENCY_W2_COVERAGE: f32 = 0.3;
pub const SUFFICIENCY_W3_BUDGET_FILL: f32 = 0.2;
pub const SUFFICIENCY_W4_TRUNCATION: f32 = 0.6;

pub struct SufficiencyInputs {
    pub retrieval_score_mean: f32,
    pub entity_coverage: f32,
    pub budget_fill: f32,
    pub truncation_penalty: f32,
}

pub fn sufficiency_score(inputs: &SufficiencyInputs) -> f32 {
    let raw = SUFFICIENCY_W1_RETRIEVAL * inputs.retrieval_score_mean
        + SUFFICIENCY_W2_COVERAGE * inputs.entity_coverage
        + SUFFICIENCY_W3_BUDGET_FILL * inputs.budget_fill
        - SUFFICIENCY_W4_TRUNCATION * inputs.truncation_penalty;
    raw.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_match_within_budget_scores_high() {
        let s = sufficiency_score(&SufficiencyInputs {
            retrieval_score_mean: 1.0,
            entity_coverage: 1.0,
            budget_fill: 0.5,
            truncation_penalty: 0.0,
        });
        assert!(s >= 0.88, "expected >= 0.88, got {s}");
    }

    #[test]
    fn weak_retrieval_and_heavy_truncation_scores_low() {
        let s = sufficiency_score(&SufficiencyInputs {
            retrieval_score_mean: 0.3,
            entity_coverage: 0.3,
            budget_fill: 1.0,
            truncation_penalty: 0.8,
        });
        assert!(s < 0.5, "expected < 0.5, got {s}");
    }
}
