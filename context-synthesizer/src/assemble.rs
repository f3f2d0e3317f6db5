use crate::budget::{estimate_tokens, fit_to_budget, Fit};
use crate::classify::classify;
use crate::error::ContextError;
use crate::priorities::section_priority;
use crate::sufficiency::{sufficiency_score, SufficiencyInputs};
use knowcode_model::{ContextBundle, Evidence, Section, SectionKind, TaskType};
use std::collections::HashMap;

pub struct EntityContextInput {
    pub entity_id: String,
    pub sections: HashMap<SectionKind, String>,
}

pub struct SynthesizeInput {
    pub query: String,
    pub entities: Vec<EntityContextInput>,
    pub evidence: Vec<Evidence>,
    pub max_tokens: usize,
    pub task_type: Option<TaskType>,
    pub retrieval_mode: knowcode_model::RetrievalMode,
}

pub fn synthesize(input: SynthesizeInput) -> Result<ContextBundle, ContextError> {
    if input.entities.is_empty() {
        return Err(ContextError::NoEntities);
    }

    let task_type = match input.task_type {
        Some(TaskType::Auto) | None => classify(&input.query),
        Some(t) => t,
    };
    let priorities = section_priority(task_type);

    let mut remaining = input.max_tokens;
    let mut sections: Vec<Section> = Vec::new();
    let mut total_sections = 0usize;
    let mut truncated_sections = 0usize;
    let mut entities_with_content: std::collections::HashSet<String> = std::collections::HashSet::new();

    'outer: for entity in &input.entities {
        for kind in priorities {
            let Some(text) = entity.sections.get(kind) else { continue };
            if text.trim().is_empty() {
                continue;
            }
            total_sections += 1;
            match fit_to_budget(text, remaining) {
                Fit::Whole(t) => {
                    remaining = remaining.saturating_sub(estimate_tokens(&t));
                    entities_with_content.insert(entity.entity_id.clone());
                    sections.push(Section { kind: *kind, text: t, truncated: false });
                }
                Fit::Truncated(t) => {
                    remaining = remaining.saturating_sub(estimate_tokens(&t));
                    truncated_sections += 1;
                    entities_with_content.insert(entity.entity_id.clone());
                    sections.push(Section { kind: *kind, text: t, truncated: true });
                }
                Fit::TooSmallToKeep => {}
            }
            if remaining == 0 {
                break 'outer;
            }
        }
    }

    let used_tokens = input.max_tokens.saturating_sub(remaining);
    let budget_fill = if input.max_tokens == 0 { 0.0 } else { used_tokens as f32 / input.max_tokens as f32 };
    let truncation_penalty = if total_sections == 0 { 0.0 } else { truncated_sections as f32 / total_sections as f32 };
    let retrieval_score_mean = if input.evidence.is_empty() {
        0.0
    } else {
        input.evidence.iter().map(|e| e.score).sum::<f32>() / input.evidence.len() as f32
    };
    let entity_coverage = entities_with_content.len() as f32 / input.entities.len() as f32;

    let sufficiency = sufficiency_score(&SufficiencyInputs {
        retrieval_score_mean,
        entity_coverage,
        budget_fill,
        truncation_penalty,
    });

    let context_text = sections
        .iter()
        .map(|s| format!("## {}\n{}", s.kind_label(), s.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(ContextBundle {
        sections,
        total_tokens: used_tokens,
        evidence: input.evidence,
        task_type,
        retrieval_mode: input.retrieval_mode,
        sufficiency_score: sufficiency,
        selected_entities: input.entities.iter().map(|e| e.entity_id.clone()).collect(),
        context_text,
    })
}

trait SectionLabel {
    fn kind_label(&self) -> &'static str;
}

impl SectionLabel for Section {
    fn kind_label(&self) -> &'static str {
        match self.kind {
            SectionKind::Header => "header",
            SectionKind::Signature => "signature",
            SectionKind::Docstring => "docstring",
            SectionKind::Source => "source",
            SectionKind::Callers => "callers",
            SectionKind::Callees => "callees",
            SectionKind::Inherits => "inherits",
            SectionKind::Imports => "imports",
            SectionKind::RecentChanges => "recent_changes",
            SectionKind::Impact => "impact",
            SectionKind::EvidenceList => "evidence",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knowcode_model::RetrievalMode;

    fn entity_with(sections: &[(SectionKind, &str)]) -> EntityContextInput {
        EntityContextInput {
            entity_id: "e1".into(),
            sections: sections.iter().map(|(k, v)| (*k, v.to_string())).collect(),
        }
    }

    #[test]
    fn assembles_sections_in_priority_order_for_general() {
        let entity = entity_with(&[
            (SectionKind::Source, "fn foo() {}"),
            (SectionKind::Signature, "fn foo()"),
            (SectionKind::Docstring, "does foo things"),
        ]);
        let bundle = synthesize(SynthesizeInput {
            query: "what does foo do".into(),
            entities: vec![entity],
            evidence: vec![],
            max_tokens: 1000,
            task_type: Some(TaskType::General),
            retrieval_mode: RetrievalMode::Hybrid,
        })
        .unwrap();
        assert_eq!(bundle.sections[0].kind, SectionKind::Signature);
        assert_eq!(bundle.sections[1].kind, SectionKind::Docstring);
        assert_eq!(bundle.sections[2].kind, SectionKind::Source);
    }

    #[test]
    fn tiny_budget_drops_low_value_sections() {
        let entity = entity_with(&[(SectionKind::Source, &"x = 1\n".repeat(1000))]);
        let bundle = synthesize(SynthesizeInput {
            query: "q".into(),
            entities: vec![entity],
            evidence: vec![],
            max_tokens: 1,
            task_type: Some(TaskType::Debug),
            retrieval_mode: RetrievalMode::Hybrid,
        })
        .unwrap();
        assert!(bundle.sections.is_empty());
        assert!(bundle.sufficiency_score < 0.5);
    }
}
