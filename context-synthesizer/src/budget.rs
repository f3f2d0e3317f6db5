//! Token-budget truncation with a visible elision marker and a
//! minimum-useful-size drop rule (spec §4.11).

pub const ELISION_MARKER: &str = "\n… [truncated]\n";

/// A section shorter than this many estimated tokens is not worth
/// keeping truncated — it gets dropped entirely instead.
pub const MIN_USEFUL_TOKENS: usize = 8;

/// Cheap token estimate (no tokenizer dependency): ~4 chars/token, the
/// same rule of thumb the teacher's prompt-budgeting code assumes.
pub fn estimate_tokens(text: &str) -> usize {
    (text.chars().count() as f32 / 4.0).ceil() as usize
}

pub enum Fit {
    Whole(String),
    Truncated(String),
    TooSmallToKeep,
}

/// Fits `text` into `remaining_tokens`, truncating to a whole-line
/// prefix and appending [`ELISION_MARKER`] if it doesn't fit as-is.
pub fn fit_to_budget(text: &str, remaining_tokens: usize) -> Fit {
    let full_tokens = estimate_tokens(text);
    if full_tokens <= remaining_tokens {
        return Fit::Whole(text.to_string());
    }

    if remaining_tokens < MIN_USEFUL_TOKENS {
        return Fit::TooSmallToKeep;
    }

    let marker_tokens = estimate_tokens(ELISION_MARKER);
    let budget_for_body = remaining_tokens.saturating_sub(marker_tokens);
    let char_budget = budget_for_body * 4;

    let mut kept = String::new();
    for line in text.lines() {
        if kept.len() + line.len() + 1 > char_budget {
            break;
        }
        kept.push_str(line);
        kept.push('\n');
    }

    if estimate_tokens(&kept) < MIN_USEFUL_TOKENS {
        return Fit::TooSmallToKeep;
    }
    kept.push_str(ELISION_MARKER);
    Fit::Truncated(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_fits_whole() {
        match fit_to_budget("hello world", 100) {
            Fit::Whole(_) => {}
            _ => panic!("expected whole fit"),
        }
    }

    #[test]
    fn long_text_truncates_with_marker() {
        let text = "line one\n".repeat(1000);
        match fit_to_budget(&text, 20) {
            Fit::Truncated(t) => assert!(t.contains(ELISION_MARKER)),
            other => panic!("expected truncation, got a different fit: {}", matches!(other, Fit::Whole(_))),
        }
    }

    #[test]
    fn tiny_budget_drops_section() {
        let text = "line one\n".repeat(1000);
        match fit_to_budget(&text, 2) {
            Fit::TooSmallToKeep => {}
            _ => panic!("expected drop"),
        }
    }
}
