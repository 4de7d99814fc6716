use crate::oracle::{validate_score, ScoringOracle};
use crate::{InferenceError, Result};
use reviewlens_preprocessing::{TokenSequence, Vocabulary};
use serde::{Deserialize, Serialize};

/// One token's leave-one-out contribution.
///
/// `delta` is base score minus the score with this token removed, so a
/// positive delta means the token pushed the prediction toward positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionEntry {
    pub token: String,
    pub position: usize,
    pub delta: f64,
    #[serde(skip)]
    pub rank: usize,
}

/// Full attribution result: the unperturbed score plus one entry per
/// token in the model's window, sorted by influence.
#[derive(Debug, Clone)]
pub struct AttributionOutcome {
    pub base_score: f64,
    pub entries: Vec<AttributionEntry>,
}

/// Score the full input, then re-score it once per token with that token
/// removed. Perturbations are built from the truncated window, so removing
/// a token never pulls a previously-truncated token into view.
///
/// Issues exactly `1 + min(tokens.len(), maxlen)` oracle calls.
pub fn attribute(
    tokens: &[String],
    vocabulary: &Vocabulary,
    maxlen: usize,
    oracle: &dyn ScoringOracle,
) -> Result<AttributionOutcome> {
    if maxlen == 0 {
        return Err(InferenceError::Config(
            "maxlen must be at least 1".to_string(),
        ));
    }

    let window = &tokens[..tokens.len().min(maxlen)];

    let base_sequence = TokenSequence::encode(window, vocabulary, maxlen)?;
    let base_score = validate_score(oracle.score(&base_sequence)?)?;

    tracing::debug!(
        "Base score {:.6} over a {}-token window, attributing each token",
        base_score,
        window.len()
    );

    let mut entries = Vec::with_capacity(window.len());
    for position in 0..window.len() {
        let mut perturbed: Vec<String> = window.to_vec();
        perturbed.remove(position);

        let sequence = TokenSequence::encode(&perturbed, vocabulary, maxlen)?;
        let without = validate_score(oracle.score(&sequence)?)?;

        entries.push(AttributionEntry {
            token: window[position].clone(),
            position,
            delta: base_score - without,
            rank: 0,
        });
    }

    entries.sort_by(|a, b| {
        b.delta
            .abs()
            .total_cmp(&a.delta.abs())
            .then(a.position.cmp(&b.position))
    });
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index + 1;
    }

    Ok(AttributionOutcome { base_score, entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_vocabulary() -> Vocabulary {
        let words = HashMap::from([
            ("good".to_string(), 5),
            ("bad".to_string(), 6),
            ("movie".to_string(), 7),
        ]);
        Vocabulary::new(words, 1, 0).unwrap()
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_presence_oracle_attribution() {
        let vocabulary = test_vocabulary();
        let oracle = |sequence: &TokenSequence| {
            if sequence.ids().contains(&5) {
                Ok(0.9)
            } else {
                Ok(0.1)
            }
        };

        let outcome = attribute(&tokens(&["good", "movie"]), &vocabulary, 4, &oracle).unwrap();
        assert_eq!(outcome.base_score, 0.9);
        assert_eq!(outcome.entries.len(), 2);

        let top = &outcome.entries[0];
        assert_eq!(top.token, "good");
        assert_eq!(top.position, 0);
        assert_eq!(top.rank, 1);
        assert!((top.delta - 0.8).abs() < 1e-12);

        let other = &outcome.entries[1];
        assert_eq!(other.token, "movie");
        assert_eq!(other.delta, 0.0);
        assert_eq!(other.rank, 2);
    }

    #[test]
    fn test_ties_break_by_position() {
        let vocabulary = test_vocabulary();
        let oracle = |_sequence: &TokenSequence| Ok(0.5);

        let outcome =
            attribute(&tokens(&["good", "bad", "movie"]), &vocabulary, 8, &oracle).unwrap();

        let positions: Vec<usize> = outcome.entries.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![0, 1, 2], "Equal deltas should rank earliest-first");
        let ranks: Vec<usize> = outcome.entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_oracle_call_count_is_bounded() {
        let vocabulary = test_vocabulary();
        let calls = AtomicUsize::new(0);
        let oracle = |_sequence: &TokenSequence| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(0.5)
        };

        let input = tokens(&["good", "bad", "movie", "good", "bad"]);
        let outcome = attribute(&input, &vocabulary, 3, &oracle).unwrap();

        assert_eq!(outcome.entries.len(), 3, "One entry per window token");
        assert_eq!(calls.load(Ordering::SeqCst), 4, "Expected 1 base call + 3 perturbations");
    }

    #[test]
    fn test_truncated_tokens_never_enter_the_window() {
        let vocabulary = test_vocabulary();
        // Sensitive to "bad" (index 6), which sits just past the window.
        let oracle = |sequence: &TokenSequence| {
            if sequence.ids().contains(&6) {
                Ok(0.9)
            } else {
                Ok(0.1)
            }
        };

        let input = tokens(&["good", "movie", "good", "bad"]);
        let outcome = attribute(&input, &vocabulary, 3, &oracle).unwrap();

        assert_eq!(outcome.base_score, 0.1);
        for entry in &outcome.entries {
            assert_eq!(
                entry.delta, 0.0,
                "Removing '{}' must not slide the truncated token into view",
                entry.token
            );
        }
    }

    #[test]
    fn test_empty_input_yields_no_entries() {
        let vocabulary = test_vocabulary();
        let calls = AtomicUsize::new(0);
        let oracle = |_sequence: &TokenSequence| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(0.3)
        };

        let outcome = attribute(&[], &vocabulary, 4, &oracle).unwrap();
        assert_eq!(outcome.base_score, 0.3);
        assert!(outcome.entries.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1, "Only the base score call should happen");
    }

    #[test]
    fn test_zero_maxlen_rejected() {
        let vocabulary = test_vocabulary();
        let oracle = |_sequence: &TokenSequence| Ok(0.5);

        let result = attribute(&tokens(&["good"]), &vocabulary, 0, &oracle);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_oracle_score_propagates() {
        let vocabulary = test_vocabulary();
        let oracle = |_sequence: &TokenSequence| Ok(1.5);

        let result = attribute(&tokens(&["good"]), &vocabulary, 2, &oracle);
        assert!(result.is_err(), "Out-of-range oracle scores should be rejected");
    }
}
