use crate::{InferenceError, Result};
use reviewlens_preprocessing::TokenSequence;

/// Source of sentiment probabilities for encoded sequences.
///
/// Implementations must be safe to share across threads; the attribution
/// engine issues many calls against a single oracle.
pub trait ScoringOracle: Send + Sync {
    /// Probability of positive sentiment for the sequence, in [0, 1].
    fn score(&self, sequence: &TokenSequence) -> Result<f64>;
}

impl<F> ScoringOracle for F
where
    F: Fn(&TokenSequence) -> Result<f64> + Send + Sync,
{
    fn score(&self, sequence: &TokenSequence) -> Result<f64> {
        self(sequence)
    }
}

/// Reject scores the downstream decision logic cannot handle.
pub(crate) fn validate_score(score: f64) -> Result<f64> {
    if !score.is_finite() {
        return Err(InferenceError::Oracle(format!(
            "oracle returned a non-finite score: {}",
            score
        )));
    }
    if !(0.0..=1.0).contains(&score) {
        return Err(InferenceError::Oracle(format!(
            "oracle returned a score outside [0, 1]: {}",
            score
        )));
    }
    Ok(score)
}
