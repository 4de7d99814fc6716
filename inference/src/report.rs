use crate::attribution::AttributionEntry;
use crate::{ExplainerConfig, InferenceError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "Positive"),
            SentimentLabel::Negative => write!(f, "Negative"),
        }
    }
}

/// Map a probability to a label. The boundary is inclusive: a score
/// exactly at the threshold counts as positive.
pub fn classify(base_score: f64, threshold: f64) -> SentimentLabel {
    if base_score >= threshold {
        SentimentLabel::Positive
    } else {
        SentimentLabel::Negative
    }
}

/// Everything the pipeline learned about one input, ready for display
/// or serialization.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceReport {
    pub input_text: String,
    pub base_score: f64,
    pub sentiment_label: SentimentLabel,
    pub threshold_used: f64,
    pub maxlen_used: usize,
    pub token_count: usize,
    pub displayed_tokens: Vec<String>,
    pub top_attributions: Vec<AttributionEntry>,
}

/// Compact interchange form of a report. Field order is the wire order;
/// downstream consumers rely on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub input: String,
    pub prediction: f64,
    pub sentiment: SentimentLabel,
    pub top_token_importances: Vec<AttributionEntry>,
    pub maxlen_used: usize,
    pub threshold: f64,
}

impl InferenceReport {
    /// Combine the attribution outcome with the decision and diagnostics.
    /// `entries` must already be sorted by rank; only the configured top
    /// slice is kept.
    pub fn assemble(
        input_text: &str,
        base_score: f64,
        entries: Vec<AttributionEntry>,
        config: &ExplainerConfig,
        original_tokens: &[String],
    ) -> Result<Self> {
        if !config.threshold.is_finite() || !(0.0..=1.0).contains(&config.threshold) {
            return Err(InferenceError::Config(format!(
                "threshold must be a finite value in [0, 1], got {}",
                config.threshold
            )));
        }

        let sentiment_label = classify(base_score, config.threshold);

        let displayed_tokens: Vec<String> = original_tokens
            .iter()
            .take(config.displayed_tokens)
            .cloned()
            .collect();

        let mut top_attributions = entries;
        top_attributions.truncate(config.top_attributions);

        Ok(Self {
            input_text: input_text.to_string(),
            base_score,
            sentiment_label,
            threshold_used: config.threshold,
            maxlen_used: config.maxlen,
            token_count: original_tokens.len(),
            displayed_tokens,
            top_attributions,
        })
    }

    pub fn to_document(&self) -> ReportDocument {
        ReportDocument {
            input: self.input_text.clone(),
            prediction: self.base_score,
            sentiment: self.sentiment_label,
            top_token_importances: self.top_attributions.clone(),
            maxlen_used: self.maxlen_used,
            threshold: self.threshold_used,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }
}
