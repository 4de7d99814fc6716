// Sentiment Scoring and Attribution Library

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod attribution;
pub mod error;
pub mod model;
pub mod oracle;
pub mod pipeline;
pub mod report;

pub use attribution::{attribute, AttributionEntry, AttributionOutcome};
pub use error::{InferenceError, Result};
pub use model::OnnxSentimentModel;
pub use oracle::ScoringOracle;
pub use pipeline::SentimentExplainer;
pub use report::{classify, InferenceReport, ReportDocument, SentimentLabel};

use serde::Deserialize;

/// Knobs for the explanation pipeline. Defaults mirror the trained
/// classifier: sequences of 500 tokens, decision boundary at 0.5.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplainerConfig {
    pub maxlen: usize,
    pub threshold: f64,
    pub top_attributions: usize,
    pub displayed_tokens: usize,
    pub max_text_length: usize,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            maxlen: 500,
            threshold: 0.5,
            top_attributions: 20,
            displayed_tokens: 60,
            max_text_length: 20_000,
        }
    }
}

impl ExplainerConfig {
    pub fn from_env_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(maxlen) = std::env::var("REVIEWLENS_MAXLEN") {
            if let Ok(value) = maxlen.parse() {
                config.maxlen = value;
            }
        }
        if let Ok(threshold) = std::env::var("REVIEWLENS_THRESHOLD") {
            if let Ok(value) = threshold.parse() {
                config.threshold = value;
            }
        }
        if let Ok(top) = std::env::var("REVIEWLENS_TOP_ATTRIBUTIONS") {
            if let Ok(value) = top.parse() {
                config.top_attributions = value;
            }
        }
        if let Ok(displayed) = std::env::var("REVIEWLENS_DISPLAYED_TOKENS") {
            if let Ok(value) = displayed.parse() {
                config.displayed_tokens = value;
            }
        }
        if let Ok(max_len) = std::env::var("REVIEWLENS_MAX_TEXT_LENGTH") {
            if let Ok(value) = max_len.parse() {
                config.max_text_length = value;
            }
        }

        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.maxlen == 0 {
            return Err(InferenceError::Config(
                "maxlen must be at least 1".to_string(),
            ));
        }
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(InferenceError::Config(format!(
                "threshold must be a finite value in [0, 1], got {}",
                self.threshold
            )));
        }
        if self.max_text_length == 0 {
            return Err(InferenceError::Config(
                "max_text_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExplainerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.maxlen, 500);
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.top_attributions, 20);
    }

    #[test]
    fn test_validate_rejects_zero_maxlen() {
        let config = ExplainerConfig {
            maxlen: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        for threshold in [-0.1, 1.1, f64::NAN, f64::INFINITY] {
            let config = ExplainerConfig {
                threshold,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "threshold {} should be rejected", threshold);
        }
    }

    #[test]
    fn test_validate_rejects_zero_max_text_length() {
        let config = ExplainerConfig {
            max_text_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
