use crate::attribution;
use crate::oracle::ScoringOracle;
use crate::report::InferenceReport;
use crate::{ExplainerConfig, InferenceError, Result};
use reviewlens_preprocessing::{TextTokenizer, Vocabulary};
use std::sync::Arc;

/// End-to-end explanation pipeline: normalize, score, attribute, assemble.
///
/// Holds the tokenizer and the shared vocabulary; the scoring oracle is
/// passed per call so the same explainer can drive a real model in
/// production and a closure in tests.
pub struct SentimentExplainer {
    tokenizer: TextTokenizer,
    vocabulary: Arc<Vocabulary>,
    config: ExplainerConfig,
}

impl SentimentExplainer {
    pub fn new(vocabulary: Arc<Vocabulary>, config: ExplainerConfig) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            "Explainer ready: maxlen={}, threshold={}, vocabulary of {} words",
            config.maxlen,
            config.threshold,
            vocabulary.len()
        );

        Ok(Self {
            tokenizer: TextTokenizer::new(),
            vocabulary,
            config,
        })
    }

    /// Produce a full report for one raw text. Rejects oversized inputs
    /// before any oracle call is made.
    pub fn explain(&self, text: &str, oracle: &dyn ScoringOracle) -> Result<InferenceReport> {
        if text.len() > self.config.max_text_length {
            return Err(InferenceError::InvalidInput(format!(
                "input of {} bytes exceeds the {}-byte limit",
                text.len(),
                self.config.max_text_length
            )));
        }

        let output = self
            .tokenizer
            .preprocess(text, &self.vocabulary, self.config.maxlen)?;

        tracing::debug!(
            "Preprocessed {} chars into {} tokens",
            text.len(),
            output.token_count
        );

        let outcome = attribution::attribute(
            &output.tokens,
            &self.vocabulary,
            self.config.maxlen,
            oracle,
        )?;

        tracing::debug!(
            "Attribution complete: base score {:.6}, {} entries",
            outcome.base_score,
            outcome.entries.len()
        );

        InferenceReport::assemble(
            text,
            outcome.base_score,
            outcome.entries,
            &self.config,
            &output.tokens,
        )
    }

    pub fn config(&self) -> &ExplainerConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }
}
