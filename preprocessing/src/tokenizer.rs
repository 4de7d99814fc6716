use crate::{PreprocessingError, Result, Vocabulary};
use regex::Regex;

/// Fixed-length integer sequence fed to the scoring model.
///
/// Invariant: the sequence always has exactly the length it was encoded
/// with. Shorter inputs are front-padded with the padding index (the
/// convention the classifier was trained with); longer inputs keep the
/// first `maxlen` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence {
    ids: Vec<u32>,
}

impl TokenSequence {
    /// Encode an already-normalized token list: vocabulary lookup, then
    /// truncation to the first `maxlen` tokens, then front-padding.
    pub fn encode(tokens: &[String], vocabulary: &Vocabulary, maxlen: usize) -> Result<Self> {
        if maxlen == 0 {
            return Err(PreprocessingError::Config(
                "maxlen must be at least 1, got 0".to_string(),
            ));
        }

        let encoded: Vec<u32> = tokens
            .iter()
            .take(maxlen)
            .map(|word| vocabulary.lookup(word))
            .collect();

        let mut ids = vec![vocabulary.padding_index(); maxlen - encoded.len()];
        ids.extend(encoded);

        Ok(Self { ids })
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn into_inner(self) -> Vec<u32> {
        self.ids
    }
}

/// Result of preprocessing one raw text: the encoded sequence plus
/// diagnostics about the original (pre-pad, pre-truncate) token list.
#[derive(Debug, Clone)]
pub struct PreprocessOutput {
    pub sequence: TokenSequence,
    pub token_count: usize,
    pub tokens: Vec<String>,
}

pub struct TextTokenizer {
    punctuation_regex: Regex,
}

impl TextTokenizer {
    pub fn new() -> Self {
        let punctuation_regex = Regex::new(r"[^\w\s]").unwrap();

        Self { punctuation_regex }
    }

    /// Normalize raw text into word tokens: lowercase, every punctuation
    /// character replaced by a space, whitespace collapsed. Contractions
    /// split ("don't" becomes "don t") and digit groups separate
    /// ("$45,000" becomes "45 000").
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let stripped = self.punctuation_regex.replace_all(&lowered, " ");

        stripped.split_whitespace().map(str::to_string).collect()
    }

    /// Map raw text to a fixed-length sequence. Pure function of its
    /// inputs for a fixed vocabulary; text that normalizes to zero tokens
    /// yields a valid all-padding sequence, not an error.
    pub fn preprocess(
        &self,
        text: &str,
        vocabulary: &Vocabulary,
        maxlen: usize,
    ) -> Result<PreprocessOutput> {
        let tokens = self.normalize(text);
        let sequence = TokenSequence::encode(&tokens, vocabulary, maxlen)?;

        Ok(PreprocessOutput {
            sequence,
            token_count: tokens.len(),
            tokens,
        })
    }
}

impl Default for TextTokenizer {
    fn default() -> Self {
        Self::new()
    }
}
