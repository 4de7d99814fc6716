use crate::{PreprocessingError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

// On-disk format: a pre-built word-to-index mapping plus the two reserved
// indices. The mapping is built offline; this crate only consumes it.
#[derive(Debug, Deserialize)]
struct VocabularyFile {
    words: HashMap<String, u32>,
    unknown_index: u32,
    padding_index: u32,
}

/// Fixed word-to-index mapping with reserved unknown and padding indices.
///
/// Loaded once at process start and read-only afterwards; share it behind
/// an `Arc` across requests.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: HashMap<String, u32>,
    reverse: HashMap<u32, String>,
    unknown_index: u32,
    padding_index: u32,
}

impl Vocabulary {
    pub fn new(words: HashMap<String, u32>, unknown_index: u32, padding_index: u32) -> Result<Self> {
        if unknown_index == padding_index {
            return Err(PreprocessingError::Vocabulary(format!(
                "unknown_index and padding_index must differ, both are {}",
                unknown_index
            )));
        }

        for (word, &index) in &words {
            if index == unknown_index || index == padding_index {
                return Err(PreprocessingError::Vocabulary(format!(
                    "word '{}' maps to reserved index {}",
                    word, index
                )));
            }
        }

        let reverse = words.iter().map(|(word, &index)| (index, word.clone())).collect();

        Ok(Self {
            words,
            reverse,
            unknown_index,
            padding_index,
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading vocabulary from: {:?}", path);

        if !path.exists() {
            return Err(PreprocessingError::Vocabulary(format!(
                "Vocabulary file not found: {:?}",
                path
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let vocabulary = Self::from_json_str(&content)?;
        tracing::info!("Loaded vocabulary with {} words", vocabulary.len());
        Ok(vocabulary)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: VocabularyFile = serde_json::from_str(content)?;
        Self::new(file.words, file.unknown_index, file.padding_index)
    }

    /// Index for a normalized word; words absent from the vocabulary map to
    /// the unknown index. Never fails.
    pub fn lookup(&self, word: &str) -> u32 {
        self.words.get(word).copied().unwrap_or(self.unknown_index)
    }

    /// Render an encoded sequence back to words, skipping padding and
    /// printing "?" for indices with no known word.
    pub fn decode(&self, ids: &[u32]) -> String {
        ids.iter()
            .filter(|&&id| id != self.padding_index)
            .map(|id| self.reverse.get(id).map(String::as_str).unwrap_or("?"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn unknown_index(&self) -> u32 {
        self.unknown_index
    }

    pub fn padding_index(&self) -> u32 {
        self.padding_index
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_words() -> HashMap<String, u32> {
        HashMap::from([("good".to_string(), 5), ("bad".to_string(), 6)])
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let vocabulary = Vocabulary::new(test_words(), 1, 0).unwrap();

        assert_eq!(vocabulary.lookup("good"), 5);
        assert_eq!(vocabulary.lookup("bad"), 6);
        assert_eq!(vocabulary.lookup("movie"), 1, "Absent words should map to the unknown index");
    }

    #[test]
    fn test_reserved_index_collisions_rejected() {
        let result = Vocabulary::new(test_words(), 3, 3);
        assert!(result.is_err(), "Identical reserved indices should be rejected");

        let mut words = test_words();
        words.insert("pad".to_string(), 0);
        let result = Vocabulary::new(words, 1, 0);
        assert!(result.is_err(), "A word claiming a reserved index should be rejected");
    }

    #[test]
    fn test_decode_skips_padding_and_marks_unknown() {
        let vocabulary = Vocabulary::new(test_words(), 1, 0).unwrap();

        let decoded = vocabulary.decode(&[0, 0, 5, 1, 6]);
        assert_eq!(decoded, "good ? bad");
    }

    #[test]
    fn test_from_json_str() {
        let vocabulary = Vocabulary::from_json_str(
            r#"{"words": {"good": 5, "bad": 6}, "unknown_index": 1, "padding_index": 0}"#,
        )
        .unwrap();

        assert_eq!(vocabulary.len(), 2);
        assert_eq!(vocabulary.unknown_index(), 1);
        assert_eq!(vocabulary.padding_index(), 0);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocabulary.json");
        std::fs::write(
            &path,
            r#"{"words": {"good": 5}, "unknown_index": 1, "padding_index": 0}"#,
        )
        .unwrap();

        let vocabulary = Vocabulary::from_json_file(&path).unwrap();
        assert_eq!(vocabulary.lookup("good"), 5);

        let missing = Vocabulary::from_json_file(&dir.path().join("missing.json"));
        assert!(missing.is_err(), "Missing vocabulary file should be an error");
    }
}
