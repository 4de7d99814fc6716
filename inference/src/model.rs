use crate::oracle::{validate_score, ScoringOracle};
use crate::{InferenceError, Result};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use reviewlens_preprocessing::TokenSequence;
use std::path::Path;
use std::sync::Mutex;

/// ONNX-backed sentiment classifier.
///
/// The exported graph takes a single `input_ids` tensor of shape
/// `[1, maxlen]` and returns a `probability` tensor with one value: the
/// probability of positive sentiment. `Session::run` needs exclusive
/// access, so the session sits behind a mutex and the model implements
/// `ScoringOracle` through `&self`.
pub struct OnnxSentimentModel {
    session: Mutex<Session>,
}

impl OnnxSentimentModel {
    pub fn new(model_path: &Path) -> Result<Self> {
        tracing::info!("Loading sentiment model from: {:?}", model_path);

        if !model_path.exists() {
            return Err(InferenceError::ModelLoad(format!(
                "Model file not found: {:?}",
                model_path
            )));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(1)
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to set thread count: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to load model: {}", e)))?;

        tracing::info!("Successfully loaded sentiment model");
        Ok(Self {
            session: Mutex::new(session),
        })
    }

    fn run(&self, input_ids: &[i64]) -> Result<f64> {
        use ort::inputs;

        let input_array = ndarray::Array2::from_shape_vec((1, input_ids.len()), input_ids.to_vec())
            .map_err(|e| InferenceError::Oracle(format!("Failed to create input array: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Oracle(format!("Failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::Oracle("Model session mutex poisoned".to_string()))?;

        let outputs = session
            .run(inputs!["input_ids" => input_tensor])
            .map_err(|e| InferenceError::Oracle(format!("Inference failed: {}", e)))?;

        let (_shape, data) = outputs["probability"]
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Oracle(format!("Failed to extract probability: {}", e)))?;

        let probability = data
            .first()
            .ok_or_else(|| InferenceError::Oracle("Model returned an empty probability tensor".to_string()))?;

        Ok(f64::from(*probability))
    }
}

impl ScoringOracle for OnnxSentimentModel {
    fn score(&self, sequence: &TokenSequence) -> Result<f64> {
        let input_ids: Vec<i64> = sequence.ids().iter().map(|&id| i64::from(id)).collect();
        let score = self.run(&input_ids)?;
        validate_score(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_model_file_is_an_error() {
        let result = OnnxSentimentModel::new(&PathBuf::from("no_such_model.onnx"));
        assert!(result.is_err(), "Model loading should fail when file doesn't exist");
    }
}
