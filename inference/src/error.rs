use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Model loading error: {0}")]
    ModelLoad(String),

    #[error("Preprocessing error: {0}")]
    Preprocessing(#[from] reviewlens_preprocessing::PreprocessingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

/// Result type alias for inference operations
pub type Result<T> = std::result::Result<T, InferenceError>;
