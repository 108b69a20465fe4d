//! Error types for solace-nlp

use thiserror::Error;

/// NLP error type
#[derive(Debug, Error)]
pub enum Error {
    /// Extractor cannot be built from the given configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Learned classifier failed to produce probabilities
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Emotion model failed to score the text
    #[error("emotion model error: {0}")]
    EmotionModel(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
