use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid model JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Missing feature: {0}")]
    MissingFeature(String),

    #[error("Feature '{name}' has the wrong type, expected {expected}")]
    FeatureType { name: String, expected: &'static str },

    #[error("Classifier produced an invalid probability: {0}")]
    InvalidProbability(f64),

    #[error("Model does not match schema: {0}")]
    SchemaMismatch(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
