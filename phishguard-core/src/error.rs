use phishguard_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid schema JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid config file: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Feature extraction failed: {0}")]
    Extraction(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
