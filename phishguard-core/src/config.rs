use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Probability above which a URL is flagged under the high-recall policy.
pub const DEFAULT_HIGH_RECALL_THRESHOLD: f64 = 0.20;

/// Runtime configuration, optionally read from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Schema artifact (feature column order and TLD categories).
    pub schema_path: PathBuf,
    /// Classifier artifact; must be versioned together with the schema.
    pub model_path: PathBuf,
    pub high_recall_threshold: f64,
    /// Address the HTTP server binds to.
    pub bind: String,
    /// Directory of static front-end files.
    pub static_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from("models/schema.json"),
            model_path: PathBuf::from("models/model.json"),
            high_recall_threshold: DEFAULT_HIGH_RECALL_THRESHOLD,
            bind: "127.0.0.1:8000".to_string(),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ServiceConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ServiceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.high_recall_threshold)?;
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| CoreError::Config(format!("Invalid bind address '{}': {}", self.bind, e)))
    }

    /// Expand a leading `~` in every path.
    pub fn expand_paths(mut self) -> Self {
        self.schema_path = expand_tilde(&self.schema_path);
        self.model_path = expand_tilde(&self.model_path);
        self.static_dir = expand_tilde(&self.static_dir);
        self
    }
}

pub fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(CoreError::Config(format!(
            "high_recall_threshold must be within [0, 1], got {}",
            threshold
        )))
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}
