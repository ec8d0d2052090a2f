use crate::classifier::Classifier;
use crate::error::Result;
use crate::logistic::LogisticModel;
use crate::tree::TreeEnsemble;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// On-disk classifier artifact, tagged by `"kind"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Logistic(LogisticModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("Reading model artifact from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Logistic(model) => model.validate(),
            ModelArtifact::TreeEnsemble(model) => model.validate(),
        }
    }

    pub fn into_classifier(self) -> Arc<dyn Classifier> {
        match self {
            ModelArtifact::Logistic(model) => Arc::new(model),
            ModelArtifact::TreeEnsemble(model) => Arc::new(model),
        }
    }
}

/// Load and validate a classifier artifact from disk.
pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>> {
    let classifier = ModelArtifact::load(path)?.into_classifier();
    info!("Loaded {} classifier from {}", classifier.kind(), path.display());
    Ok(classifier)
}
