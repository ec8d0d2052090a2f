//! Scoring orchestration: text → URL → features → probability → verdicts.
//!
//! A `ScoringService` is built once at startup and never mutated afterwards,
//! so it can be shared between concurrent requests behind an `Arc`.

use crate::align::align_features;
use crate::config::{ServiceConfig, validate_threshold};
use crate::error::Result;
use crate::extract::extract_features;
use crate::normalize::normalize_url;
use crate::risk::map_risk_factors;
use crate::scan::find_target_url;
use crate::schema::FeatureSchema;
use phishguard_model::classifier::checked_probability;
use phishguard_model::{Classifier, FeatureVector, load_classifier};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Fixed decision boundary for the standard verdict.
pub const STANDARD_THRESHOLD: f64 = 0.5;

pub const NO_URL_FACTOR: &str = "No valid URL found in input.";

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub probability: f64,
    pub is_phishing_std: bool,
    pub is_phishing_hr: bool,
    pub high_recall_threshold: f64,
    pub features: FeatureVector,
    pub risk_factors: Vec<String>,
}

/// Normalize, extract and align one URL against a schema.
pub fn featurize(schema: &FeatureSchema, url: &str) -> Result<FeatureVector> {
    let normalized = normalize_url(url);
    let raw = extract_features(&normalized)?;
    Ok(align_features(schema, &raw.to_row()))
}

pub struct ScoringService {
    schema: Arc<FeatureSchema>,
    classifier: Arc<dyn Classifier>,
    high_recall_threshold: f64,
}

impl ScoringService {
    /// Assemble a service, refusing a classifier that references columns or
    /// categories the schema does not define.
    pub fn new(
        schema: Arc<FeatureSchema>,
        classifier: Arc<dyn Classifier>,
        high_recall_threshold: f64,
    ) -> Result<Self> {
        validate_threshold(high_recall_threshold)?;
        classifier.check_schema(schema.feature_columns(), schema.tld_categories())?;
        Ok(Self {
            schema,
            classifier,
            high_recall_threshold,
        })
    }

    /// Load schema and classifier artifacts named by the configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let schema = Arc::new(FeatureSchema::load(&config.schema_path)?);
        let classifier = load_classifier(&config.model_path)?;
        let service = Self::new(schema, classifier, config.high_recall_threshold)?;
        info!(
            "Scoring service ready ({} classifier, high recall threshold {:.2})",
            service.classifier.kind(),
            service.high_recall_threshold
        );
        Ok(service)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn high_recall_threshold(&self) -> f64 {
        self.high_recall_threshold
    }

    pub fn classifier_kind(&self) -> &'static str {
        self.classifier.kind()
    }

    pub fn featurize(&self, url: &str) -> Result<FeatureVector> {
        featurize(&self.schema, url)
    }

    /// Score a single URL.
    pub fn score_url(&self, url: &str) -> Result<ScoreResponse> {
        debug!("Scoring {}", url);
        let features = self.featurize(url)?;
        let probability = checked_probability(self.classifier.predict_proba(&features)?)?;
        let risk_factors = map_risk_factors(&features);

        Ok(ScoreResponse {
            probability,
            is_phishing_std: probability > STANDARD_THRESHOLD,
            is_phishing_hr: probability > self.high_recall_threshold,
            high_recall_threshold: self.high_recall_threshold,
            features,
            risk_factors,
        })
    }

    /// Score the first URL found in free-form text. Text without a URL gets
    /// a zero-risk answer rather than an error.
    pub fn score_text(&self, text: &str) -> Result<ScoreResponse> {
        match find_target_url(text) {
            Some(url) => self.score_url(url),
            None => {
                debug!("No URL found in input");
                Ok(self.no_url_response())
            }
        }
    }

    fn no_url_response(&self) -> ScoreResponse {
        ScoreResponse {
            probability: 0.0,
            is_phishing_std: false,
            is_phishing_hr: false,
            high_recall_threshold: self.high_recall_threshold,
            features: FeatureVector::new(),
            risk_factors: vec![NO_URL_FACTOR.to_string()],
        }
    }
}
