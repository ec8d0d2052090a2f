// Feature schema: column order and TLD category space fixed at training time

use crate::error::{CoreError, Result};
use crate::vocab::SENTINEL_TLD;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// On-disk layout, as written by the training pipeline.
#[derive(Debug, Deserialize)]
struct SchemaDocument {
    feature_cols: Vec<String>,
    tld_categories: Vec<String>,
}

/// Column layout and TLD categories the model was fit against.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    feature_columns: Vec<String>,
    tld_categories: Vec<String>,
}

impl FeatureSchema {
    pub fn new(feature_columns: Vec<String>, tld_categories: Vec<String>) -> Result<Self> {
        if feature_columns.is_empty() {
            return Err(CoreError::InvalidSchema(
                "feature_cols must not be empty".to_string(),
            ));
        }
        if tld_categories.is_empty() {
            return Err(CoreError::InvalidSchema(
                "tld_categories must not be empty".to_string(),
            ));
        }
        if let Some(name) = first_duplicate(&feature_columns) {
            return Err(CoreError::InvalidSchema(format!(
                "duplicate feature column '{}'",
                name
            )));
        }
        if let Some(name) = first_duplicate(&tld_categories) {
            return Err(CoreError::InvalidSchema(format!(
                "duplicate TLD category '{}'",
                name
            )));
        }

        Ok(Self {
            feature_columns,
            tld_categories,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        Self::new(document.feature_cols, document.tld_categories)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let schema = Self::from_json(&content)?;
        info!(
            "Loaded schema from {} ({} columns, {} TLD categories)",
            path.display(),
            schema.feature_columns.len(),
            schema.tld_categories.len()
        );
        Ok(schema)
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn tld_categories(&self) -> &[String] {
        &self.tld_categories
    }

    /// Category used for out-of-vocabulary TLDs: the sentinel when the
    /// schema has one, otherwise the first category.
    pub fn fallback_category(&self) -> &str {
        if self.has_category(SENTINEL_TLD) {
            SENTINEL_TLD
        } else {
            &self.tld_categories[0]
        }
    }

    pub fn has_category(&self, label: &str) -> bool {
        self.tld_categories.iter().any(|c| c == label)
    }

    /// Map a raw TLD into the closed category space.
    pub fn map_tld(&self, raw: &str) -> &str {
        let lowered = raw.to_lowercase();
        match self.tld_categories.iter().find(|c| **c == lowered) {
            Some(category) => category,
            None => self.fallback_category(),
        }
    }
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(String::as_str)
}
