// Linear model over the aligned row: one weight per numeric column plus an
// optional weight per TLD category.

use crate::classifier::{Classifier, checked_probability, require_category, require_column, sigmoid};
use crate::error::{ModelError, Result};
use crate::vector::{FeatureValue, FeatureVector, TLD_COLUMN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: BTreeMap<String, f64>,
    #[serde(default)]
    pub tld_weights: BTreeMap<String, f64>,
}

impl LogisticModel {
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.intercept.is_finite() {
            return Err(ModelError::InvalidArtifact(
                "logistic intercept is not finite".to_string(),
            ));
        }
        if self.coefficients.contains_key(TLD_COLUMN) {
            return Err(ModelError::InvalidArtifact(format!(
                "'{}' is categorical, weight it through tld_weights",
                TLD_COLUMN
            )));
        }
        for (name, weight) in self.coefficients.iter().chain(self.tld_weights.iter()) {
            if !weight.is_finite() {
                return Err(ModelError::InvalidArtifact(format!(
                    "weight for '{}' is not finite",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Raw log-odds for a row.
    pub fn margin(&self, features: &FeatureVector) -> Result<f64> {
        let mut z = self.intercept;

        for (name, weight) in &self.coefficients {
            match features.get(name) {
                Some(FeatureValue::Number(x)) => z += weight * x,
                Some(FeatureValue::Category(_)) => {
                    return Err(ModelError::FeatureType {
                        name: name.clone(),
                        expected: "number",
                    });
                }
                None => return Err(ModelError::MissingFeature(name.clone())),
            }
        }

        if !self.tld_weights.is_empty() {
            let label = match features.get(TLD_COLUMN) {
                Some(FeatureValue::Category(label)) => label,
                Some(FeatureValue::Number(_)) => {
                    return Err(ModelError::FeatureType {
                        name: TLD_COLUMN.to_string(),
                        expected: "category",
                    });
                }
                None => return Err(ModelError::MissingFeature(TLD_COLUMN.to_string())),
            };
            z += self.tld_weights.get(label).copied().unwrap_or(0.0);
        }

        Ok(z)
    }
}

impl Classifier for LogisticModel {
    fn kind(&self) -> &'static str {
        "logistic"
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<f64> {
        checked_probability(sigmoid(self.margin(features)?))
    }

    fn check_schema(&self, columns: &[String], categories: &[String]) -> Result<()> {
        for name in self.coefficients.keys() {
            require_column(columns, name)?;
        }
        if !self.tld_weights.is_empty() {
            require_column(columns, TLD_COLUMN)?;
            for label in self.tld_weights.keys() {
                require_category(categories, label)?;
            }
        }
        Ok(())
    }
}
