// Additive ensemble of binary decision trees, optionally Platt-calibrated.
//
// Each tree is a flat array of nodes rooted at index 0. Children always sit
// at a higher index than their parent, which `validate` enforces, so a walk
// from the root can never loop.

use crate::classifier::{Classifier, checked_probability, require_category, require_column, sigmoid};
use crate::error::{ModelError, Result};
use crate::vector::{FeatureValue, FeatureVector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf {
        leaf: f64,
    },
    NumericSplit {
        feature: String,
        threshold: f64,
        left: usize,
        right: usize,
    },
    CategoricalSplit {
        feature: String,
        categories: Vec<String>,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlattCalibration {
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub baseline: f64,
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub calibration: Option<PlattCalibration>,
}

impl Tree {
    fn validate(&self, index: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ModelError::InvalidArtifact(format!("tree {} has no nodes", index)));
        }
        for (position, node) in self.nodes.iter().enumerate() {
            let (left, right) = match node {
                TreeNode::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(ModelError::InvalidArtifact(format!(
                            "tree {} node {} has a non-finite leaf",
                            index, position
                        )));
                    }
                    continue;
                }
                TreeNode::NumericSplit {
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if !threshold.is_finite() {
                        return Err(ModelError::InvalidArtifact(format!(
                            "tree {} node {} has a non-finite threshold",
                            index, position
                        )));
                    }
                    (*left, *right)
                }
                TreeNode::CategoricalSplit { left, right, .. } => (*left, *right),
            };
            for child in [left, right] {
                if child <= position || child >= self.nodes.len() {
                    return Err(ModelError::InvalidArtifact(format!(
                        "tree {} node {} points to invalid child {}",
                        index, position, child
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn evaluate(&self, features: &FeatureVector) -> Result<f64> {
        let mut index = 0;
        loop {
            let node = self.nodes.get(index).ok_or_else(|| {
                ModelError::InvalidArtifact(format!("node {} out of range", index))
            })?;
            index = match node {
                TreeNode::Leaf { leaf } => return Ok(*leaf),
                TreeNode::NumericSplit {
                    feature,
                    threshold,
                    left,
                    right,
                } => match features.get(feature) {
                    Some(FeatureValue::Number(x)) => {
                        if *x <= *threshold {
                            *left
                        } else {
                            *right
                        }
                    }
                    Some(FeatureValue::Category(_)) => {
                        return Err(ModelError::FeatureType {
                            name: feature.clone(),
                            expected: "number",
                        });
                    }
                    None => return Err(ModelError::MissingFeature(feature.clone())),
                },
                TreeNode::CategoricalSplit {
                    feature,
                    categories,
                    left,
                    right,
                } => match features.get(feature) {
                    Some(FeatureValue::Category(label)) => {
                        if categories.iter().any(|c| c == label) {
                            *left
                        } else {
                            *right
                        }
                    }
                    Some(FeatureValue::Number(_)) => {
                        return Err(ModelError::FeatureType {
                            name: feature.clone(),
                            expected: "category",
                        });
                    }
                    None => return Err(ModelError::MissingFeature(feature.clone())),
                },
            };
        }
    }
}

impl TreeEnsemble {
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.baseline.is_finite() {
            return Err(ModelError::InvalidArtifact(
                "ensemble baseline is not finite".to_string(),
            ));
        }
        if self.trees.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "ensemble has no trees".to_string(),
            ));
        }
        if let Some(calibration) = self.calibration
            && !(calibration.a.is_finite() && calibration.b.is_finite())
        {
            return Err(ModelError::InvalidArtifact(
                "calibration parameters are not finite".to_string(),
            ));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(index)?;
        }
        Ok(())
    }

    /// Sum of the baseline and every tree's leaf value.
    pub fn margin(&self, features: &FeatureVector) -> Result<f64> {
        let mut total = self.baseline;
        for tree in &self.trees {
            total += tree.evaluate(features)?;
        }
        Ok(total)
    }
}

impl Classifier for TreeEnsemble {
    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<f64> {
        let margin = self.margin(features)?;
        let p = match self.calibration {
            Some(PlattCalibration { a, b }) => sigmoid(-(a * margin + b)),
            None => sigmoid(margin),
        };
        checked_probability(p)
    }

    fn check_schema(&self, columns: &[String], categories: &[String]) -> Result<()> {
        for tree in &self.trees {
            for node in &tree.nodes {
                match node {
                    TreeNode::Leaf { .. } => {}
                    TreeNode::NumericSplit { feature, .. } => require_column(columns, feature)?,
                    TreeNode::CategoricalSplit {
                        feature,
                        categories: labels,
                        ..
                    } => {
                        require_column(columns, feature)?;
                        for label in labels {
                            require_category(categories, label)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
