pub mod artifact;
pub mod classifier;
pub mod error;
pub mod logistic;
pub mod tree;
pub mod vector;

pub use artifact::{ModelArtifact, load_classifier};
pub use classifier::Classifier;
pub use error::ModelError;
pub use vector::{FeatureValue, FeatureVector, TLD_COLUMN};
