use crate::error::{ModelError, Result};
use crate::vector::FeatureVector;

/// Scoring capability the service depends on.
///
/// Implementations are loaded once at startup and shared read-only between
/// request tasks, hence `Send + Sync` and `&self` everywhere.
pub trait Classifier: Send + Sync {
    /// Short name of the model family, for logs.
    fn kind(&self) -> &'static str;

    /// Probability of the positive (phishing) class for one aligned row.
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64>;

    /// Verify that every column and category the model relies on exists in
    /// the schema it will be fed with.
    fn check_schema(&self, _columns: &[String], _categories: &[String]) -> Result<()> {
        Ok(())
    }
}

/// Logistic function, evaluated so that neither branch overflows.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let ex = x.exp();
        ex / (1.0 + ex)
    }
}

/// Reject probabilities outside [0, 1] instead of clamping them.
pub fn checked_probability(p: f64) -> Result<f64> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(ModelError::InvalidProbability(p))
    }
}

pub(crate) fn require_column(columns: &[String], name: &str) -> Result<()> {
    if columns.iter().any(|c| c == name) {
        Ok(())
    } else {
        Err(ModelError::SchemaMismatch(format!(
            "model uses column '{}' which the schema does not define",
            name
        )))
    }
}

pub(crate) fn require_category(categories: &[String], label: &str) -> Result<()> {
    if categories.iter().any(|c| c == label) {
        Ok(())
    } else {
        Err(ModelError::SchemaMismatch(format!(
            "model uses TLD category '{}' which the schema does not define",
            label
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_midpoint() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_checked_probability() {
        assert_eq!(checked_probability(0.0).unwrap(), 0.0);
        assert_eq!(checked_probability(1.0).unwrap(), 1.0);
        assert!(checked_probability(1.01).is_err());
        assert!(checked_probability(-0.1).is_err());
        assert!(checked_probability(f64::NAN).is_err());
    }
}
