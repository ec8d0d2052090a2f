// Tests for classifier artifacts

use phishguard_model::{
    Classifier, FeatureVector, ModelArtifact, ModelError, TLD_COLUMN, load_classifier,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn row(url_length: f64, is_https: f64, tld: &str) -> FeatureVector {
    let mut vector = FeatureVector::new();
    vector.push("URLLength", url_length);
    vector.push(TLD_COLUMN, tld);
    vector.push("IsHTTPS", is_https);
    vector
}

fn columns() -> Vec<String> {
    vec!["URLLength".to_string(), TLD_COLUMN.to_string(), "IsHTTPS".to_string()]
}

fn categories() -> Vec<String> {
    vec!["com".to_string(), "org".to_string(), "other".to_string()]
}

const LOGISTIC: &str = r#"{
    "kind": "logistic",
    "intercept": -1.0,
    "coefficients": { "URLLength": 0.05, "IsHTTPS": -2.0 },
    "tld_weights": { "other": 1.5 }
}"#;

const ENSEMBLE: &str = r#"{
    "kind": "tree_ensemble",
    "baseline": -0.5,
    "trees": [
        { "nodes": [
            { "feature": "URLLength", "threshold": 40.0, "left": 1, "right": 2 },
            { "leaf": -1.0 },
            { "leaf": 2.0 }
        ] },
        { "nodes": [
            { "feature": "TLD", "categories": ["other"], "left": 1, "right": 2 },
            { "leaf": 1.0 },
            { "leaf": -0.5 }
        ] }
    ]
}"#;

// ============================================================================
// Logistic Model Tests
// ============================================================================

#[test]
fn test_logistic_probability() {
    let model = ModelArtifact::from_json(LOGISTIC).unwrap().into_classifier();
    assert_eq!(model.kind(), "logistic");

    // -1.0 + 0.05 * 20 - 2.0 * 1 + 0 = -2.0
    let p = model.predict_proba(&row(20.0, 1.0, "com")).unwrap();
    let expected = 1.0 / (1.0 + 2.0f64.exp());
    assert!((p - expected).abs() < 1e-12);
}

#[test]
fn test_logistic_tld_weight_raises_probability() {
    let model = ModelArtifact::from_json(LOGISTIC).unwrap().into_classifier();
    let common = model.predict_proba(&row(20.0, 0.0, "com")).unwrap();
    let rare = model.predict_proba(&row(20.0, 0.0, "other")).unwrap();
    assert!(rare > common);
}

#[test]
fn test_logistic_missing_feature() {
    let model = ModelArtifact::from_json(LOGISTIC).unwrap().into_classifier();
    let mut vector = FeatureVector::new();
    vector.push("URLLength", 10.0);
    vector.push(TLD_COLUMN, "com");

    let result = model.predict_proba(&vector);
    assert!(matches!(result, Err(ModelError::MissingFeature(ref name)) if name == "IsHTTPS"));
}

#[test]
fn test_logistic_rejects_weight_on_categorical_column() {
    let json = r#"{"kind": "logistic", "intercept": 0.0, "coefficients": {"TLD": 1.0}}"#;
    assert!(matches!(
        ModelArtifact::from_json(json),
        Err(ModelError::InvalidArtifact(_))
    ));
}

#[test]
fn test_logistic_schema_check() {
    let model = ModelArtifact::from_json(LOGISTIC).unwrap().into_classifier();
    assert!(model.check_schema(&columns(), &categories()).is_ok());

    let without_other = vec!["com".to_string()];
    assert!(matches!(
        model.check_schema(&columns(), &without_other),
        Err(ModelError::SchemaMismatch(_))
    ));

    let short_columns = vec!["URLLength".to_string(), TLD_COLUMN.to_string()];
    assert!(matches!(
        model.check_schema(&short_columns, &categories()),
        Err(ModelError::SchemaMismatch(_))
    ));
}

// ============================================================================
// Tree Ensemble Tests
// ============================================================================

#[test]
fn test_ensemble_sums_leaves() {
    let model = ModelArtifact::from_json(ENSEMBLE).unwrap();
    let ModelArtifact::TreeEnsemble(ensemble) = &model else {
        panic!("expected a tree ensemble");
    };

    assert_eq!(ensemble.margin(&row(30.0, 1.0, "com")).unwrap(), -2.0);
    assert_eq!(ensemble.margin(&row(90.0, 1.0, "other")).unwrap(), 2.5);
}

#[test]
fn test_ensemble_probability_without_calibration() {
    let model = ModelArtifact::from_json(ENSEMBLE).unwrap().into_classifier();
    let p = model.predict_proba(&row(90.0, 1.0, "other")).unwrap();
    let expected = 1.0 / (1.0 + (-2.5f64).exp());
    assert!((p - expected).abs() < 1e-12);
}

#[test]
fn test_ensemble_with_platt_calibration() {
    let json = r#"{
        "kind": "tree_ensemble",
        "trees": [ { "nodes": [ { "leaf": 1.0 } ] } ],
        "calibration": { "a": -2.0, "b": 0.5 }
    }"#;
    let model = ModelArtifact::from_json(json).unwrap().into_classifier();
    let p = model.predict_proba(&row(10.0, 0.0, "com")).unwrap();
    let expected = 1.0 / (1.0 + (-2.0f64 + 0.5).exp());
    assert!((p - expected).abs() < 1e-12);
}

#[test]
fn test_ensemble_type_mismatch() {
    let model = ModelArtifact::from_json(ENSEMBLE).unwrap().into_classifier();
    let mut vector = FeatureVector::new();
    vector.push("URLLength", "long");
    vector.push(TLD_COLUMN, "com");
    vector.push("IsHTTPS", 1.0);

    assert!(matches!(
        model.predict_proba(&vector),
        Err(ModelError::FeatureType { expected: "number", .. })
    ));
}

#[test]
fn test_ensemble_rejects_backward_child() {
    let json = r#"{
        "kind": "tree_ensemble",
        "trees": [ { "nodes": [
            { "feature": "URLLength", "threshold": 1.0, "left": 0, "right": 1 },
            { "leaf": 0.0 }
        ] } ]
    }"#;
    assert!(matches!(
        ModelArtifact::from_json(json),
        Err(ModelError::InvalidArtifact(_))
    ));
}

#[test]
fn test_ensemble_rejects_out_of_range_child() {
    let json = r#"{
        "kind": "tree_ensemble",
        "trees": [ { "nodes": [
            { "feature": "URLLength", "threshold": 1.0, "left": 1, "right": 5 },
            { "leaf": 0.0 }
        ] } ]
    }"#;
    assert!(ModelArtifact::from_json(json).is_err());
}

#[test]
fn test_ensemble_rejects_empty_forest() {
    let json = r#"{"kind": "tree_ensemble", "trees": []}"#;
    assert!(ModelArtifact::from_json(json).is_err());
}

#[test]
fn test_ensemble_schema_check_categories() {
    let model = ModelArtifact::from_json(ENSEMBLE).unwrap().into_classifier();
    assert!(model.check_schema(&columns(), &categories()).is_ok());
    assert!(
        model
            .check_schema(&columns(), &["com".to_string()])
            .is_err()
    );
}

// ============================================================================
// Loading Tests
// ============================================================================

#[test]
fn test_load_classifier_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    write!(file, "{}", LOGISTIC)?;

    let model = load_classifier(file.path())?;
    assert_eq!(model.kind(), "logistic");
    Ok(())
}

#[test]
fn test_load_classifier_missing_file() {
    let result = load_classifier(std::path::Path::new("/nonexistent/model.json"));
    assert!(matches!(result, Err(ModelError::IoError(_))));
}

#[test]
fn test_unknown_kind_is_rejected() {
    let json = r#"{"kind": "neural_net", "layers": []}"#;
    assert!(matches!(
        ModelArtifact::from_json(json),
        Err(ModelError::JsonError(_))
    ));
}
