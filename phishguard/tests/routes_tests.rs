// Tests for the HTTP routes

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use phishguard::routes::{AppState, NOT_LOADED_DETAIL, api_router, create_router};
use phishguard_core::{FeatureSchema, ScoringService};
use phishguard_model::error::Result as ModelResult;
use phishguard_model::{Classifier, FeatureVector, ModelError};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

struct FixedClassifier(f64);

impl Classifier for FixedClassifier {
    fn kind(&self) -> &'static str {
        "fixed"
    }

    fn predict_proba(&self, _features: &FeatureVector) -> ModelResult<f64> {
        Ok(self.0)
    }
}

struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn kind(&self) -> &'static str {
        "failing"
    }

    fn predict_proba(&self, _features: &FeatureVector) -> ModelResult<f64> {
        Err(ModelError::InvalidArtifact("boom".to_string()))
    }
}

fn loaded_state(classifier: Arc<dyn Classifier>) -> AppState {
    let schema = FeatureSchema::new(
        vec![
            "URLLength".to_string(),
            "IsHTTPS".to_string(),
            "TLD".to_string(),
        ],
        vec!["com".to_string(), "other".to_string()],
    )
    .unwrap();
    let service = ScoringService::new(Arc::new(schema), classifier, 0.20).unwrap();
    AppState::new(Some(Arc::new(service)))
}

async fn post_score(app: Router, text: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/score")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "text": text }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get_health(app: Router) -> Value {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_loaded_model() {
    let app = api_router(loaded_state(Arc::new(FixedClassifier(0.1))));
    assert_eq!(get_health(app).await, json!({"status": "ok", "model_loaded": true}));
}

#[tokio::test]
async fn test_health_reports_missing_model() {
    let app = api_router(AppState::default());
    assert_eq!(get_health(app).await, json!({"status": "ok", "model_loaded": false}));
}

// ============================================================================
// Scoring
// ============================================================================

#[tokio::test]
async fn test_score_returns_full_response() {
    let app = api_router(loaded_state(Arc::new(FixedClassifier(0.3))));
    let (status, body) = post_score(app, "check https://www.google.com please").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["probability"], json!(0.3));
    assert_eq!(body["is_phishing_std"], json!(false));
    assert_eq!(body["is_phishing_hr"], json!(true));
    assert_eq!(body["high_recall_threshold"], json!(0.2));
    assert_eq!(
        body["features"],
        json!({"URLLength": 22.0, "IsHTTPS": 1.0, "TLD": "com"})
    );
    assert_eq!(body["risk_factors"], json!([]));
}

#[tokio::test]
async fn test_score_features_keep_schema_order() {
    let app = api_router(loaded_state(Arc::new(FixedClassifier(0.3))));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/score")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"text": "example.zz"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    let url_length = text.find("\"URLLength\"").unwrap();
    let is_https = text.find("\"IsHTTPS\"").unwrap();
    let tld = text.find("\"TLD\"").unwrap();
    assert!(url_length < is_https && is_https < tld);
    assert!(text.contains("Uncommon/Invalid TLD"));
}

#[tokio::test]
async fn test_score_without_url() {
    let app = api_router(loaded_state(Arc::new(FixedClassifier(0.9))));
    let (status, body) = post_score(app, "hello there").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["probability"], json!(0.0));
    assert_eq!(body["features"], json!({}));
    assert_eq!(body["risk_factors"], json!(["No valid URL found in input."]));
}

#[tokio::test]
async fn test_score_without_model_is_server_error() {
    let app = api_router(AppState::default());
    let (status, body) = post_score(app, "https://www.google.com").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "detail": NOT_LOADED_DETAIL }));
}

#[tokio::test]
async fn test_classifier_failure_is_server_error() {
    let app = api_router(loaded_state(Arc::new(FailingClassifier)));
    let (status, body) = post_score(app, "https://www.google.com").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error during analysis:"));
    assert!(detail.contains("boom"));
}

#[tokio::test]
async fn test_malformed_url_is_server_error() {
    let app = api_router(loaded_state(Arc::new(FixedClassifier(0.1))));
    let (status, body) = post_score(app, "http://[::1/login").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("Error during analysis:"));
}

// ============================================================================
// Static Files
// ============================================================================

#[tokio::test]
async fn test_static_index_is_served() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("index.html"), "<h1>PhishGuard</h1>")?;
    let app = create_router(AppState::default(), dir.path());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"<h1>PhishGuard</h1>");
    Ok(())
}

#[tokio::test]
async fn test_api_routes_take_precedence_over_static() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let app = create_router(AppState::default(), dir.path());
    assert_eq!(get_health(app).await["model_loaded"], json!(false));
    Ok(())
}

#[tokio::test]
async fn test_bundled_front_end_renders_verdicts() -> Result<(), Box<dyn std::error::Error>> {
    let static_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../static");
    let app = create_router(AppState::default(), &static_dir);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let page = String::from_utf8(body.to_vec())?;
    assert!(page.contains("/api/score"));
    assert!(page.contains("risk_factors"));
    assert!(page.contains("is_phishing_hr"));
    Ok(())
}
