use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::eligibility::domain::RawApplication;
use crate::eligibility::features::{FEATURE_COUNT, FEATURE_NAMES};
use crate::eligibility::model::{BinaryClassifier, ClassifierError};
use crate::eligibility::predictor::Predictor;
use crate::eligibility::service::EligibilityService;

/// Applicant from the reference walkthrough: graduate, urban, clean credit.
pub(super) fn application() -> RawApplication {
    RawApplication {
        gender: "Male".to_string(),
        married: "Yes".to_string(),
        dependents: "0".to_string(),
        education: "Graduate".to_string(),
        self_employed: "No".to_string(),
        applicant_income: 5000.0,
        coapplicant_income: 0.0,
        loan_amount: 100.0,
        loan_amount_term: 360.0,
        credit_history: "Meets guidelines".to_string(),
        property_area: "Urban".to_string(),
    }
}

pub(super) fn poor_credit_application() -> RawApplication {
    RawApplication {
        credit_history: "Does not meet guidelines".to_string(),
        ..application()
    }
}

/// Logistic regression dominated by the credit history column.
pub(super) fn credit_weighted_artifact() -> Value {
    let mut coefficients = vec![0.0; FEATURE_COUNT];
    coefficients[7] = 6.0;
    json!({
        "model_name": "credit-weighted",
        "feature_names": FEATURE_NAMES,
        "classifier": {
            "kind": "logistic_regression",
            "coefficients": coefficients,
            "intercept": -3.0
        }
    })
}

/// Two-tree forest that approves only when credit history and balance income agree.
pub(super) fn forest_artifact() -> Value {
    json!({
        "model_name": "credit-forest",
        "feature_names": FEATURE_NAMES,
        "classifier": {
            "kind": "decision_forest",
            "n_features": FEATURE_COUNT,
            "trees": [
                { "nodes": [
                    { "type": "split", "feature": 7, "threshold": 0.5, "left": 1, "right": 2 },
                    { "type": "leaf", "label": 0 },
                    { "type": "leaf", "label": 1 }
                ]},
                { "nodes": [
                    { "type": "split", "feature": 11, "threshold": 0.0, "left": 1, "right": 2 },
                    { "type": "leaf", "label": 0 },
                    { "type": "leaf", "label": 1 }
                ]},
                { "nodes": [
                    { "type": "split", "feature": 7, "threshold": 0.5, "left": 1, "right": 2 },
                    { "type": "leaf", "label": 0 },
                    { "type": "leaf", "label": 1 }
                ]}
            ]
        }
    })
}

pub(super) struct ArtifactDir {
    _dir: tempfile::TempDir,
    pub(super) path: PathBuf,
}

pub(super) fn write_artifact(contents: impl AsRef<[u8]>) -> ArtifactDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("loan_model.json");
    std::fs::write(&path, contents).expect("write artifact");
    ArtifactDir { _dir: dir, path }
}

pub(super) fn credit_weighted_predictor() -> Predictor {
    let artifact = serde_json::from_value(credit_weighted_artifact()).expect("artifact decodes");
    Predictor::from_artifact(artifact).expect("artifact validates")
}

pub(super) fn service() -> EligibilityService {
    EligibilityService::new(Arc::new(credit_weighted_predictor()))
}

/// Returns a fixed label and counts invocations.
#[derive(Default)]
pub(super) struct FixedClassifier {
    pub(super) label: i64,
    pub(super) calls: Arc<AtomicUsize>,
}

impl BinaryClassifier for FixedClassifier {
    fn predict(&self, features: &[f64]) -> Result<i64, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if features.len() != FEATURE_COUNT {
            return Err(ClassifierError::FeatureCount {
                expected: FEATURE_COUNT,
                found: features.len(),
            });
        }
        Ok(self.label)
    }

    fn family(&self) -> &'static str {
        "fixed"
    }
}

pub(super) struct FailingClassifier;

impl BinaryClassifier for FailingClassifier {
    fn predict(&self, _features: &[f64]) -> Result<i64, ClassifierError> {
        Err(ClassifierError::Traversal {
            reason: "corrupted node table".to_string(),
        })
    }

    fn family(&self) -> &'static str {
        "failing"
    }
}

pub(super) struct PanickingClassifier;

impl BinaryClassifier for PanickingClassifier {
    fn predict(&self, _features: &[f64]) -> Result<i64, ClassifierError> {
        panic!("shape mismatch inside native runtime");
    }

    fn family(&self) -> &'static str {
        "panicking"
    }
}

pub(super) fn failing_service() -> EligibilityService {
    EligibilityService::new(Arc::new(Predictor::with_classifier(
        "failing",
        Box::new(FailingClassifier),
    )))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
