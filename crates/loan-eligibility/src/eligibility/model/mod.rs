//! Serialized classifier artifacts and the in-process evaluators behind them.
//!
//! An artifact is a JSON document naming the feature columns it was trained on
//! and the parameters of one classifier family:
//!
//! ```json
//! {
//!   "model_name": "loan-logreg-v3",
//!   "feature_names": ["Gender", "Married", "..."],
//!   "classifier": { "kind": "logistic_regression", "coefficients": [...], "intercept": -1.2 }
//! }
//! ```

mod forest;
mod logistic;

pub use forest::{DecisionForest, DecisionTree, TreeNode};
pub use logistic::LogisticRegression;

use serde::{Deserialize, Serialize};

/// Binary classifier consulted once per submission.
pub trait BinaryClassifier: Send + Sync {
    /// Class label for a single feature row; `1` is the positive class.
    fn predict(&self, features: &[f64]) -> Result<i64, ClassifierError>;

    fn family(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("expected {expected} features, found {found}")]
    FeatureCount { expected: usize, found: usize },
    #[error("feature at position {index} is not a finite number")]
    NonFiniteFeature { index: usize },
    #[error("tree traversal failed: {reason}")]
    Traversal { reason: String },
}

/// On-disk representation of a trained classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_name: String,
    pub feature_names: Vec<String>,
    pub classifier: ClassifierSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    LogisticRegression(LogisticRegression),
    DecisionForest(DecisionForest),
}

impl ClassifierSpec {
    /// Structural checks so a loaded artifact can never fail on shape at inference time.
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        match self {
            ClassifierSpec::LogisticRegression(model) => model.validate(feature_count),
            ClassifierSpec::DecisionForest(model) => model.validate(feature_count),
        }
    }

    pub fn into_classifier(self) -> Box<dyn BinaryClassifier> {
        match self {
            ClassifierSpec::LogisticRegression(model) => Box::new(model),
            ClassifierSpec::DecisionForest(model) => Box::new(model),
        }
    }
}

pub(crate) fn check_row(features: &[f64], expected: usize) -> Result<(), ClassifierError> {
    if features.len() != expected {
        return Err(ClassifierError::FeatureCount {
            expected,
            found: features.len(),
        });
    }
    match features.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(ClassifierError::NonFiniteFeature { index }),
        None => Ok(()),
    }
}
