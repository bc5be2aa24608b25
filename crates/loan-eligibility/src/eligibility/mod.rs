//! Loan eligibility checks: form answers are encoded into the fixed feature
//! vector the classifier was trained on, then classified into a verdict.

pub mod domain;
pub mod features;
pub mod model;
pub mod predictor;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{CategoricalField, RawApplication, Verdict};
pub use features::{transform, FeatureError, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use model::{
    BinaryClassifier, ClassifierError, ClassifierSpec, DecisionForest, DecisionTree,
    LogisticRegression, ModelArtifact, TreeNode,
};
pub use predictor::{ModelInfo, ModelLoadError, ModelStore, PredictionError, Predictor};
pub use router::{eligibility_router, FormSchema};
pub use service::{Assessment, EligibilityError, EligibilityService};
