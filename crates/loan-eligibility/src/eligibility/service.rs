use std::sync::Arc;

use serde::Serialize;

use super::domain::{RawApplication, Verdict};
use super::features::{transform, FeatureError, FeatureVector};
use super::predictor::{ModelInfo, PredictionError, Predictor};

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub verdict: Verdict,
    pub message: &'static str,
    pub features: FeatureVector,
}

/// Service composing the feature transformer with the shared predictor.
#[derive(Debug, Clone)]
pub struct EligibilityService {
    predictor: Arc<Predictor>,
}

impl EligibilityService {
    pub fn new(predictor: Arc<Predictor>) -> Self {
        Self { predictor }
    }

    pub fn model_info(&self) -> &ModelInfo {
        self.predictor.info()
    }

    /// Transform the raw answers and classify them.
    pub fn assess(&self, application: &RawApplication) -> Result<Assessment, EligibilityError> {
        let features = transform(application)?;
        let verdict = self.predictor.predict(&features)?;

        Ok(Assessment {
            verdict,
            message: verdict.message(),
            features,
        })
    }
}

/// Error raised by the eligibility service.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityError {
    #[error(transparent)]
    Features(#[from] FeatureError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}
