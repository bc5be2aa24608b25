use serde::{Deserialize, Serialize};

use super::{check_row, BinaryClassifier, ClassifierError};

fn default_threshold() -> f64 {
    0.5
}

/// `sigmoid(w·x + b) >= threshold` selects the positive class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticRegression {
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.coefficients.len() != feature_count {
            return Err(format!(
                "logistic regression has {} coefficients for {} features",
                self.coefficients.len(),
                feature_count
            ));
        }
        if self.coefficients.iter().any(|weight| !weight.is_finite()) {
            return Err("logistic regression coefficients must be finite".to_string());
        }
        if !self.intercept.is_finite() {
            return Err("logistic regression intercept must be finite".to_string());
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(format!(
                "decision threshold {} must lie strictly between 0 and 1",
                self.threshold
            ));
        }
        Ok(())
    }

    /// Probability of the positive class.
    pub fn probability(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        check_row(features, self.coefficients.len())?;
        let logit = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(weight, value)| weight * value)
            .sum::<f64>()
            + self.intercept;
        Ok(sigmoid(logit))
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl BinaryClassifier for LogisticRegression {
    fn predict(&self, features: &[f64]) -> Result<i64, ClassifierError> {
        let probability = self.probability(features)?;
        Ok(i64::from(probability >= self.threshold))
    }

    fn family(&self) -> &'static str {
        "logistic_regression"
    }
}
