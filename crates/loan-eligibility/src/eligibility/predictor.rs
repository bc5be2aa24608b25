use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::Verdict;
use super::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use super::model::{BinaryClassifier, ModelArtifact};

/// Failure to produce a usable [`Predictor`]; the service must not start without one.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("model artifact not found at {}", .path.display())]
    Missing { path: PathBuf },
    #[error("failed to read model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("artifact features {found:?} do not match expected {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("invalid model artifact: {reason}")]
    InvalidArtifact { reason: String },
}

/// Inference failed for a single submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("prediction failed: {message}")]
pub struct PredictionError {
    message: String,
}

impl PredictionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Descriptive metadata exposed alongside the loaded classifier.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub family: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<PathBuf>,
    pub loaded_at: DateTime<Utc>,
    pub feature_names: [&'static str; FEATURE_COUNT],
}

/// Immutable handle on the loaded classifier.
pub struct Predictor {
    classifier: Box<dyn BinaryClassifier>,
    info: ModelInfo,
}

impl fmt::Debug for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predictor").field("info", &self.info).finish()
    }
}

impl Predictor {
    /// Read and validate the artifact at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ModelLoadError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                ModelLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let artifact: ModelArtifact =
            serde_json::from_slice(&raw).map_err(|source| ModelLoadError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;

        let mut predictor = Self::from_artifact(artifact)?;
        predictor.info.artifact_path = Some(path.to_path_buf());

        info!(
            model = %predictor.info.model_name,
            family = predictor.info.family,
            path = %path.display(),
            "classifier artifact loaded"
        );
        Ok(predictor)
    }

    /// Build from an already-decoded artifact, enforcing the training schema.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelLoadError> {
        let ModelArtifact {
            model_name,
            feature_names,
            classifier,
        } = artifact;

        if feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(ModelLoadError::SchemaMismatch {
                expected: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
                found: feature_names,
            });
        }

        classifier
            .validate(FEATURE_COUNT)
            .map_err(|reason| ModelLoadError::InvalidArtifact { reason })?;

        Ok(Self::with_classifier(model_name, classifier.into_classifier()))
    }

    /// Wrap a classifier that does not come from an artifact file.
    pub fn with_classifier(
        model_name: impl Into<String>,
        classifier: Box<dyn BinaryClassifier>,
    ) -> Self {
        let info = ModelInfo {
            model_name: model_name.into(),
            family: classifier.family(),
            artifact_path: None,
            loaded_at: Utc::now(),
            feature_names: FEATURE_NAMES,
        };
        Self { classifier, info }
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Classify one feature vector. Classifier faults, panics included, become
    /// [`PredictionError`].
    pub fn predict(&self, features: &FeatureVector) -> Result<Verdict, PredictionError> {
        let row = features.to_array();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.classifier.predict(&row)));

        match outcome {
            Ok(Ok(label)) => Ok(Verdict::from_label(label)),
            Ok(Err(err)) => {
                warn!(model = %self.info.model_name, error = %err, "classifier rejected input");
                Err(PredictionError::new(err.to_string()))
            }
            Err(payload) => {
                let message = panic_message(&*payload);
                warn!(model = %self.info.model_name, error = %message, "classifier panicked");
                Err(PredictionError::new(message))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "classifier panicked".to_string()
    }
}

/// Loads the artifact at most once and hands out shared references to it.
///
/// A failed load leaves the store empty so a later call can retry.
#[derive(Debug)]
pub struct ModelStore {
    path: PathBuf,
    predictor: OnceLock<Arc<Predictor>>,
    init: Mutex<()>,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            predictor: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached predictor, if a load has succeeded.
    pub fn get(&self) -> Option<Arc<Predictor>> {
        self.predictor.get().cloned()
    }

    pub fn load(&self) -> Result<Arc<Predictor>, ModelLoadError> {
        if let Some(predictor) = self.predictor.get() {
            return Ok(predictor.clone());
        }

        // Serializes concurrent first access; the guard protects no data.
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(predictor) = self.predictor.get() {
            return Ok(predictor.clone());
        }

        let predictor = Arc::new(Predictor::load(&self.path)?);
        Ok(self.predictor.get_or_init(|| predictor).clone())
    }
}
