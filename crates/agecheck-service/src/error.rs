//! Error taxonomy for the age estimation service.
//!
//! Per-request failures are [`ValidationError`] (bad or policy-violating
//! input), [`InferenceError`] (well-formed input that cannot yield an
//! estimate) or a model fault surfaced as [`VisionError`]. Configuration
//! failures are startup-level and kept apart in [`ConfigError`].

use std::path::PathBuf;

use agecheck_models::InferenceFailureReason;
use agecheck_vision::VisionError;
use serde::Serialize;
use thiserror::Error;

/// Result type for a single estimation call.
pub type EstimationResult<T> = Result<T, EstimationError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for [`crate::run_inference`].
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Malformed or policy-violating input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Offending request field, if the failure is attributable to one
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Failure not attributable to a single field.
    pub fn without_field(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

/// Well-formed input that cannot produce a usable estimate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InferenceError {
    pub reason: InferenceFailureReason,
    pub message: String,
}

impl InferenceError {
    pub fn new(reason: InferenceFailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

impl From<InferenceFailureReason> for InferenceError {
    fn from(reason: InferenceFailureReason) -> Self {
        Self::new(reason, reason.description())
    }
}

/// Any per-request failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimationError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    /// The model produced output the pipeline cannot use.
    #[error("Model error: {0}")]
    Model(#[from] VisionError),
}

impl EstimationError {
    /// Machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EstimationError::Validation(_) => "validation_error",
            EstimationError::Inference(_) => "inference_error",
            EstimationError::Model(_) => "model_error",
        }
    }

    /// Whether the request itself was at fault, as opposed to the model.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, EstimationError::Model(_))
    }

    /// Serializable error body for callers outside the process.
    pub fn to_body(&self) -> ErrorBody {
        match self {
            EstimationError::Validation(e) => ErrorBody {
                error: self.kind(),
                detail: e.message.clone(),
                field: e.field.clone(),
                reason: None,
            },
            EstimationError::Inference(e) => ErrorBody {
                error: self.kind(),
                detail: e.message.clone(),
                field: None,
                reason: Some(e.reason),
            },
            EstimationError::Model(e) => ErrorBody {
                error: self.kind(),
                detail: e.to_string(),
                field: None,
                reason: None,
            },
        }
    }
}

impl From<InferenceFailureReason> for EstimationError {
    fn from(reason: InferenceFailureReason) -> Self {
        Self::Inference(reason.into())
    }
}

/// Wire form of an [`EstimationError`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<InferenceFailureReason>,
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Failure of [`crate::run_inference`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Estimation(#[from] EstimationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_carries_field() {
        let err: EstimationError = ValidationError::new("consent", "consent must be granted").into();
        let body = serde_json::to_value(err.to_body()).unwrap();
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["field"], "consent");
        assert_eq!(body["detail"], "consent must be granted");
        assert!(body.get("reason").is_none());
    }

    #[test]
    fn test_inference_body_carries_reason() {
        let err = EstimationError::from(InferenceFailureReason::MultipleFaces);
        let body = serde_json::to_value(err.to_body()).unwrap();
        assert_eq!(body["error"], "inference_error");
        assert_eq!(body["reason"], "multiple_faces");
        assert_eq!(body["detail"], "multiple faces detected");
        assert!(body.get("field").is_none());
    }

    #[test]
    fn test_model_body_is_not_a_rejection() {
        let err = EstimationError::from(VisionError::invalid_prediction(
            "uncertainty must be non-negative, got -2",
        ));
        assert!(!err.is_rejection());
        assert!(EstimationError::from(InferenceFailureReason::NoFaces).is_rejection());

        let body = serde_json::to_value(err.to_body()).unwrap();
        assert_eq!(body["error"], "model_error");
        assert_eq!(
            body["detail"],
            "Invalid prediction: uncertainty must be non-negative, got -2"
        );
        assert!(body.get("field").is_none());
        assert!(body.get("reason").is_none());
    }

    #[test]
    fn test_display_includes_message() {
        let err = ValidationError::without_field("payload must be an object");
        assert_eq!(err.to_string(), "payload must be an object");
        assert_eq!(err.field(), None);
        assert_eq!(
            EstimationError::from(err).to_string(),
            "Validation error: payload must be an object"
        );
    }
}
