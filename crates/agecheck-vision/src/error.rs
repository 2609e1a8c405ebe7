//! Error types for vision capabilities.

use thiserror::Error;

/// Result type for capability providers.
pub type VisionResult<T> = Result<T, VisionError>;

/// Failures decoding the image wire payload.
///
/// Parse failures of individual fields are deliberately collapsed into
/// [`ImageDecodeError::Malformed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageDecodeError {
    #[error("Invalid base64 encoded image")]
    InvalidBase64,

    #[error("Image payload must be ASCII")]
    NotAscii,

    #[error("image payload must be width,height,intensity")]
    Malformed,

    #[error("image dimensions must be positive")]
    NonPositiveDimensions,

    #[error("intensity must be between 0 and 255")]
    IntensityOutOfRange,
}

/// Errors raised while building or running capability providers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisionError {
    #[error("Invalid model parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("Invalid prediction: {0}")]
    InvalidPrediction(String),
}

impl VisionError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Create an invalid prediction error.
    pub fn invalid_prediction(message: impl Into<String>) -> Self {
        Self::InvalidPrediction(message.into())
    }
}
