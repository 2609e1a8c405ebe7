//! Reasons an otherwise well-formed request cannot produce an estimate.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Machine-readable discriminator carried by inference failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InferenceFailureReason {
    /// The detector reported no faces.
    NoFaces,
    /// The detector reported more than one face.
    MultipleFaces,
    /// The single detected face is flagged as occluded.
    Occluded,
}

impl InferenceFailureReason {
    /// All failure reasons, in the order the orchestrator checks them.
    pub const ALL: &'static [InferenceFailureReason] = &[
        InferenceFailureReason::NoFaces,
        InferenceFailureReason::MultipleFaces,
        InferenceFailureReason::Occluded,
    ];

    /// Returns the reason as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceFailureReason::NoFaces => "no_faces",
            InferenceFailureReason::MultipleFaces => "multiple_faces",
            InferenceFailureReason::Occluded => "occluded",
        }
    }

    /// Returns a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            InferenceFailureReason::NoFaces => "no faces detected",
            InferenceFailureReason::MultipleFaces => "multiple faces detected",
            InferenceFailureReason::Occluded => "primary face appears occluded",
        }
    }
}

impl fmt::Display for InferenceFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InferenceFailureReason {
    type Err = InferenceFailureReasonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "no_faces" => Ok(InferenceFailureReason::NoFaces),
            "multiple_faces" => Ok(InferenceFailureReason::MultipleFaces),
            "occluded" => Ok(InferenceFailureReason::Occluded),
            _ => Err(InferenceFailureReasonParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown inference failure reason: {0}")]
pub struct InferenceFailureReasonParseError(String);
