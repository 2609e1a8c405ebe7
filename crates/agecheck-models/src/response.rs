//! Success response returned by the inference entry point.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::detection::BoundingBox;

/// Response status discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    #[default]
    Success,
}

/// Symmetric interval around the predicted age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConfidenceInterval {
    /// Requested confidence level, as validated (not clamped)
    pub level: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AgeEstimate {
    /// Point estimate in years
    pub value: f64,
    pub confidence_interval: ConfidenceInterval,
}

/// Model identity block copied from the service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelSummary {
    pub name: String,
    pub version: String,
    pub mean_absolute_error: f64,
    pub calibration_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResponseMetadata {
    /// Name of the detector implementation that actually ran
    pub detector: String,
    pub model: ModelSummary,
    pub fairness_warnings: Vec<String>,
    pub limitations: Vec<String>,
}

/// Full success response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InferenceResponse {
    pub status: ResponseStatus,
    pub age: AgeEstimate,
    pub metadata: ResponseMetadata,
    /// Present only when the request asked for it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_bbox: Option<BoundingBox>,
}
