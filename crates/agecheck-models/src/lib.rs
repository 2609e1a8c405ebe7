//! Shared data models for the age estimation service.
//!
//! This crate provides Serde-serializable types for:
//! - Face bounding boxes and detections
//! - Age predictions
//! - The success response schema
//! - Inference failure reasons

pub mod detection;
pub mod reason;
pub mod response;

// Re-export common types
pub use detection::{AgePrediction, BoundingBox, FaceDetection};
pub use reason::{InferenceFailureReason, InferenceFailureReasonParseError};
pub use response::{
    AgeEstimate, ConfidenceInterval, InferenceResponse, ModelSummary, ResponseMetadata,
    ResponseStatus,
};
