//! Age estimation service.
//!
//! This crate provides:
//! - Configuration loading (JSON file + environment overrides)
//! - Request validation with stable, field-level errors
//! - The inference orchestrator ([`AgeEstimator`], [`run_inference`])
//! - Outcome metrics

pub mod config;
pub mod error;
pub mod estimator;
pub mod metrics;
pub mod validation;

pub use config::{ModelMetadata, ServiceConfig, DEFAULT_CONFIG_PATH};
pub use error::{
    ConfigError, ErrorBody, EstimationError, EstimationResult, InferenceError, ServiceError,
    ServiceResult, ValidationError,
};
pub use estimator::{check_resolution, run_inference, select_single_face, AgeEstimator};
pub use validation::{validate_payload, ValidatedRequest};
