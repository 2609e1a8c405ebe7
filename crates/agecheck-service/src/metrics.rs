//! Inference metrics.
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! these calls are no-ops.

use metrics::{counter, histogram};

use crate::error::EstimationError;

/// Metric names as constants for consistency.
pub mod names {
    pub const INFERENCES_TOTAL: &str = "agecheck_inferences_total";
    pub const INFERENCE_DURATION_SECONDS: &str = "agecheck_inference_duration_seconds";
    pub const VALIDATION_FAILURES_TOTAL: &str = "agecheck_validation_failures_total";
    pub const INFERENCE_FAILURES_TOTAL: &str = "agecheck_inference_failures_total";
    pub const MODEL_FAILURES_TOTAL: &str = "agecheck_model_failures_total";
}

/// Record a successful estimate.
pub fn record_success(detector: &str, duration_secs: f64) {
    let labels = [
        ("outcome", "success".to_string()),
        ("detector", detector.to_string()),
    ];
    counter!(names::INFERENCES_TOTAL, &labels).increment(1);
    histogram!(names::INFERENCE_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a rejected request.
pub fn record_failure(error: &EstimationError, duration_secs: f64) {
    let labels = [("outcome", error.kind().to_string())];
    counter!(names::INFERENCES_TOTAL, &labels).increment(1);
    histogram!(names::INFERENCE_DURATION_SECONDS, &labels).record(duration_secs);

    match error {
        EstimationError::Validation(e) => {
            let labels = [("field", e.field().unwrap_or("payload").to_string())];
            counter!(names::VALIDATION_FAILURES_TOTAL, &labels).increment(1);
        }
        EstimationError::Inference(e) => {
            let labels = [("reason", e.reason.as_str().to_string())];
            counter!(names::INFERENCE_FAILURES_TOTAL, &labels).increment(1);
        }
        EstimationError::Model(_) => {
            counter!(names::MODEL_FAILURES_TOTAL).increment(1);
        }
    }
}
