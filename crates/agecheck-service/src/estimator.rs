//! Inference orchestration.
//!
//! ```text
//! payload
//!   │ validate        → ValidationError(field)
//!   │ decode image    → ValidationError(image_base64)
//!   │ resolution      → ValidationError(image_base64)
//!   │ detect faces
//!   │ face count      → InferenceError(no_faces | multiple_faces)
//!   │ occlusion       → InferenceError(occluded)
//!   │ crop + normalize
//!   │ predict + interval → EstimationError::Model (negative or NaN uncertainty)
//!   ▼
//! InferenceResponse
//! ```
//!
//! Every stage is terminal on failure; nothing is retried.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use agecheck_models::{
    AgeEstimate, ConfidenceInterval, FaceDetection, InferenceFailureReason, InferenceResponse,
    ResponseMetadata, ResponseStatus,
};
use agecheck_vision::{
    confidence_interval, crop_to_face, normalize_image, AgeModel, CalibratedLinearModel,
    DetectorKind, FaceDetector, Image,
};
use serde_json::Value;
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::error::{EstimationResult, ServiceResult, ValidationError};
use crate::metrics;
use crate::validation::{fields, validate_payload};

/// Runs the estimation pipeline against a fixed configuration.
///
/// Detector and model default to the configuration-selected
/// implementations; injected overrides take precedence. The estimator holds
/// no mutable state and can be shared across threads.
#[derive(Clone)]
pub struct AgeEstimator {
    config: Arc<ServiceConfig>,
    detector: Option<Arc<dyn FaceDetector>>,
    model: Option<Arc<dyn AgeModel>>,
}

impl AgeEstimator {
    pub fn new(config: Arc<ServiceConfig>) -> Self {
        Self {
            config,
            detector: None,
            model: None,
        }
    }

    /// Override the configured detector.
    pub fn with_detector(mut self, detector: Arc<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Override the default age model.
    pub fn with_model(mut self, model: Arc<dyn AgeModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Estimate age for one untyped request payload.
    pub fn estimate(&self, payload: &Value) -> EstimationResult<InferenceResponse> {
        let request_id = Uuid::new_v4();
        let span = info_span!("estimate", %request_id);
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.run_pipeline(payload);
        let elapsed = start.elapsed().as_secs_f64();

        match &result {
            Ok(response) => {
                info!(
                    age = response.age.value,
                    detector = %response.metadata.detector,
                    elapsed_ms = elapsed * 1000.0,
                    "Estimate complete"
                );
                metrics::record_success(&response.metadata.detector, elapsed);
            }
            Err(e) if e.is_rejection() => {
                warn!(kind = e.kind(), "Request rejected: {}", e);
                metrics::record_failure(e, elapsed);
            }
            Err(e) => {
                error!(kind = e.kind(), "Estimate failed: {}", e);
                metrics::record_failure(e, elapsed);
            }
        }
        result
    }

    fn run_pipeline(&self, payload: &Value) -> EstimationResult<InferenceResponse> {
        let request = validate_payload(payload, &self.config)?;
        debug!(
            confidence_level = request.confidence_level(),
            hints = request.detector_hints().len(),
            "Payload validated"
        );

        let image = Image::decode_base64(request.image_base64())
            .map_err(|e| ValidationError::new(fields::IMAGE, e.to_string()))?;
        check_resolution(&image, self.config.min_image_edge)?;
        debug!(width = image.width(), height = image.height(), "Image decoded");

        let detector = self.resolve_detector();
        let model = self.resolve_model();

        let detections = detector.detect(&image, request.detector_hints());
        let detection = select_single_face(&detections)?;
        debug!(
            detector = detector.name(),
            confidence = detection.confidence,
            "Face selected"
        );

        let face = normalize_image(&crop_to_face(&image, &detection));
        let prediction = model.predict(&face);
        let level = request.confidence_level();
        let (lower, upper) = confidence_interval(&prediction, level)?;
        debug!(
            model = model.name(),
            version = model.version(),
            value = prediction.value,
            uncertainty = prediction.uncertainty,
            "Prediction computed"
        );

        let metadata = &self.config.model_metadata;
        Ok(InferenceResponse {
            status: ResponseStatus::Success,
            age: AgeEstimate {
                value: prediction.value,
                confidence_interval: ConfidenceInterval {
                    level,
                    lower,
                    upper,
                },
            },
            metadata: ResponseMetadata {
                detector: detector.name().to_string(),
                model: metadata.summary(),
                fairness_warnings: metadata.fairness_warnings.clone(),
                limitations: metadata.limitations.clone(),
            },
            face_bbox: request
                .return_face_bbox()
                .then_some(detection.bounding_box),
        })
    }

    fn resolve_detector(&self) -> Arc<dyn FaceDetector> {
        match &self.detector {
            Some(detector) => Arc::clone(detector),
            None => DetectorKind::resolve(&self.config.detector_name).build(),
        }
    }

    fn resolve_model(&self) -> Arc<dyn AgeModel> {
        match &self.model {
            Some(model) => Arc::clone(model),
            None => Arc::new(CalibratedLinearModel::default()),
        }
    }
}

/// Reject images whose shorter edge is below `min_edge`.
pub fn check_resolution(image: &Image, min_edge: u32) -> Result<(), ValidationError> {
    if image.min_edge() < u64::from(min_edge) {
        return Err(ValidationError::new(
            fields::IMAGE,
            format!("image must be at least {}px on each edge", min_edge),
        ));
    }
    Ok(())
}

/// Require exactly one unoccluded face. Count is checked before occlusion.
pub fn select_single_face(
    detections: &[FaceDetection],
) -> Result<FaceDetection, InferenceFailureReason> {
    match detections {
        [] => Err(InferenceFailureReason::NoFaces),
        [single] if single.occluded => Err(InferenceFailureReason::Occluded),
        [single] => Ok(*single),
        _ => Err(InferenceFailureReason::MultipleFaces),
    }
}

/// Load configuration and run a single estimate.
///
/// Configuration is read fresh on every call; hold an [`AgeEstimator`] to
/// reuse it.
pub fn run_inference(
    payload: &Value,
    config_path: Option<&Path>,
    detector: Option<Arc<dyn FaceDetector>>,
    model: Option<Arc<dyn AgeModel>>,
) -> ServiceResult<InferenceResponse> {
    let config = ServiceConfig::load(config_path)?;

    let mut estimator = AgeEstimator::new(Arc::new(config));
    if let Some(detector) = detector {
        estimator = estimator.with_detector(detector);
    }
    if let Some(model) = model {
        estimator = estimator.with_model(model);
    }
    Ok(estimator.estimate(payload)?)
}
