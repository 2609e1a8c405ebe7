//! Age model capability.

use agecheck_models::AgePrediction;

use crate::error::{VisionError, VisionResult};
use crate::image::Image;

/// Age prediction provider.
///
/// Implementations must be deterministic for identical input and report
/// `uncertainty` as one non-negative standard deviation of a normal error.
pub trait AgeModel: Send + Sync {
    /// Predict age from a normalized image.
    fn predict(&self, image: &Image) -> AgePrediction;

    /// Model name for logging.
    fn name(&self) -> &'static str;

    /// Model version for logging.
    fn version(&self) -> &'static str;
}

/// Linear regression head over mean intensity.
///
/// `value = slope * (mean_intensity / 255) + intercept`, with a fixed
/// residual standard deviation as uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibratedLinearModel {
    slope: f64,
    intercept: f64,
    residual_std: f64,
}

impl CalibratedLinearModel {
    pub const NAME: &'static str = "calibrated-linear";
    pub const VERSION: &'static str = "1.0.0";

    pub const DEFAULT_SLOPE: f64 = 60.0;
    pub const DEFAULT_INTERCEPT: f64 = 5.0;
    pub const DEFAULT_RESIDUAL_STD: f64 = 7.5;

    /// Create a model from calibration parameters.
    pub fn new(slope: f64, intercept: f64, residual_std: f64) -> VisionResult<Self> {
        if !slope.is_finite() {
            return Err(VisionError::invalid_parameter("slope", "must be finite"));
        }
        if !intercept.is_finite() {
            return Err(VisionError::invalid_parameter("intercept", "must be finite"));
        }
        if !residual_std.is_finite() || residual_std < 0.0 {
            return Err(VisionError::invalid_parameter(
                "residual_std",
                format!("must be a non-negative finite number, got {}", residual_std),
            ));
        }
        Ok(Self {
            slope,
            intercept,
            residual_std,
        })
    }
}

impl Default for CalibratedLinearModel {
    fn default() -> Self {
        Self {
            slope: Self::DEFAULT_SLOPE,
            intercept: Self::DEFAULT_INTERCEPT,
            residual_std: Self::DEFAULT_RESIDUAL_STD,
        }
    }
}

impl AgeModel for CalibratedLinearModel {
    fn predict(&self, image: &Image) -> AgePrediction {
        let value = self.slope * (image.mean_intensity() / 255.0) + self.intercept;
        AgePrediction::new(value, self.residual_std)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn version(&self) -> &'static str {
        Self::VERSION
    }
}
