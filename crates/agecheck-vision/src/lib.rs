//! Capability providers for the age estimation pipeline.
//!
//! This crate provides:
//! - The placeholder image type and its base64 wire codec
//! - The `FaceDetector` trait with a hint-aware reference detector
//! - The `AgeModel` trait with a calibrated linear reference model
//! - Symmetric confidence intervals from the inverse normal CDF

pub mod detector;
pub mod error;
pub mod image;
pub mod interval;
pub mod model;

pub use detector::{
    crop_to_face, DetectorKind, DetectorKindParseError, FaceDetector, SimpleFaceDetector,
};
pub use error::{ImageDecodeError, VisionError, VisionResult};
pub use image::{normalize_image, Image, NORMALIZED_EDGE};
pub use interval::{confidence_interval, inverse_normal_cdf, MAX_CONFIDENCE_LEVEL};
pub use model::{AgeModel, CalibratedLinearModel};
