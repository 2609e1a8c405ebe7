//! Face detection capability.
//!
//! Detectors are reached through the [`FaceDetector`] trait so real
//! detection engines can replace the reference implementation without
//! touching the orchestrator.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use agecheck_models::{BoundingBox, FaceDetection};
use thiserror::Error;
use tracing::{debug, warn};

use crate::image::Image;

/// Face detection provider.
///
/// Implementations must be safe to share across concurrent calls.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in `image`.
    ///
    /// `hints` are caller-supplied boxes the detector may honor instead of
    /// running its own localization. An empty slice means no hints.
    fn detect(&self, image: &Image, hints: &[BoundingBox]) -> Vec<FaceDetection>;

    /// Provider name reported in response metadata.
    fn name(&self) -> &'static str;
}

/// Reference detector that honors hints or falls back to the central 80%
/// of the frame.
///
/// Without hints it always reports exactly one face; zero or multiple faces
/// only come from hints or other detector implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleFaceDetector;

impl SimpleFaceDetector {
    pub const NAME: &'static str = "simple";

    /// Confidence assigned to caller-supplied hint boxes.
    pub const HINT_CONFIDENCE: f64 = 0.9;
    /// Confidence assigned to the full-frame fallback box.
    pub const FALLBACK_CONFIDENCE: f64 = 0.5;

    const MARGIN: f64 = 0.1;
    const EXTENT: f64 = 0.8;

    pub fn new() -> Self {
        Self
    }

    fn fallback_box(image: &Image) -> BoundingBox {
        let width = image.width() as f64;
        let height = image.height() as f64;
        BoundingBox::new(
            (width * Self::MARGIN) as i64,
            (height * Self::MARGIN) as i64,
            (width * Self::EXTENT) as i64,
            (height * Self::EXTENT) as i64,
        )
    }
}

impl FaceDetector for SimpleFaceDetector {
    fn detect(&self, image: &Image, hints: &[BoundingBox]) -> Vec<FaceDetection> {
        if !hints.is_empty() {
            debug!(hints = hints.len(), "Using detector hints");
            return hints
                .iter()
                .map(|hint| FaceDetection::new(*hint, Self::HINT_CONFIDENCE))
                .collect();
        }

        let bbox = Self::fallback_box(image);
        debug!(
            x = bbox.x,
            y = bbox.y,
            width = bbox.width,
            height = bbox.height,
            "No hints, using central box"
        );
        vec![FaceDetection::new(bbox, Self::FALLBACK_CONFIDENCE)]
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Crop the image to the detection's bounding box.
pub fn crop_to_face(image: &Image, detection: &FaceDetection) -> Image {
    let (x, y, width, height) = detection.bounding_box.as_tuple();
    image.crop(x, y, width, height)
}

/// Detector implementations selectable by name from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DetectorKind {
    /// [`SimpleFaceDetector`]
    #[default]
    Simple,
}

impl DetectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::Simple => SimpleFaceDetector::NAME,
        }
    }

    /// Resolve a configured detector name.
    ///
    /// Unknown names fall back to the default detector with a warning.
    pub fn resolve(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: DetectorKindParseError| {
            warn!("{}, falling back to {}", e, DetectorKind::default());
            DetectorKind::default()
        })
    }

    /// Instantiate the detector.
    pub fn build(&self) -> Arc<dyn FaceDetector> {
        match self {
            DetectorKind::Simple => Arc::new(SimpleFaceDetector::new()),
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DetectorKind {
    type Err = DetectorKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(DetectorKind::Simple),
            _ => Err(DetectorKindParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown detector: {0}")]
pub struct DetectorKindParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_become_detections() {
        let image = Image::new(256, 256, 100.0).unwrap();
        let hints = [BoundingBox::new(10, 10, 90, 90), BoundingBox::new(120, 20, 80, 80)];

        let detections = SimpleFaceDetector::new().detect(&image, &hints);

        assert_eq!(detections.len(), 2);
        for (detection, hint) in detections.iter().zip(hints.iter()) {
            assert_eq!(detection.bounding_box, *hint);
            assert_eq!(detection.confidence, SimpleFaceDetector::HINT_CONFIDENCE);
            assert!(!detection.occluded);
        }
    }

    #[test]
    fn test_fallback_is_central_box_truncated() {
        let image = Image::new(256, 130, 100.0).unwrap();

        let detections = SimpleFaceDetector::new().detect(&image, &[]);

        assert_eq!(detections.len(), 1);
        // 256 * 0.1 = 25.6, 256 * 0.8 = 204.8, 130 * 0.1 = 13, 130 * 0.8 = 104
        assert_eq!(detections[0].bounding_box, BoundingBox::new(25, 13, 204, 104));
        assert_eq!(detections[0].confidence, SimpleFaceDetector::FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_crop_to_face_uses_bbox() {
        let image = Image::new(256, 256, 100.0).unwrap();
        let detection = FaceDetection::new(BoundingBox::new(200, 10, 100, 120), 0.9);

        let cropped = crop_to_face(&image, &detection);

        assert_eq!(cropped.size(), (56, 120));
    }

    #[test]
    fn test_detector_kind_parse() {
        assert_eq!("simple".parse::<DetectorKind>().unwrap(), DetectorKind::Simple);
        assert_eq!(" Simple ".parse::<DetectorKind>().unwrap(), DetectorKind::Simple);
        assert!("yunet".parse::<DetectorKind>().is_err());
    }

    #[test]
    fn test_unknown_detector_falls_back() {
        assert_eq!(DetectorKind::resolve("retinaface"), DetectorKind::Simple);
        assert_eq!(DetectorKind::resolve("simple").build().name(), "simple");
    }
}
