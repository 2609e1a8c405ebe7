//! Detection and prediction primitives exchanged between the detector,
//! the age model and the orchestrator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Bounding box in integer pixel coordinates.
///
/// Coordinates are not checked for negativity here; callers that accept
/// boxes from untrusted input validate them before construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    /// Left edge x-coordinate
    pub x: i64,
    /// Top edge y-coordinate
    pub y: i64,
    /// Box width
    pub width: i64,
    /// Box height
    pub height: i64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Return the box as an `(x, y, width, height)` tuple.
    #[inline]
    pub fn as_tuple(&self) -> (i64, i64, i64, i64) {
        (self.x, self.y, self.width, self.height)
    }
}

/// A single face reported by a detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaceDetection {
    /// Bounding box of the face
    pub bounding_box: BoundingBox,
    /// Detection confidence score (0.0-1.0)
    pub confidence: f64,
    /// Whether the face is partially obscured
    #[serde(default)]
    pub occluded: bool,
}

impl FaceDetection {
    /// Create an unoccluded detection.
    pub fn new(bounding_box: BoundingBox, confidence: f64) -> Self {
        Self {
            bounding_box,
            confidence,
            occluded: false,
        }
    }

    /// Builder-style setter for the occlusion flag.
    pub fn with_occluded(mut self, occluded: bool) -> Self {
        self.occluded = occluded;
        self
    }
}

/// Point estimate of age with its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AgePrediction {
    /// Predicted age in years
    pub value: f64,
    /// One standard deviation of the assumed normal error, in years
    pub uncertainty: f64,
}

impl AgePrediction {
    pub fn new(value: f64, uncertainty: f64) -> Self {
        Self { value, uncertainty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_serializes_as_flat_object() {
        let bbox = BoundingBox::new(10, 20, 100, 120);
        let json = serde_json::to_value(bbox).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"x": 10, "y": 20, "width": 100, "height": 120})
        );
    }

    #[test]
    fn test_detection_defaults_to_unoccluded() {
        let detection: FaceDetection = serde_json::from_value(serde_json::json!({
            "bounding_box": {"x": 1, "y": 2, "width": 3, "height": 4},
            "confidence": 0.9
        }))
        .unwrap();
        assert!(!detection.occluded);
        assert!(FaceDetection::new(BoundingBox::new(0, 0, 1, 1), 0.5)
            .with_occluded(true)
            .occluded);
    }
}
