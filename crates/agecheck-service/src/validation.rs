//! Request validation.
//!
//! Turns an untyped JSON payload into a [`ValidatedRequest`], stopping at the
//! first failure. Loose values are coerced the way a dynamic client would
//! expect: truthiness for flags, numeric strings for numbers.

use agecheck_models::BoundingBox;
use serde_json::{Map, Value};

use crate::config::ServiceConfig;
use crate::error::ValidationError;

/// Request field names as they appear on the wire.
pub mod fields {
    pub const CONSENT: &str = "consent";
    pub const IMAGE: &str = "image_base64";
    pub const CONFIDENCE_LEVEL: &str = "confidence_level";
    pub const RETURN_FACE_BBOX: &str = "return_face_bbox";
    pub const DETECTOR_HINTS: &str = "detector_hints";
}

/// A request that passed schema and consent checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    image_base64: String,
    consent: bool,
    confidence_level: f64,
    return_face_bbox: bool,
    detector_hints: Vec<BoundingBox>,
}

impl ValidatedRequest {
    /// Base64 image payload, not yet decoded.
    pub fn image_base64(&self) -> &str {
        &self.image_base64
    }

    /// Always true for a validated request.
    pub fn consent(&self) -> bool {
        self.consent
    }

    /// Requested confidence level, strictly inside (0, 1).
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn return_face_bbox(&self) -> bool {
        self.return_face_bbox
    }

    pub fn detector_hints(&self) -> &[BoundingBox] {
        &self.detector_hints
    }
}

/// Validate `payload` against the request schema.
pub fn validate_payload(
    payload: &Value,
    config: &ServiceConfig,
) -> Result<ValidatedRequest, ValidationError> {
    let payload = payload
        .as_object()
        .ok_or_else(|| ValidationError::without_field("payload must be an object"))?;

    let consent = payload
        .get(fields::CONSENT)
        .ok_or_else(|| ValidationError::new(fields::CONSENT, "consent is required"))?;
    if !is_truthy(consent) {
        return Err(ValidationError::new(fields::CONSENT, "consent must be granted"));
    }

    let image_base64 = parse_image(payload)?;

    let confidence_level = match payload.get(fields::CONFIDENCE_LEVEL) {
        Some(value) => coerce_f64(value).ok_or_else(|| {
            ValidationError::new(fields::CONFIDENCE_LEVEL, "confidence level must be a number")
        })?,
        None => config.default_confidence_level,
    };
    let confidence_level = check_confidence_level(confidence_level)?;

    let return_face_bbox = payload
        .get(fields::RETURN_FACE_BBOX)
        .map(is_truthy)
        .unwrap_or(config.return_face_bbox_default);

    let detector_hints = parse_detector_hints(payload.get(fields::DETECTOR_HINTS))?;

    Ok(ValidatedRequest {
        image_base64,
        consent: true,
        confidence_level,
        return_face_bbox,
        detector_hints,
    })
}

fn parse_image(payload: &Map<String, Value>) -> Result<String, ValidationError> {
    let value = payload
        .get(fields::IMAGE)
        .ok_or_else(|| ValidationError::new(fields::IMAGE, "image_base64 is required"))?;
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ValidationError::new(
            fields::IMAGE,
            "image_base64 must be a non-empty string",
        )),
    }
}

fn check_confidence_level(level: f64) -> Result<f64, ValidationError> {
    // NaN fails both comparisons.
    if !(level > 0.0 && level < 1.0) {
        return Err(ValidationError::new(
            fields::CONFIDENCE_LEVEL,
            "confidence level must be in (0, 1)",
        ));
    }
    Ok(level)
}

fn parse_detector_hints(value: Option<&Value>) -> Result<Vec<BoundingBox>, ValidationError> {
    let entries = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(ValidationError::new(
                fields::DETECTOR_HINTS,
                "detector_hints must be a list",
            ))
        }
    };

    entries
        .iter()
        .map(|entry| -> Result<BoundingBox, ValidationError> {
            let entry = entry.as_object().ok_or_else(|| {
                ValidationError::new(
                    fields::DETECTOR_HINTS,
                    "detector_hints entries must be objects",
                )
            })?;
            let coord = |key: &str| {
                entry
                    .get(key)
                    .and_then(coerce_i64)
                    .ok_or_else(|| {
                        ValidationError::new(fields::DETECTOR_HINTS, "invalid detector hint")
                    })
            };
            Ok(BoundingBox::new(
                coord("x")?,
                coord("y")?,
                coord("width")?,
                coord("height")?,
            ))
        })
        .collect()
}

/// `null`, `false`, zero, and empty strings/lists/objects are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Integers pass through, finite floats truncate toward zero, strings must
/// hold an integer literal.
fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ServiceConfig {
        ServiceConfig::default()
    }

    fn base_payload() -> Value {
        json!({"consent": true, "image_base64": "MjU2LDI1NiwxODAuMA=="})
    }

    fn field_of(payload: Value) -> Option<String> {
        validate_payload(&payload, &config()).unwrap_err().field
    }

    #[test]
    fn test_minimal_payload_uses_config_defaults() {
        let config = ServiceConfig {
            default_confidence_level: 0.8,
            return_face_bbox_default: true,
            ..ServiceConfig::default()
        };

        let request = validate_payload(&base_payload(), &config).unwrap();

        assert!(request.consent());
        assert_eq!(request.image_base64(), "MjU2LDI1NiwxODAuMA==");
        assert_eq!(request.confidence_level(), 0.8);
        assert!(request.return_face_bbox());
        assert!(request.detector_hints().is_empty());
    }

    #[test]
    fn test_payload_must_be_object() {
        let err = validate_payload(&json!([1, 2]), &config()).unwrap_err();
        assert_eq!(err.field, None);
        assert_eq!(err.message, "payload must be an object");
    }

    #[test]
    fn test_consent_missing_and_false_have_distinct_messages() {
        let missing = validate_payload(&json!({"image_base64": "abc"}), &config()).unwrap_err();
        assert_eq!(missing.field(), Some("consent"));
        assert_eq!(missing.message, "consent is required");

        for falsy in [json!(false), json!(0), json!(""), json!(null)] {
            let err = validate_payload(&json!({"consent": falsy, "image_base64": "abc"}), &config())
                .unwrap_err();
            assert_eq!(err.field(), Some("consent"));
            assert_eq!(err.message, "consent must be granted");
        }
    }

    #[test]
    fn test_consent_checked_before_image() {
        assert_eq!(
            field_of(json!({"image_base64": "", "consent": false})),
            Some("consent".to_string())
        );
    }

    #[test]
    fn test_image_must_be_non_empty_string() {
        assert_eq!(field_of(json!({"consent": true})), Some("image_base64".to_string()));
        assert_eq!(
            field_of(json!({"consent": true, "image_base64": ""})),
            Some("image_base64".to_string())
        );
        assert_eq!(
            field_of(json!({"consent": true, "image_base64": 42})),
            Some("image_base64".to_string())
        );
    }

    #[test]
    fn test_confidence_level_bounds_are_exclusive() {
        for level in [json!(0), json!(0.0), json!(1), json!(1.0), json!(1.5), json!(-0.2)] {
            let mut payload = base_payload();
            payload["confidence_level"] = level;
            let err = validate_payload(&payload, &config()).unwrap_err();
            assert_eq!(err.field(), Some("confidence_level"));
            assert_eq!(err.message, "confidence level must be in (0, 1)");
        }
    }

    #[test]
    fn test_confidence_level_coercion() {
        let mut payload = base_payload();
        payload["confidence_level"] = json!(" 0.95 ");
        assert_eq!(validate_payload(&payload, &config()).unwrap().confidence_level(), 0.95);

        payload["confidence_level"] = json!("high");
        let err = validate_payload(&payload, &config()).unwrap_err();
        assert_eq!(err.message, "confidence level must be a number");

        payload["confidence_level"] = json!(null);
        let err = validate_payload(&payload, &config()).unwrap_err();
        assert_eq!(err.message, "confidence level must be a number");

        payload["confidence_level"] = json!("NaN");
        let err = validate_payload(&payload, &config()).unwrap_err();
        assert_eq!(err.message, "confidence level must be in (0, 1)");
    }

    #[test]
    fn test_return_face_bbox_truthiness() {
        let mut payload = base_payload();
        payload["return_face_bbox"] = json!(1);
        assert!(validate_payload(&payload, &config()).unwrap().return_face_bbox());

        payload["return_face_bbox"] = json!(null);
        assert!(!validate_payload(&payload, &config()).unwrap().return_face_bbox());
    }

    #[test]
    fn test_detector_hints_parsed() {
        let mut payload = base_payload();
        payload["detector_hints"] = json!([
            {"x": 10, "y": "20", "width": 100.9, "height": 120},
            {"x": -5, "y": 0, "width": 50, "height": true}
        ]);

        let request = validate_payload(&payload, &config()).unwrap();

        assert_eq!(
            request.detector_hints(),
            &[BoundingBox::new(10, 20, 100, 120), BoundingBox::new(-5, 0, 50, 1)]
        );
    }

    #[test]
    fn test_detector_hints_rejections() {
        let cases = [
            (json!({"x": 1}), "detector_hints must be a list"),
            (json!([1, 2]), "detector_hints entries must be objects"),
            (json!([{"x": 1, "y": 2, "width": 3}]), "invalid detector hint"),
            (json!([{"x": 1, "y": 2, "width": "3.5", "height": 4}]), "invalid detector hint"),
            (json!([{"x": null, "y": 2, "width": 3, "height": 4}]), "invalid detector hint"),
        ];
        for (hints, message) in cases {
            let mut payload = base_payload();
            payload["detector_hints"] = hints;
            let err = validate_payload(&payload, &config()).unwrap_err();
            assert_eq!(err.field(), Some("detector_hints"));
            assert_eq!(err.message, message);
        }
    }

    #[test]
    fn test_null_hints_mean_none() {
        let mut payload = base_payload();
        payload["detector_hints"] = json!(null);
        assert!(validate_payload(&payload, &config())
            .unwrap()
            .detector_hints()
            .is_empty());
    }
}
