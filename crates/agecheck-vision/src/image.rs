//! Placeholder image type and its wire codec.
//!
//! The wire payload is standard base64 over the ASCII text
//! `"width,height,intensity"`, where intensity is a uniform greyscale value
//! in `[0, 255]`. Crop and resize only change the declared dimensions since
//! the image carries no pixel grid.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::ImageDecodeError;

/// Edge length of the square model input.
pub const NORMALIZED_EDGE: u64 = 224;

const MAX_INTENSITY: f64 = 255.0;

/// Uniform greyscale image.
///
/// Invariant: `width > 0`, `height > 0`, `0 <= intensity <= 255`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Image {
    width: u64,
    height: u64,
    intensity: f64,
}

impl Image {
    /// Create an image, enforcing the dimension and intensity invariants.
    pub fn new(width: u64, height: u64, intensity: f64) -> Result<Self, ImageDecodeError> {
        if width == 0 || height == 0 {
            return Err(ImageDecodeError::NonPositiveDimensions);
        }
        if !(0.0..=MAX_INTENSITY).contains(&intensity) {
            return Err(ImageDecodeError::IntensityOutOfRange);
        }
        Ok(Self {
            width,
            height,
            intensity,
        })
    }

    #[inline]
    pub fn width(&self) -> u64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u64 {
        self.height
    }

    /// `(width, height)` pair.
    #[inline]
    pub fn size(&self) -> (u64, u64) {
        (self.width, self.height)
    }

    /// Length of the shorter edge.
    #[inline]
    pub fn min_edge(&self) -> u64 {
        self.width.min(self.height)
    }

    /// Mean greyscale intensity, which for this image is the single scalar.
    #[inline]
    pub fn mean_intensity(&self) -> f64 {
        self.intensity
    }

    /// Decode a base64 wire payload.
    pub fn decode_base64(data: &str) -> Result<Self, ImageDecodeError> {
        let raw = STANDARD
            .decode(data)
            .map_err(|_| ImageDecodeError::InvalidBase64)?;
        if !raw.is_ascii() {
            return Err(ImageDecodeError::NotAscii);
        }
        let text = std::str::from_utf8(&raw).map_err(|_| ImageDecodeError::NotAscii)?;
        Self::parse_payload(text)
    }

    /// Encode into the base64 wire payload.
    ///
    /// Intensity is rendered with `{:?}` so integral values keep a decimal
    /// point (`180.0`).
    pub fn encode_base64(&self) -> String {
        let payload = format!("{},{},{:?}", self.width, self.height, self.intensity);
        STANDARD.encode(payload.as_bytes())
    }

    fn parse_payload(text: &str) -> Result<Self, ImageDecodeError> {
        let parts: Vec<&str> = text.split(',').collect();
        let [width, height, intensity] = parts.as_slice() else {
            return Err(ImageDecodeError::Malformed);
        };

        let width: i64 = width.trim().parse().map_err(|_| ImageDecodeError::Malformed)?;
        let height: i64 = height.trim().parse().map_err(|_| ImageDecodeError::Malformed)?;
        let intensity: f64 = intensity
            .trim()
            .parse()
            .map_err(|_| ImageDecodeError::Malformed)?;

        if width <= 0 || height <= 0 {
            return Err(ImageDecodeError::NonPositiveDimensions);
        }
        let width = width.unsigned_abs();
        let height = height.unsigned_abs();

        Self::new(width, height, intensity)
    }

    /// Crop to `(x, y, width, height)`.
    ///
    /// Each resulting extent is `max(1, min(requested, original - offset))`,
    /// so the crop is never empty and never exceeds what remains of the
    /// source past the offset.
    pub fn crop(&self, x: i64, y: i64, width: i64, height: i64) -> Self {
        let new_width = clamp_extent(width, self.width, x);
        let new_height = clamp_extent(height, self.height, y);
        Self {
            width: new_width,
            height: new_height,
            intensity: self.intensity,
        }
    }

    /// Resize to new declared dimensions. Intensity is carried through.
    ///
    /// Zero dimensions are raised to 1 to keep the invariant.
    pub fn resize(&self, (width, height): (u64, u64)) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            intensity: self.intensity,
        }
    }
}

fn clamp_extent(requested: i64, original: u64, offset: i64) -> u64 {
    let remaining = i128::from(original) - i128::from(offset);
    let extent = i128::from(requested).min(remaining).max(1);
    u64::try_from(extent).unwrap_or(u64::MAX)
}

/// Bring an image into model input space (224x224).
pub fn normalize_image(image: &Image) -> Image {
    image.resize((NORMALIZED_EDGE, NORMALIZED_EDGE))
}
