//! Crop & encode: turn the drawn ink into the signature artifact.
//!
//! The artifact is a lossless PNG data URI of the ink bounding box expanded by
//! [`CROP_PADDING`] on every side, or the empty string when nothing has been
//! drawn. It is the only value the signature pad hands to the enclosing form,
//! and the record store keeps it as an opaque string.
//!
//! Decoding is the inverse used by restore (drawing a previously captured
//! signature back onto the pad) and by the export renderers.

#[cfg(test)]
#[path = "artifact_test.rs"]
mod artifact_test;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;

use crate::bounds::{BoundingBox, ink_bounds};
use crate::consts::{CROP_PADDING, PNG_DATA_URI_PREFIX};
use crate::raster::{RasterBuffer, copy_region};

/// Errors produced while encoding or decoding a signature artifact.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// The artifact string is not a `data:image/png;base64,` URI.
    #[error("not a PNG data URI")]
    NotPngDataUri,

    /// The base64 payload could not be decoded.
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The PNG bytes could not be decoded.
    #[error("PNG decode failed: {0}")]
    PngDecode(String),

    /// The cropped raster could not be encoded.
    #[error("PNG encode failed: {0}")]
    PngEncode(String),

    /// The padded crop region could not be allocated.
    #[error("invalid crop size {width}x{height}")]
    InvalidCrop { width: u32, height: u32 },
}

/// An encoded signature: a PNG data URI, or empty for "no signature".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureArtifact(String);

impl SignatureArtifact {
    /// The empty artifact, meaning no signature has been drawn.
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Wrap a stored artifact string without validating it.
    #[must_use]
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Encode `image` as a PNG data URI.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::PngEncode`] if PNG encoding fails.
    pub fn encode(image: &Pixmap) -> Result<Self, SignatureError> {
        let png = image
            .encode_png()
            .map_err(|e| SignatureError::PngEncode(e.to_string()))?;
        Ok(Self(format!("{PNG_DATA_URI_PREFIX}{}", B64.encode(png))))
    }

    /// Decode the artifact back into pixels.
    ///
    /// # Errors
    ///
    /// Fails if the artifact is empty, not a PNG data URI, or carries an
    /// invalid base64 or PNG payload.
    pub fn decode(&self) -> Result<Pixmap, SignatureError> {
        let payload = self
            .0
            .strip_prefix(PNG_DATA_URI_PREFIX)
            .ok_or(SignatureError::NotPngDataUri)?;
        let bytes = B64.decode(payload.trim())?;
        Pixmap::decode_png(&bytes).map_err(|e| SignatureError::PngDecode(e.to_string()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SignatureArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Copy `bbox` plus [`CROP_PADDING`] on every side out of `raster` into a new
/// pixmap. Padding that falls outside the raster stays transparent.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidCrop`] if the padded size cannot be
/// allocated.
pub fn crop(raster: &RasterBuffer, bbox: BoundingBox) -> Result<Pixmap, SignatureError> {
    let width = bbox.width() + 2 * CROP_PADDING;
    let height = bbox.height() + 2 * CROP_PADDING;
    let mut out = Pixmap::new(width, height).ok_or(SignatureError::InvalidCrop { width, height })?;

    let origin_x = i64::from(bbox.min_x) - i64::from(CROP_PADDING);
    let origin_y = i64::from(bbox.min_y) - i64::from(CROP_PADDING);
    copy_region(raster.pixmap(), origin_x, origin_y, &mut out);
    Ok(out)
}

/// Run the full pipeline: find the ink, crop it with padding, encode it.
/// A raster without ink yields the empty artifact.
///
/// # Errors
///
/// Propagates crop and encode failures.
pub fn capture(raster: &RasterBuffer) -> Result<SignatureArtifact, SignatureError> {
    match ink_bounds(raster) {
        None => Ok(SignatureArtifact::empty()),
        Some(bbox) => SignatureArtifact::encode(&crop(raster, bbox)?),
    }
}
