//! Shared constants for the signature crate.

// ── Stroke style ────────────────────────────────────────────────

/// Ink line width in raster pixels.
pub const STROKE_WIDTH: f32 = 2.0;

/// Ink color as straight RGBA.
pub const INK_RGBA: [u8; 4] = [0, 0, 0, 255];

// ── Crop & encode ───────────────────────────────────────────────

/// Transparent margin added on every side of the ink bounding box.
pub const CROP_PADDING: u32 = 10;

/// Prefix of every encoded signature artifact.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";
