//! Ink bounding-box extraction.
//!
//! A pixel is ink when its alpha is non-zero. The extractor is a full
//! O(width × height) scan; it only runs once per completed stroke, never per
//! pointer move.

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use crate::raster::RasterBuffer;

/// Tight inclusive rectangle around all ink, in raster pixel coordinates.
///
/// A box with `min == max` on both axes is a single ink pixel, which is a
/// valid non-empty result. "No ink" is represented by `Option::None`, never
/// by a zero box at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// Width in pixels (inclusive of both edges).
    #[must_use]
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Height in pixels (inclusive of both edges).
    #[must_use]
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// Scan the raster and return the box around every ink pixel, or `None` if
/// the raster holds no ink.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn ink_bounds(raster: &RasterBuffer) -> Option<BoundingBox> {
    let width = raster.width() as usize;
    let mut found: Option<BoundingBox> = None;

    for (i, pixel) in raster.pixmap().pixels().iter().enumerate() {
        if pixel.alpha() == 0 {
            continue;
        }
        let x = (i % width) as u32;
        let y = (i / width) as u32;
        found = Some(match found {
            None => BoundingBox { min_x: x, min_y: y, max_x: x, max_y: y },
            Some(b) => BoundingBox {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });
    }

    found
}
