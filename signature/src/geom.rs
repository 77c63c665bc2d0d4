#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

/// A point in either client (viewport) or canvas-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The drawing surface's on-screen rectangle, as reported by the host
/// (`getBoundingClientRect` in the browser).
///
/// `left` / `top` are in client pixels; `width` / `height` are the surface's
/// pixel size and therefore also the raster size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// A rect at the client origin, for hosts that already report local coordinates.
    #[must_use]
    pub fn at_origin(width: f64, height: f64) -> Self {
        Self { left: 0.0, top: 0.0, width, height }
    }

    /// Convert a client-space point to canvas-local coordinates.
    #[must_use]
    pub fn to_local(&self, client: Point) -> Point {
        Point { x: client.x - self.left, y: client.y - self.top }
    }

    /// Raster dimensions for this rect. Fractional sizes truncate; negative
    /// or non-finite sizes become zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_size(&self) -> (u32, u32) {
        let dim = |v: f64| if v.is_finite() && v > 0.0 { v.floor() as u32 } else { 0 };
        (dim(self.width), dim(self.height))
    }
}
