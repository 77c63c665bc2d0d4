//! Raster buffer: the full-size pixel grid the ink is drawn onto.
//!
//! Pixels are premultiplied RGBA (`tiny_skia::Pixmap`). The buffer always has
//! the drawing surface's current pixel size; a zero-sized surface has no
//! buffer at all, which is how the engine models "no rendering context".

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use tiny_skia::{Color, ColorU8, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::consts::{INK_RGBA, STROKE_WIDTH};
use crate::geom::Point;

/// Ink style applied to every stroke segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Line width in raster pixels.
    pub width: f32,
    /// Straight (non-premultiplied) RGBA ink color.
    pub color: [u8; 4],
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self { width: STROKE_WIDTH, color: INK_RGBA }
    }
}

/// The drawing surface's backing pixels plus the style used to draw on them.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    pixmap: Pixmap,
    style: StrokeStyle,
}

impl RasterBuffer {
    /// Allocate a fully transparent buffer. Returns `None` for a zero-sized
    /// (or absurdly large) surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Self::with_style(width, height, StrokeStyle::default())
    }

    /// Allocate a transparent buffer drawing with `style`.
    #[must_use]
    pub fn with_style(width: u32, height: u32, style: StrokeStyle) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap, style })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[must_use]
    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Read-only view of the pixels.
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Alpha of the pixel at `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.pixel(x, y).map(|p| p.alpha())
    }

    /// Erase every pixel to fully transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Draw one ink segment with round caps.
    #[allow(clippy::cast_possible_truncation)]
    pub fn stroke_segment(&mut self, from: Point, to: Point) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };

        let [r, g, b, a] = self.style.color;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;

        let stroke = Stroke { width: self.style.width, line_cap: LineCap::Round, ..Stroke::default() };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Stamp a single ink pixel at the pixel containing `point`.
    /// Points outside the buffer are ignored.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn plot(&mut self, point: Point) {
        let (x, y) = (point.x.floor(), point.y.floor());
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return;
        }
        if x >= f64::from(self.width()) || y >= f64::from(self.height()) {
            return;
        }

        let [r, g, b, a] = self.style.color;
        let ink = ColorU8::from_rgba(r, g, b, a).premultiply();
        let width = self.width() as usize;
        let i = (y as usize * width + x as usize) * 4;
        self.pixmap.data_mut()[i..i + 4].copy_from_slice(&[ink.red(), ink.green(), ink.blue(), ink.alpha()]);
    }

    /// Composite `image` over this buffer with its top-left at the origin.
    /// Parts of `image` beyond the buffer edge are dropped.
    #[allow(clippy::cast_possible_truncation)]
    pub fn draw_image(&mut self, image: &Pixmap) {
        let w = self.width().min(image.width()) as usize;
        let h = self.height().min(image.height()) as usize;
        let dst_stride = self.width() as usize;
        let src_stride = image.width() as usize;

        let src = image.data();
        let dst = self.pixmap.data_mut();
        for y in 0..h {
            for x in 0..w {
                let s = (y * src_stride + x) * 4;
                let d = (y * dst_stride + x) * 4;
                let inv_alpha = 255 - u16::from(src[s + 3]);
                if inv_alpha == 255 {
                    continue;
                }
                for c in 0..4 {
                    let blended = u16::from(src[s + c]) + div255(u16::from(dst[d + c]) * inv_alpha);
                    dst[d + c] = blended.min(255) as u8;
                }
            }
        }
    }

    /// A new buffer of the given size holding this buffer's pixels at the
    /// origin (cropped or padded with transparency) and the same style.
    /// Returns `None` for a zero-sized target.
    #[must_use]
    pub fn resized(&self, width: u32, height: u32) -> Option<Self> {
        let saved = self.pixmap.clone();
        let mut next = Self::with_style(width, height, self.style)?;
        copy_region(&saved, 0, 0, &mut next.pixmap);
        Some(next)
    }
}

/// Copy the `dst`-sized window of `src` whose top-left is `(src_x, src_y)`
/// into `dst` at the origin. Window pixels outside `src` are left untouched.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub fn copy_region(src: &Pixmap, src_x: i64, src_y: i64, dst: &mut Pixmap) {
    let src_w = i64::from(src.width());
    let src_h = i64::from(src.height());
    let x0 = src_x.max(0);
    let x1 = (src_x + i64::from(dst.width())).min(src_w);
    let y0 = src_y.max(0);
    let y1 = (src_y + i64::from(dst.height())).min(src_h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let dst_stride = dst.width() as usize;
    let row_bytes = (x1 - x0) as usize * 4;
    let dx = (x0 - src_x) as usize;

    let src_data = src.data();
    let dst_data = dst.data_mut();
    for sy in y0..y1 {
        let dy = (sy - src_y) as usize;
        let s = (sy * src_w + x0) as usize * 4;
        let d = (dy * dst_stride + dx) * 4;
        dst_data[d..d + row_bytes].copy_from_slice(&src_data[s..s + row_bytes]);
    }
}

fn div255(v: u16) -> u16 {
    (v + 127) / 255
}
