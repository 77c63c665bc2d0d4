//! Input model: normalized pointer events and the stroke session.
//!
//! Mouse and touch events are reduced to a single [`PointerInput`] at the host
//! boundary, each kind through its own coordinate extractor. Everything past
//! that point (the engine, the stroke session) only sees client coordinates
//! plus the input kind, which decides whether default scrolling has to be
//! suppressed while drawing.
//!
//! [`StrokeSession`] is the gesture tracked between pointer-down and
//! pointer-up/leave.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::Point;

/// Which device produced an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    /// Mouse or pen reported through mouse events.
    #[default]
    Mouse,
    /// Finger on a touch screen.
    Touch,
}

impl InputKind {
    /// Whether the platform's default scroll must be suppressed while a
    /// stroke from this device is in progress.
    #[must_use]
    pub fn suppresses_scroll(self) -> bool {
        matches!(self, Self::Touch)
    }
}

/// A pointer event normalized to client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Device the event came from.
    pub kind: InputKind,
    /// Position in client (viewport) pixels.
    pub client: Point,
}

impl PointerInput {
    /// Extract a mouse event's client position.
    #[must_use]
    pub fn mouse(client_x: f64, client_y: f64) -> Self {
        Self { kind: InputKind::Mouse, client: Point::new(client_x, client_y) }
    }

    /// Extract the first active touch point. Returns `None` when the event
    /// carries no touches (e.g. the final `touchend`).
    #[must_use]
    pub fn touch(touches: &[Point]) -> Option<Self> {
        touches
            .first()
            .map(|&client| Self { kind: InputKind::Touch, client })
    }
}

/// Stroke tracker state between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeSession {
    /// No stroke in progress; `extend` calls are ignored.
    #[default]
    Idle,
    /// The user is drawing.
    Drawing {
        /// Canvas-local position of the last recorded point.
        last: Point,
        /// Device that started the stroke.
        kind: InputKind,
        /// Whether at least one segment has been drawn in this stroke.
        painted: bool,
    },
}

impl StrokeSession {
    /// Start a stroke at `start` (canvas-local).
    #[must_use]
    pub fn begin(start: Point, kind: InputKind) -> Self {
        Self::Drawing { last: start, kind, painted: false }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    /// The last recorded point, if a stroke is in progress.
    #[must_use]
    pub fn last_point(&self) -> Option<Point> {
        match self {
            Self::Idle => None,
            Self::Drawing { last, .. } => Some(*last),
        }
    }

    /// Record `to` as the new last point and return the segment to draw.
    /// Returns `None` (and changes nothing) when no stroke is active.
    pub fn advance(&mut self, to: Point) -> Option<(Point, Point)> {
        match self {
            Self::Idle => None,
            Self::Drawing { last, painted, .. } => {
                let from = *last;
                *last = to;
                *painted = true;
                Some((from, to))
            }
        }
    }
}
