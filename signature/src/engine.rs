//! Signature lifecycle controller.
//!
//! [`SignatureCore`] holds everything the pad needs apart from the browser:
//! the raster, the surface geometry, the stroke session and the current
//! artifact. Hosts feed it normalized input and act on the returned
//! [`Action`]s (forward the new artifact to the form, repaint, suppress
//! touch scrolling).
//!
//! The externally visible state is derived rather than stored:
//! `Drawing` while a stroke session is active, otherwise `Captured` when the
//! artifact is non-empty and `Empty` when it is not.
//!
//! A surface with zero width or height has no raster; every operation is then
//! a silent no-op, the same as a missing rendering context.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use log::{error, warn};

use crate::artifact::{self, SignatureArtifact};
use crate::bounds::{BoundingBox, ink_bounds};
use crate::geom::ClientRect;
use crate::input::{PointerInput, StrokeSession};
use crate::raster::RasterBuffer;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The artifact changed; hand it to the form's setter.
    ArtifactChanged(SignatureArtifact),
    /// Suppress the platform default for the current event (touch scroll).
    PreventDefault,
    /// The raster changed and should be repainted.
    RenderNeeded,
}

/// Externally observable signature state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureState {
    /// No signature captured.
    Empty,
    /// A stroke is in progress.
    Drawing,
    /// A non-empty artifact is held.
    Captured,
}

/// Core pad state: all logic that doesn't depend on the canvas element.
///
/// Separated from the browser host so it can be tested natively.
#[derive(Debug, Clone, Default)]
pub struct SignatureCore {
    raster: Option<RasterBuffer>,
    rect: ClientRect,
    stroke: StrokeSession,
    artifact: SignatureArtifact,
}

impl SignatureCore {
    /// Create a pad for a surface occupying `rect`.
    #[must_use]
    pub fn new(rect: ClientRect) -> Self {
        let (width, height) = rect.pixel_size();
        Self { raster: RasterBuffer::new(width, height), rect, ..Self::default() }
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> SignatureState {
        if self.stroke.is_active() {
            SignatureState::Drawing
        } else if self.artifact.is_empty() {
            SignatureState::Empty
        } else {
            SignatureState::Captured
        }
    }

    /// The current artifact (empty when no signature is held).
    #[must_use]
    pub fn artifact(&self) -> &SignatureArtifact {
        &self.artifact
    }

    #[must_use]
    pub fn raster(&self) -> Option<&RasterBuffer> {
        self.raster.as_ref()
    }

    #[must_use]
    pub fn client_rect(&self) -> ClientRect {
        self.rect
    }

    #[must_use]
    pub fn stroke(&self) -> StrokeSession {
        self.stroke
    }

    /// Current ink bounds, scanned on demand.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.raster.as_ref().and_then(ink_bounds)
    }

    // --- Stroke input ---

    /// Pointer-down: start a stroke at the event position. Draws nothing.
    pub fn begin(&mut self, input: PointerInput) -> Vec<Action> {
        if self.raster.is_none() {
            return Vec::new();
        }
        let start = self.rect.to_local(input.client);
        self.stroke = StrokeSession::begin(start, input.kind);
        Vec::new()
    }

    /// Pointer-move: draw a segment from the last point. Ignored unless a
    /// stroke is in progress.
    pub fn extend(&mut self, input: PointerInput) -> Vec<Action> {
        let Some(raster) = self.raster.as_mut() else {
            return Vec::new();
        };
        let to = self.rect.to_local(input.client);
        let Some((from, to)) = self.stroke.advance(to) else {
            return Vec::new();
        };
        raster.stroke_segment(from, to);

        let mut actions = Vec::with_capacity(2);
        if input.kind.suppresses_scroll() {
            actions.push(Action::PreventDefault);
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Pointer-up / leave: finish the stroke and recapture the artifact from
    /// all ink drawn so far. A stroke that never moved leaves a one-pixel dot.
    pub fn end(&mut self) -> Vec<Action> {
        let StrokeSession::Drawing { last, painted, .. } = self.stroke else {
            return Vec::new();
        };
        self.stroke = StrokeSession::Idle;

        let Some(raster) = self.raster.as_mut() else {
            return Vec::new();
        };
        if !painted {
            raster.plot(last);
        }

        self.artifact = match artifact::capture(raster) {
            Ok(artifact) => artifact,
            Err(e) => {
                error!("signature capture failed: {e}");
                SignatureArtifact::empty()
            }
        };
        vec![Action::ArtifactChanged(self.artifact.clone()), Action::RenderNeeded]
    }

    // --- Lifecycle ---

    /// Erase all ink and drop the artifact.
    pub fn clear(&mut self) -> Vec<Action> {
        let Some(raster) = self.raster.as_mut() else {
            return Vec::new();
        };
        raster.clear();
        self.artifact = SignatureArtifact::empty();
        vec![Action::ArtifactChanged(SignatureArtifact::empty()), Action::RenderNeeded]
    }

    /// Draw a previously captured artifact onto the raster at the origin and
    /// hold it as the current artifact. An empty value is ignored. A value
    /// that fails to decode is logged and leaves the pad untouched.
    pub fn restore(&mut self, value: &SignatureArtifact) -> Vec<Action> {
        if value.is_empty() {
            return Vec::new();
        }
        let Some(raster) = self.raster.as_mut() else {
            return Vec::new();
        };
        let image = match value.decode() {
            Ok(image) => image,
            Err(e) => {
                warn!("stored signature could not be restored: {e}");
                return Vec::new();
            }
        };
        raster.draw_image(&image);
        self.artifact = value.clone();
        vec![Action::RenderNeeded]
    }

    /// Update the surface geometry. A position-only change just moves the
    /// coordinate origin; a size change rebuilds the raster at the new size
    /// with the existing pixels redrawn at the origin and the style
    /// reapplied.
    pub fn resize(&mut self, rect: ClientRect) -> Vec<Action> {
        self.rect = rect;
        let (width, height) = rect.pixel_size();
        let same_size = self
            .raster
            .as_ref()
            .is_some_and(|r| r.width() == width && r.height() == height);
        if same_size {
            return Vec::new();
        }

        let next = match &self.raster {
            Some(current) => current.resized(width, height),
            None => RasterBuffer::new(width, height),
        };
        let changed = next.is_some() || self.raster.is_some();
        self.raster = next;
        if changed { vec![Action::RenderNeeded] } else { Vec::new() }
    }
}
