//! Browser host for the signature pad.
//!
//! [`SignaturePad`] owns the `<canvas>` element and a [`SignatureCore`]. DOM
//! event handlers call the matching `on_*` method; the pad normalizes the event,
//! feeds the core and carries out the returned [`Action`]s itself. The only
//! thing handed back to the caller is a changed artifact, which the form
//! stores as its signature field.
//!
//! This module is the only place that touches `web_sys`. Rendering blits the
//! raster into the canvas with `putImageData`, so what the user sees is
//! exactly the pixels the artifact is cropped from.

use log::error;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, ImageData, MouseEvent, TouchEvent};

use crate::artifact::SignatureArtifact;
use crate::engine::{Action, SignatureCore};
use crate::geom::{ClientRect, Point};
use crate::input::PointerInput;

/// The full signature pad. Wraps `SignatureCore` and owns the canvas element.
pub struct SignaturePad {
    canvas: HtmlCanvasElement,
    pub core: SignatureCore,
}

impl SignaturePad {
    /// Bind a pad to `canvas`, sizing its backing store to the element's
    /// on-screen rectangle.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let rect = client_rect(&canvas);
        let mut pad = Self { canvas, core: SignatureCore::new(rect) };
        pad.sync_canvas_size();
        pad
    }

    // --- Mouse ---

    pub fn on_mouse_down(&mut self, event: &MouseEvent) -> Option<SignatureArtifact> {
        let actions = self.core.begin(mouse_input(event));
        self.dispatch(event, actions)
    }

    pub fn on_mouse_move(&mut self, event: &MouseEvent) -> Option<SignatureArtifact> {
        let actions = self.core.extend(mouse_input(event));
        self.dispatch(event, actions)
    }

    pub fn on_mouse_up(&mut self, event: &MouseEvent) -> Option<SignatureArtifact> {
        let actions = self.core.end();
        self.dispatch(event, actions)
    }

    /// Leaving the canvas ends the stroke the same way releasing the button does.
    pub fn on_mouse_leave(&mut self, event: &MouseEvent) -> Option<SignatureArtifact> {
        self.on_mouse_up(event)
    }

    // --- Touch ---

    pub fn on_touch_start(&mut self, event: &TouchEvent) -> Option<SignatureArtifact> {
        let actions = match touch_input(event) {
            Some(input) => self.core.begin(input),
            None => Vec::new(),
        };
        self.dispatch(event, actions)
    }

    pub fn on_touch_move(&mut self, event: &TouchEvent) -> Option<SignatureArtifact> {
        let actions = match touch_input(event) {
            Some(input) => self.core.extend(input),
            None => Vec::new(),
        };
        self.dispatch(event, actions)
    }

    pub fn on_touch_end(&mut self, event: &TouchEvent) -> Option<SignatureArtifact> {
        let actions = self.core.end();
        self.dispatch(event, actions)
    }

    // --- Lifecycle ---

    /// Window resize: re-read the element's rectangle and rebuild the raster
    /// if the size changed.
    pub fn on_resize(&mut self) {
        let actions = self.core.resize(client_rect(&self.canvas));
        self.sync_canvas_size();
        self.apply(None, actions);
    }

    /// Clear button.
    pub fn clear(&mut self) -> Option<SignatureArtifact> {
        let actions = self.core.clear();
        self.apply(None, actions)
    }

    /// Draw a previously saved signature back onto the pad.
    pub fn restore(&mut self, value: &str) {
        let actions = self.core.restore(&SignatureArtifact::from_stored(value));
        self.apply(None, actions);
    }

    // --- Render ---

    /// Copy the raster onto the visible canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or `putImageData` fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let Some(ctx) = self.context()? else {
            return Ok(());
        };
        let Some(raster) = self.core.raster() else {
            return Ok(());
        };

        let mut rgba = Vec::with_capacity(raster.pixmap().data().len());
        for pixel in raster.pixmap().pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&rgba), raster.width(), raster.height())?;
        ctx.clear_rect(0.0, 0.0, f64::from(raster.width()), f64::from(raster.height()));
        ctx.put_image_data(&image, 0.0, 0.0)
    }

    #[must_use]
    pub fn artifact(&self) -> &SignatureArtifact {
        self.core.artifact()
    }

    // --- Internals ---

    fn dispatch(&mut self, event: &Event, actions: Vec<Action>) -> Option<SignatureArtifact> {
        self.apply(Some(event), actions)
    }

    fn apply(&mut self, event: Option<&Event>, actions: Vec<Action>) -> Option<SignatureArtifact> {
        let mut changed = None;
        for action in actions {
            match action {
                Action::ArtifactChanged(artifact) => changed = Some(artifact),
                Action::PreventDefault => {
                    if let Some(event) = event {
                        event.prevent_default();
                    }
                }
                Action::RenderNeeded => {
                    if let Err(e) = self.render() {
                        error!("signature render failed: {e:?}");
                    }
                }
            }
        }
        changed
    }

    fn context(&self) -> Result<Option<CanvasRenderingContext2d>, JsValue> {
        match self.canvas.get_context("2d")? {
            Some(obj) => Ok(Some(obj.dyn_into::<CanvasRenderingContext2d>()?)),
            None => Ok(None),
        }
    }

    /// Keep the canvas backing store the same size as the raster.
    fn sync_canvas_size(&mut self) {
        let (width, height) = self.core.client_rect().pixel_size();
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }
    }
}

fn client_rect(canvas: &HtmlCanvasElement) -> ClientRect {
    let r = canvas.get_bounding_client_rect();
    ClientRect::new(r.left(), r.top(), r.width(), r.height())
}

fn mouse_input(event: &MouseEvent) -> PointerInput {
    PointerInput::mouse(f64::from(event.client_x()), f64::from(event.client_y()))
}

fn touch_input(event: &TouchEvent) -> Option<PointerInput> {
    let touches = event.touches();
    let points: Vec<Point> = (0..touches.length())
        .filter_map(|i| touches.get(i))
        .map(|t| Point::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect();
    PointerInput::touch(&points)
}
