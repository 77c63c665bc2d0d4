//! Hand-drawn signature capture for the attendance form.
//!
//! This crate owns the signature pad: it turns raw pointer and touch input
//! into ink on an RGBA raster, finds the tight box around everything drawn
//! after each stroke, and crops that region (with fixed padding) into a PNG
//! data URI. That string is the only thing the surrounding form ever sees.
//! The host layer (the browser, behind the `web` feature) only forwards DOM
//! events and blits the raster back onto the visible canvas.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Lifecycle controller and testable [`engine::SignatureCore`] |
//! | [`input`] | Normalized pointer input and the stroke session |
//! | [`geom`] | Points and client-rect coordinate conversion |
//! | [`raster`] | Pixel buffer the ink is drawn onto |
//! | [`bounds`] | Ink bounding-box extraction |
//! | [`artifact`] | Crop, PNG encode/decode and the data URI artifact |
//! | [`consts`] | Stroke style and crop padding |
//! | `pad` | Browser host: DOM events and canvas blits (`web` feature) |

pub mod artifact;
pub mod bounds;
pub mod consts;
pub mod engine;
pub mod geom;
pub mod input;
pub mod raster;

#[cfg(feature = "web")]
pub mod pad;
