//! CPU raster drawing target.

/// `Canvas2d`, its element, frames and layers.
pub mod canvas;
/// Fonts and text shaping for `Canvas2d::fill_text`.
pub mod text;
