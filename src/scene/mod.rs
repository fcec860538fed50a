//! The pixel-art demo scene drawn by every demo canvas.

/// Pixel-art drawing primitives.
pub mod draw;
/// Scene renderable and static background cache.
pub mod game;
/// Scene colors.
pub mod palette;
