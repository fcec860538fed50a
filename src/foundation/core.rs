use crate::foundation::error::{CanvasError, CanvasResult};

pub use kurbo::{Point, Rect, Vec2};

/// Straight (non-premultiplied) RGBA8 color.
///
/// Also the brush type of text layouts. The default is transparent black.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> CanvasResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| CanvasError::validation(format!("color '{s}' must start with '#'")))?;
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return Err(CanvasError::validation(format!(
                "color '{s}' must have 6 or 8 hex digits"
            )));
        }
        let channel = |i: usize| -> CanvasResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| CanvasError::validation(format!("color '{s}' is not valid hex")))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 255 },
        })
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Pixel dimensions of a drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Shortest side; scene geometry scales from this.
    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    /// Size as `u16` pair for the raster backend.
    pub fn to_u16(self) -> CanvasResult<(u16, u16)> {
        if self.is_empty() {
            return Err(CanvasError::validation(format!(
                "surface size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| CanvasError::validation("surface width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| CanvasError::validation("surface height exceeds u16"))?;
        Ok((w, h))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
