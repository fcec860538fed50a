use std::{cell::Cell, sync::Arc};

use crate::{
    animator::renderable::Surface,
    foundation::{
        core::{Rgba8, SurfaceSize},
        error::{CanvasError, CanvasResult},
    },
    render::text::{CanvasFont, TextLayoutEngine},
};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight alpha (what PNG encoders expect).
    pub fn into_straight(mut self) -> Self {
        if !self.premultiplied {
            return self;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = px[3];
            if a == 0 || a == 255 {
                continue;
            }
            let a16 = u16::from(a);
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a16 / 2) / a16).min(255) as u8;
            }
        }
        self.premultiplied = false;
        self
    }

    /// Pixel at `(x, y)` as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).and_then(|s| s.try_into().ok())
    }
}

/// The element side of a canvas: just its current pixel size.
///
/// Widgets resize the element; the coordinator reads the new size on the next tick.
#[derive(Debug)]
pub struct CanvasElement {
    size: Cell<SurfaceSize>,
}

impl CanvasElement {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Cell::new(SurfaceSize::new(width, height)),
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.size.set(SurfaceSize::new(width, height));
    }
}

impl Surface for CanvasElement {
    fn size(&self) -> SurfaceSize {
        self.size.get()
    }
}

/// A pre-rasterized, immutable image that can be blitted onto a [`Canvas2d`].
#[derive(Clone)]
pub struct Layer {
    size: SurfaceSize,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl Layer {
    /// Rasterize `draw` into a new layer of the given size.
    pub fn rasterize(
        width: u32,
        height: u32,
        draw: impl FnOnce(&mut Canvas2d) -> CanvasResult<()>,
    ) -> CanvasResult<Self> {
        let mut canvas = Canvas2d::new();
        canvas.begin_frame(width, height)?;
        draw(&mut canvas)?;
        canvas.end_frame()?;
        let pixmap = canvas
            .pixmap
            .take()
            .ok_or_else(|| CanvasError::render("layer canvas has no pixmap"))?;
        Ok(Self {
            size: SurfaceSize::new(width, height),
            pixmap: Arc::new(pixmap),
        })
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer").field("size", &self.size).finish()
    }
}

/// A small 2D drawing context over a CPU pixel buffer.
///
/// Drawing happens between [`Canvas2d::begin_frame`] and [`Canvas2d::end_frame`]; the committed
/// pixels are kept until the next `end_frame` and can be read with [`Canvas2d::snapshot`].
pub struct Canvas2d {
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: Option<vello_cpu::Pixmap>,
    fill: Rgba8,
    alpha: f32,
    in_frame: bool,
    frames: u64,
    text: Option<TextLayoutEngine>,
}

impl Default for Canvas2d {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas2d {
    pub fn new() -> Self {
        Self {
            ctx: None,
            pixmap: None,
            fill: Rgba8::rgb(0, 0, 0),
            alpha: 1.0,
            in_frame: false,
            frames: 0,
            text: None,
        }
    }

    /// Start a frame at `width`×`height`, reallocating the buffer if the size changed.
    pub fn begin_frame(&mut self, width: u32, height: u32) -> CanvasResult<()> {
        let (w, h) = SurfaceSize::new(width, height).to_u16()?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => {
                self.pixmap = Some(vello_cpu::Pixmap::new(w, h));
                vello_cpu::RenderContext::new(w, h)
            }
        };
        if self.pixmap.is_none() {
            self.pixmap = Some(vello_cpu::Pixmap::new(w, h));
        }
        ctx.reset();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx = Some(ctx);
        self.fill = Rgba8::rgb(0, 0, 0);
        self.alpha = 1.0;
        self.in_frame = true;
        Ok(())
    }

    /// Rasterize everything drawn since `begin_frame` into the pixel buffer.
    pub fn end_frame(&mut self) -> CanvasResult<()> {
        let ctx = self.frame_ctx()?;
        ctx.flush();
        let pixmap = self
            .pixmap
            .as_mut()
            .ok_or_else(|| CanvasError::render("canvas has no pixel buffer"))?;
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.render_to_pixmap(pixmap);
        }
        self.in_frame = false;
        self.frames += 1;
        Ok(())
    }

    pub fn set_fill_style(&mut self, color: Rgba8) {
        self.fill = color;
    }

    /// Opacity applied to subsequent fills, clamped to `0..=1`.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    pub fn global_alpha(&self) -> f32 {
        self.alpha
    }

    /// Fill an axis-aligned rectangle. Empty or negative extents draw nothing.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> CanvasResult<()> {
        let (color, alpha) = (self.fill, self.alpha);
        let ctx = self.frame_ctx()?;
        if w <= 0.0 || h <= 0.0 || alpha <= 0.0 {
            return Ok(());
        }
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        if alpha < 1.0 {
            ctx.push_opacity_layer(alpha);
        }
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x, y, x + w, y + h));
        if alpha < 1.0 {
            ctx.pop_layer();
        }
        Ok(())
    }

    /// Fill one line of `text` centered on `(x, y)` both ways, like a 2D context with
    /// `textAlign = "center"` and `textBaseline = "middle"`.
    pub fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        size_px: f32,
        font: &CanvasFont,
    ) -> CanvasResult<()> {
        let (color, alpha) = (self.fill, self.alpha);
        self.frame_ctx()?;
        if text.is_empty() || alpha <= 0.0 {
            return Ok(());
        }

        let layout = self
            .text
            .get_or_insert_with(TextLayoutEngine::new)
            .layout_line(text, font, size_px, color)?;

        let ctx = self.frame_ctx()?;
        let origin = vello_cpu::kurbo::Vec2::new(
            x - f64::from(layout.width()) / 2.0,
            y - f64::from(layout.height()) / 2.0,
        );
        ctx.set_transform(vello_cpu::kurbo::Affine::translate(origin));
        if alpha < 1.0 {
            ctx.push_opacity_layer(alpha);
        }

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font.data())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        if alpha < 1.0 {
            ctx.pop_layer();
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    /// Blit `layer` at the origin, scaled to the current frame size.
    pub fn draw_layer(&mut self, layer: &Layer) -> CanvasResult<()> {
        let ctx = self.frame_ctx()?;
        let (fw, fh) = (f64::from(ctx.width()), f64::from(ctx.height()));
        let size = layer.size();
        let (lw, lh) = (f64::from(size.width), f64::from(size.height));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::scale_non_uniform(fw / lw, fh / lh));
        ctx.set_paint(layer.paint());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, lw, lh));
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    /// Size of the pixel buffer, if any frame has started.
    pub fn size(&self) -> Option<SurfaceSize> {
        self.pixmap
            .as_ref()
            .map(|p| SurfaceSize::new(u32::from(p.width()), u32::from(p.height())))
    }

    /// Frames committed so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Copy of the last committed frame (premultiplied).
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        let pixmap = self.pixmap.as_ref()?;
        Some(FrameRGBA {
            width: u32::from(pixmap.width()),
            height: u32::from(pixmap.height()),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn frame_ctx(&mut self) -> CanvasResult<&mut vello_cpu::RenderContext> {
        if !self.in_frame {
            return Err(CanvasError::render("drawing outside of begin_frame/end_frame"));
        }
        self.ctx
            .as_mut()
            .ok_or_else(|| CanvasError::render("canvas has no render context"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
