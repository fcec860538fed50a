use std::{collections::HashMap, path::Path};

use crate::foundation::{
    core::Rgba8,
    error::{CanvasError, CanvasResult},
};

/// A font loaded from raw TrueType/OpenType bytes, used by [`Canvas2d::fill_text`].
///
/// Cloning is cheap; clones share the font data.
///
/// [`Canvas2d::fill_text`]: crate::render::canvas::Canvas2d::fill_text
#[derive(Clone)]
pub struct CanvasFont {
    data: vello_cpu::peniko::FontData,
}

impl CanvasFont {
    pub fn from_bytes(bytes: Vec<u8>) -> CanvasResult<Self> {
        if bytes.is_empty() {
            return Err(CanvasError::validation("font bytes must be non-empty"));
        }
        Ok(Self {
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
        })
    }

    #[tracing::instrument]
    pub fn load(path: &Path) -> CanvasResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            CanvasError::config(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes)
    }

    pub(crate) fn data(&self) -> &vello_cpu::peniko::FontData {
        &self.data
    }

    fn id(&self) -> u64 {
        self.data.data.id()
    }

    fn bytes(&self) -> &[u8] {
        self.data.data.data()
    }
}

impl std::fmt::Debug for CanvasFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasFont")
            .field("bytes", &self.bytes().len())
            .finish()
    }
}

/// Parley contexts plus the family names of the fonts registered so far.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    families: HashMap<u64, String>,
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &CanvasFont) -> CanvasResult<String> {
        if let Some(name) = self.families.get(&font.id()) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CanvasError::validation("no font families registered from font bytes")
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CanvasError::validation("registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %name, "font registered");
        self.families.insert(font.id(), name.clone());
        Ok(name)
    }

    /// Shape `text` as a single unwrapped line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font: &CanvasFont,
        size_px: f32,
        color: Rgba8,
    ) -> CanvasResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CanvasError::validation("text size must be finite and > 0"));
        }
        let family = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(color));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
