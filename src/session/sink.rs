use std::path::{Path, PathBuf};

use crate::{
    foundation::error::{CanvasError, CanvasResult},
    render::canvas::FrameRGBA,
};

/// Consumes frames produced by a headless run.
///
/// Ordering contract: for each widget, `push_frame` is called with strictly increasing tick
/// indices. Ticks on which a widget did not render (paused loop, dropped target) are absent.
pub trait FrameSink {
    fn push_frame(&mut self, widget: &str, tick: u32, frame: &FrameRGBA) -> CanvasResult<()>;

    /// Called once after the last tick.
    fn finish(&mut self) -> CanvasResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    frames: Vec<(String, u32, FrameRGBA)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured `(widget, tick, frame)` triples in push order.
    pub fn frames(&self) -> &[(String, u32, FrameRGBA)] {
        &self.frames
    }

    /// Ticks captured for `widget`.
    pub fn ticks_for(&self, widget: &str) -> Vec<u32> {
        self.frames
            .iter()
            .filter(|(w, _, _)| w == widget)
            .map(|(_, t, _)| *t)
            .collect()
    }
}

impl FrameSink for InMemorySink {
    fn push_frame(&mut self, widget: &str, tick: u32, frame: &FrameRGBA) -> CanvasResult<()> {
        self.frames.push((widget.to_string(), tick, frame.clone()));
        Ok(())
    }
}

/// Writes `<dir>/<widget>-<tick>.png` for every frame.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> CanvasResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            CanvasError::Other(anyhow::Error::new(e).context(format!(
                "create output dir '{}'",
                dir.display()
            )))
        })?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn push_frame(&mut self, widget: &str, tick: u32, frame: &FrameRGBA) -> CanvasResult<()> {
        let path = self.dir.join(format!("{widget}-{tick:05}.png"));
        let straight = frame.clone().into_straight();
        image::save_buffer_with_format(
            &path,
            &straight.data,
            straight.width,
            straight.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| {
            CanvasError::Other(
                anyhow::Error::new(e).context(format!("write png '{}'", path.display())),
            )
        })?;
        tracing::debug!(path = %path.display(), "frame written");
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/sink.rs"]
mod tests;
