use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use crate::foundation::{
    core::SurfaceSize,
    error::{CanvasError, CanvasResult},
};

/// Headless demo run: which widgets to mount and how to drive the clock.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Simulated display refresh rate.
    pub fps: f64,
    /// Number of scheduler ticks to pump.
    pub frames: u32,
    /// Timestamp of the first tick, in milliseconds.
    pub start_ms: f64,
    /// Start with the reduced-motion preference set.
    pub reduced_motion: bool,
    /// Hide the page from this tick onward.
    pub hidden_from_frame: Option<u32>,
    /// Share one static background cache across all widgets.
    pub shared_layer_cache: bool,
    /// Font file for widget captions. Relative paths in a loaded file resolve against the
    /// file's directory.
    pub label_font: Option<PathBuf>,
    pub widgets: Vec<WidgetConfig>,
}

/// One demo canvas.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetConfig {
    /// Used in output file names; `[A-Za-z0-9_-]` only.
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub resize: Option<WidgetResize>,
    /// Draw the caption under the scene. Requires `label_font`.
    #[serde(default)]
    pub show_label: bool,
}

/// Resize a widget's element before a given tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetResize {
    pub at_frame: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            frames: 1,
            start_ms: 0.0,
            reduced_motion: false,
            hidden_from_frame: None,
            shared_layer_cache: true,
            label_font: None,
            widgets: vec![WidgetConfig {
                name: "demo".to_string(),
                width: 320,
                height: 180,
                resize: None,
                show_label: false,
            }],
        }
    }
}

impl DemoConfig {
    pub fn from_json_str(s: &str) -> CanvasResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| CanvasError::config(format!("invalid demo config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[tracing::instrument]
    pub fn load(path: &Path) -> CanvasResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CanvasError::config(format!("failed to read '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_json_str(&text)?;
        if let (Some(font), Some(dir)) = (cfg.label_font.as_mut(), path.parent())
            && font.is_relative()
        {
            *font = dir.join(&*font);
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> CanvasResult<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(CanvasError::validation("fps must be a positive number"));
        }
        if self.frames == 0 {
            return Err(CanvasError::validation("frames must be > 0"));
        }
        if !self.start_ms.is_finite() || self.start_ms < 0.0 {
            return Err(CanvasError::validation("start_ms must be >= 0"));
        }
        if self.widgets.is_empty() {
            return Err(CanvasError::validation("at least one widget is required"));
        }

        let mut names = BTreeSet::new();
        for w in &self.widgets {
            let valid_name = !w.name.is_empty()
                && w
                    .name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid_name {
                return Err(CanvasError::validation(format!(
                    "widget name '{}' must be non-empty and use [A-Za-z0-9_-]",
                    w.name
                )));
            }
            if !names.insert(w.name.as_str()) {
                return Err(CanvasError::validation(format!(
                    "duplicate widget name '{}'",
                    w.name
                )));
            }
            SurfaceSize::new(w.width, w.height)
                .to_u16()
                .map_err(|e| CanvasError::validation(format!("widget '{}': {e}", w.name)))?;
            if w.show_label && self.label_font.is_none() {
                return Err(CanvasError::validation(format!(
                    "widget '{}' shows a label but no label_font is set",
                    w.name
                )));
            }
            if let Some(r) = w.resize {
                SurfaceSize::new(r.width, r.height).to_u16().map_err(|e| {
                    CanvasError::validation(format!("widget '{}' resize: {e}", w.name))
                })?;
            }
        }
        Ok(())
    }

    /// Timestamp of tick `frame`.
    pub fn frame_timestamp_ms(&self, frame: u32) -> f64 {
        self.start_ms + f64::from(frame) * 1000.0 / self.fps
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
