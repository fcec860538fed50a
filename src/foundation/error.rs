/// Convenience result type used across prism-canvas.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Error taxonomy for drawing, scene and configuration APIs.
///
/// The animation coordinator itself never returns these: missing host facilities and missing
/// registration inputs degrade to "not running" instead.
#[derive(thiserror::Error, Debug)]
pub enum CanvasError {
    /// Invalid caller-provided data (sizes, colors, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised while drawing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while loading or parsing demo configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CanvasError {
    /// Build a [`CanvasError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CanvasError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CanvasError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
