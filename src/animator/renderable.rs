use crate::foundation::{core::SurfaceSize, error::CanvasResult};

/// Something with pixel dimensions that may change over time.
///
/// The coordinator reads the size on every tick, so a resized surface is picked up without
/// re-registering.
pub trait Surface {
    /// Current pixel size.
    fn size(&self) -> SurfaceSize;
}

/// A per-frame drawing routine driven by the animation coordinator.
///
/// Implementations draw onto `target` only, must not assume a frame rate, must not block, and
/// must tolerate skipped ticks. `elapsed_ms` is relative to the current run of the loop and
/// restarts at zero after every pause.
pub trait Renderable<T: ?Sized> {
    /// Draw one frame.
    fn render(&mut self, target: &mut T, width: u32, height: u32, elapsed_ms: f64)
    -> CanvasResult<()>;
}

impl<T: ?Sized, F> Renderable<T> for F
where
    F: FnMut(&mut T, u32, u32, f64) -> CanvasResult<()>,
{
    fn render(
        &mut self,
        target: &mut T,
        width: u32,
        height: u32,
        elapsed_ms: f64,
    ) -> CanvasResult<()> {
        self(target, width, height, elapsed_ms)
    }
}
