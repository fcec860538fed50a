//! The shared animation loop.

/// Loop state machine and registration handles.
pub mod coordinator;
/// Render and surface contracts implemented by callers.
pub mod renderable;
