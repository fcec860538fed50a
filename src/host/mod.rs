//! Host environment primitives consumed by the animation coordinator.
//!
//! A host provides up to three facilities: a frame-scheduling primitive, a page-visibility signal
//! and a reduced-motion preference signal. Any of them may be absent; the coordinator treats a
//! missing scheduler as "never run" and a missing signal as "never paused by it".

use std::rc::Rc;

/// Callback ownership for host frame requests.
mod frames;
/// Deterministic host for tests and headless rendering.
pub mod manual;
/// Browser host backed by `web-sys`.
#[cfg(feature = "web")]
pub mod web;

/// Opaque id of a pending frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Opaque id of a signal subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// One-shot callback invoked with the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Listener invoked with the new value of a boolean signal.
pub type SignalListener = Box<dyn Fn(bool)>;

/// Invokes a callback once before the next repaint.
pub trait FrameScheduler {
    /// Schedule `callback` for the next frame.
    ///
    /// Returns `None` if the host refused the request; `callback` is then dropped unrun.
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle>;

    /// Cancel a pending request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
}

/// A boolean environment signal with change notification.
pub trait SignalSource {
    /// Current value of the signal.
    fn current(&self) -> bool;

    /// Register `listener`; it is called with the new value on every change.
    fn subscribe(&self, listener: SignalListener) -> ListenerId;

    /// Remove a listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: ListenerId);
}

/// The set of host facilities available to a coordinator.
#[derive(Clone, Default)]
pub struct HostEnvironment {
    /// Frame-scheduling primitive.
    pub scheduler: Option<Rc<dyn FrameScheduler>>,
    /// `true` while the page is hidden.
    pub visibility: Option<Rc<dyn SignalSource>>,
    /// `true` while the user prefers reduced motion.
    pub reduced_motion: Option<Rc<dyn SignalSource>>,
}

impl HostEnvironment {
    /// An environment with no facilities at all. Coordinators built on it never run.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Replace the frame scheduler.
    pub fn with_scheduler(mut self, scheduler: Rc<dyn FrameScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Replace the visibility signal.
    pub fn with_visibility(mut self, visibility: Rc<dyn SignalSource>) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Replace the reduced-motion signal.
    pub fn with_reduced_motion(mut self, reduced_motion: Rc<dyn SignalSource>) -> Self {
        self.reduced_motion = Some(reduced_motion);
        self
    }
}

impl std::fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("scheduler", &self.scheduler.is_some())
            .field("visibility", &self.visibility.is_some())
            .field("reduced_motion", &self.reduced_motion.is_some())
            .finish()
    }
}
