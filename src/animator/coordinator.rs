use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{
    animator::renderable::{Renderable, Surface},
    host::{FrameHandle, HostEnvironment, ListenerId, SignalSource},
};

/// Removes one registration from its coordinator.
///
/// Calling [`Disposer::dispose`] more than once, or after the coordinator shut down, has no
/// effect. Dropping a disposer does *not* unregister.
#[derive(Clone, Default)]
#[must_use = "dropping the disposer leaves the renderer registered for the coordinator's lifetime"]
pub struct Disposer {
    action: Option<Rc<dyn Fn()>>,
}

impl Disposer {
    /// A disposer that does nothing.
    pub fn noop() -> Self {
        Self::default()
    }

    fn new(action: impl Fn() + 'static) -> Self {
        Self {
            action: Some(Rc::new(action)),
        }
    }

    /// Unregister the renderer this disposer was issued for.
    pub fn dispose(&self) {
        if let Some(action) = &self.action {
            action();
        }
    }

    /// `false` for disposers returned by rejected registrations.
    pub fn is_noop(&self) -> bool {
        self.action.is_none()
    }
}

impl std::fmt::Debug for Disposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposer")
            .field("noop", &self.is_noop())
            .finish()
    }
}

struct Registration<T> {
    target: Weak<RefCell<T>>,
    surface: Weak<dyn Surface>,
    renderer: RefCell<Box<dyn Renderable<T>>>,
}

#[derive(Clone, Copy, Debug)]
enum PauseSignal {
    Visibility,
    Preference,
}

struct LoopState<T> {
    renderers: Vec<Rc<Registration<T>>>,
    paused_by_visibility: bool,
    paused_by_preference: bool,
    frame: Option<FrameHandle>,
    origin_ms: Option<f64>,
    subscriptions: Vec<(Rc<dyn SignalSource>, ListenerId)>,
    shut_down: bool,
}

struct Shared<T> {
    env: HostEnvironment,
    state: RefCell<LoopState<T>>,
}

enum Transition {
    Start,
    Stop(FrameHandle),
    Keep,
}

/// Drives any number of renderers from a single frame-scheduling loop.
///
/// The loop is scheduled exactly when at least one renderer is registered, the page is visible,
/// the user has not asked for reduced motion, a frame scheduler is available, and the coordinator
/// has not been shut down. The condition is re-evaluated after every registration, disposal and
/// signal change.
///
/// Handles are cheap to clone and share one loop. The coordinator is single-threaded: every call,
/// including host callbacks, must happen on the thread that created it.
pub struct AnimationCoordinator<T: 'static> {
    shared: Rc<Shared<T>>,
}

impl<T: 'static> Clone for AnimationCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: 'static> AnimationCoordinator<T> {
    /// Create a coordinator and subscribe to the environment's pause signals.
    pub fn new(env: HostEnvironment) -> Self {
        let paused_by_visibility = env.visibility.as_ref().is_some_and(|s| s.current());
        let paused_by_preference = env.reduced_motion.as_ref().is_some_and(|s| s.current());

        let shared = Rc::new(Shared {
            env,
            state: RefCell::new(LoopState {
                renderers: Vec::new(),
                paused_by_visibility,
                paused_by_preference,
                frame: None,
                origin_ms: None,
                subscriptions: Vec::new(),
                shut_down: false,
            }),
        });

        let mut subscriptions = Vec::new();
        for (source, signal) in [
            (&shared.env.visibility, PauseSignal::Visibility),
            (&shared.env.reduced_motion, PauseSignal::Preference),
        ] {
            let Some(source) = source else { continue };
            let weak = Rc::downgrade(&shared);
            let id = source.subscribe(Box::new(move |value: bool| {
                if let Some(shared) = weak.upgrade() {
                    shared.set_paused(signal, value);
                }
            }));
            subscriptions.push((Rc::clone(source), id));
        }
        shared.state.borrow_mut().subscriptions = subscriptions;

        tracing::debug!(
            env = ?shared.env,
            paused_by_visibility,
            paused_by_preference,
            "animation coordinator created"
        );
        Self { shared }
    }

    /// Register `renderer` to draw onto `target`, sized by `surface`.
    ///
    /// If either `target` or `surface` is missing, nothing is registered and a no-op disposer is
    /// returned. The coordinator only keeps weak references to both; once the caller drops either
    /// one the renderer is skipped on every tick until disposed.
    pub fn register<R>(
        &self,
        target: Option<Rc<RefCell<T>>>,
        surface: Option<Rc<dyn Surface>>,
        renderer: R,
    ) -> Disposer
    where
        R: Renderable<T> + 'static,
    {
        let (Some(target), Some(surface)) = (target, surface) else {
            tracing::debug!("renderer registration skipped: missing target or surface");
            return Disposer::noop();
        };

        let registration = Rc::new(Registration {
            target: Rc::downgrade(&target),
            surface: Rc::downgrade(&surface),
            renderer: RefCell::new(Box::new(renderer) as Box<dyn Renderable<T>>),
        });

        {
            let mut state = self.shared.state.borrow_mut();
            if state.shut_down {
                tracing::debug!("renderer registration skipped: coordinator is shut down");
                return Disposer::noop();
            }
            state.renderers.push(Rc::clone(&registration));
            tracing::debug!(renderers = state.renderers.len(), "renderer registered");
        }
        self.shared.refresh();

        let shared = Rc::downgrade(&self.shared);
        let registration = Rc::downgrade(&registration);
        Disposer::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared.unregister(&registration);
            }
        })
    }

    /// Tear down: unsubscribe from host signals, cancel the pending frame, drop all renderers.
    ///
    /// Idempotent. Later registrations are rejected with no-op disposers.
    pub fn shutdown(&self) {
        self.shared.shutdown();
    }

    /// Whether a frame is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.shared.state.borrow().frame.is_some()
    }

    /// Number of live registrations.
    pub fn renderer_count(&self) -> usize {
        self.shared.state.borrow().renderers.len()
    }

    /// Whether either pause signal is active.
    pub fn is_paused(&self) -> bool {
        let state = self.shared.state.borrow();
        state.paused_by_visibility || state.paused_by_preference
    }

    /// Whether [`AnimationCoordinator::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.shared.state.borrow().shut_down
    }
}

impl<T: 'static> Shared<T> {
    fn should_run(&self, state: &LoopState<T>) -> bool {
        !state.shut_down
            && !state.renderers.is_empty()
            && !state.paused_by_visibility
            && !state.paused_by_preference
            && self.env.scheduler.is_some()
    }

    fn refresh(self: &Rc<Self>) {
        let transition = {
            let state = self.state.borrow();
            match (self.should_run(&state), state.frame) {
                (true, None) => Transition::Start,
                (false, Some(handle)) => Transition::Stop(handle),
                _ => Transition::Keep,
            }
        };

        match transition {
            Transition::Start => {
                let handle = self.request_tick();
                let mut state = self.state.borrow_mut();
                state.origin_ms = None;
                state.frame = handle;
                if handle.is_some() {
                    tracing::debug!(renderers = state.renderers.len(), "animation loop started");
                }
            }
            Transition::Stop(handle) => {
                if let Some(scheduler) = &self.env.scheduler {
                    scheduler.cancel_frame(handle);
                }
                self.state.borrow_mut().frame = None;
                tracing::debug!("animation loop stopped");
            }
            Transition::Keep => {}
        }
    }

    fn request_tick(self: &Rc<Self>) -> Option<FrameHandle> {
        let scheduler = self.env.scheduler.as_ref()?;
        let weak = Rc::downgrade(self);
        let handle = scheduler.request_frame(Box::new(move |timestamp_ms: f64| {
            if let Some(shared) = weak.upgrade() {
                shared.tick(timestamp_ms);
            }
        }));
        if handle.is_none() {
            tracing::warn!("frame request refused by host; loop stays stopped");
        }
        handle
    }

    fn tick(self: &Rc<Self>, timestamp_ms: f64) {
        let (this_frame, elapsed_ms, renderers) = {
            let mut state = self.state.borrow_mut();
            let Some(this_frame) = state.frame else {
                return;
            };
            if !self.should_run(&state) {
                state.frame = None;
                return;
            }
            let origin = *state.origin_ms.get_or_insert(timestamp_ms);
            (this_frame, timestamp_ms - origin, state.renderers.clone())
        };

        // No borrow is held while renderers run: they may register or dispose.
        for registration in &renderers {
            if !self.is_registered(registration) {
                continue;
            }
            let (Some(target), Some(surface)) = (
                registration.target.upgrade(),
                registration.surface.upgrade(),
            ) else {
                continue;
            };
            let size = surface.size();
            let (Ok(mut target), Ok(mut renderer)) =
                (target.try_borrow_mut(), registration.renderer.try_borrow_mut())
            else {
                tracing::warn!("renderer skipped: target or renderer already borrowed");
                continue;
            };
            if let Err(err) = renderer.render(&mut target, size.width, size.height, elapsed_ms) {
                tracing::warn!(
                    error = %err,
                    width = size.width,
                    height = size.height,
                    elapsed_ms,
                    "renderer failed; skipped for this frame"
                );
            }
        }

        let next = {
            let state = self.state.borrow();
            // A refresh during the renderers stopped (or restarted) the loop.
            if state.frame != Some(this_frame) {
                return;
            }
            self.should_run(&state)
        };
        let handle = if next { self.request_tick() } else { None };
        self.state.borrow_mut().frame = handle;
    }

    fn is_registered(&self, registration: &Rc<Registration<T>>) -> bool {
        self.state
            .borrow()
            .renderers
            .iter()
            .any(|r| Rc::ptr_eq(r, registration))
    }

    fn unregister(self: &Rc<Self>, registration: &Weak<Registration<T>>) {
        let removed = {
            let mut state = self.state.borrow_mut();
            let pos = state
                .renderers
                .iter()
                .position(|r| std::ptr::eq(Rc::as_ptr(r), registration.as_ptr()));
            pos.map(|pos| state.renderers.remove(pos))
        };
        // Dropped outside the borrow; the renderer may own arbitrary state.
        if removed.is_none() {
            return;
        }
        drop(removed);
        tracing::debug!(
            renderers = self.state.borrow().renderers.len(),
            "renderer disposed"
        );
        self.refresh();
    }

    fn set_paused(self: &Rc<Self>, signal: PauseSignal, paused: bool) {
        {
            let mut state = self.state.borrow_mut();
            match signal {
                PauseSignal::Visibility => state.paused_by_visibility = paused,
                PauseSignal::Preference => state.paused_by_preference = paused,
            }
        }
        tracing::debug!(?signal, paused, "pause signal changed");
        self.refresh();
    }

    fn shutdown(&self) {
        let (subscriptions, frame, renderers) = {
            let mut state = self.state.borrow_mut();
            if state.shut_down {
                return;
            }
            state.shut_down = true;
            (
                std::mem::take(&mut state.subscriptions),
                state.frame.take(),
                std::mem::take(&mut state.renderers),
            )
        };
        self.release(subscriptions, frame);
        tracing::debug!(dropped = renderers.len(), "animation coordinator shut down");
    }

    fn release(
        &self,
        subscriptions: Vec<(Rc<dyn SignalSource>, ListenerId)>,
        frame: Option<FrameHandle>,
    ) {
        for (source, id) in subscriptions {
            source.unsubscribe(id);
        }
        if let (Some(handle), Some(scheduler)) = (frame, &self.env.scheduler) {
            scheduler.cancel_frame(handle);
        }
    }
}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.shut_down {
            return;
        }
        for (source, id) in std::mem::take(&mut state.subscriptions) {
            source.unsubscribe(id);
        }
        if let (Some(handle), Some(scheduler)) = (state.frame.take(), &self.env.scheduler) {
            scheduler.cancel_frame(handle);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animator/coordinator.rs"]
mod tests;
