use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{Document, Event, EventTarget, MediaQueryList, Window};

use crate::host::{
    FrameCallback, FrameHandle, FrameScheduler, HostEnvironment, ListenerId, SignalListener,
    SignalSource, frames::FrameTable,
};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

type RafClosure = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` / `cancelAnimationFrame` on a browser window.
///
/// The scheduler owns every closure it hands to the browser. Cancelled requests free theirs
/// immediately; fired ones are freed on the next frame.
pub struct WebFrameScheduler {
    window: Window,
    frames: Rc<RefCell<FrameTable<RafClosure>>>,
}

impl WebFrameScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            frames: Rc::new(RefCell::new(FrameTable::default())),
        }
    }

    /// Requests handed to the browser that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.frames.borrow().live_len()
    }
}

impl FrameScheduler for WebFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle> {
        let handle = self.frames.borrow_mut().next_handle();

        let table = Rc::downgrade(&self.frames);
        let closure: RafClosure = Closure::once(move |timestamp: f64| {
            if let Some(table) = table.upgrade() {
                let stale = table.borrow_mut().retire(handle);
                drop(stale);
            }
            callback(timestamp);
        });

        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref::<js_sys::Function>())
        {
            Ok(id) => {
                self.frames.borrow_mut().insert(handle, id, closure);
                Some(handle)
            }
            Err(err) => {
                tracing::warn!(?err, "requestAnimationFrame failed");
                None
            }
        }
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let Some((id, closure)) = self.frames.borrow_mut().cancel(handle) else {
            return;
        };
        if let Err(err) = self.window.cancel_animation_frame(id) {
            tracing::warn!(?err, "cancelAnimationFrame failed");
        }
        drop(closure);
    }
}

impl Drop for WebFrameScheduler {
    fn drop(&mut self) {
        let live = self.frames.borrow().live_handles();
        for handle in live {
            self.cancel_frame(handle);
        }
        // The retired closure may be the one running right now; JS owns it from here.
        if let Some(closure) = self.frames.borrow_mut().take_retired() {
            let _ = closure.into_js_value();
        }
    }
}

/// A boolean derived from an [`EventTarget`], re-read whenever `event` fires.
pub struct EventSignal {
    target: EventTarget,
    event: &'static str,
    read: Rc<dyn Fn() -> bool>,
    next_id: Cell<u64>,
    closures: RefCell<HashMap<ListenerId, Closure<dyn FnMut(Event)>>>,
}

impl EventSignal {
    fn new(target: EventTarget, event: &'static str, read: Rc<dyn Fn() -> bool>) -> Self {
        Self {
            target,
            event,
            read,
            next_id: Cell::new(0),
            closures: RefCell::new(HashMap::new()),
        }
    }

    /// `true` while `document.hidden`; notified on `visibilitychange`.
    pub fn visibility(document: Document) -> Self {
        let doc = document.clone();
        Self::new(
            document.into(),
            "visibilitychange",
            Rc::new(move || doc.hidden()),
        )
    }

    /// `true` while the reduced-motion media query matches; notified on `change`.
    pub fn reduced_motion(query: MediaQueryList) -> Self {
        let mql = query.clone();
        Self::new(query.into(), "change", Rc::new(move || mql.matches()))
    }
}

impl SignalSource for EventSignal {
    fn current(&self) -> bool {
        (self.read)()
    }

    fn subscribe(&self, listener: SignalListener) -> ListenerId {
        let id = ListenerId(self.next_id.get() + 1);
        self.next_id.set(id.0);

        let read = Rc::clone(&self.read);
        let closure =
            Closure::wrap(Box::new(move |_event: Event| listener(read())) as Box<dyn FnMut(Event)>);
        if let Err(err) = self
            .target
            .add_event_listener_with_callback(self.event, closure.as_ref().unchecked_ref())
        {
            tracing::warn!(?err, event = self.event, "addEventListener failed");
        }
        self.closures.borrow_mut().insert(id, closure);
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        let Some(closure) = self.closures.borrow_mut().remove(&id) else {
            return;
        };
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, closure.as_ref().unchecked_ref())
        {
            tracing::warn!(?err, event = self.event, "removeEventListener failed");
        }
    }
}

impl Drop for EventSignal {
    fn drop(&mut self) {
        let ids: Vec<ListenerId> = self.closures.borrow().keys().copied().collect();
        for id in ids {
            self.unsubscribe(id);
        }
    }
}

impl HostEnvironment {
    /// Environment backed by the current browser window.
    ///
    /// Facilities the page does not provide are left as `None`; outside a browser this is
    /// equivalent to [`HostEnvironment::detached`].
    pub fn browser() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::detached();
        };

        let visibility = window
            .document()
            .map(|doc| Rc::new(EventSignal::visibility(doc)) as Rc<dyn SignalSource>);
        let reduced_motion = window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .map(|mql| Rc::new(EventSignal::reduced_motion(mql)) as Rc<dyn SignalSource>);

        Self {
            scheduler: Some(Rc::new(WebFrameScheduler::new(window))),
            visibility,
            reduced_motion,
        }
    }
}
