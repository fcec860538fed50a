use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::host::{
    FrameCallback, FrameHandle, FrameScheduler, ListenerId, SignalListener, SignalSource,
};

/// Frame scheduler driven explicitly by the caller.
///
/// Requests accumulate until [`ManualFrameScheduler::fire`] is called. A fire runs the callbacks
/// that were pending when it started, in request order; callbacks requested while firing wait for
/// the next fire, the same way a browser batches animation-frame callbacks.
#[derive(Default)]
pub struct ManualFrameScheduler {
    next_id: Cell<u64>,
    clock_ms: Cell<f64>,
    pending: RefCell<Vec<(FrameHandle, FrameCallback)>>,
    fired: Cell<u64>,
    refusing: Cell<bool>,
}

impl ManualFrameScheduler {
    /// Create a scheduler whose clock starts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the pending callbacks with `timestamp_ms`. Returns how many ran.
    pub fn fire(&self, timestamp_ms: f64) -> usize {
        self.clock_ms.set(timestamp_ms);
        let batch: Vec<FrameHandle> = self.pending.borrow().iter().map(|(h, _)| *h).collect();

        let mut ran = 0;
        for handle in batch {
            // An earlier callback in this batch may have cancelled this one.
            let callback = {
                let mut pending = self.pending.borrow_mut();
                match pending.iter().position(|(h, _)| *h == handle) {
                    Some(pos) => pending.remove(pos).1,
                    None => continue,
                }
            };
            callback(timestamp_ms);
            ran += 1;
        }
        self.fired.set(self.fired.get() + ran as u64);
        ran
    }

    /// Advance the clock by `delta_ms` and fire.
    pub fn advance(&self, delta_ms: f64) -> usize {
        self.fire(self.clock_ms.get() + delta_ms)
    }

    /// Timestamp of the most recent fire.
    pub fn now_ms(&self) -> f64 {
        self.clock_ms.get()
    }

    /// Number of outstanding requests.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Total callbacks run since creation.
    pub fn fired(&self) -> u64 {
        self.fired.get()
    }

    /// While set, every request is rejected the way a failing host would.
    pub fn set_refusing(&self, refusing: bool) {
        self.refusing.set(refusing);
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle> {
        if self.refusing.get() {
            return None;
        }
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = FrameHandle(id);
        self.pending.borrow_mut().push((handle, callback));
        Some(handle)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

/// Boolean signal set explicitly by the caller.
#[derive(Default)]
pub struct ManualSignal {
    value: Cell<bool>,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn(bool)>)>>,
}

impl ManualSignal {
    /// Create a signal with an initial value.
    pub fn new(initial: bool) -> Self {
        Self {
            value: Cell::new(initial),
            ..Self::default()
        }
    }

    /// Store `value` and notify listeners if it changed.
    pub fn set(&self, value: bool) {
        if self.value.replace(value) == value {
            return;
        }
        let listeners: Vec<Rc<dyn Fn(bool)>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(value);
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl SignalSource for ManualSignal {
    fn current(&self) -> bool {
        self.value.get()
    }

    fn subscribe(&self, listener: SignalListener) -> ListenerId {
        let id = ListenerId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.listeners.borrow_mut().push((id, Rc::from(listener)));
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(l, _)| *l != id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/manual.rs"]
mod tests;
