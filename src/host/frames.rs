use std::collections::HashMap;

use crate::host::FrameHandle;

/// Ownership of the host-side callback objects behind outstanding frame requests.
///
/// `C` is whatever must stay alive while the host holds a request (a JS closure in the browser).
/// Live entries are keyed by [`FrameHandle`] next to the host's own request id. A fired entry
/// cannot be dropped from inside its own callback, so it is parked in a single retired slot and
/// released when the next frame fires.
pub(crate) struct FrameTable<C> {
    next_id: u64,
    live: HashMap<FrameHandle, (i32, C)>,
    retired: Option<C>,
}

impl<C> Default for FrameTable<C> {
    fn default() -> Self {
        Self {
            next_id: 0,
            live: HashMap::new(),
            retired: None,
        }
    }
}

#[cfg_attr(not(feature = "web"), allow(dead_code))]
impl<C> FrameTable<C> {
    pub(crate) fn next_handle(&mut self) -> FrameHandle {
        self.next_id += 1;
        FrameHandle(self.next_id)
    }

    pub(crate) fn insert(&mut self, handle: FrameHandle, host_id: i32, callback: C) {
        self.live.insert(handle, (host_id, callback));
    }

    /// Move a fired entry into the retired slot. Returns the previously retired callback,
    /// which the caller drops once the table is no longer borrowed.
    pub(crate) fn retire(&mut self, handle: FrameHandle) -> Option<C> {
        let current = self.live.remove(&handle).map(|(_, callback)| callback);
        std::mem::replace(&mut self.retired, current)
    }

    /// Remove a live entry, returning the host id to cancel and its callback.
    pub(crate) fn cancel(&mut self, handle: FrameHandle) -> Option<(i32, C)> {
        self.live.remove(&handle)
    }

    pub(crate) fn live_handles(&self) -> Vec<FrameHandle> {
        self.live.keys().copied().collect()
    }

    pub(crate) fn live_len(&self) -> usize {
        self.live.len()
    }

    #[cfg(test)]
    pub(crate) fn has_retired(&self) -> bool {
        self.retired.is_some()
    }

    /// Hand out the retired callback, for a host that is shutting down.
    pub(crate) fn take_retired(&mut self) -> Option<C> {
        self.retired.take()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/frames.rs"]
mod tests;
