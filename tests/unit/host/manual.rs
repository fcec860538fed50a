use super::*;

#[test]
fn fire_runs_only_requests_pending_at_start() {
    let sched = Rc::new(ManualFrameScheduler::new());
    let seen = Rc::new(RefCell::new(Vec::new()));

    let s = Rc::clone(&sched);
    let log = Rc::clone(&seen);
    sched.request_frame(Box::new(move |t| {
        log.borrow_mut().push(t);
        let log = Rc::clone(&log);
        s.request_frame(Box::new(move |t| log.borrow_mut().push(t)));
    }));

    assert_eq!(sched.fire(10.0), 1);
    assert_eq!(*seen.borrow(), vec![10.0]);
    assert_eq!(sched.pending(), 1);

    assert_eq!(sched.advance(16.0), 1);
    assert_eq!(*seen.borrow(), vec![10.0, 26.0]);
    assert_eq!(sched.fired(), 2);
}

#[test]
fn cancelled_requests_never_fire() {
    let sched = ManualFrameScheduler::new();
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    let handle = sched
        .request_frame(Box::new(move |_| h.set(h.get() + 1)))
        .unwrap();
    sched.cancel_frame(handle);
    sched.cancel_frame(handle);
    sched.cancel_frame(FrameHandle(999));
    assert_eq!(sched.fire(1.0), 0);
    assert_eq!(hits.get(), 0);
}

#[test]
fn refusing_scheduler_drops_requests() {
    let sched = ManualFrameScheduler::new();
    let hits = Rc::new(Cell::new(0));

    sched.set_refusing(true);
    let h = Rc::clone(&hits);
    assert!(sched.request_frame(Box::new(move |_| h.set(h.get() + 1))).is_none());
    assert_eq!(sched.pending(), 0);

    sched.set_refusing(false);
    let h = Rc::clone(&hits);
    assert!(sched.request_frame(Box::new(move |_| h.set(h.get() + 1))).is_some());
    assert_eq!(sched.fire(0.0), 1);
    assert_eq!(hits.get(), 1);
}

#[test]
fn signal_notifies_on_change_only() {
    let signal = ManualSignal::new(false);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let id = signal.subscribe(Box::new(move |v| log.borrow_mut().push(v)));

    signal.set(false);
    signal.set(true);
    signal.set(true);
    assert!(signal.current());
    assert_eq!(*seen.borrow(), vec![true]);

    signal.unsubscribe(id);
    signal.set(false);
    assert_eq!(*seen.borrow(), vec![true]);
    assert_eq!(signal.listener_count(), 0);
}
