use std::cell::Cell;

use super::*;
use crate::{
    foundation::{core::SurfaceSize, error::CanvasError},
    host::manual::{ManualFrameScheduler, ManualSignal},
};

type Calls = Vec<(u32, u32, f64)>;

struct FixedSurface(Cell<SurfaceSize>);

impl Surface for FixedSurface {
    fn size(&self) -> SurfaceSize {
        self.0.get()
    }
}

struct Harness {
    sched: Rc<ManualFrameScheduler>,
    hidden: Rc<ManualSignal>,
    reduced: Rc<ManualSignal>,
    coord: AnimationCoordinator<Calls>,
}

fn harness() -> Harness {
    let sched = Rc::new(ManualFrameScheduler::new());
    let hidden = Rc::new(ManualSignal::new(false));
    let reduced = Rc::new(ManualSignal::new(false));
    let env = HostEnvironment::detached()
        .with_scheduler(sched.clone())
        .with_visibility(hidden.clone())
        .with_reduced_motion(reduced.clone());
    Harness {
        sched,
        hidden,
        reduced,
        coord: AnimationCoordinator::new(env),
    }
}

fn target() -> Rc<RefCell<Calls>> {
    Rc::new(RefCell::new(Vec::new()))
}

fn surface(w: u32, h: u32) -> Rc<FixedSurface> {
    Rc::new(FixedSurface(Cell::new(SurfaceSize::new(w, h))))
}

fn record(t: &mut Calls, w: u32, h: u32, elapsed: f64) -> crate::CanvasResult<()> {
    t.push((w, h, elapsed));
    Ok(())
}

fn reg(
    coord: &AnimationCoordinator<Calls>,
    t: &Rc<RefCell<Calls>>,
    s: &Rc<FixedSurface>,
) -> Disposer {
    coord.register(
        Some(Rc::clone(t)),
        Some(Rc::clone(s) as Rc<dyn Surface>),
        record,
    )
}

#[test]
fn loop_runs_iff_renderers_registered() {
    let h = harness();
    assert!(!h.coord.is_running());

    let (ta, sa) = (target(), surface(10, 10));
    let a = reg(&h.coord, &ta, &sa);
    let b = reg(&h.coord, &ta, &sa);
    assert!(h.coord.is_running());
    assert_eq!(h.sched.pending(), 1);
    assert_eq!(h.coord.renderer_count(), 2);

    a.dispose();
    assert!(h.coord.is_running());
    b.dispose();
    assert!(!h.coord.is_running());
    assert_eq!(h.sched.pending(), 0);
}

#[test]
fn duplicate_registrations_each_render() {
    let h = harness();
    let (t, s) = (target(), surface(4, 4));
    let _a = reg(&h.coord, &t, &s);
    let _b = reg(&h.coord, &t, &s);
    h.sched.fire(0.0);
    assert_eq!(t.borrow().len(), 2);
}

#[test]
fn double_dispose_never_removes_another_renderer() {
    let h = harness();
    let (t, s) = (target(), surface(4, 4));
    let a = reg(&h.coord, &t, &s);
    let _b = reg(&h.coord, &t, &s);

    a.dispose();
    a.dispose();
    assert_eq!(h.coord.renderer_count(), 1);
    assert!(h.coord.is_running());
}

#[test]
fn missing_target_or_surface_is_a_silent_noop() {
    let h = harness();
    let (t, s) = (target(), surface(4, 4));

    let d1 = h
        .coord
        .register(None, Some(Rc::clone(&s) as Rc<dyn Surface>), record);
    let d2 = h.coord.register(Some(Rc::clone(&t)), None, record);
    assert!(d1.is_noop());
    assert!(d2.is_noop());
    d1.dispose();
    d2.dispose();
    assert_eq!(h.coord.renderer_count(), 0);
    assert!(!h.coord.is_running());
}

#[test]
fn elapsed_time_is_relative_to_first_tick() {
    let h = harness();
    let (t, s) = (target(), surface(100, 50));
    let a = reg(&h.coord, &t, &s);

    h.sched.fire(1000.0);
    h.sched.fire(1016.0);
    assert_eq!(*t.borrow(), vec![(100, 50, 0.0), (100, 50, 16.0)]);

    a.dispose();
    assert_eq!(h.sched.fire(1032.0), 0);
    assert_eq!(t.borrow().len(), 2);
}

#[test]
fn restart_resets_elapsed_time() {
    let h = harness();
    let (t, s) = (target(), surface(8, 8));
    let _a = reg(&h.coord, &t, &s);

    h.sched.fire(0.0);
    h.sched.fire(500.0);
    h.hidden.set(true);
    assert!(!h.coord.is_running());
    h.hidden.set(false);
    h.sched.fire(90_000.0);

    let elapsed: Vec<f64> = t.borrow().iter().map(|c| c.2).collect();
    assert_eq!(elapsed, vec![0.0, 500.0, 0.0]);
}

#[test]
fn either_pause_signal_stops_the_loop() {
    let h = harness();
    let (t, s) = (target(), surface(8, 8));
    let _a = reg(&h.coord, &t, &s);

    h.reduced.set(true);
    assert!(h.coord.is_paused());
    assert!(!h.coord.is_running());
    h.hidden.set(true);
    h.reduced.set(false);
    assert!(!h.coord.is_running());
    h.hidden.set(false);
    assert!(h.coord.is_running());
}

#[test]
fn initial_signal_values_are_honoured() {
    let sched = Rc::new(ManualFrameScheduler::new());
    let env = HostEnvironment::detached()
        .with_scheduler(sched.clone())
        .with_reduced_motion(Rc::new(ManualSignal::new(true)));
    let coord = AnimationCoordinator::<Calls>::new(env);
    let (t, s) = (target(), surface(8, 8));
    let _a = reg(&coord, &t, &s);
    assert!(coord.is_paused());
    assert!(!coord.is_running());
    assert_eq!(sched.pending(), 0);
}

#[test]
fn no_scheduler_means_never_running() {
    let coord = AnimationCoordinator::<Calls>::new(HostEnvironment::detached());
    let (t, s) = (target(), surface(8, 8));
    let d = reg(&coord, &t, &s);
    assert!(!d.is_noop());
    assert_eq!(coord.renderer_count(), 1);
    assert!(!coord.is_running());
}

#[test]
fn refused_frame_request_leaves_loop_stopped() {
    let h = harness();
    let (t, s) = (target(), surface(8, 8));

    h.sched.set_refusing(true);
    let _a = reg(&h.coord, &t, &s);
    assert_eq!(h.coord.renderer_count(), 1);
    assert!(!h.coord.is_running());
    assert_eq!(h.sched.pending(), 0);

    // Any later refresh retries the request.
    h.sched.set_refusing(false);
    h.hidden.set(true);
    h.hidden.set(false);
    assert!(h.coord.is_running());
    h.sched.fire(100.0);
    assert_eq!(*t.borrow(), vec![(8, 8, 0.0)]);

    // A refused reschedule after a tick also reports the loop as stopped.
    h.sched.set_refusing(true);
    h.sched.fire(116.0);
    assert_eq!(t.borrow().len(), 2);
    assert!(!h.coord.is_running());
    assert_eq!(h.sched.fire(132.0), 0);
}

#[test]
fn dropped_target_is_skipped_but_stays_registered() {
    let h = harness();
    let (ta, sa) = (target(), surface(8, 8));
    let (tb, sb) = (target(), surface(8, 8));
    let _a = reg(&h.coord, &ta, &sa);
    let _b = reg(&h.coord, &tb, &sb);

    drop(sa);
    h.sched.fire(0.0);
    assert!(ta.borrow().is_empty());
    assert_eq!(tb.borrow().len(), 1);
    assert_eq!(h.coord.renderer_count(), 2);
    assert!(h.coord.is_running());
}

#[test]
fn failing_renderer_is_skipped_for_the_tick_only() {
    let h = harness();
    let (t, s) = (target(), surface(8, 8));
    let fails = Rc::new(Cell::new(0));
    let f = Rc::clone(&fails);
    let _bad = h.coord.register(
        Some(Rc::clone(&t)),
        Some(Rc::clone(&s) as Rc<dyn Surface>),
        move |_: &mut Calls, _: u32, _: u32, _: f64| -> crate::CanvasResult<()> {
            f.set(f.get() + 1);
            Err(CanvasError::render("boom"))
        },
    );
    let _good = reg(&h.coord, &t, &s);

    h.sched.fire(0.0);
    h.sched.fire(16.0);
    assert_eq!(fails.get(), 2);
    assert_eq!(t.borrow().len(), 2);
    assert!(h.coord.is_running());
}

#[test]
fn renderer_disposing_itself_mid_tick_stops_cleanly() {
    let h = harness();
    let (t, s) = (target(), surface(8, 8));
    let slot: Rc<RefCell<Option<Disposer>>> = Rc::new(RefCell::new(None));
    let inner = Rc::clone(&slot);
    let d = h.coord.register(
        Some(Rc::clone(&t)),
        Some(Rc::clone(&s) as Rc<dyn Surface>),
        move |c: &mut Calls, w: u32, hh: u32, e: f64| -> crate::CanvasResult<()> {
            c.push((w, hh, e));
            if let Some(d) = inner.borrow().as_ref() {
                d.dispose();
            }
            Ok(())
        },
    );
    *slot.borrow_mut() = Some(d);

    assert_eq!(h.sched.fire(0.0), 1);
    assert!(!h.coord.is_running());
    assert_eq!(h.sched.pending(), 0);
    assert_eq!(h.sched.fire(16.0), 0);
    assert_eq!(t.borrow().len(), 1);
}

#[test]
fn registration_during_tick_does_not_double_schedule() {
    let h = harness();
    let (t, s) = (target(), surface(8, 8));
    let coord = h.coord.clone();
    let (t2, s2) = (Rc::clone(&t), Rc::clone(&s));
    let added: Rc<RefCell<Vec<Disposer>>> = Rc::new(RefCell::new(Vec::new()));
    let added2 = Rc::clone(&added);
    let _spawner = h.coord.register(
        Some(Rc::clone(&t)),
        Some(Rc::clone(&s) as Rc<dyn Surface>),
        move |_: &mut Calls, _: u32, _: u32, _: f64| -> crate::CanvasResult<()> {
            if added2.borrow().is_empty() {
                let d = coord.register(
                    Some(Rc::clone(&t2)),
                    Some(Rc::clone(&s2) as Rc<dyn Surface>),
                    record,
                );
                added2.borrow_mut().push(d);
            }
            Ok(())
        },
    );

    h.sched.fire(0.0);
    assert_eq!(h.coord.renderer_count(), 2);
    assert_eq!(h.sched.pending(), 1);
    h.sched.fire(16.0);
    assert_eq!(t.borrow().len(), 1);
}

#[test]
fn shutdown_unsubscribes_and_rejects_new_work() {
    let h = harness();
    let (t, s) = (target(), surface(8, 8));
    let a = reg(&h.coord, &t, &s);
    assert_eq!(h.hidden.listener_count(), 1);
    assert_eq!(h.reduced.listener_count(), 1);

    h.coord.shutdown();
    h.coord.shutdown();
    assert!(h.coord.is_shut_down());
    assert_eq!(h.hidden.listener_count(), 0);
    assert_eq!(h.reduced.listener_count(), 0);
    assert_eq!(h.sched.pending(), 0);
    assert_eq!(h.coord.renderer_count(), 0);

    a.dispose();
    assert!(reg(&h.coord, &t, &s).is_noop());
    assert!(!h.coord.is_running());
}

#[test]
fn dropping_last_handle_releases_host_resources() {
    let h = harness();
    let (t, s) = (target(), surface(8, 8));
    let a = reg(&h.coord, &t, &s);
    let Harness {
        sched,
        hidden,
        reduced,
        coord,
    } = h;

    drop(coord);
    assert_eq!(hidden.listener_count(), 0);
    assert_eq!(reduced.listener_count(), 0);
    assert_eq!(sched.pending(), 0);
    a.dispose();
}
