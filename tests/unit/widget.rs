use super::*;
use crate::{
    host::{
        HostEnvironment,
        manual::{ManualFrameScheduler, ManualSignal},
    },
    scene::game::GameScene,
};

fn coordinator() -> (Rc<ManualFrameScheduler>, AnimationCoordinator<Canvas2d>) {
    let sched = Rc::new(ManualFrameScheduler::new());
    let env = HostEnvironment::detached()
        .with_scheduler(sched.clone())
        .with_visibility(Rc::new(ManualSignal::new(false)));
    (sched, AnimationCoordinator::new(env))
}

#[test]
fn mounted_widget_renders_each_tick() {
    let (sched, coord) = coordinator();
    let w = DemoWidget::mount(&coord, "hero", 64, 36, GameScene::default());
    assert_eq!(w.name(), "hero");
    assert!(coord.is_running());

    sched.fire(0.0);
    sched.fire(16.0);
    assert_eq!(w.frames_rendered(), 2);
    assert_eq!(w.snapshot().unwrap().width, 64);
}

#[test]
fn resize_is_picked_up_on_next_tick() {
    let (sched, coord) = coordinator();
    let w = DemoWidget::mount(&coord, "card", 100, 50, GameScene::default());
    sched.fire(0.0);
    w.resize(200, 100);
    assert_eq!(w.size(), SurfaceSize::new(200, 100));
    sched.fire(16.0);
    assert_eq!(w.canvas().size(), Some(SurfaceSize::new(200, 100)));
}

#[test]
fn unmount_and_drop_stop_the_loop() {
    let (sched, coord) = coordinator();
    let a = DemoWidget::mount(&coord, "a", 32, 32, GameScene::default());
    let b = DemoWidget::mount(&coord, "b", 32, 32, GameScene::default());
    assert_eq!(coord.renderer_count(), 2);

    a.unmount();
    a.unmount();
    assert_eq!(coord.renderer_count(), 1);
    drop(b);
    assert_eq!(coord.renderer_count(), 0);
    assert!(!coord.is_running());
    assert_eq!(sched.fire(16.0), 0);
    drop(a);
}
