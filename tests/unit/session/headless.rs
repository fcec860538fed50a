use super::*;
use crate::{
    config::{WidgetConfig, WidgetResize},
    session::sink::InMemorySink,
};

fn widget(name: &str, width: u32, height: u32) -> WidgetConfig {
    WidgetConfig {
        name: name.to_string(),
        width,
        height,
        resize: None,
        show_label: false,
    }
}

fn config(frames: u32, widgets: Vec<WidgetConfig>) -> DemoConfig {
    DemoConfig {
        frames,
        widgets,
        ..DemoConfig::default()
    }
}

#[test]
fn every_widget_renders_every_tick() {
    let mut session =
        HeadlessSession::new(config(3, vec![widget("a", 40, 30), widget("b", 20, 20)])).unwrap();
    assert_eq!(session.coordinator().renderer_count(), 2);

    let mut sink = InMemorySink::new();
    let stats = session.run(&mut sink).unwrap();
    assert_eq!(
        stats,
        RunStats {
            ticks: 3,
            active_ticks: 3,
            frames_emitted: 6,
        }
    );
    assert_eq!(sink.ticks_for("a"), vec![0, 1, 2]);
    assert_eq!(sink.ticks_for("b"), vec![0, 1, 2]);
    assert!(session.coordinator().is_running());
}

#[test]
fn hiding_the_page_stops_emission() {
    let mut cfg = config(5, vec![widget("a", 16, 16)]);
    cfg.hidden_from_frame = Some(2);
    let mut session = HeadlessSession::new(cfg).unwrap();

    let mut sink = InMemorySink::new();
    let stats = session.run(&mut sink).unwrap();
    assert_eq!(sink.ticks_for("a"), vec![0, 1]);
    assert_eq!(stats.active_ticks, 2);
    assert!(session.coordinator().is_paused());
    assert!(!session.coordinator().is_running());

    session.set_hidden(false);
    let stats = session.run(&mut sink).unwrap();
    assert_eq!(stats.frames_emitted, 5);
    assert_eq!(sink.ticks_for("a"), vec![0, 1, 5, 6, 7, 8, 9]);
}

#[test]
fn reduced_motion_from_config_never_renders() {
    let mut cfg = config(4, vec![widget("a", 16, 16)]);
    cfg.reduced_motion = true;
    let mut session = HeadlessSession::new(cfg).unwrap();

    let mut sink = InMemorySink::new();
    let stats = session.run(&mut sink).unwrap();
    assert_eq!(stats.frames_emitted, 0);
    assert_eq!(stats.active_ticks, 0);
    assert!(sink.frames().is_empty());

    session.set_reduced_motion(false);
    session.run(&mut sink).unwrap();
    assert_eq!(sink.ticks_for("a"), vec![4, 5, 6, 7]);
}

#[test]
fn resize_applies_before_the_scheduled_tick() {
    let mut w = widget("a", 32, 16);
    w.resize = Some(WidgetResize {
        at_frame: 1,
        width: 64,
        height: 32,
    });
    let mut session = HeadlessSession::new(config(2, vec![w])).unwrap();

    let mut sink = InMemorySink::new();
    session.run(&mut sink).unwrap();
    let sizes: Vec<(u32, u32)> = sink
        .frames()
        .iter()
        .map(|(_, _, f)| (f.width, f.height))
        .collect();
    assert_eq!(sizes, vec![(32, 16), (64, 32)]);
}

#[test]
fn invalid_config_is_rejected() {
    let err = HeadlessSession::new(config(0, vec![widget("a", 8, 8)]))
        .err()
        .unwrap();
    assert!(matches!(err, crate::CanvasError::Validation(_)));
}

#[test]
fn shared_and_private_caches_agree_on_background() {
    let run = |shared: bool| {
        let mut cfg = config(2, vec![widget("a", 160, 90), widget("b", 160, 90)]);
        cfg.shared_layer_cache = shared;
        let mut session = HeadlessSession::new(cfg).unwrap();
        let mut sink = InMemorySink::new();
        session.run(&mut sink).unwrap();
        sink.frames()
            .iter()
            .map(|(_, _, f)| f.pixel(1, 88))
            .collect::<Vec<_>>()
    };
    let shared = run(true);
    assert_eq!(shared.len(), 4);
    assert_eq!(shared, run(false));
}

#[test]
fn labelled_widgets_load_the_configured_font() {
    let mut labelled = widget("hero", 160, 90);
    labelled.show_label = true;
    let mut cfg = config(1, vec![labelled, widget("card", 160, 90)]);
    cfg.label_font = Some(
        concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/data/fonts/DejaVuSansMono-Bold.ttf"
        )
        .into(),
    );
    let mut session = HeadlessSession::new(cfg).unwrap();
    let mut sink = InMemorySink::new();
    session.run(&mut sink).unwrap();

    let frames = sink.frames();
    assert_eq!(frames.len(), 2);
    assert_ne!(frames[0].2, frames[1].2);
}

#[test]
fn missing_label_font_fails_session_setup() {
    let mut labelled = widget("hero", 16, 16);
    labelled.show_label = true;
    let mut cfg = config(1, vec![labelled]);
    cfg.label_font = Some("tests/data/fonts/missing.ttf".into());
    let err = HeadlessSession::new(cfg).err().unwrap();
    assert!(matches!(err, crate::CanvasError::Config(_)));
}
