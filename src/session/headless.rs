use std::{cell::RefCell, rc::Rc};

use crate::{
    animator::coordinator::AnimationCoordinator,
    config::DemoConfig,
    foundation::error::CanvasResult,
    host::{
        HostEnvironment,
        manual::{ManualFrameScheduler, ManualSignal},
    },
    render::{canvas::Canvas2d, text::CanvasFont},
    scene::{
        game::{GameScene, StaticLayerCache},
        palette::SceneColors,
    },
    session::sink::FrameSink,
    widget::DemoWidget,
};

/// Counters for a headless run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Ticks pumped.
    pub ticks: u32,
    /// Ticks on which the scheduler had a frame to run.
    pub active_ticks: u32,
    /// Frames handed to the sink, across all widgets.
    pub frames_emitted: u64,
}

/// The demo page without a browser: a manual host, one coordinator and the configured widgets.
pub struct HeadlessSession {
    config: DemoConfig,
    scheduler: Rc<ManualFrameScheduler>,
    visibility: Rc<ManualSignal>,
    reduced_motion: Rc<ManualSignal>,
    coordinator: AnimationCoordinator<Canvas2d>,
    widgets: Vec<DemoWidget>,
    next_tick: u32,
}

impl HeadlessSession {
    /// Validate `config`, build the host and mount every widget.
    pub fn new(config: DemoConfig) -> CanvasResult<Self> {
        config.validate()?;

        let scheduler = Rc::new(ManualFrameScheduler::new());
        let visibility = Rc::new(ManualSignal::new(false));
        let reduced_motion = Rc::new(ManualSignal::new(config.reduced_motion));
        let env = HostEnvironment::detached()
            .with_scheduler(scheduler.clone())
            .with_visibility(visibility.clone())
            .with_reduced_motion(reduced_motion.clone());
        let coordinator = AnimationCoordinator::new(env);

        let label_font = match &config.label_font {
            Some(path) if config.widgets.iter().any(|w| w.show_label) => {
                Some(CanvasFont::load(path)?)
            }
            _ => None,
        };
        let cache = config
            .shared_layer_cache
            .then(|| Rc::new(RefCell::new(StaticLayerCache::new(SceneColors::DEFAULT))));
        let widgets = config
            .widgets
            .iter()
            .map(|w| {
                let mut scene = match &cache {
                    Some(cache) => GameScene::with_cache(Rc::clone(cache)),
                    None => GameScene::new(SceneColors::DEFAULT),
                };
                if let (true, Some(font)) = (w.show_label, &label_font) {
                    scene = scene.with_label(font.clone());
                }
                DemoWidget::mount(&coordinator, w.name.clone(), w.width, w.height, scene)
            })
            .collect();

        Ok(Self {
            config,
            scheduler,
            visibility,
            reduced_motion,
            coordinator,
            widgets,
            next_tick: 0,
        })
    }

    pub fn coordinator(&self) -> &AnimationCoordinator<Canvas2d> {
        &self.coordinator
    }

    pub fn widgets(&self) -> &[DemoWidget] {
        &self.widgets
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.visibility.set(hidden);
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.reduced_motion.set(reduced);
    }

    /// Pump `config.frames` ticks, pushing every frame a widget rendered into `sink`.
    ///
    /// Calling `run` again continues from the next tick.
    pub fn run(&mut self, sink: &mut dyn FrameSink) -> CanvasResult<RunStats> {
        let mut stats = RunStats::default();
        let first = self.next_tick;

        for tick in first..first.saturating_add(self.config.frames) {
            for (widget, cfg) in self.widgets.iter().zip(&self.config.widgets) {
                if let Some(r) = cfg.resize.filter(|r| r.at_frame == tick) {
                    widget.resize(r.width, r.height);
                }
            }
            if self.config.hidden_from_frame == Some(tick) {
                self.visibility.set(true);
            }

            let before: Vec<u64> = self.widgets.iter().map(|w| w.frames_rendered()).collect();
            let fired = self
                .scheduler
                .fire(self.config.frame_timestamp_ms(tick));

            stats.ticks += 1;
            if fired > 0 {
                stats.active_ticks += 1;
            }
            for (widget, prev) in self.widgets.iter().zip(before) {
                if widget.frames_rendered() == prev {
                    continue;
                }
                if let Some(frame) = widget.snapshot() {
                    sink.push_frame(widget.name(), tick, &frame)?;
                    stats.frames_emitted += 1;
                }
            }
            self.next_tick = tick + 1;
        }
        sink.finish()?;

        tracing::info!(
            ticks = stats.ticks,
            active_ticks = stats.active_ticks,
            frames = stats.frames_emitted,
            running = self.coordinator.is_running(),
            "headless run finished"
        );
        Ok(stats)
    }
}

impl Drop for HeadlessSession {
    fn drop(&mut self) {
        self.widgets.clear();
        self.coordinator.shutdown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/headless.rs"]
mod tests;
