//! Decorative canvas animations driven by one shared frame loop.
//!
//! Every widget registers a renderer with an [`AnimationCoordinator`]. The coordinator keeps a
//! single frame request alive while at least one renderer is registered and the page is neither
//! hidden nor under a reduced-motion preference, and hands each renderer the time elapsed since
//! the loop last started.
//!
//! The host side (frame scheduling, visibility, motion preference) sits behind the traits in
//! [`host`]. [`host::manual`] drives everything from tests or the CLI; the `web` feature binds the
//! same traits to the browser.
#![forbid(unsafe_code)]

pub mod animator;
pub mod config;
pub mod foundation;
pub mod host;
pub mod render;
pub mod scene;
pub mod session;
pub mod widget;

pub use animator::{
    coordinator::{AnimationCoordinator, Disposer},
    renderable::{Renderable, Surface},
};
pub use config::{DemoConfig, WidgetConfig, WidgetResize};
pub use foundation::{
    core::{Point, Rect, Rgba8, SurfaceSize, Vec2},
    error::{CanvasError, CanvasResult},
};
pub use host::{
    FrameHandle, FrameScheduler, HostEnvironment, ListenerId, SignalSource,
    manual::{ManualFrameScheduler, ManualSignal},
};
pub use render::{
    canvas::{Canvas2d, CanvasElement, FrameRGBA, Layer},
    text::CanvasFont,
};
pub use scene::{
    game::{GameScene, StaticLayerCache, draw_game_frame},
    palette::SceneColors,
};
pub use session::{
    headless::{HeadlessSession, RunStats},
    sink::{FrameSink, InMemorySink, PngSequenceSink},
};
pub use widget::DemoWidget;
