//! Pixel-art primitives of the demo scene.
//!
//! Every routine sizes itself from `unit`, one percent of the canvas's shortest side, and snaps
//! rectangle coordinates to whole pixels so adjacent blocks never leave sub-pixel seams.

use std::f64::consts::TAU;

use crate::{
    foundation::{core::Point, error::CanvasResult},
    render::{canvas::Canvas2d, text::CanvasFont},
    scene::palette::SceneColors,
};

/// One percent of the shortest side.
pub fn scene_unit(width: u32, height: u32) -> f64 {
    f64::from(width.min(height)) / 100.0
}

/// Horizon line: the grass starts at three quarters of the height.
pub fn horizon_y(height: u32) -> f64 {
    f64::from(height) * 0.75
}

/// Where the gem floats at `time_ms`.
pub fn gem_center(width: u32, height: u32, time_ms: f64) -> Point {
    let (w, h) = (f64::from(width), f64::from(height));
    let bob = h * 0.04;
    Point::new(w / 2.0, h * 0.38 + (time_ms / 300.0).sin() * bob)
}

fn snap(v: f64) -> f64 {
    v.trunc()
}

fn fill_snapped(canvas: &mut Canvas2d, x: f64, y: f64, w: f64, h: f64) -> CanvasResult<()> {
    canvas.fill_rect(snap(x), snap(y), snap(w), snap(h))
}

/// Sky, grass band, horizon stripe and grass blades. Does not depend on time.
pub fn draw_static_scene(
    canvas: &mut Canvas2d,
    width: u32,
    height: u32,
    colors: &SceneColors,
) -> CanvasResult<()> {
    let (w, h) = (f64::from(width), f64::from(height));
    let unit = scene_unit(width, height);
    let horizon = horizon_y(height);

    canvas.set_fill_style(colors.sky);
    canvas.fill_rect(0.0, 0.0, w, h)?;

    canvas.set_fill_style(colors.grass);
    fill_snapped(canvas, 0.0, horizon, w, h * 0.25)?;

    canvas.set_fill_style(colors.grass_dark);
    let stripe = (unit * 2.0).max(1.0);
    fill_snapped(canvas, 0.0, horizon, w, stripe)?;

    let spacing = (unit * 4.0).max(3.0);
    let blade_w = unit.max(1.0);
    let mut i = 0u32;
    while f64::from(i) < w / spacing {
        let x = f64::from(i) * spacing + f64::from(i % 2) * (spacing / 2.0);
        let blade_h = (unit * (1.5 + f64::from(i % 3) * 0.5)).max(1.0);
        fill_snapped(canvas, x, horizon - blade_h, blade_w, blade_h)?;
        i += 1;
    }
    Ok(())
}

/// Three clouds drifting right and wrapping around.
pub fn draw_clouds(
    canvas: &mut Canvas2d,
    width: u32,
    height: u32,
    time_ms: f64,
    colors: &SceneColors,
) -> CanvasResult<()> {
    let (w, h) = (f64::from(width), f64::from(height));
    let px = (scene_unit(width, height) * 2.0).max(1.0);
    let speed = w / 5000.0;

    for i in 0..3 {
        let fi = f64::from(i);
        let x = snap(((time_ms * speed + fi * w * 0.5) % (w * 1.3)) - w * 0.15);
        let y = snap(h * (0.08 + fi * 0.10));

        // (dx, dy, width) in cloud pixels for the three rows, bottom first.
        let rows = [(1.0, 2.0, 10.0), (0.0, 1.0, 12.0), (2.0, 0.0, 8.0)];

        canvas.set_fill_style(colors.cloud_shadow);
        for (dx, dy, len) in rows {
            fill_snapped(canvas, x + px * dx + 1.0, y + px * dy + 1.0, px * len, px)?;
        }
        canvas.set_fill_style(colors.cloud);
        for (dx, dy, len) in rows {
            fill_snapped(canvas, x + px * dx, y + px * dy, px * len, px)?;
        }
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum GemTone {
    Pink,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
}

impl GemTone {
    fn color(self, colors: &SceneColors) -> crate::foundation::core::Rgba8 {
        match self {
            Self::Pink => colors.gem_pink,
            Self::Orange => colors.gem_orange,
            Self::Yellow => colors.gem_yellow,
            Self::Green => colors.gem_green,
            Self::Cyan => colors.gem_cyan,
            Self::Blue => colors.gem_blue,
            Self::Purple => colors.gem_purple,
        }
    }
}

// (column, row, tone) in gem pixels relative to the center, top row first.
const GEM_PIXELS: [(i8, i8, GemTone); 18] = [
    (-1, -3, GemTone::Yellow),
    (-2, -2, GemTone::Orange),
    (-1, -2, GemTone::Yellow),
    (0, -2, GemTone::Green),
    (-3, -1, GemTone::Pink),
    (-2, -1, GemTone::Orange),
    (-1, -1, GemTone::Yellow),
    (0, -1, GemTone::Green),
    (1, -1, GemTone::Cyan),
    (-3, 0, GemTone::Pink),
    (-2, 0, GemTone::Orange),
    (-1, 0, GemTone::Yellow),
    (0, 0, GemTone::Cyan),
    (1, 0, GemTone::Blue),
    (-2, 1, GemTone::Purple),
    (-1, 1, GemTone::Blue),
    (0, 1, GemTone::Blue),
    (-1, 2, GemTone::Purple),
];

/// Diamond-shaped gem made of `pixel`-sized blocks around `center`.
pub fn draw_gem(
    canvas: &mut Canvas2d,
    center: Point,
    pixel: f64,
    colors: &SceneColors,
) -> CanvasResult<()> {
    let p = pixel.round();
    let (cx, cy) = (center.x.round(), center.y.round());
    for (col, row, tone) in GEM_PIXELS {
        canvas.set_fill_style(tone.color(colors));
        canvas.fill_rect(cx + f64::from(col) * p, cy + f64::from(row) * p, p, p)?;
    }
    Ok(())
}

/// Five twinkling sparkles orbiting `center`.
pub fn draw_sparkles(
    canvas: &mut Canvas2d,
    center: Point,
    time_ms: f64,
    unit: f64,
    colors: &SceneColors,
) -> CanvasResult<()> {
    const COUNT: u32 = 5;
    let orbit = unit * 12.0;

    for i in 0..COUNT {
        let fi = f64::from(i);
        let angle = time_ms / 500.0 + fi / f64::from(COUNT) * TAU;
        let x = center.x + angle.cos() * orbit;
        let y = center.y + angle.sin() * orbit * 0.6;

        let twinkle = (time_ms / 100.0 + fi * 1.5).sin();
        if twinkle <= -0.5 {
            continue;
        }
        let size = (unit * (1.0 + twinkle * 0.5)).max(1.0);

        canvas.set_global_alpha((0.5 + twinkle * 0.5) as f32);
        canvas.set_fill_style(colors.sparkle_glow);
        fill_snapped(canvas, x - size, y - size * 0.5, size * 2.0, size)?;
        fill_snapped(canvas, x - size * 0.5, y - size, size, size * 2.0)?;
        canvas.set_fill_style(colors.sparkle);
        fill_snapped(canvas, x - size * 0.5, y - size * 0.5, size, size)?;
        canvas.set_global_alpha(1.0);
    }
    Ok(())
}

/// Caption drawn under the scene by widgets that show a label.
pub const LABEL_TEXT: &str = "PrismGB";

/// Font size of the caption: seven units, never below 8 px.
pub fn label_size(width: u32, height: u32) -> f32 {
    (scene_unit(width, height) * 7.0).max(8.0) as f32
}

/// The caption, centered near the bottom edge in the dark grass color.
pub fn draw_label(
    canvas: &mut Canvas2d,
    width: u32,
    height: u32,
    font: &CanvasFont,
    colors: &SceneColors,
) -> CanvasResult<()> {
    canvas.set_fill_style(colors.grass_dark);
    canvas.fill_text(
        LABEL_TEXT,
        f64::from(width) / 2.0,
        f64::from(height) * 0.94,
        label_size(width, height),
        font,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scene/draw.rs"]
mod tests;
