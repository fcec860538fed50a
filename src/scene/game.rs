use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use crate::{
    animator::renderable::Renderable,
    foundation::{core::SurfaceSize, error::CanvasResult},
    render::{
        canvas::{Canvas2d, Layer},
        text::CanvasFont,
    },
    scene::{
        draw::{
            draw_clouds, draw_gem, draw_label, draw_sparkles, draw_static_scene, gem_center,
            scene_unit,
        },
        palette::SceneColors,
    },
};

const DEFAULT_LAYER_CACHE_CAPACITY: usize = 8;

/// Pre-rendered static backgrounds, one per canvas size.
///
/// Least-recently-used sizes are evicted once `capacity` layers are held.
pub struct StaticLayerCache {
    colors: SceneColors,
    layers: HashMap<SurfaceSize, Layer>,
    lru: VecDeque<SurfaceSize>,
    capacity: usize,
    built: u64,
}

impl StaticLayerCache {
    /// Capacity comes from `PRISM_CANVAS_LAYER_CACHE_CAPACITY` when set to a positive integer.
    pub fn new(colors: SceneColors) -> Self {
        let capacity = std::env::var("PRISM_CANVAS_LAYER_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_LAYER_CACHE_CAPACITY);
        Self::with_capacity(colors, capacity)
    }

    pub fn with_capacity(colors: SceneColors, capacity: usize) -> Self {
        Self {
            colors,
            layers: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
            built: 0,
        }
    }

    /// The static layer for `size`, rasterizing it on first use. Empty sizes have no layer.
    pub fn layer_for(&mut self, size: SurfaceSize) -> CanvasResult<Option<Layer>> {
        if size.is_empty() {
            return Ok(None);
        }
        if let Some(layer) = self.layers.get(&size).cloned() {
            self.touch(size);
            return Ok(Some(layer));
        }

        let colors = self.colors;
        let layer = Layer::rasterize(size.width, size.height, |c| {
            draw_static_scene(c, size.width, size.height, &colors)
        })?;
        self.built += 1;
        tracing::debug!(
            width = size.width,
            height = size.height,
            "static scene layer rasterized"
        );

        self.layers.insert(size, layer.clone());
        self.touch(size);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.layers.remove(&old);
            }
        }
        Ok(Some(layer))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers rasterized since creation, including evicted ones.
    pub fn layers_built(&self) -> u64 {
        self.built
    }

    fn touch(&mut self, size: SurfaceSize) {
        if let Some(pos) = self.lru.iter().position(|s| *s == size) {
            self.lru.remove(pos);
        }
        self.lru.push_back(size);
    }
}

/// Draw one frame of the demo scene onto an open canvas frame.
///
/// With a cache the static background is blitted from a pre-rendered layer; without one it is
/// drawn directly. With `label` the caption is drawn last, in that font.
pub fn draw_game_frame(
    canvas: &mut Canvas2d,
    width: u32,
    height: u32,
    time_ms: f64,
    colors: &SceneColors,
    cache: Option<&mut StaticLayerCache>,
    label: Option<&CanvasFont>,
) -> CanvasResult<()> {
    let unit = scene_unit(width, height);

    let layer = match cache {
        Some(cache) => cache.layer_for(SurfaceSize::new(width, height))?,
        None => None,
    };
    match layer {
        Some(layer) => canvas.draw_layer(&layer)?,
        None => draw_static_scene(canvas, width, height, colors)?,
    }

    draw_clouds(canvas, width, height, time_ms, colors)?;

    let gem = gem_center(width, height, time_ms);
    draw_sparkles(canvas, gem, time_ms, unit, colors)?;
    draw_gem(canvas, gem, (unit * 3.0).max(1.0), colors)?;

    match label {
        Some(font) => draw_label(canvas, width, height, font, colors),
        None => Ok(()),
    }
}

/// The demo scene as a [`Renderable`] for [`Canvas2d`] targets.
///
/// Scenes created with [`GameScene::with_cache`] share the static background cache.
#[derive(Clone)]
pub struct GameScene {
    colors: SceneColors,
    cache: Option<Rc<RefCell<StaticLayerCache>>>,
    label: Option<CanvasFont>,
}

impl Default for GameScene {
    fn default() -> Self {
        Self::new(SceneColors::DEFAULT)
    }
}

impl GameScene {
    /// A scene that draws its background every frame.
    pub fn new(colors: SceneColors) -> Self {
        Self {
            colors,
            cache: None,
            label: None,
        }
    }

    /// A scene that blits its background from `cache`.
    pub fn with_cache(cache: Rc<RefCell<StaticLayerCache>>) -> Self {
        let colors = cache.borrow().colors;
        Self {
            colors,
            cache: Some(cache),
            label: None,
        }
    }

    /// Also draw the caption, in `font`.
    pub fn with_label(mut self, font: CanvasFont) -> Self {
        self.label = Some(font);
        self
    }

    pub fn colors(&self) -> &SceneColors {
        &self.colors
    }

    pub fn shows_label(&self) -> bool {
        self.label.is_some()
    }
}

impl Renderable<Canvas2d> for GameScene {
    fn render(
        &mut self,
        canvas: &mut Canvas2d,
        width: u32,
        height: u32,
        elapsed_ms: f64,
    ) -> CanvasResult<()> {
        // A zero-sized element has nothing to paint; the last frame is kept.
        if width == 0 || height == 0 {
            return Ok(());
        }
        canvas.begin_frame(width, height)?;
        let label = self.label.as_ref();
        match &self.cache {
            Some(cache) => {
                let mut cache = cache.borrow_mut();
                draw_game_frame(
                    canvas,
                    width,
                    height,
                    elapsed_ms,
                    &self.colors,
                    Some(&mut *cache),
                    label,
                )?;
            }
            None => draw_game_frame(
                canvas,
                width,
                height,
                elapsed_ms,
                &self.colors,
                None,
                label,
            )?,
        }
        canvas.end_frame()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/game.rs"]
mod tests;
