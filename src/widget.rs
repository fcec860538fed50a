use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

use crate::{
    animator::{
        coordinator::{AnimationCoordinator, Disposer},
        renderable::{Renderable, Surface},
    },
    foundation::core::SurfaceSize,
    render::canvas::{Canvas2d, CanvasElement, FrameRGBA},
};

/// One decorative canvas on the page.
///
/// Owns its drawing target and element and keeps them registered with the shared coordinator
/// until [`DemoWidget::unmount`] or drop.
pub struct DemoWidget {
    name: String,
    canvas: Rc<RefCell<Canvas2d>>,
    element: Rc<CanvasElement>,
    disposer: Disposer,
}

impl DemoWidget {
    pub fn mount<R>(
        coordinator: &AnimationCoordinator<Canvas2d>,
        name: impl Into<String>,
        width: u32,
        height: u32,
        renderer: R,
    ) -> Self
    where
        R: Renderable<Canvas2d> + 'static,
    {
        let name = name.into();
        let canvas = Rc::new(RefCell::new(Canvas2d::new()));
        let element = Rc::new(CanvasElement::new(width, height));
        let disposer = coordinator.register(
            Some(Rc::clone(&canvas)),
            Some(Rc::clone(&element) as Rc<dyn Surface>),
            renderer,
        );
        tracing::debug!(widget = %name, width, height, "demo widget mounted");
        Self {
            name,
            canvas,
            element,
            disposer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resize the element; the next tick renders at the new size.
    pub fn resize(&self, width: u32, height: u32) {
        self.element.resize(width, height);
    }

    pub fn size(&self) -> SurfaceSize {
        self.element.size()
    }

    /// Borrow the drawing target. Must not be held across a coordinator tick.
    pub fn canvas(&self) -> Ref<'_, Canvas2d> {
        self.canvas.borrow()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.canvas.borrow().frames_rendered()
    }

    pub fn snapshot(&self) -> Option<FrameRGBA> {
        self.canvas.borrow().snapshot()
    }

    /// Unregister from the coordinator. Idempotent.
    pub fn unmount(&self) {
        self.disposer.dispose();
    }
}

impl Drop for DemoWidget {
    fn drop(&mut self) {
        self.disposer.dispose();
    }
}

#[cfg(test)]
#[path = "../tests/unit/widget.rs"]
mod tests;
