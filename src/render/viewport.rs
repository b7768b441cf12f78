use super::context::GpuContext;
use super::renderer::SceneRenderer;
use crate::view::{SceneFrame, Viewport};
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use winit::dpi::PhysicalSize;

/// The window's GPU context plus the texture view being drawn this frame.
///
/// The host sets `target` after acquiring the surface texture and clears it
/// once the frame is presented.
pub struct GpuSurface {
    pub context: GpuContext<'static>,
    pub target: Option<wgpu::TextureView>,
}

impl GpuSurface {
    pub fn new(context: GpuContext<'static>) -> Self {
        Self { context, target: None }
    }

    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }
}

/// [`Viewport`] that draws into the window surface.
pub struct GpuViewport {
    surface: Rc<RefCell<GpuSurface>>,
    renderer: Option<SceneRenderer>,
}

impl GpuViewport {
    pub fn new(surface: Rc<RefCell<GpuSurface>>) -> Self {
        let renderer = SceneRenderer::new(&surface.borrow().context);
        Self {
            surface,
            renderer: Some(renderer),
        }
    }
}

impl Viewport for GpuViewport {
    fn size(&self) -> (u32, u32) {
        let surface = self.surface.borrow();
        (surface.context.config.width, surface.context.config.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface
            .borrow_mut()
            .context
            .resize(PhysicalSize::new(width, height));
    }

    fn render(&mut self, frame: &SceneFrame<'_>) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let surface = self.surface.borrow();
        match surface.target.as_ref() {
            Some(target) => renderer.render(&surface.context, target, frame),
            None => warn!("scene frame skipped: no surface texture acquired"),
        }
    }

    fn release(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            debug!("released viewport with {} cached meshes", renderer.cached_meshes());
        }
    }
}
