use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::SceneScheduler;

use super::{Surface, Viewport, CLEAR_COLOR};

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    /// Clears the backbuffer, lets the scheduler draw the active scene (or the running
    /// fade) into it, then presents.
    pub(crate) fn render_scenes(&mut self, scheduler: &SceneScheduler) -> Result<(), Error> {
        if self.viewport.is_empty() {
            return Ok(());
        }

        let Viewport { width, height } = self.viewport;
        let mut surface = Surface::new(self.pixels.frame_mut(), width, height);
        surface.clear(CLEAR_COLOR);
        scheduler.draw(&mut surface);

        self.pixels.render()
    }
}
