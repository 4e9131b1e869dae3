use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::RenderTarget;

/// Owns the `pixels` surface. The buffer keeps the display size while the
/// surface follows the window, so the buffer is scaled up to fill it.
pub(crate) struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    display_width: u32,
    display_height: u32,
}

impl Renderer {
    pub(crate) fn new(
        window: Arc<Window>,
        display_width: u32,
        display_height: u32,
    ) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(
            Arc::clone(&window),
            size.width,
            size.height,
            display_width,
            display_height,
        )?;
        Ok(Self {
            window,
            pixels,
            display_width,
            display_height,
        })
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(
            Arc::clone(&self.window),
            width,
            height,
            self.display_width,
            self.display_height,
        )?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        surface_width: u32,
        surface_height: u32,
        display_width: u32,
        display_height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width, surface_height, window);
        Pixels::new(display_width, display_height, surface)
    }

    /// Maps a physical window position to buffer pixels, clamped to the buffer.
    pub(crate) fn window_to_buffer(&self, x: f64, y: f64) -> (i32, i32) {
        let (px, py) = match self.pixels.window_pos_to_pixel((x as f32, y as f32)) {
            Ok(position) => position,
            Err(outside) => self.pixels.clamp_pixel_pos(outside),
        };
        (px as i32, py as i32)
    }

    pub(crate) fn draw_frame<F>(&mut self, draw: F) -> Result<(), Error>
    where
        F: FnOnce(&mut RenderTarget<'_>),
    {
        let (width, height) = (self.display_width, self.display_height);
        if let Some(mut target) = RenderTarget::new(self.pixels.frame_mut(), width, height) {
            draw(&mut target);
        }
        self.pixels.render()
    }
}
