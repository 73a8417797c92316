mod renderer;
mod surface;

pub use renderer::Renderer;
pub use surface::Surface;

/// Backbuffer colour shown wherever the active scene does not draw.
pub const CLEAR_COLOR: [u8; 4] = [0, 0, 0, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
