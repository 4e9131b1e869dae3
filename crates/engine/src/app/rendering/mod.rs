mod renderer;
mod target;

pub(crate) use renderer::Renderer;
pub use target::{render_tilemap, visible_cell_range, RenderTarget};
