mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod session;

pub use input::{EdgeKey, InputAction, InputSnapshot};
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub(crate) use rendering::Renderer;
pub use rendering::{render_tilemap, visible_cell_range, RenderTarget};
pub use session::{Session, SessionCommand};
