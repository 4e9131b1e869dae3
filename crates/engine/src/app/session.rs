use super::{InputSnapshot, LoopMetricsSnapshot, RenderTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Continue,
    Quit,
}

/// Game or editor state driven by the app loop: `update` once per fixed tick,
/// `render` once per presented frame.
pub trait Session {
    fn update(&mut self, input: &InputSnapshot) -> SessionCommand;

    fn render(&mut self, target: &mut RenderTarget<'_>);

    /// Window title for the current frame; `None` keeps the configured title.
    fn title(&self, _metrics: &LoopMetricsSnapshot) -> Option<String> {
        None
    }

    fn shutdown(&mut self) {}
}
