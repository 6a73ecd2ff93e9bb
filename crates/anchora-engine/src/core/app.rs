use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by scenes.
///
/// The runtime calls `on_frame` once per animation frame, after the input
/// received since the previous frame has been folded into the context.
pub trait App {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once when the loop is about to stop.
    fn on_exit(&mut self) {}
}
