use winit::event::WindowEvent;

use super::ctx::{FrameCtx, LoadCtx, UpdateCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
///
/// Callback order: `on_load` once, then per frame `on_update` followed by
/// `on_frame`. `on_resize` and `on_window_event` arrive between frames.
/// `on_unload` runs once before the GPU and window are dropped.
pub trait App {
    /// Creates GPU resources. An error stops the runtime and is returned from `run`.
    fn on_load(&mut self, ctx: &mut LoadCtx<'_>) -> anyhow::Result<()>;

    /// Called with the new physical size of the window.
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called for raw window events, after the input state was updated.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Advances application state once per frame.
    fn on_update(&mut self, ctx: &mut UpdateCtx<'_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }

    /// Renders one frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Releases application resources.
    fn on_unload(&mut self) {}
}
