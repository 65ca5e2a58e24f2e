use crate::coords::Viewport;
use crate::input::PointerEvent;
use crate::lifecycle::AppPhase;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Call order for one window: `on_attach`, then any mix of `on_resize`,
/// `on_pointer`, `on_phase` and `on_frame`, then `on_detach` while the
/// window still exists.
pub trait App {
    /// The window and its GPU surface exist.
    fn on_attach(&mut self, viewport: Viewport) -> AppControl {
        let _ = viewport;
        AppControl::Continue
    }

    fn on_resize(&mut self, viewport: Viewport) {
        let _ = viewport;
    }

    fn on_pointer(&mut self, event: PointerEvent) {
        let _ = event;
    }

    /// Called after the runtime published a new phase.
    fn on_phase(&mut self, phase: AppPhase) {
        let _ = phase;
    }

    /// Called once per display refresh.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// The window is about to close.
    fn on_detach(&mut self) {}
}
