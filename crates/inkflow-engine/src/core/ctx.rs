use tiny_skia::{IntRect, Pixmap};
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::lifecycle::AppPhase;
use crate::render::{BlitRenderer, RenderCtx};
use crate::surface::{DisplaySurface, Frame, PresentError};
use crate::time::FrameTime;

/// Per-window handles.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Physical drawable size and scale factor.
    pub fn viewport(&self) -> Viewport {
        viewport_of(self.window)
    }
}

pub(crate) fn viewport_of(window: &Window) -> Viewport {
    let phys = window.inner_size();
    Viewport::new(phys.width, phys.height, window.scale_factor() as f32)
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// `'a` is the callback duration, `'w` the window borrow carried by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub surface: GpuSurface<'a, 'w>,
    pub phase: AppPhase,
    pub time: FrameTime,
}

/// Display surface backed by the window's swapchain.
///
/// Frames are composited into a CPU canvas sized to the swapchain, then
/// blitted. The canvas persists across frames, so only the frame's damage is
/// repainted and uploaded.
pub struct GpuSurface<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
    blit: &'a mut BlitRenderer,
    canvas: &'a mut Option<Pixmap>,
    window: &'a Window,
}

impl<'a, 'w> GpuSurface<'a, 'w> {
    pub(crate) fn new(
        gpu: &'a mut Gpu<'w>,
        blit: &'a mut BlitRenderer,
        canvas: &'a mut Option<Pixmap>,
        window: &'a Window,
    ) -> Self {
        Self {
            gpu,
            blit,
            canvas,
            window,
        }
    }
}

impl DisplaySurface for GpuSurface<'_, '_> {
    fn is_ready(&self) -> bool {
        self.gpu.is_configured()
    }

    fn present(&mut self, frame: &Frame<'_>) -> Result<(), PresentError> {
        if !self.gpu.is_configured() {
            return Err(PresentError::NotReady);
        }

        let size = self.gpu.size();
        let stale = self
            .canvas
            .as_ref()
            .is_none_or(|c| c.width() != size.width || c.height() != size.height);
        if stale {
            *self.canvas = Some(Pixmap::new(size.width, size.height).ok_or(PresentError::NotReady)?);
        }
        let Some(canvas) = self.canvas.as_mut() else {
            return Err(PresentError::NotReady);
        };
        let region = if stale {
            frame.composite(canvas);
            IntRect::from_xywh(0, 0, canvas.width(), canvas.height())
        } else {
            frame.composite_damage(canvas)
        };

        let mut gpu_frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return Err(match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured => PresentError::Lost,
                    SurfaceErrorAction::SkipFrame => PresentError::NotReady,
                    SurfaceErrorAction::Fatal => {
                        PresentError::Fatal("out of memory acquiring swapchain image".into())
                    }
                });
            }
        };

        {
            let mut rctx = RenderCtx::for_frame(&*self.gpu, &mut gpu_frame);
            self.blit.render(&mut rctx, canvas, region);
        }

        self.window.pre_present_notify();
        self.gpu.submit(gpu_frame);
        Ok(())
    }
}
