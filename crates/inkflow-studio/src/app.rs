use std::path::PathBuf;

use inkflow_engine::buffer::{BufferConfig, DrainOutcome, RenderBuffer};
use inkflow_engine::capture::InkCaptureSource;
use inkflow_engine::coords::Viewport;
use inkflow_engine::core::{App, AppControl, FrameCtx};
use inkflow_engine::input::PointerEvent;
use inkflow_engine::lifecycle::{AppPhase, Lifecycle};
use inkflow_engine::paint::Color;
use inkflow_engine::raster::Brush;
use inkflow_engine::surface::{DisplaySurface, PresentError, SnapshotSurface};

use crate::pen::{PenConfig, SyntheticPen};
use crate::pointer::PointerPen;

/// The studio's window contents: one render buffer fed by the pointer and,
/// optionally, a synthetic pen.
pub struct StudioApp {
    lifecycle: Lifecycle,
    brush: Brush,
    clear: Color,
    pen: Option<PenConfig>,
    snapshot: Option<PathBuf>,

    buffer: Option<RenderBuffer>,
    sources: Vec<Box<dyn InkCaptureSource>>,
    pointer: PointerPen,
}

impl StudioApp {
    pub fn new(
        lifecycle: Lifecycle,
        brush: Brush,
        clear: Color,
        pen: Option<PenConfig>,
        snapshot: Option<PathBuf>,
    ) -> Self {
        Self {
            lifecycle,
            brush,
            clear,
            pen,
            snapshot,
            buffer: None,
            sources: Vec::new(),
            pointer: PointerPen::new(brush.width),
        }
    }

    fn attach(&mut self, viewport: Viewport) -> anyhow::Result<()> {
        let config = BufferConfig::new(viewport.width, viewport.height, viewport.scale)
            .with_brush(self.brush)
            .with_clear(self.clear);
        let buffer = RenderBuffer::new(config, self.lifecycle.clone())?;

        self.pointer.start(buffer.sink())?;

        if let Some(mut pen_config) = self.pen.clone() {
            pen_config.view = viewport.logical_size();
            pen_config.width = self.brush.width;
            let mut pen = SyntheticPen::new(pen_config);
            pen.start(buffer.sink())?;
            log::info!("capture source started: {}", pen.name());
            self.sources.push(Box::new(pen));
        }

        self.buffer = Some(buffer);
        Ok(())
    }

    /// Runs everything still queued onto the canvas and writes it as PNG.
    fn write_snapshot(&self, buffer: &mut RenderBuffer) {
        let Some(path) = self.snapshot.as_deref() else { return };

        let mut surface = SnapshotSurface::new();
        let report = buffer.drain_and_present(&mut surface);
        let presented = match report.outcome {
            DrainOutcome::Presented => Ok(()),
            // Nothing queued and nothing owed; the snapshot still needs a frame.
            DrainOutcome::Idle => surface.present(&buffer.frame()),
            outcome => {
                log::warn!(
                    "snapshot drain stopped early ({outcome:?}, {} ops still queued); writing current canvas",
                    report.remaining
                );
                surface.present(&buffer.frame())
            }
        };
        let saved = presented
            .map_err(anyhow::Error::from)
            .and_then(|()| surface.save_png(path));
        if let Err(e) = saved {
            log::error!("snapshot failed: {e:#}");
        }
    }
}

impl App for StudioApp {
    fn on_attach(&mut self, viewport: Viewport) -> AppControl {
        match self.attach(viewport) {
            Ok(()) => AppControl::Continue,
            Err(e) => {
                log::error!("failed to attach render buffer: {e:#}");
                AppControl::Exit
            }
        }
    }

    fn on_resize(&mut self, viewport: Viewport) {
        // Minimized windows report a zero size; keep the old canvas.
        if !viewport.is_valid() {
            return;
        }
        let Some(buffer) = self.buffer.as_mut() else { return };
        if let Err(e) = buffer.resize(viewport.width, viewport.height, viewport.scale) {
            log::warn!("render buffer resize failed: {e}");
        }
    }

    fn on_pointer(&mut self, event: PointerEvent) {
        self.pointer.handle(event);
    }

    fn on_phase(&mut self, phase: AppPhase) {
        log::info!("app phase: {phase:?}");
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(buffer) = self.buffer.as_mut() else {
            return AppControl::Continue;
        };

        let report = buffer.drain_and_present(&mut ctx.surface);
        match report.outcome {
            DrainOutcome::PresentFailed(PresentError::Fatal(reason)) => {
                log::error!("display surface failed: {reason}");
                AppControl::Exit
            }
            DrainOutcome::Presented if report.executed > 0 => {
                log::trace!(
                    "frame {}: {} ops, {} layers",
                    ctx.time.frame_index,
                    report.executed,
                    buffer.layers().len()
                );
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn on_detach(&mut self) {
        for source in &mut self.sources {
            if let Err(e) = source.stop() {
                log::warn!("failed to stop {}: {e:#}", source.name());
            }
        }
        self.sources.clear();
        if let Err(e) = self.pointer.stop() {
            log::warn!("failed to stop pointer: {e:#}");
        }

        let Some(mut buffer) = self.buffer.take() else { return };
        self.write_snapshot(&mut buffer);
        log::info!("{} strokes drawn", buffer.strokes_finalized());
        buffer.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkflow_engine::coords::Vec2;

    fn app(snapshot: Option<PathBuf>) -> StudioApp {
        StudioApp::new(Lifecycle::default(), Brush::default(), Color::WHITE, None, snapshot)
    }

    #[test]
    fn attach_creates_buffer_fed_by_pointer() {
        let mut app = app(None);
        assert_eq!(app.on_attach(Viewport::new(64, 48, 1.0)), AppControl::Continue);

        app.on_pointer(PointerEvent::Pressed(Vec2::new(4.0, 4.0)));
        app.on_pointer(PointerEvent::Released(Vec2::new(20.0, 10.0)));

        let buffer = app.buffer.as_ref().unwrap();
        assert_eq!(buffer.pending_len(), 3);
    }

    #[test]
    fn zero_size_attach_exits() {
        let mut app = app(None);
        assert_eq!(app.on_attach(Viewport::new(0, 0, 1.0)), AppControl::Exit);
    }

    fn snapshot_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("inkflow-studio-{name}-{}.png", std::process::id()))
    }

    #[test]
    fn detach_writes_snapshot_and_releases_buffer() {
        let path = snapshot_path("release");
        let mut app = app(Some(path.clone()));
        app.on_attach(Viewport::new(32, 32, 1.0));
        app.on_resize(Viewport::new(0, 0, 1.0));

        app.on_detach();

        assert!(app.buffer.is_none());
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn snapshot_includes_ink_still_queued_at_detach() {
        let path = snapshot_path("queued");
        let mut app = app(Some(path.clone()));
        app.on_attach(Viewport::new(64, 64, 1.0));

        // No frame tick runs between the stroke and closing the window.
        app.on_pointer(PointerEvent::Pressed(Vec2::new(5.0, 32.0)));
        app.on_pointer(PointerEvent::Moved { pos: Vec2::new(30.0, 32.0), pressed: true });
        app.on_pointer(PointerEvent::Released(Vec2::new(60.0, 32.0)));
        app.on_detach();

        let png = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).unwrap();

        let ink = png.get_pixel(30, 32);
        assert!(ink[0] < 128, "expected ink at (30, 32), got {ink:?}");
        let paper = png.get_pixel(30, 10);
        assert_eq!(paper.0, [255, 255, 255, 255]);
    }

    #[test]
    fn snapshot_of_untouched_canvas_is_blank() {
        let path = snapshot_path("blank");
        let mut app = app(Some(path.clone()));
        app.on_attach(Viewport::new(16, 16, 1.0));
        app.on_detach();

        let png = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).unwrap();
        assert!(png.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }
}
