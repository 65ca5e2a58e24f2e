use std::path::Path;

use anyhow::{Context, Result};
use tiny_skia::Pixmap;

use super::{DisplaySurface, Frame, PresentError};

/// CPU-only display surface.
///
/// Keeps the last presented frame in memory and can write it out as PNG.
/// Used for headless runs and as the studio's exit snapshot.
#[derive(Debug, Default)]
pub struct SnapshotSurface {
    canvas: Option<Pixmap>,
    presented: u64,
    suspended: bool,
}

impl SnapshotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a surface that cannot accept frames (e.g. mid-reconfigure).
    pub fn set_ready(&mut self, ready: bool) {
        self.suspended = !ready;
    }

    /// Number of frames presented so far.
    #[inline]
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Last presented frame.
    #[inline]
    pub fn canvas(&self) -> Option<&Pixmap> {
        self.canvas.as_ref()
    }

    /// Writes the last presented frame to `path` as straight-alpha RGBA PNG.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let canvas = self.canvas.as_ref().context("no frame has been presented yet")?;

        let mut straight = Vec::with_capacity(canvas.data().len());
        for px in canvas.pixels() {
            let c = px.demultiply();
            straight.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        let image = image::RgbaImage::from_raw(canvas.width(), canvas.height(), straight)
            .context("snapshot buffer does not match canvas size")?;
        image
            .save(path)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;

        log::info!("snapshot written to {}", path.display());
        Ok(())
    }
}

impl DisplaySurface for SnapshotSurface {
    fn is_ready(&self) -> bool {
        !self.suspended
    }

    fn present(&mut self, frame: &Frame<'_>) -> Result<(), PresentError> {
        if self.suspended {
            return Err(PresentError::NotReady);
        }

        let (w, h) = (frame.raster.width(), frame.raster.height());
        let stale = self.canvas.as_ref().map_or(true, |c| c.width() != w || c.height() != h);
        if stale {
            self.canvas = Some(Pixmap::new(w, h).ok_or(PresentError::NotReady)?);
        }
        let Some(canvas) = self.canvas.as_mut() else {
            return Err(PresentError::NotReady);
        };

        frame.composite(canvas);
        self.presented += 1;
        Ok(())
    }
}
