use std::path::PathBuf;

use anyhow::Result;
use inkflow_engine::device::GpuInit;
use inkflow_engine::lifecycle::Lifecycle;
use inkflow_engine::paint::Color;
use inkflow_engine::raster::Brush;
use inkflow_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::app::StudioApp;
use crate::pen::PenConfig;

/// Studio builder.
///
/// ```rust,ignore
/// Studio::new()
///     .title("Inkflow Studio")
///     .size(1024.0, 768.0)
///     .run()?;
/// ```
pub struct Studio {
    title: String,
    width: f64,
    height: f64,
    pen: Option<PenConfig>,
    snapshot: Option<PathBuf>,
}

impl Studio {
    pub fn new() -> Self {
        Self {
            title: "inkflow studio".to_string(),
            width: 1024.0,
            height: 768.0,
            pen: Some(PenConfig::default()),
            snapshot: None,
        }
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Synthetic pen settings; `None` leaves only the mouse.
    pub fn pen(mut self, pen: Option<PenConfig>) -> Self {
        self.pen = pen;
        self
    }

    /// Writes the canvas to `path` as PNG when the window closes.
    pub fn snapshot(mut self, path: Option<PathBuf>) -> Self {
        self.snapshot = path;
        self
    }

    pub fn run(self) -> Result<()> {
        let config = RuntimeConfig {
            title: self.title,
            initial_size: LogicalSize::new(self.width, self.height),
        };

        let lifecycle = Lifecycle::default();
        let app = StudioApp::new(
            lifecycle.clone(),
            Brush::default(),
            Color::WHITE,
            self.pen,
            self.snapshot,
        );

        Runtime::run(config, GpuInit::default(), lifecycle, app)
    }
}

impl Default for Studio {
    fn default() -> Self {
        Self::new()
    }
}
