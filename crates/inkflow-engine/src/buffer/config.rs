use crate::paint::Color;
use crate::raster::Brush;

/// Initial parameters of a render buffer.
#[derive(Debug, Clone)]
pub struct BufferConfig {
    /// Raster size in physical pixels.
    pub width: u32,
    pub height: u32,
    /// Logical→physical scale (the display's scale factor).
    pub scale: f32,
    /// Canvas color behind all ink.
    pub clear: Color,
    pub brush: Brush,
}

impl BufferConfig {
    pub fn new(width: u32, height: u32, scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
            ..Self::default()
        }
    }

    pub fn with_brush(mut self, brush: Brush) -> Self {
        self.brush = brush;
        self
    }

    pub fn with_clear(mut self, clear: Color) -> Self {
        self.clear = clear;
        self
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            scale: 1.0,
            clear: Color::WHITE,
            brush: Brush::default(),
        }
    }
}
