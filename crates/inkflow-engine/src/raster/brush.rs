use crate::paint::Color;

/// Solid brush used for in-progress ink and for filling committed strokes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Brush {
    pub color: Color,
    /// Stroke width in logical pixels when a point carries no width channel.
    pub width: f32,
}

impl Brush {
    #[inline]
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }

    pub(crate) fn skia_paint(&self) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(self.color.to_skia());
        paint.anti_alias = true;
        paint
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(Color::BLACK, 2.0)
    }
}
