use crate::coords::Vec2;

/// One sample of a stroke in logical pixels.
///
/// `width` is the optional per-point width channel produced by pressure-aware
/// devices. When absent, the brush width applies.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InkPoint {
    pub pos: Vec2,
    pub width: Option<f32>,
}

impl InkPoint {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { pos: Vec2::new(x, y), width: None }
    }

    #[inline]
    pub const fn with_width(x: f32, y: f32, width: f32) -> Self {
        Self { pos: Vec2::new(x, y), width: Some(width) }
    }

    /// Width to rasterize with, falling back to `default`.
    ///
    /// Non-finite or negative channel values are treated as missing.
    #[inline]
    pub fn width_or(self, default: f32) -> f32 {
        match self.width {
            Some(w) if w.is_finite() && w >= 0.0 => w,
            _ => default,
        }
    }
}

impl From<Vec2> for InkPoint {
    fn from(pos: Vec2) -> Self {
        Self { pos, width: None }
    }
}
