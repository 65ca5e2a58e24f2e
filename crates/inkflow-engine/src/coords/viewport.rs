/// Drawable size in physical pixels plus the logical→physical scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32, scale: f32) -> Self {
        Self { width, height, scale }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0 && self.scale.is_finite() && self.scale > 0.0
    }

    /// Size in logical pixels.
    #[inline]
    pub fn logical_size(self) -> (f32, f32) {
        (self.width as f32 / self.scale, self.height as f32 / self.scale)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0, 0, 1.0)
    }
}
