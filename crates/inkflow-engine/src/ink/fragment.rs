use super::InkPoint;

/// A partial, in-progress slice of a stroke.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeFragment {
    pub points: Vec<InkPoint>,
    /// Marks the last fragment of a stroke.
    pub is_final: bool,
}

impl StrokeFragment {
    #[inline]
    pub fn new(points: Vec<InkPoint>, is_final: bool) -> Self {
        Self { points, is_final }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }
}
