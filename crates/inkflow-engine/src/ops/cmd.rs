use crate::ink::{StrokeFragment, VectorPath};

/// Deferred unit of render work.
///
/// Operations are immutable once enqueued and are executed by the render
/// buffer in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Render the fragment into the raster target.
    Append(StrokeFragment),
    /// Add the finished stroke as a filled vector layer, then clear the raster target.
    Commit(VectorPath),
    /// Clear the raster target without keeping the stroke.
    Discard,
}

impl DrawOp {
    #[inline]
    pub fn kind(&self) -> &'static str {
        match self {
            DrawOp::Append(_) => "append",
            DrawOp::Commit(_) => "commit",
            DrawOp::Discard => "discard",
        }
    }
}
