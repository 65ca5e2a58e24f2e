use tiny_skia::{LineCap, LineJoin, PathBuilder, Stroke};

use crate::coords::{Rect, Vec2};

use super::InkPoint;

/// Filled outline of a finished stroke.
///
/// Coordinates are logical pixels. The path is filled with the non-zero rule.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPath {
    path: tiny_skia::Path,
}

impl VectorPath {
    #[inline]
    pub fn from_skia(path: tiny_skia::Path) -> Self {
        Self { path }
    }

    #[inline]
    pub fn as_skia(&self) -> &tiny_skia::Path {
        &self.path
    }

    /// Axis-aligned rectangle, useful as a test fixture and for selection marks.
    pub fn rect(rect: Rect) -> Option<Self> {
        let r = tiny_skia::Rect::from_xywh(rect.origin.x, rect.origin.y, rect.size.x, rect.size.y)?;
        Some(Self::from_skia(PathBuilder::from_rect(r)))
    }

    /// Vectorizes a polyline into the outline a pen of `width` would leave:
    /// round caps and joins, constant width.
    ///
    /// Returns `None` for an empty point set or a non-positive width.
    pub fn outline(points: &[InkPoint], width: f32) -> Option<Self> {
        if !(width.is_finite() && width > 0.0) {
            return None;
        }

        let bounds = Rect::from_points(points.iter().map(|p| p.pos))?;
        if bounds.size.x == 0.0 && bounds.size.y == 0.0 {
            let c = bounds.origin;
            return PathBuilder::from_circle(c.x, c.y, width * 0.5).map(Self::from_skia);
        }

        let mut pb = PathBuilder::new();
        let mut it = points.iter().map(|p| p.pos);
        if let Some(Vec2 { x, y }) = it.next() {
            pb.move_to(x, y);
        }
        for Vec2 { x, y } in it {
            pb.line_to(x, y);
        }
        let centerline = pb.finish()?;

        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        centerline.stroke(&stroke, 1.0).map(Self::from_skia)
    }

    pub fn bounds(&self) -> Rect {
        let b = self.path.bounds();
        Rect::new(b.x(), b.y(), b.width(), b.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_of_segment_covers_width() {
        let pts = [InkPoint::new(10.0, 10.0), InkPoint::new(30.0, 10.0)];
        let path = VectorPath::outline(&pts, 4.0).unwrap();
        let b = path.bounds();
        assert!((b.origin.x - 8.0).abs() < 0.5);
        assert!((b.size.y - 4.0).abs() < 0.5);
    }

    #[test]
    fn outline_of_single_point_is_a_dot() {
        let path = VectorPath::outline(&[InkPoint::new(5.0, 5.0)], 2.0).unwrap();
        let b = path.bounds();
        assert!((b.size.x - 2.0).abs() < 0.1);
    }

    #[test]
    fn outline_rejects_empty_and_zero_width() {
        assert!(VectorPath::outline(&[], 2.0).is_none());
        assert!(VectorPath::outline(&[InkPoint::new(0.0, 0.0), InkPoint::new(1.0, 1.0)], 0.0).is_none());
    }
}
