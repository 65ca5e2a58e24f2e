use tiny_skia::{FillRule, LineCap, LineJoin, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform};

use crate::coords::{Rect, Vec2};
use crate::ink::{InkPoint, StrokeFragment};

use super::Brush;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum RasterError {
    #[error("raster target needs a non-zero size, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("raster target scale must be positive and finite, got {0}")]
    InvalidScale(f32),
}

/// Pixel surface holding the ink of the stroke that is still in progress.
///
/// Sized in physical pixels; fragments arrive in logical pixels and are
/// scaled on the way in. Strokes are continuous across fragments: the last
/// point drawn is remembered and joined to the next fragment.
pub struct RasterTarget {
    pixmap: Pixmap,
    scale: f32,
    brush: Brush,

    /// Last point drawn for the current stroke.
    tail: Option<InkPoint>,

    /// Logical area currently holding ink.
    ink_bounds: Option<Rect>,
    /// Logical area changed since the last `take_dirty`.
    dirty: Option<Rect>,

    points_drawn: u64,
}

impl std::fmt::Debug for RasterTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterTarget")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("scale", &self.scale)
            .field("ink_bounds", &self.ink_bounds)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl RasterTarget {
    pub fn new(width: u32, height: u32, scale: f32, brush: Brush) -> Result<Self, RasterError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RasterError::InvalidScale(scale));
        }
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;

        Ok(Self {
            pixmap,
            scale,
            brush,
            tail: None,
            ink_bounds: None,
            dirty: None,
            points_drawn: 0,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn brush(&self) -> Brush {
        self.brush
    }

    /// Brush for the next stroke. Ink already on the target keeps its color.
    #[inline]
    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    #[inline]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// True when no ink is held.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.ink_bounds.is_none()
    }

    #[inline]
    pub fn ink_bounds(&self) -> Option<Rect> {
        self.ink_bounds
    }

    /// Total points rasterized since creation.
    #[inline]
    pub fn points_drawn(&self) -> u64 {
        self.points_drawn
    }

    /// Returns and resets the area changed since the previous call.
    pub fn take_dirty(&mut self) -> Option<Rect> {
        self.dirty.take()
    }

    /// Rasterizes a fragment of the current stroke.
    ///
    /// An empty fragment leaves the target untouched. A final fragment ends
    /// the stroke: the next fragment starts a new one instead of joining.
    pub fn draw_fragment(&mut self, fragment: &StrokeFragment) {
        if fragment.is_empty() {
            return;
        }

        let mut points = Vec::with_capacity(fragment.len() + 1);
        points.extend(self.tail);
        points.extend_from_slice(&fragment.points);

        let max_width = points
            .iter()
            .map(|p| p.width_or(self.brush.width))
            .fold(0.0f32, f32::max);

        if points.len() == 1 {
            self.draw_dot(points[0]);
        } else if points.iter().all(|p| p.width.is_none()) {
            self.draw_polyline(&points, self.brush.width);
        } else {
            for pair in points.windows(2) {
                let w = 0.5 * (pair[0].width_or(self.brush.width) + pair[1].width_or(self.brush.width));
                self.draw_polyline(pair, w);
            }
        }

        if let Some(b) = Rect::from_points(points.iter().map(|p| p.pos)) {
            // One extra pixel covers anti-aliasing fringes.
            self.mark(b.inflate(max_width * 0.5 + 1.0));
        }

        self.points_drawn += fragment.len() as u64;
        self.tail = if fragment.is_final { None } else { fragment.points.last().copied() };
    }

    /// Wipes all ink and ends the current stroke.
    pub fn clear(&mut self) {
        if let Some(b) = self.ink_bounds.take() {
            self.dirty = Some(self.dirty.map_or(b, |d| d.union(b)));
        }
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self.tail = None;
    }

    /// Reallocates for a new drawable size, keeping the ink already drawn.
    pub fn resize(&mut self, width: u32, height: u32, scale: f32) -> Result<(), RasterError> {
        let mut next = RasterTarget::new(width, height, scale, self.brush)?;

        let ratio = scale / self.scale;
        next.pixmap.draw_pixmap(
            0,
            0,
            self.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::from_scale(ratio, ratio),
            None,
        );

        next.tail = self.tail;
        next.ink_bounds = self.ink_bounds;
        // Everything must be re-presented at the new size.
        next.dirty = Some(Rect::new(0.0, 0.0, width as f32 / scale, height as f32 / scale));
        next.points_drawn = self.points_drawn;

        *self = next;
        Ok(())
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.scale, self.scale)
    }

    fn draw_dot(&mut self, p: InkPoint) {
        let r = p.width_or(self.brush.width) * 0.5;
        let Some(circle) = PathBuilder::from_circle(p.pos.x, p.pos.y, r.max(0.01)) else {
            return;
        };
        let paint = self.brush.skia_paint();
        let transform = self.transform();
        self.pixmap.fill_path(&circle, &paint, FillRule::Winding, transform, None);
    }

    fn draw_polyline(&mut self, points: &[InkPoint], width: f32) {
        let mut pb = PathBuilder::new();
        let mut it = points.iter().map(|p| p.pos);
        if let Some(Vec2 { x, y }) = it.next() {
            pb.move_to(x, y);
        }
        for Vec2 { x, y } in it {
            pb.line_to(x, y);
        }
        let Some(path) = pb.finish() else { return };

        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        let paint = self.brush.skia_paint();
        let transform = self.transform();
        self.pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }

    fn mark(&mut self, area: Rect) {
        self.ink_bounds = Some(self.ink_bounds.map_or(area, |b| b.union(area)));
        self.dirty = Some(self.dirty.map_or(area, |d| d.union(area)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> RasterTarget {
        RasterTarget::new(64, 64, 1.0, Brush::default()).unwrap()
    }

    fn alpha_at(t: &RasterTarget, x: u32, y: u32) -> u8 {
        t.pixmap().pixel(x, y).map_or(0, |c| c.alpha())
    }

    fn frag(points: &[(f32, f32)], is_final: bool) -> StrokeFragment {
        StrokeFragment::new(points.iter().map(|&(x, y)| InkPoint::new(x, y)).collect(), is_final)
    }

    #[test]
    fn rejects_zero_size_and_bad_scale() {
        assert_eq!(
            RasterTarget::new(0, 10, 1.0, Brush::default()).unwrap_err(),
            RasterError::InvalidSize { width: 0, height: 10 }
        );
        assert!(matches!(
            RasterTarget::new(10, 10, 0.0, Brush::default()),
            Err(RasterError::InvalidScale(_))
        ));
    }

    #[test]
    fn fragment_leaves_ink_and_dirty_area() {
        let mut t = target();
        t.draw_fragment(&frag(&[(10.0, 10.0), (40.0, 10.0)], false));

        assert!(!t.is_blank());
        assert!(alpha_at(&t, 25, 10) > 0);
        assert_eq!(alpha_at(&t, 25, 40), 0);

        let dirty = t.take_dirty().unwrap();
        assert!(dirty.contains(Vec2::new(10.0, 10.0)));
        assert!(dirty.contains(Vec2::new(39.0, 10.0)));
        assert!(t.take_dirty().is_none());
    }

    #[test]
    fn empty_fragment_is_ignored() {
        let mut t = target();
        let before = t.pixmap().data().to_vec();
        t.draw_fragment(&StrokeFragment::default());
        assert!(t.is_blank());
        assert!(t.take_dirty().is_none());
        assert_eq!(t.pixmap().data(), &before[..]);
    }

    #[test]
    fn fragments_of_one_stroke_are_joined() {
        let mut t = target();
        t.draw_fragment(&frag(&[(10.0, 30.0)], false));
        t.draw_fragment(&frag(&[(50.0, 30.0)], true));
        // The gap between the two single-point fragments is filled in.
        assert!(alpha_at(&t, 30, 30) > 0);
    }

    #[test]
    fn final_fragment_ends_the_stroke() {
        let mut t = target();
        t.draw_fragment(&frag(&[(10.0, 10.0)], true));
        t.draw_fragment(&frag(&[(50.0, 50.0)], true));
        assert_eq!(alpha_at(&t, 30, 30), 0);
    }

    #[test]
    fn width_channel_overrides_brush() {
        let mut t = target();
        let wide = StrokeFragment::new(
            vec![InkPoint::with_width(10.0, 32.0, 16.0), InkPoint::with_width(50.0, 32.0, 16.0)],
            true,
        );
        t.draw_fragment(&wide);
        assert!(alpha_at(&t, 30, 38) > 0);
    }

    #[test]
    fn clear_wipes_ink_and_reports_area() {
        let mut t = target();
        t.draw_fragment(&frag(&[(10.0, 10.0), (20.0, 20.0)], false));
        t.take_dirty();

        t.clear();
        assert!(t.is_blank());
        assert!(t.pixmap().data().iter().all(|&b| b == 0));
        assert!(t.take_dirty().is_some());
    }

    #[test]
    fn scale_maps_logical_to_physical() {
        let mut t = RasterTarget::new(64, 64, 2.0, Brush::default()).unwrap();
        t.draw_fragment(&frag(&[(5.0, 20.0), (25.0, 20.0)], true));
        assert!(alpha_at(&t, 30, 40) > 0);
        assert_eq!(alpha_at(&t, 30, 20), 0);
    }

    #[test]
    fn resize_keeps_ink() {
        let mut t = target();
        t.draw_fragment(&frag(&[(10.0, 10.0), (20.0, 10.0)], false));
        t.resize(128, 128, 1.0).unwrap();

        assert_eq!(t.width(), 128);
        assert!(alpha_at(&t, 15, 10) > 0);
        assert!(!t.is_blank());
    }
}
