use tiny_skia::{BlendMode, FillRule, IntRect, Pixmap, PixmapPaint, Transform};

use crate::coords::Rect;
use crate::ink::VectorPath;
use crate::paint::Color;
use crate::raster::RasterTarget;

/// A finished stroke drawn as a filled path on top of the raster target.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorLayer {
    pub path: VectorPath,
    pub color: Color,
}

impl VectorLayer {
    #[inline]
    pub fn new(path: VectorPath, color: Color) -> Self {
        Self { path, color }
    }
}

/// Area of the frame that changed since the surface last showed one, in
/// logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum Damage {
    /// Nothing changed; the previous frame is still accurate.
    #[default]
    Clean,
    Area(Rect),
    /// Everything must be repainted (new surface, resize, reset).
    Full,
}

impl Damage {
    /// Adds `area` to the damaged region.
    pub fn include(self, area: Option<Rect>) -> Damage {
        match (self, area) {
            (d, None) | (d @ Damage::Full, _) => d,
            (Damage::Clean, Some(a)) => Damage::Area(a),
            (Damage::Area(d), Some(a)) => Damage::Area(d.union(a)),
        }
    }

    #[inline]
    pub fn is_clean(self) -> bool {
        self == Damage::Clean
    }
}

/// Everything a display surface needs to present one frame.
///
/// Paint order: clear color, raster target, then vector layers in the order
/// they were committed.
#[derive(Debug, Copy, Clone)]
pub struct Frame<'a> {
    pub clear: Color,
    pub raster: &'a RasterTarget,
    pub layers: &'a [VectorLayer],
    /// What changed since the previous successfully presented frame.
    pub damage: Damage,
}

impl Frame<'_> {
    /// Renders the frame into `canvas`, stretching to the canvas size.
    pub fn composite(&self, canvas: &mut Pixmap) {
        let (sx, sy) = self.stretch(canvas);
        self.paint(canvas, sx, sy, 0.0, 0.0);
    }

    /// Repaints only the damaged part of `canvas`, which must hold the
    /// previously presented frame. Returns the repainted canvas pixels, or
    /// `None` when nothing needed repainting.
    pub fn composite_damage(&self, canvas: &mut Pixmap) -> Option<IntRect> {
        let region = self.damage_region(canvas.width(), canvas.height())?;
        if region.width() == canvas.width() && region.height() == canvas.height() {
            self.composite(canvas);
            return Some(region);
        }

        let (sx, sy) = self.stretch(canvas);
        let mut patch = Pixmap::new(region.width(), region.height())?;
        self.paint(&mut patch, sx, sy, region.x() as f32, region.y() as f32);

        let copy = PixmapPaint {
            blend_mode: BlendMode::Source,
            ..PixmapPaint::default()
        };
        canvas.draw_pixmap(region.x(), region.y(), patch.as_ref(), &copy, Transform::identity(), None);
        Some(region)
    }

    /// Damage mapped to the pixels of a `width` x `height` canvas, rounded
    /// outwards and clipped to it.
    pub fn damage_region(&self, width: u32, height: u32) -> Option<IntRect> {
        let area = match self.damage {
            Damage::Clean => return None,
            Damage::Full => return IntRect::from_xywh(0, 0, width, height),
            Damage::Area(area) => area,
        };

        // Canvas pixels per logical pixel; antialiasing may bleed one pixel.
        let factor = self.raster.scale() * (width as f32 / self.raster.width() as f32)
            .max(height as f32 / self.raster.height() as f32);
        let bounds = Rect::new(0.0, 0.0, width as f32, height as f32);
        let px = area.scaled(factor).inflate(1.0).intersect(bounds)?;

        let (min, max) = (px.min(), px.max());
        IntRect::from_ltrb(
            min.x.floor() as i32,
            min.y.floor() as i32,
            max.x.ceil() as i32,
            max.y.ceil() as i32,
        )
    }

    fn stretch(&self, canvas: &Pixmap) -> (f32, f32) {
        (
            canvas.width() as f32 / self.raster.width() as f32,
            canvas.height() as f32 / self.raster.height() as f32,
        )
    }

    /// Paints the frame into `target`, whose top-left sits at canvas pixel
    /// (`dx`, `dy`).
    fn paint(&self, target: &mut Pixmap, sx: f32, sy: f32, dx: f32, dy: f32) {
        target.fill(self.clear.to_skia());

        if !self.raster.is_blank() {
            target.draw_pixmap(
                0,
                0,
                self.raster.pixmap().as_ref(),
                &PixmapPaint::default(),
                Transform::from_scale(sx, sy).post_translate(-dx, -dy),
                None,
            );
        }

        let scale = self.raster.scale();
        let transform = Transform::from_scale(scale * sx, scale * sy).post_translate(-dx, -dy);
        for layer in self.layers {
            let mut paint = tiny_skia::Paint::default();
            paint.set_color(layer.color.to_skia());
            paint.anti_alias = true;
            target.fill_path(layer.path.as_skia(), &paint, FillRule::Winding, transform, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::ink::{InkPoint, StrokeFragment};
    use crate::raster::Brush;

    fn raster(scale: f32) -> RasterTarget {
        let side = (64.0 * scale) as u32;
        RasterTarget::new(side, side, scale, Brush::default()).unwrap()
    }

    fn frame<'a>(raster: &'a RasterTarget, layers: &'a [VectorLayer], damage: Damage) -> Frame<'a> {
        Frame {
            clear: Color::WHITE,
            raster,
            layers,
            damage,
        }
    }

    #[test]
    fn damage_accumulates_areas() {
        let d = Damage::Clean.include(None);
        assert!(d.is_clean());

        let d = d.include(Some(Rect::new(0.0, 0.0, 2.0, 2.0)));
        let d = d.include(Some(Rect::new(5.0, 5.0, 1.0, 1.0)));
        assert_eq!(d, Damage::Area(Rect::new(0.0, 0.0, 6.0, 6.0)));

        assert_eq!(Damage::Full.include(Some(Rect::new(1.0, 1.0, 1.0, 1.0))), Damage::Full);
    }

    #[test]
    fn damage_region_maps_logical_to_canvas_pixels() {
        let target = raster(2.0);
        let f = frame(&target, &[], Damage::Area(Rect::new(10.0, 10.0, 5.0, 5.0)));

        // 2x scale, one pixel of antialiasing slack on each side.
        let region = f.damage_region(128, 128).unwrap();
        assert_eq!((region.x(), region.y(), region.width(), region.height()), (19, 19, 12, 12));

        // Clipped to the canvas.
        let f = frame(&target, &[], Damage::Area(Rect::new(60.0, -5.0, 20.0, 10.0)));
        let region = f.damage_region(128, 128).unwrap();
        assert_eq!((region.right(), region.top()), (128, 0));

        let f = frame(&target, &[], Damage::Area(Rect::new(100.0, 100.0, 5.0, 5.0)));
        assert!(f.damage_region(128, 128).is_none());
        assert!(frame(&target, &[], Damage::Clean).damage_region(128, 128).is_none());
    }

    #[test]
    fn damaged_composite_matches_full_composite() {
        let mut target = raster(1.0);
        let fragment = StrokeFragment::new(vec![InkPoint::new(10.0, 10.0), InkPoint::new(30.0, 12.0)], false);
        let layers = [VectorLayer::new(
            VectorPath::rect(Rect::new(40.0, 40.0, 8.0, 8.0)).unwrap(),
            Color::BLACK,
        )];

        let mut canvas = Pixmap::new(64, 64).unwrap();
        frame(&target, &[], Damage::Full).composite(&mut canvas);

        target.take_dirty();
        target.draw_fragment(&fragment);
        let damage = Damage::Clean
            .include(target.take_dirty())
            .include(Some(layers[0].path.bounds().inflate(1.0)));

        let region = frame(&target, &layers, damage).composite_damage(&mut canvas).unwrap();
        assert!(region.width() < 64);

        let mut expected = Pixmap::new(64, 64).unwrap();
        frame(&target, &layers, Damage::Full).composite(&mut expected);
        let worst = canvas.data().iter().zip(expected.data()).map(|(a, b)| a.abs_diff(*b)).max();
        assert!(worst.unwrap() <= 1, "patched canvas differs by {worst:?}");
        assert!(target.ink_bounds().unwrap().contains(Vec2::new(20.0, 11.0)));
    }

    #[test]
    fn clean_frame_leaves_canvas_alone() {
        let target = raster(1.0);
        let mut canvas = Pixmap::new(64, 64).unwrap();
        assert!(frame(&target, &[], Damage::Clean).composite_damage(&mut canvas).is_none());
        assert!(canvas.data().iter().all(|&b| b == 0));
    }
}
