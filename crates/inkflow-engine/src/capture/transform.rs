use crate::coords::Vec2;
use crate::ink::InkPoint;

/// Affine map from device sensor coordinates to view coordinates.
///
/// Column convention:
/// `x' = a·x + c·y + tx`, `y' = b·x + d·y + ty`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DeviceTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl DeviceTransform {
    pub const IDENTITY: DeviceTransform = DeviceTransform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub const fn scale(s: f32) -> Self {
        Self { a: s, d: s, ..Self::IDENTITY }
    }

    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self { tx, ty, ..Self::IDENTITY }
    }

    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Applies `self`, then `next`.
    pub fn then(self, next: DeviceTransform) -> DeviceTransform {
        DeviceTransform {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            tx: next.a * self.tx + next.c * self.ty + next.tx,
            ty: next.b * self.tx + next.d * self.ty + next.ty,
        }
    }

    /// Maps a device-space sample into the view.
    ///
    /// Widths scale by the transform's uniform scale factor.
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    pub fn apply_point(&self, p: InkPoint) -> InkPoint {
        let s = (self.a * self.d - self.b * self.c).abs().sqrt();
        InkPoint {
            pos: self.apply(p.pos),
            width: p.width.map(|w| w * s),
        }
    }

    /// Fits a device's sensor area into a view at 1:1 aspect.
    ///
    /// Sensors mounted sideways are rotated a quarter turn and shifted back
    /// into view.
    pub fn fit(device: (f32, f32), view: (f32, f32), sensor_rotated: bool) -> Self {
        let (dw, dh) = device;
        let (vw, vh) = view;

        if dw <= 0.0 || dh <= 0.0 {
            log::debug!("device reports empty sensor area {dw}x{dh}; using identity transform");
            return Self::IDENTITY;
        }

        if sensor_rotated {
            let s = (vw / dh).min(vh / dw);
            Self::rotation(core::f32::consts::FRAC_PI_2)
                .then(Self::scale(s))
                .then(Self::translation(vw.min(vh), 0.0))
        } else {
            Self::scale((vw / dw).min(vh / dh))
        }
    }
}

impl Default for DeviceTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn fit_keeps_aspect() {
        let t = DeviceTransform::fit((200.0, 100.0), (400.0, 400.0), false);
        assert!(close(t.apply(Vec2::new(200.0, 100.0)), Vec2::new(400.0, 200.0)));
    }

    #[test]
    fn fit_rotated_turns_a_quarter() {
        // 100x50 sensor mounted sideways into a 50x100 view: scale 1.
        let t = DeviceTransform::fit((100.0, 50.0), (50.0, 100.0), true);
        assert!(close(t.apply(Vec2::new(0.0, 0.0)), Vec2::new(50.0, 0.0)));
        assert!(close(t.apply(Vec2::new(100.0, 0.0)), Vec2::new(50.0, 100.0)));
        assert!(close(t.apply(Vec2::new(0.0, 50.0)), Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn then_composes_in_order() {
        let t = DeviceTransform::translation(1.0, 0.0).then(DeviceTransform::scale(2.0));
        assert!(close(t.apply(Vec2::new(1.0, 1.0)), Vec2::new(4.0, 2.0)));
    }

    #[test]
    fn width_follows_scale() {
        let p = DeviceTransform::scale(3.0).apply_point(InkPoint::with_width(1.0, 1.0, 2.0));
        assert!((p.width.unwrap() - 6.0).abs() < 1e-5);
    }

    #[test]
    fn degenerate_device_is_identity() {
        assert_eq!(DeviceTransform::fit((0.0, 10.0), (10.0, 10.0), false), DeviceTransform::IDENTITY);
    }
}
