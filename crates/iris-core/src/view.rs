// File: crates/iris-core/src/view.rs
// Summary: Pan/zoom view transform applied on top of the base data-to-pixel scales.

use crate::geometry::{Affine, Point};

/// Smallest and largest zoom factor a gesture may reach.
pub const SCALE_EXTENT: (f64, f64) = (0.9, 100.0);

/// Translate-then-scale transform: `screen = k * p + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform { x: 0.0, y: 0.0, k: 1.0 };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    pub fn invert(&self, p: Point) -> Point {
        Point::new(self.invert_x(p.x), self.invert_y(p.y))
    }

    pub fn invert_x(&self, px: f64) -> f64 {
        (px - self.x) / self.k
    }

    pub fn invert_y(&self, py: f64) -> f64 {
        (py - self.y) / self.k
    }

    pub fn translate_by(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..self }
    }

    /// Zoom to `k` (clamped to [`SCALE_EXTENT`]) keeping screen point `anchor` fixed.
    pub fn scale_about(self, k: f64, anchor: Point) -> Self {
        let k = clamp_scale(k);
        let p = self.invert(anchor);
        Self { x: anchor.x - p.x * k, y: anchor.y - p.y * k, k }
    }

    pub fn lerp(self, to: ViewTransform, t: f64) -> Self {
        Self {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
            k: self.k + (to.k - self.k) * t,
        }
    }

    pub fn as_affine(&self) -> Affine {
        Affine::scale(self.k, self.k).then(Affine::translate(self.x, self.y))
    }
}

pub fn clamp_scale(k: f64) -> f64 {
    if k.is_nan() {
        return 1.0;
    }
    k.clamp(SCALE_EXTENT.0, SCALE_EXTENT.1)
}

/// Stroke and marker scale factor: zooming in grows strokes at three quarters of the zoom rate.
pub fn damp(k: f64) -> f64 {
    if k > 1.0 { k * 0.75 } else { k }
}
