//! 2D vector primitive
//!
//! `glam::DVec2` already provides dot products, arithmetic and length. This
//! adds rotation by an angle and translation by offsets, both by value and in
//! place.

use glam::DVec2;

/// Point or direction in the plane
pub type Vector2D = DVec2;

pub trait Vector2DExt {
    /// Rotate by `angle` radians (counter-clockwise), returning a new vector
    fn rotated(self, angle: f64) -> Self;
    /// Rotate by `angle` radians in place
    fn rotate_by(&mut self, angle: f64);
    /// Translate in place
    fn translate(&mut self, dx: f64, dy: f64);
}

impl Vector2DExt for DVec2 {
    #[inline]
    fn rotated(self, angle: f64) -> Self {
        let (sin_a, cos_a) = angle.sin_cos();
        DVec2::new(
            self.x * cos_a - self.y * sin_a,
            self.x * sin_a + self.y * cos_a,
        )
    }

    #[inline]
    fn rotate_by(&mut self, angle: f64) {
        *self = self.rotated(angle);
    }

    #[inline]
    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}
