//=========================================================================
// Transform2D
//=========================================================================
//
// Screen-space placement of a UI actor.
//
// Architecture:
//   translation, rotation (degrees, wrapped), scale, origin, dimensions
//        ↓ (dirty flag)
//   world  = T(translation) · Rz · S · T(−origin)
//   bounds = axis-aligned box around the transformed (0, 0, w, h) rect
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;

use glam::{Mat4, Vec2, Vec3};

//=== Internal Dependencies ===============================================

use super::Rect;

//=== Transform2D =========================================================

#[derive(Debug, Clone)]
pub struct Transform2D {
    translation: Vec2,
    rotation_in_degrees: f32,
    scale: Vec2,
    origin: Vec2,
    dimensions: Vec2,

    original_translation: Vec2,
    original_rotation: f32,
    original_scale: Vec2,

    dirty: Cell<bool>,
    world: Cell<Mat4>,
    bounds: Cell<Rect>,
}

impl Transform2D {
    //--- Construction -----------------------------------------------------

    /// `dimensions` is the size of the drawn content before scaling.
    pub fn new(translation: Vec2, rotation_in_degrees: f32, scale: Vec2, origin: Vec2, dimensions: Vec2) -> Self {
        let scale = sanitize_scale(scale);
        let rotation = wrap_degrees(rotation_in_degrees);
        Self {
            translation,
            rotation_in_degrees: rotation,
            scale,
            origin,
            dimensions,
            original_translation: translation,
            original_rotation: rotation,
            original_scale: scale,
            dirty: Cell::new(true),
            world: Cell::new(Mat4::IDENTITY),
            bounds: Cell::new(Rect::default()),
        }
    }

    /// Full-screen background: unit dimensions stretched by `scale`.
    pub fn from_scale(scale: Vec2) -> Self {
        Self::new(Vec2::ZERO, 0.0, scale, Vec2::ZERO, Vec2::ONE)
    }

    //--- Query API --------------------------------------------------------

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn rotation_in_degrees(&self) -> f32 {
        self.rotation_in_degrees
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Scale given at construction; `reset` returns to it.
    pub fn original_scale(&self) -> Vec2 {
        self.original_scale
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn dimensions(&self) -> Vec2 {
        self.dimensions
    }

    pub fn world(&self) -> Mat4 {
        self.refresh();
        self.world.get()
    }

    /// Screen-space bounding rectangle of the transformed content.
    pub fn bounds(&self) -> Rect {
        self.refresh();
        self.bounds.get()
    }

    //--- Mutation ---------------------------------------------------------

    pub fn set_translation(&mut self, translation: Vec2) {
        self.translation = translation;
        self.dirty.set(true);
    }

    pub fn translate_by(&mut self, delta: Vec2) {
        self.set_translation(self.translation + delta);
    }

    /// Sets the rotation, wrapped into [0, 360).
    pub fn set_rotation_in_degrees(&mut self, degrees: f32) {
        self.rotation_in_degrees = wrap_degrees(degrees);
        self.dirty.set(true);
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        self.set_rotation_in_degrees(self.rotation_in_degrees + degrees);
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = sanitize_scale(scale);
        self.dirty.set(true);
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
        self.dirty.set(true);
    }

    pub fn reset(&mut self) {
        self.translation = self.original_translation;
        self.rotation_in_degrees = self.original_rotation;
        self.scale = self.original_scale;
        self.dirty.set(true);
    }

    //--- Internal Helpers -------------------------------------------------

    fn refresh(&self) {
        if !self.dirty.get() {
            return;
        }

        let world = Mat4::from_translation(self.translation.extend(0.0))
            * Mat4::from_rotation_z(self.rotation_in_degrees.to_radians())
            * Mat4::from_scale(self.scale.extend(1.0))
            * Mat4::from_translation((-self.origin).extend(0.0));

        let corners = [
            Vec3::ZERO,
            Vec3::new(self.dimensions.x, 0.0, 0.0),
            Vec3::new(0.0, self.dimensions.y, 0.0),
            Vec3::new(self.dimensions.x, self.dimensions.y, 0.0),
        ]
        .map(|c| world.transform_point3(c).truncate());

        let min = corners.iter().fold(Vec2::splat(f32::MAX), |acc, c| acc.min(*c));
        let max = corners.iter().fold(Vec2::splat(f32::MIN), |acc, c| acc.max(*c));

        self.world.set(world);
        self.bounds.set(Rect::from_min_max(min, max));
        self.dirty.set(false);
    }
}

fn sanitize_scale(scale: Vec2) -> Vec2 {
    if scale == Vec2::ZERO {
        Vec2::ONE
    } else {
        scale
    }
}

fn wrap_degrees(degrees: f32) -> f32 {
    // Tiny negatives round up to exactly 360.
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotation_wraps_into_range() {
        let mut t = Transform2D::new(Vec2::ZERO, 370.0, Vec2::ONE, Vec2::ZERO, Vec2::ONE);
        assert_relative_eq!(t.rotation_in_degrees(), 10.0, epsilon = 1e-4);

        t.rotate_by(-20.0);
        assert_relative_eq!(t.rotation_in_degrees(), 350.0, epsilon = 1e-4);
    }

    #[test]
    fn tiny_negative_rotation_stays_below_360() {
        let mut t = Transform2D::new(Vec2::ZERO, 0.0, Vec2::ONE, Vec2::ZERO, Vec2::ONE);
        t.set_rotation_in_degrees(-1e-6);
        assert!((0.0..360.0).contains(&t.rotation_in_degrees()), "{}", t.rotation_in_degrees());
    }

    #[test]
    fn bounds_follow_translation_and_scale() {
        let mut t = Transform2D::new(Vec2::new(10.0, 20.0), 0.0, Vec2::new(2.0, 3.0), Vec2::ZERO, Vec2::new(50.0, 10.0));
        assert_eq!(t.bounds(), Rect::new(10.0, 20.0, 100.0, 30.0));

        t.translate_by(Vec2::new(5.0, 0.0));
        assert_eq!(t.bounds().x, 15.0);
    }

    #[test]
    fn bounds_enclose_rotated_content() {
        let t = Transform2D::new(Vec2::ZERO, 90.0, Vec2::ONE, Vec2::ZERO, Vec2::new(40.0, 10.0));
        let b = t.bounds();
        assert_relative_eq!(b.width, 10.0, epsilon = 1e-3);
        assert_relative_eq!(b.height, 40.0, epsilon = 1e-3);
        assert_relative_eq!(b.x, -10.0, epsilon = 1e-3);
    }

    #[test]
    fn origin_shifts_pivot() {
        let t = Transform2D::new(Vec2::new(100.0, 100.0), 0.0, Vec2::ONE, Vec2::new(8.0, 8.0), Vec2::new(16.0, 16.0));
        assert_eq!(t.bounds(), Rect::new(92.0, 92.0, 16.0, 16.0));
    }

    #[test]
    fn zero_scale_replaced_and_reset_restores() {
        let mut t = Transform2D::from_scale(Vec2::ZERO);
        assert_eq!(t.scale(), Vec2::ONE);

        t.set_scale(Vec2::splat(4.0));
        t.translate_by(Vec2::ONE);
        t.reset();
        assert_eq!(t.scale(), Vec2::ONE);
        assert_eq!(t.translation(), Vec2::ZERO);
    }
}
