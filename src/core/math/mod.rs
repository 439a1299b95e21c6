//=========================================================================
// Math
//=========================================================================
//
// Transforms, keyframe curves and small geometric value types shared by
// actors, controllers and managers. Vector/matrix types come from glam.
//
//=========================================================================

//=== Module Declarations =================================================

mod curve;
mod transform2d;
mod transform3d;

//=== Public API ==========================================================

pub use curve::{Curve1D, Curve3D, CurveLoopType, Transform3DCurve};
pub use transform2d::Transform2D;
pub use transform3d::Transform3D;

//=== External Dependencies ===============================================

use glam::{Vec2, Vec3};

//=== Rounding ============================================================

/// Rounds `value` to `decimals` places.
pub fn round_f32(value: f32, decimals: u32) -> f32 {
    let factor = 10f32.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Component-wise [`round_f32`]. Rail and curve controllers use this so
/// sub-millimetre jitter does not accumulate.
pub fn round_vec3(v: Vec3, decimals: u32) -> Vec3 {
    Vec3::new(round_f32(v.x, decimals), round_f32(v.y, decimals), round_f32(v.z, decimals))
}

//=== Rect ================================================================

/// Axis-aligned screen rectangle (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.x + self.width && point.y >= self.y && point.y < self.y + self.height
    }

    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

//=== Ray =================================================================

/// A half-line used for picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize_or_zero() }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

//=========================================================================
// Tests
//=========================================================================
