//=========================================================================
// Rapier Conversions
//=========================================================================
//
// glam ↔ nalgebra at the physics boundary. Everything above the bridge
// speaks glam; only world.rs, body.rs and primitive.rs see rapier types.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};
use rapier3d::na::{Isometry3, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};
use rapier3d::prelude::Real;

//=== To Rapier ===========================================================

pub(crate) fn to_vector(v: Vec3) -> Vector3<Real> {
    Vector3::new(v.x, v.y, v.z)
}

pub(crate) fn to_point(v: Vec3) -> Point3<Real> {
    Point3::new(v.x, v.y, v.z)
}

pub(crate) fn to_rotation(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub(crate) fn to_isometry(translation: Vec3, rotation: Quat) -> Isometry3<Real> {
    Isometry3::from_parts(Translation3::new(translation.x, translation.y, translation.z), to_rotation(rotation))
}

//=== From Rapier =========================================================

pub(crate) fn from_vector(v: &Vector3<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub(crate) fn from_point(p: &Point3<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

pub(crate) fn from_rotation(q: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_keeps_component_order() {
        let q = Quat::from_rotation_y(0.7);
        let back = from_rotation(&to_rotation(q));
        assert!(back.abs_diff_eq(q, 1e-6), "{:?} vs {:?}", back, q);
    }

    #[test]
    fn isometry_applies_rotation_then_translation() {
        let iso = to_isometry(Vec3::new(1.0, 0.0, 0.0), Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let moved = from_point(&(iso * to_point(Vec3::X)));
        assert!(moved.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
    }
}
