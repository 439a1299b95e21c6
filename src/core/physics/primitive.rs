//=========================================================================
// Collision Primitives
//=========================================================================
//
// Shapes a collision skin is built from, with their surface materials.
//
// All primitives are expressed in the owning body's local frame. Each
// maps onto one rapier collider shape; volumes and mass distribution
// come from parry's solid, uniform-density formulas.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};
use rapier3d::na::{Isometry3, Unit};
use num_traits::Zero;
use rapier3d::parry::mass_properties::MassProperties;
use rapier3d::parry::shape::Shape;
use rapier3d::prelude::{Real, SharedShape};

//=== Internal Dependencies ===============================================

use super::conversions::{to_isometry, to_vector};

//=== MaterialProperties ==================================================

/// Surface response handed to the colliders built from a skin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    /// Restitution in [0, 1]; touching surfaces multiply.
    pub elasticity: f32,
    pub static_roughness: f32,
    /// Used as the collider's friction coefficient.
    pub dynamic_roughness: f32,
}

impl MaterialProperties {
    pub const UNSET: Self = Self::new(0.5, 0.5, 0.5);
    pub const NOT_BOUNCY_SMOOTH: Self = Self::new(0.0, 0.1, 0.1);
    pub const NOT_BOUNCY_NORMAL: Self = Self::new(0.0, 0.5, 0.3);
    pub const NOT_BOUNCY_ROUGH: Self = Self::new(0.0, 0.9, 0.7);
    pub const NORMAL_SMOOTH: Self = Self::new(0.3, 0.1, 0.1);
    pub const NORMAL_NORMAL: Self = Self::new(0.3, 0.5, 0.3);
    pub const NORMAL_ROUGH: Self = Self::new(0.3, 0.9, 0.7);
    pub const VERY_BOUNCY_SMOOTH: Self = Self::new(1.0, 0.1, 0.1);
    pub const VERY_BOUNCY_NORMAL: Self = Self::new(1.0, 0.5, 0.3);
    pub const VERY_BOUNCY_ROUGH: Self = Self::new(1.0, 0.9, 0.7);

    pub const fn new(elasticity: f32, static_roughness: f32, dynamic_roughness: f32) -> Self {
        Self { elasticity, static_roughness, dynamic_roughness }
    }
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self::UNSET
    }
}

//=== Primitive ===========================================================

/// A collision shape in body-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Oriented box around `centre`.
    Box { centre: Vec3, orientation: Quat, side_lengths: Vec3 },

    Sphere { centre: Vec3, radius: f32 },

    /// Cylinder of `length` capped by hemispheres; the axis is the
    /// orientation's local Y.
    Capsule { centre: Vec3, orientation: Quat, length: f32, radius: f32 },

    /// Infinite plane `normal · p = distance`. Has no volume.
    Plane { normal: Vec3, distance: f32 },
}

impl Primitive {
    //--- Construction -----------------------------------------------------

    pub fn cuboid(centre: Vec3, side_lengths: Vec3) -> Self {
        Self::Box { centre, orientation: Quat::IDENTITY, side_lengths }
    }

    pub fn sphere(centre: Vec3, radius: f32) -> Self {
        Self::Sphere { centre, radius }
    }

    /// Upright capsule.
    pub fn capsule(centre: Vec3, length: f32, radius: f32) -> Self {
        Self::Capsule { centre, orientation: Quat::IDENTITY, length, radius }
    }

    /// Horizontal ground plane at height `distance`.
    pub fn ground() -> Self {
        Self::Plane { normal: Vec3::Y, distance: 0.0 }
    }

    //--- Query API --------------------------------------------------------

    /// Geometric centroid (local frame).
    pub fn centre(&self) -> Vec3 {
        match *self {
            Self::Box { centre, .. } | Self::Sphere { centre, .. } | Self::Capsule { centre, .. } => centre,
            Self::Plane { normal, distance } => normal * distance,
        }
    }

    pub fn orientation(&self) -> Quat {
        match *self {
            Self::Box { orientation, .. } | Self::Capsule { orientation, .. } => orientation,
            _ => Quat::IDENTITY,
        }
    }

    pub fn has_volume(&self) -> bool {
        !matches!(self, Self::Plane { .. })
    }

    pub fn volume(&self) -> f32 {
        if self.has_volume() {
            self.shape().mass_properties(1.0).mass()
        } else {
            0.0
        }
    }

    //--- Rapier -----------------------------------------------------------

    pub(crate) fn shape(&self) -> SharedShape {
        match *self {
            Self::Box { side_lengths: s, .. } => SharedShape::cuboid(s.x / 2.0, s.y / 2.0, s.z / 2.0),
            Self::Sphere { radius, .. } => SharedShape::ball(radius),
            Self::Capsule { length, radius, .. } => SharedShape::capsule_y(length / 2.0, radius),
            Self::Plane { normal, .. } => SharedShape::halfspace(Unit::new_normalize(to_vector(normal))),
        }
    }

    /// Pose relative to the body frame once the skin is shifted by `offset`.
    pub(crate) fn local_pose(&self, offset: Vec3) -> Isometry3<Real> {
        to_isometry(self.centre() + offset, self.orientation())
    }

    /// Solid mass properties at `density`, in the unshifted skin frame.
    pub(crate) fn mass_properties(&self, density: f32) -> MassProperties {
        if self.has_volume() {
            self.shape().mass_properties(density).transform_by(&self.local_pose(Vec3::ZERO))
        } else {
            MassProperties::zero()
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn volumes_match_solid_formulas() {
        assert_relative_eq!(Primitive::cuboid(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)).volume(), 6.0, epsilon = 1e-4);
        assert_relative_eq!(Primitive::sphere(Vec3::ZERO, 2.0).volume(), 32.0 / 3.0 * PI, epsilon = 1e-3);
        let capsule = PI * 0.25 * 2.0 + 4.0 / 3.0 * PI * 0.125;
        assert_relative_eq!(Primitive::capsule(Vec3::ZERO, 2.0, 0.5).volume(), capsule, epsilon = 1e-4);
        assert_eq!(Primitive::ground().volume(), 0.0);
    }

    #[test]
    fn sphere_inertia() {
        let sphere = Primitive::sphere(Vec3::ZERO, 2.0);
        let props = sphere.mass_properties(10.0 / sphere.volume());
        assert_relative_eq!(props.mass(), 10.0, epsilon = 1e-3);
        assert_relative_eq!(props.principal_inertia().x, 16.0, epsilon = 1e-2);
    }

    #[test]
    fn offset_primitive_moves_its_centre_of_mass() {
        let props = Primitive::cuboid(Vec3::new(1.0, 2.0, 3.0), Vec3::ONE).mass_properties(1.0);
        assert!((props.local_com.coords - to_vector(Vec3::new(1.0, 2.0, 3.0))).norm() < 1e-5);
    }

    #[test]
    fn capsule_axis_is_local_y() {
        let shape = Primitive::capsule(Vec3::ZERO, 2.0, 0.5).shape();
        let aabb = shape.compute_local_aabb();
        assert_relative_eq!(aabb.maxs.y, 1.5, epsilon = 1e-5);
        assert_relative_eq!(aabb.maxs.x, 0.5, epsilon = 1e-5);
    }
}
