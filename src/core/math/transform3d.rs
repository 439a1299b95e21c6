//=========================================================================
// Transform3D
//=========================================================================
//
// Position, orientation and scale of a 3D actor.
//
// Architecture:
//   translation, rotation (degrees), scale, look, up
//        ↓ (dirty flag)
//   world = T · Rz · Ry · Rx · S   (recomputed lazily)
//
// look/up are stored as assigned and normalized on read. The
// original look/up/rotation are kept so rotate_by() can express an
// absolute rotation relative to the starting pose.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;

use glam::{EulerRot, Mat4, Quat, Vec3};

//=== Transform3D =========================================================

#[derive(Debug, Clone)]
pub struct Transform3D {
    translation: Vec3,
    rotation_in_degrees: Vec3,
    scale: Vec3,
    look: Vec3,
    up: Vec3,

    //--- Starting Pose --------------------------------------------------
    original_translation: Vec3,
    original_rotation: Vec3,
    original_look: Vec3,
    original_up: Vec3,

    //--- Cache ----------------------------------------------------------
    dirty: Cell<bool>,
    world: Cell<Mat4>,
}

impl Transform3D {
    //--- Construction -----------------------------------------------------

    /// Full constructor. A zero `scale` is replaced with `Vec3::ONE`.
    pub fn new(translation: Vec3, rotation_in_degrees: Vec3, scale: Vec3, look: Vec3, up: Vec3) -> Self {
        Self {
            translation,
            rotation_in_degrees,
            scale: sanitize_scale(scale),
            look,
            up,
            original_translation: translation,
            original_rotation: rotation_in_degrees,
            original_look: look,
            original_up: up,
            dirty: Cell::new(true),
            world: Cell::new(Mat4::IDENTITY),
        }
    }

    /// Camera-style transform: no rotation, unit scale.
    pub fn from_look(translation: Vec3, look: Vec3, up: Vec3) -> Self {
        Self::new(translation, Vec3::ZERO, Vec3::ONE, look, up)
    }

    /// Object-style transform looking down −Z.
    pub fn from_trs(translation: Vec3, rotation_in_degrees: Vec3, scale: Vec3) -> Self {
        Self::new(translation, rotation_in_degrees, scale, Vec3::NEG_Z, Vec3::Y)
    }

    /// Origin, no rotation, unit scale, looking down −Z.
    pub fn identity() -> Self {
        Self::from_trs(Vec3::ZERO, Vec3::ZERO, Vec3::ONE)
    }

    //--- Query API --------------------------------------------------------

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation_in_degrees(&self) -> Vec3 {
        self.rotation_in_degrees
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Unit-length look vector, whatever magnitude was assigned.
    pub fn look(&self) -> Vec3 {
        self.look.normalize_or_zero()
    }

    /// Unit-length up vector, whatever magnitude was assigned.
    pub fn up(&self) -> Vec3 {
        self.up.normalize_or_zero()
    }

    /// normalize(look × up).
    pub fn right(&self) -> Vec3 {
        self.look.cross(self.up).normalize_or_zero()
    }

    /// Rotation-only matrix built from the stored Euler degrees.
    pub fn orientation(&self) -> Mat4 {
        let r = self.rotation_in_degrees;
        Mat4::from_rotation_z(r.z.to_radians())
            * Mat4::from_rotation_y(r.y.to_radians())
            * Mat4::from_rotation_x(r.x.to_radians())
    }

    /// Scale, rotate, then translate. Cached until the next mutation.
    pub fn world(&self) -> Mat4 {
        if self.dirty.get() {
            let world = Mat4::from_translation(self.translation) * self.orientation() * Mat4::from_scale(self.scale);
            self.world.set(world);
            self.dirty.set(false);
        }
        self.world.get()
    }

    pub fn original_translation(&self) -> Vec3 {
        self.original_translation
    }

    pub fn distance_to(&self, other: &Transform3D) -> f32 {
        self.translation.distance(other.translation)
    }

    #[cfg(test)]
    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    //--- Mutation ---------------------------------------------------------

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.dirty.set(true);
    }

    pub fn translate_by(&mut self, delta: Vec3) {
        self.set_translation(self.translation + delta);
    }

    /// Sets the scale; a zero vector is replaced with `Vec3::ONE`.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = sanitize_scale(scale);
        self.dirty.set(true);
    }

    pub fn set_rotation_in_degrees(&mut self, rotation: Vec3) {
        self.rotation_in_degrees = rotation;
        self.dirty.set(true);
    }

    pub fn set_look(&mut self, look: Vec3) {
        self.look = look;
        self.dirty.set(true);
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
        self.dirty.set(true);
    }

    /// Yaws around world up: rotation.y += degrees, look = Ry · original look.
    pub fn rotate_around_up_by(&mut self, degrees: f32) {
        self.rotation_in_degrees.y += degrees;
        let rotation = Quat::from_rotation_y(self.rotation_in_degrees.y.to_radians());
        self.look = (rotation * self.original_look).normalize_or_zero();
        self.dirty.set(true);
    }

    /// Sets rotation to original + `offset` and re-derives look/up.
    ///
    /// `offset.x` yaws, `offset.y` pitches, `offset.z` rolls (degrees).
    pub fn rotate_by(&mut self, offset: Vec3) {
        self.rotation_in_degrees = self.original_rotation + offset;

        let r = self.rotation_in_degrees;
        let rotation = Quat::from_euler(EulerRot::YXZ, r.x.to_radians(), r.y.to_radians(), r.z.to_radians());

        self.look = rotation * self.original_look;
        self.up = rotation * self.original_up;
        self.dirty.set(true);
    }

    /// Restores the pose given at construction.
    pub fn reset(&mut self) {
        self.translation = self.original_translation;
        self.rotation_in_degrees = self.original_rotation;
        self.look = self.original_look;
        self.up = self.original_up;
        self.dirty.set(true);
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

//--- Internal Helpers ----------------------------------------------------

fn sanitize_scale(scale: Vec3) -> Vec3 {
    if scale == Vec3::ZERO {
        Vec3::ONE
    } else {
        scale
    }
}

//=========================================================================
// Tests
//=========================================================================
