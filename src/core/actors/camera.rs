//=========================================================================
// Camera
//=========================================================================
//
// Perspective camera actor: transform + projection + viewport.
//
// Conventions: right-handed view space, clip depth in [0, 1] (near maps
// to the viewport's min depth), screen origin top-left.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::f32::consts::FRAC_PI_4;
use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};

//=== Internal Dependencies ===============================================

use super::{Actor, ActorCore, ActorRef, ActorType, CloneBehaviours, StatusType};
use crate::core::math::{Ray, Transform3D};

/// Shared handle to a camera (cameras are managed separately from
/// other actors).
pub type CameraRef = Rc<RefCell<Camera3D>>;

//=== ProjectionParameters ================================================

/// Perspective frustum with a lazily rebuilt projection matrix.
#[derive(Debug, Clone)]
pub struct ProjectionParameters {
    field_of_view: f32,
    aspect_ratio: f32,
    near_clip: f32,
    far_clip: f32,
    dirty: Cell<bool>,
    projection: Cell<Mat4>,
}

impl ProjectionParameters {
    //--- Construction -----------------------------------------------------

    /// `field_of_view` is the vertical angle in radians.
    pub fn new(field_of_view: f32, aspect_ratio: f32, near_clip: f32, far_clip: f32) -> Self {
        Self {
            field_of_view,
            aspect_ratio,
            near_clip,
            far_clip,
            dirty: Cell::new(true),
            projection: Cell::new(Mat4::IDENTITY),
        }
    }

    //--- Presets ----------------------------------------------------------

    pub fn standard_shallow_four_three() -> Self {
        Self::new(FRAC_PI_4, 4.0 / 3.0, 0.1, 500.0)
    }

    pub fn standard_medium_four_three() -> Self {
        Self::new(FRAC_PI_4, 4.0 / 3.0, 0.1, 1000.0)
    }

    pub fn standard_deep_four_three() -> Self {
        Self::new(FRAC_PI_4, 4.0 / 3.0, 0.1, 2500.0)
    }

    pub fn standard_shallow_sixteen_ten() -> Self {
        Self::new(FRAC_PI_4, 16.0 / 10.0, 0.1, 500.0)
    }

    pub fn standard_medium_sixteen_ten() -> Self {
        Self::new(FRAC_PI_4, 16.0 / 10.0, 0.1, 1000.0)
    }

    pub fn standard_deep_sixteen_ten() -> Self {
        Self::new(FRAC_PI_4, 16.0 / 10.0, 0.1, 10000.0)
    }

    pub fn standard_shallow_sixteen_nine() -> Self {
        Self::new(FRAC_PI_4, 16.0 / 9.0, 0.1, 500.0)
    }

    pub fn standard_medium_sixteen_nine() -> Self {
        Self::new(FRAC_PI_4, 16.0 / 9.0, 0.1, 1000.0)
    }

    pub fn standard_deep_sixteen_nine() -> Self {
        Self::new(FRAC_PI_4, 16.0 / 9.0, 0.1, 2500.0)
    }

    //--- Query API --------------------------------------------------------

    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn near_clip(&self) -> f32 {
        self.near_clip
    }

    pub fn far_clip(&self) -> f32 {
        self.far_clip
    }

    pub fn projection(&self) -> Mat4 {
        if self.dirty.get() {
            self.projection.set(Mat4::perspective_rh(self.field_of_view, self.aspect_ratio, self.near_clip, self.far_clip));
            self.dirty.set(false);
        }
        self.projection.get()
    }

    //--- Mutation ---------------------------------------------------------

    pub fn set_field_of_view(&mut self, field_of_view: f32) {
        self.field_of_view = field_of_view;
        self.dirty.set(true);
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.dirty.set(true);
    }

    pub fn set_near_clip(&mut self, near_clip: f32) {
        self.near_clip = near_clip;
        self.dirty.set(true);
    }

    pub fn set_far_clip(&mut self, far_clip: f32) {
        self.far_clip = far_clip;
        self.dirty.set(true);
    }
}

impl PartialEq for ProjectionParameters {
    fn eq(&self, other: &Self) -> bool {
        self.field_of_view == other.field_of_view
            && self.aspect_ratio == other.aspect_ratio
            && self.near_clip == other.near_clip
            && self.far_clip == other.far_clip
    }
}

//=== Viewport ============================================================

/// Screen region a camera renders into, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height, min_depth: 0.0, max_depth: 1.0 }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Maps a screen point (`z` = depth in [min_depth, max_depth]) back
    /// into world space.
    pub fn unproject(&self, source: Vec3, projection: Mat4, view: Mat4) -> Vec3 {
        let inverse = (projection * view).inverse();
        let ndc = Vec3::new(
            (source.x - self.x) / self.width * 2.0 - 1.0,
            1.0 - (source.y - self.y) / self.height * 2.0,
            (source.z - self.min_depth) / (self.max_depth - self.min_depth),
        );
        inverse.project_point3(ndc)
    }
}

//=== Camera3D ============================================================

#[derive(Debug)]
pub struct Camera3D {
    core: ActorCore,
    transform: Transform3D,
    projection: ProjectionParameters,
    viewport: Viewport,
}

impl Camera3D {
    pub fn new(
        id: &str,
        status: StatusType,
        transform: Transform3D,
        projection: ProjectionParameters,
        viewport: Viewport,
    ) -> Self {
        Self {
            core: ActorCore::new(id, ActorType::Camera3D, status),
            transform,
            projection,
            viewport,
        }
    }

    pub fn transform(&self) -> &Transform3D {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform3D {
        &mut self.transform
    }

    /// Rebuilt on every call; the transform changes most frames.
    pub fn view(&self) -> Mat4 {
        let eye = self.transform.translation();
        Mat4::look_at_rh(eye, eye + self.transform.look(), self.transform.up())
    }

    pub fn projection(&self) -> Mat4 {
        self.projection.projection()
    }

    pub fn projection_parameters(&self) -> &ProjectionParameters {
        &self.projection
    }

    pub fn projection_parameters_mut(&mut self) -> &mut ProjectionParameters {
        &mut self.projection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Ray from the near plane through `screen_position` toward the far plane.
    pub fn mouse_ray(&self, screen_position: Vec2) -> Ray {
        let (projection, view) = (self.projection(), self.view());
        let near = self.viewport.unproject(screen_position.extend(self.viewport.min_depth), projection, view);
        let far = self.viewport.unproject(screen_position.extend(self.viewport.max_depth), projection, view);
        Ray::new(near, far - near)
    }
}

impl Actor for Camera3D {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn transform3d(&self) -> Option<&Transform3D> {
        Some(&self.transform)
    }

    fn transform3d_mut(&mut self) -> Option<&mut Transform3D> {
        Some(&mut self.transform)
    }

    fn clone_actor(&self, behaviours: CloneBehaviours) -> ActorRef {
        Rc::new(RefCell::new(Self {
            core: self.core.clone_with(behaviours),
            transform: self.transform.clone(),
            projection: self.projection.clone(),
            viewport: self.viewport,
        }))
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> Camera3D {
        Camera3D::new(
            "main",
            StatusType::UPDATE,
            Transform3D::from_look(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z, Vec3::Y),
            ProjectionParameters::standard_deep_four_three(),
            Viewport::new(0.0, 0.0, 800.0, 600.0),
        )
    }

    #[test]
    fn presets_match_table() {
        let p = ProjectionParameters::standard_deep_sixteen_ten();
        assert_relative_eq!(p.aspect_ratio(), 1.6);
        assert_eq!(p.far_clip(), 10000.0);
        assert_eq!(ProjectionParameters::standard_medium_four_three().far_clip(), 1000.0);
    }

    #[test]
    fn projection_rebuilt_after_setter() {
        let mut p = ProjectionParameters::standard_shallow_four_three();
        let before = p.projection();
        p.set_field_of_view(FRAC_PI_4 / 2.0);
        assert_ne!(before, p.projection());
    }

    #[test]
    fn view_tracks_transform() {
        let mut camera = camera();
        let origin = camera.view().transform_point3(Vec3::new(0.0, 0.0, 10.0));
        assert!(origin.abs_diff_eq(Vec3::ZERO, 1e-5));

        camera.transform_mut().translate_by(Vec3::X);
        let moved = camera.view().transform_point3(Vec3::new(1.0, 0.0, 10.0));
        assert!(moved.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn centre_ray_points_down_look() {
        let camera = camera();
        let ray = camera.mouse_ray(Vec2::new(400.0, 300.0));

        assert!(ray.direction.abs_diff_eq(-Vec3::Z, 1e-4), "got {:?}", ray.direction);
        assert_relative_eq!(ray.origin.z, 10.0 - 0.1, epsilon = 1e-3);
    }

    #[test]
    fn ray_right_of_centre_bends_right() {
        let ray = camera().mouse_ray(Vec2::new(700.0, 300.0));
        assert!(ray.direction.x > 0.0);
        assert_relative_eq!(ray.direction.y, 0.0, epsilon = 1e-5);
    }
}
