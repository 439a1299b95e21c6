//=========================================================================
// First-Person and Flight Controllers
//=========================================================================
//
// Keyboard moves the actor along its look/right axes, the cursor's
// offset from the screen centre turns it.
//
// First-person keeps motion on the ground plane (y zeroed); flight
// moves freely along the look vector.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{mouse_look, move_vector, Controller, ControllerType, MoveKeys};
use crate::core::actors::Actor;
use crate::core::context::FrameContext;

//=== FirstPersonController ===============================================

#[derive(Debug, Clone)]
pub struct FirstPersonController {
    id: String,
    keys: MoveKeys,
    move_speed: f32,
    strafe_speed: f32,
    rotation_speed: f32,
}

impl FirstPersonController {
    pub fn new(id: &str, keys: MoveKeys, move_speed: f32, strafe_speed: f32, rotation_speed: f32) -> Self {
        Self { id: id.trim().to_string(), keys, move_speed, strafe_speed, rotation_speed }
    }

    pub fn set_move_speed(&mut self, move_speed: f32) {
        self.move_speed = move_speed;
    }

    pub fn set_rotation_speed(&mut self, rotation_speed: f32) {
        self.rotation_speed = rotation_speed;
    }
}

impl Controller for FirstPersonController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::FirstPerson
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        let Some(transform) = actor.transform3d_mut() else {
            return;
        };

        let mut step = move_vector(ctx.keyboard, &self.keys, transform.look(), transform.right(), self.move_speed, self.strafe_speed);
        step.y = 0.0;
        transform.translate_by(step * ctx.elapsed_ms() as f32);

        mouse_look(ctx, transform, self.rotation_speed);
    }

    fn clone_box(&self) -> Option<Box<dyn Controller>> {
        Some(Box::new(self.clone()))
    }
}

//=== FlightCameraController ==============================================

#[derive(Debug, Clone)]
pub struct FlightCameraController {
    id: String,
    keys: MoveKeys,
    move_speed: f32,
    strafe_speed: f32,
    rotation_speed: f32,
}

impl FlightCameraController {
    pub fn new(id: &str, keys: MoveKeys, move_speed: f32, strafe_speed: f32, rotation_speed: f32) -> Self {
        Self { id: id.trim().to_string(), keys, move_speed, strafe_speed, rotation_speed }
    }
}

impl Controller for FlightCameraController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::FlightCamera
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        let Some(transform) = actor.transform3d_mut() else {
            return;
        };

        let step = move_vector(ctx.keyboard, &self.keys, transform.look(), transform.right(), self.move_speed, self.strafe_speed);
        transform.translate_by(step * ctx.elapsed_ms() as f32);

        mouse_look(ctx, transform, self.rotation_speed);
    }

    fn clone_box(&self) -> Option<Box<dyn Controller>> {
        Some(Box::new(self.clone()))
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actors::{Actor3D, ActorType, StatusType};
    use crate::core::input::{InputEvent, KeyCode};
    use crate::core::math::Transform3D;
    use crate::core::testing::FrameHarness;
    use glam::Vec3;

    fn tilted_camera() -> Actor3D {
        // Looking forward and slightly up.
        let look = Vec3::new(0.0, 1.0, -1.0);
        Actor3D::new("camera", ActorType::Camera3D, StatusType::UPDATE, Transform3D::from_look(Vec3::ZERO, look, Vec3::Y))
    }

    fn press(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key }
    }

    #[test]
    fn first_person_stays_on_ground_plane() {
        let mut harness = FrameHarness::new();
        harness.input(&[press(KeyCode::KeyW)]);

        let mut camera = tilted_camera();
        let mut controller = FirstPersonController::new("fp", MoveKeys::WASD, 0.1, 0.1, 0.0);
        controller.update(&mut harness.context(), &mut camera);

        let p = camera.position();
        assert_eq!(p.y, 0.0);
        assert!(p.z < 0.0);
    }

    #[test]
    fn flight_climbs_along_look() {
        let mut harness = FrameHarness::new();
        harness.input(&[press(KeyCode::KeyW)]);

        let mut camera = tilted_camera();
        let mut controller = FlightCameraController::new("flight", MoveKeys::WASD, 0.1, 0.1, 0.0);
        controller.update(&mut harness.context(), &mut camera);

        assert!(camera.position().y > 0.0);
    }

    #[test]
    fn cursor_at_centre_leaves_orientation_alone() {
        let mut harness = FrameHarness::new();
        harness.input(&[]);

        let mut camera = tilted_camera();
        let before = camera.transform3d().map(Transform3D::look);
        let mut controller = FirstPersonController::new("fp", MoveKeys::WASD, 0.1, 0.1, 0.01);
        controller.update(&mut harness.context(), &mut camera);

        assert_eq!(camera.transform3d().map(Transform3D::look), before);
    }

    #[test]
    fn cursor_right_of_centre_turns_right() {
        let mut harness = FrameHarness::new();
        harness.input(&[InputEvent::MouseMoved { x: 410.0, y: 300.0 }]);

        let mut camera = Actor3D::new("camera", ActorType::Camera3D, StatusType::UPDATE, Transform3D::identity());
        let mut controller = FirstPersonController::new("fp", MoveKeys::WASD, 0.0, 0.0, 0.01);
        controller.update(&mut harness.context(), &mut camera);

        let look = camera.transform3d().map(Transform3D::look).unwrap_or_default();
        assert!(look.x > 0.0, "look {look:?}");
    }
}
