//=========================================================================
// Drive Controller
//=========================================================================
//
// Tank-style steering: U/J drive along look on the ground plane, H/K
// turn around world up.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Controller, ControllerType};
use crate::core::actors::Actor;
use crate::core::context::FrameContext;
use crate::core::input::KeyCode;

//=== DriveController =====================================================

#[derive(Debug, Clone)]
pub struct DriveController {
    id: String,
    move_speed: f32,
    rotation_speed: f32,
}

impl DriveController {
    const FORWARD: KeyCode = KeyCode::KeyU;
    const BACK: KeyCode = KeyCode::KeyJ;
    const TURN_LEFT: KeyCode = KeyCode::KeyH;
    const TURN_RIGHT: KeyCode = KeyCode::KeyK;

    pub fn new(id: &str, move_speed: f32, rotation_speed: f32) -> Self {
        Self { id: id.trim().to_string(), move_speed, rotation_speed }
    }
}

impl Controller for DriveController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::Drive
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        let Some(transform) = actor.transform3d_mut() else {
            return;
        };
        let ms = ctx.elapsed_ms() as f32;

        let mut step = if ctx.keyboard.is_key_down(Self::FORWARD) {
            transform.look() * self.move_speed
        } else if ctx.keyboard.is_key_down(Self::BACK) {
            -transform.look() * self.move_speed
        } else {
            glam::Vec3::ZERO
        };

        if ctx.keyboard.is_key_down(Self::TURN_LEFT) {
            transform.rotate_around_up_by(self.rotation_speed * ms);
        } else if ctx.keyboard.is_key_down(Self::TURN_RIGHT) {
            transform.rotate_around_up_by(-self.rotation_speed * ms);
        }

        step.y = 0.0;
        transform.translate_by(step * ms);
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
    use crate::core::input::InputEvent;
    use crate::core::math::Transform3D;
    use crate::core::testing::FrameHarness;
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn car() -> Actor3D {
        Actor3D::new("car", ActorType::Player, StatusType::UPDATE, Transform3D::identity())
    }

    fn hold(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key }
    }

    #[test]
    fn drives_forward_along_look() {
        let mut harness = FrameHarness::new();
        harness.input(&[hold(KeyCode::KeyU)]);
        let mut car = car();

        DriveController::new("drive", 0.01, 0.1).update(&mut harness.context(), &mut car);

        assert!(car.position().abs_diff_eq(Vec3::new(0.0, 0.0, -0.16), 1e-5));
    }

    #[test]
    fn turns_left_around_up() {
        let mut harness = FrameHarness::new();
        harness.input(&[hold(KeyCode::KeyH)]);
        let mut car = car();

        DriveController::new("drive", 0.01, 0.5).update(&mut harness.context(), &mut car);

        let rotation = car.transform3d().map(Transform3D::rotation_in_degrees).unwrap_or_default();
        assert_relative_eq!(rotation.y, 8.0, epsilon = 1e-4);
        assert_eq!(car.position(), Vec3::ZERO);
    }
}
