//=========================================================================
// Third-Person Controller
//=========================================================================
//
// Chase camera: sits `distance` behind the target, raised by an
// elevation angle around the target's right axis, and eases toward that
// spot each frame. The scroll wheel tilts the elevation.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};

//=== Internal Dependencies ===============================================

use super::{Controller, ControllerType};
use crate::core::actors::{Actor, ActorRef};
use crate::core::context::FrameContext;

//=== ThirdPersonController ===============================================

pub struct ThirdPersonController {
    id: String,
    target: Option<ActorRef>,
    distance: f32,
    elevation_in_degrees: f32,
    lerp_speed: f32,
    previous_translation: Option<Vec3>,
}

impl ThirdPersonController {
    /// `lerp_speed` is usually a [`LerpSpeed`](super::LerpSpeed) value.
    pub fn new(id: &str, target: Option<ActorRef>, distance: f32, elevation_in_degrees: f32, lerp_speed: f32) -> Self {
        Self {
            id: id.trim().to_string(),
            target,
            distance,
            elevation_in_degrees,
            lerp_speed,
            previous_translation: None,
        }
    }

    pub fn set_target(&mut self, target: Option<ActorRef>) {
        self.target = target;
    }

    pub fn elevation_in_degrees(&self) -> f32 {
        self.elevation_in_degrees
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }
}

impl Controller for ThirdPersonController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::ThirdPerson
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        self.elevation_in_degrees += ctx.elapsed_ms() as f32 * ctx.mouse.delta_from_scroll_wheel() as f32 / 1000.0;

        let Some(target) = &self.target else {
            return;
        };
        let Ok(target) = target.try_borrow() else {
            return;
        };
        let Some(target_transform) = target.transform3d() else {
            return;
        };
        let rotation = Quat::from_axis_angle(target_transform.right(), self.elevation_in_degrees.to_radians());
        let target_to_camera = (rotation * target_transform.look()).normalize_or_zero();
        let goal = target.position() + target_to_camera * self.distance;
        drop(target);

        let Some(transform) = actor.transform3d_mut() else {
            return;
        };
        let from = self.previous_translation.unwrap_or_else(|| transform.translation());
        let translation = from.lerp(goal, self.lerp_speed);

        transform.set_translation(translation);
        transform.set_look(-target_to_camera);
        self.previous_translation = Some(translation);
    }
}

//=========================================================================
// Tests
//=========================================================================
