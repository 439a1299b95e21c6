//=========================================================================
// Pan Controller
//=========================================================================
//
// Swings the actor about a fixed axis following a sine wave of game
// time: angle = A · sin(ω·t + φ), with t in seconds wrapped to [0, 360).
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use super::{Controller, ControllerType};
use crate::core::actors::Actor;
use crate::core::context::FrameContext;

//=== TrigonometricParameters =============================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrigonometricParameters {
    /// Peak angle in degrees.
    pub max_amplitude: f32,
    /// Degrees of phase advanced per second.
    pub angular_speed: f32,
    pub phase_angle_in_degrees: f32,
}

impl TrigonometricParameters {
    pub fn new(max_amplitude: f32, angular_speed: f32, phase_angle_in_degrees: f32) -> Self {
        Self { max_amplitude, angular_speed, phase_angle_in_degrees }
    }

    /// Wave value at `seconds`.
    pub fn evaluate(&self, seconds: f32) -> f32 {
        let t = seconds % 360.0;
        self.max_amplitude * (self.angular_speed * t + self.phase_angle_in_degrees).to_radians().sin()
    }
}

//=== PanController =======================================================

#[derive(Debug, Clone)]
pub struct PanController {
    id: String,
    rotation_axis: Vec3,
    parameters: TrigonometricParameters,
}

impl PanController {
    pub fn new(id: &str, rotation_axis: Vec3, parameters: TrigonometricParameters) -> Self {
        Self { id: id.trim().to_string(), rotation_axis, parameters }
    }

    pub fn parameters(&self) -> &TrigonometricParameters {
        &self.parameters
    }
}

impl Controller for PanController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::Pan
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        let Some(transform) = actor.transform3d_mut() else {
            return;
        };
        let seconds = (ctx.time.total_ms() / 1000.0) as f32;
        transform.rotate_by(self.rotation_axis * self.parameters.evaluate(seconds));
    }

    fn clone_box(&self) -> Option<Box<dyn Controller>> {
        Some(Box::new(self.clone()))
    }
}

//=========================================================================
// Tests
//=========================================================================
