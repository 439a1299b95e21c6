//=========================================================================
// Curve Controller
//=========================================================================
//
// Plays a keyframed translation/look/up path on the actor, starting the
// first time it updates.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Controller, ControllerType};
use crate::core::actors::Actor;
use crate::core::context::FrameContext;
use crate::core::math::Transform3DCurve;

const PRECISION: u32 = 3;

//=== Curve3DController ===================================================

#[derive(Debug, Clone)]
pub struct Curve3DController {
    id: String,
    curve: Transform3DCurve,
    elapsed_ms: f64,
}

impl Curve3DController {
    pub fn new(id: &str, curve: Transform3DCurve) -> Self {
        Self { id: id.trim().to_string(), curve, elapsed_ms: 0.0 }
    }

    /// Time into the path.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Restarts the path from its first key.
    pub fn rewind(&mut self) {
        self.elapsed_ms = 0.0;
    }
}

impl Controller for Curve3DController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::Curve
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        let Some(transform) = actor.transform3d_mut() else {
            return;
        };
        self.elapsed_ms += ctx.elapsed_ms();

        let (translation, look, up) = self.curve.evaluate(self.elapsed_ms, PRECISION);
        transform.set_translation(translation);
        transform.set_look(look);
        transform.set_up(up);
    }

    fn clone_box(&self) -> Option<Box<dyn Controller>> {
        let mut copy = self.clone();
        copy.rewind();
        Some(Box::new(copy))
    }
}

//=========================================================================
// Tests
//=========================================================================
