//=========================================================================
// Rail Controller
//=========================================================================
//
// Slides the actor along a straight rail so that it keeps level with a
// target, always looking at it.
//
// Per update:
//   to_target = round3(normalize(target − actor))
//   candidate = round3(actor + (to_target · rail.look) · rail.look)
//   move to candidate only if it lies on the rail; look = to_target
//
// Rounding to three decimals keeps the projection from creeping when the
// target is still.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use super::{Controller, ControllerType};
use crate::core::actors::{Actor, ActorRef};
use crate::core::context::FrameContext;
use crate::core::math::{round_f32, round_vec3};

const PRECISION: u32 = 3;

//=== RailParameters ======================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RailParameters {
    id: String,
    start: Vec3,
    end: Vec3,
    look: Vec3,
    length: f32,
}

impl RailParameters {
    pub fn new(id: &str, start: Vec3, end: Vec3) -> Self {
        Self {
            id: id.trim().to_string(),
            start,
            end,
            look: (end - start).normalize_or_zero(),
            length: round_f32(start.distance(end), PRECISION),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    /// Unit direction from start to end.
    pub fn look(&self) -> Vec3 {
        self.look
    }

    pub fn mid_point(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// True if `position` projects onto the segment (to 3 decimals).
    pub fn inside_rail(&self, position: Vec3) -> bool {
        let along = round_f32((position - self.start).dot(self.look), PRECISION);
        (0.0..=self.length).contains(&along)
    }
}

//=== RailController ======================================================

pub struct RailController {
    id: String,
    rail: RailParameters,
    target: Option<ActorRef>,
    first_update: bool,
}

impl RailController {
    pub fn new(id: &str, rail: RailParameters, target: Option<ActorRef>) -> Self {
        Self { id: id.trim().to_string(), rail, target, first_update: true }
    }

    pub fn rail(&self) -> &RailParameters {
        &self.rail
    }

    pub fn set_target(&mut self, target: Option<ActorRef>) {
        self.target = target;
    }
}

impl Controller for RailController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::Rail
    }

    fn update(&mut self, _ctx: &mut FrameContext, actor: &mut dyn Actor) {
        let Some(target) = &self.target else {
            return;
        };
        let Ok(target) = target.try_borrow() else {
            return;
        };
        let target_position = target.position();
        drop(target);

        let Some(transform) = actor.transform3d_mut() else {
            return;
        };

        if self.first_update {
            transform.set_translation(self.rail.mid_point());
            self.first_update = false;
        }

        let to_target = round_vec3((target_position - transform.translation()).normalize_or_zero(), PRECISION);
        let along = to_target.dot(self.rail.look());
        let projected = round_vec3(transform.translation() + along * self.rail.look(), PRECISION);

        if self.rail.inside_rail(projected) {
            transform.set_translation(projected);
        }
        transform.set_look(to_target);
    }
}

//=========================================================================
// Tests
//=========================================================================
