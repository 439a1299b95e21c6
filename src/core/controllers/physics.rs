//=========================================================================
// Physics Controller
//=========================================================================
//
// Queues forces and torques for the actor's physics body and hands them
// to the body's accumulators on the actor's next update, so the next
// integration step applies them.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use glam::Vec3;
use log::warn;

//=== Internal Dependencies ===============================================

use super::{Controller, ControllerType};
use crate::core::actors::Actor;
use crate::core::context::FrameContext;

//=== Public Types ========================================================

/// Frame a queued force or torque is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    World,
    /// Relative to the body's orientation.
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct QueuedForce {
    system: CoordinateSystem,
    force: Vec3,
    at: Option<Vec3>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct QueuedTorque {
    system: CoordinateSystem,
    torque: Vec3,
}

//=== PhysicsController ===================================================

#[derive(Debug, Default)]
pub struct PhysicsController {
    id: String,
    forces: VecDeque<QueuedForce>,
    torques: VecDeque<QueuedTorque>,
}

impl PhysicsController {
    pub fn new(id: &str) -> Self {
        Self { id: id.trim().to_string(), ..Self::default() }
    }

    /// `at` is a point in the same coordinate system; `None` pushes
    /// through the centre of mass.
    pub fn add_force(&mut self, system: CoordinateSystem, force: Vec3, at: Option<Vec3>) {
        self.forces.push_back(QueuedForce { system, force, at });
    }

    pub fn add_torque(&mut self, system: CoordinateSystem, torque: Vec3) {
        self.torques.push_back(QueuedTorque { system, torque });
    }

    pub fn pending(&self) -> usize {
        self.forces.len() + self.torques.len()
    }
}

impl Controller for PhysicsController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::Physics
    }

    fn update(&mut self, _ctx: &mut FrameContext, actor: &mut dyn Actor) {
        if self.pending() == 0 {
            return;
        }
        let Some(body) = actor.body() else {
            warn!("Physics controller '{}' attached to '{}', which has no body", self.id, actor.core().id());
            self.forces.clear();
            self.torques.clear();
            return;
        };

        let mut body = body.borrow_mut();
        while let Some(QueuedForce { system, force, at }) = self.forces.pop_front() {
            match system {
                CoordinateSystem::World => body.add_world_force(force, at),
                CoordinateSystem::Local => body.add_body_force(force, at),
            }
        }
        while let Some(QueuedTorque { system, torque }) = self.torques.pop_front() {
            match system {
                CoordinateSystem::World => body.add_world_torque(torque),
                CoordinateSystem::Local => body.add_body_torque(torque),
            }
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
