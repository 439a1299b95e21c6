//=========================================================================
// Physics Manager
//=========================================================================
//
// Steps the physics world once per frame with a clamped timestep.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::trace;

//=== Internal Dependencies ===============================================

use super::{GameComponent, Pausable};
use crate::core::actors::StatusType;
use crate::core::context::FrameContext;
use crate::core::events::{EventData, EventHandler, EventQueue};
use crate::error::Result;

/// Longest step handed to the integrator (one 60 Hz frame).
pub const DEFAULT_MAX_STEP: Duration = Duration::from_nanos(16_666_667);

//=== PhysicsManager ======================================================

pub struct PhysicsManager {
    pausable: Pausable,
    max_step: Duration,
}

impl PhysicsManager {
    pub fn new(status: StatusType, max_step: Duration) -> Self {
        Self { pausable: Pausable::new(status, false), max_step }
    }

    pub fn max_step(&self) -> Duration {
        self.max_step
    }

    /// The step integrated for a frame lasting `elapsed`.
    pub fn step_for(&self, elapsed: Duration) -> Duration {
        elapsed.min(self.max_step)
    }
}

impl Default for PhysicsManager {
    fn default() -> Self {
        Self::new(StatusType::UPDATE, DEFAULT_MAX_STEP)
    }
}

//--- Trait Implementations -----------------------------------------------

impl GameComponent for PhysicsManager {
    fn pausable(&self) -> &Pausable {
        &self.pausable
    }

    fn pausable_mut(&mut self) -> &mut Pausable {
        &mut self.pausable
    }

    fn apply_update(&mut self, ctx: &mut FrameContext) -> Result<()> {
        let step = self.step_for(ctx.time.elapsed());
        trace!(target: "physics", "Integrating {:?}", step);
        ctx.physics.integrate(step.as_secs_f32(), ctx.events);
        Ok(())
    }
}

impl EventHandler for PhysicsManager {
    fn handle_event(&mut self, event: &EventData, _queue: &mut EventQueue) {
        self.pausable.handle_menu_event(event);
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::{Body, MaterialProperties, Primitive};
    use crate::core::testing::FrameHarness;
    use approx::assert_relative_eq;
    use glam::{Quat, Vec3};

    #[test]
    fn long_frames_are_clamped() {
        let manager = PhysicsManager::default();
        assert_eq!(manager.step_for(Duration::from_millis(5)), Duration::from_millis(5));
        assert_eq!(manager.step_for(Duration::from_millis(250)), DEFAULT_MAX_STEP);
    }

    #[test]
    fn update_integrates_one_clamped_step() {
        let mut harness = FrameHarness::new();
        harness.time.advance(Duration::from_millis(100));

        let mut body = Body::new();
        body.skin_mut().add_primitive(Primitive::sphere(Vec3::ZERO, 1.0), MaterialProperties::UNSET);
        body.distribute_mass(1.0);
        body.move_to(Vec3::new(0.0, 10.0, 0.0), Quat::IDENTITY);
        body.enable();
        let body = harness.physics.add_body(body);

        let mut manager = PhysicsManager::new(StatusType::UPDATE, Duration::from_millis(10));
        manager.update(&mut harness.context()).unwrap();

        // One 10 ms step under -10 gravity.
        assert_relative_eq!(body.borrow().velocity().y, -0.1, epsilon = 1e-4);
    }

    #[test]
    fn paused_manager_does_not_step() {
        let mut harness = FrameHarness::new();
        let mut body = Body::new();
        body.enable();
        let body = harness.physics.add_body(body);

        let mut manager = PhysicsManager::new(StatusType::OFF, DEFAULT_MAX_STEP);
        manager.update(&mut harness.context()).unwrap();
        assert_eq!(body.borrow().velocity(), Vec3::ZERO);
    }
}
