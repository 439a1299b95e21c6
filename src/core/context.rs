//=========================================================================
// Frame Context
//=========================================================================
//
// Everything an actor, controller or manager may touch while it updates,
// borrowed from the game for the duration of one update pass.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::events::EventQueue;
use crate::core::input::{KeyboardManager, MouseManager};
use crate::core::physics::PhysicsWorld;
use crate::core::time::GameTime;

//=== FrameContext ========================================================

pub struct FrameContext<'a> {
    pub time: &'a GameTime,
    pub keyboard: &'a KeyboardManager,
    pub mouse: &'a MouseManager,
    /// Publish side of the event bus; delivered at the frame's drain.
    pub events: &'a mut EventQueue,
    pub physics: &'a mut PhysicsWorld,
    pub screen_centre: Vec2,
}

impl FrameContext<'_> {
    pub fn elapsed_ms(&self) -> f64 {
        self.time.elapsed_ms()
    }
}
