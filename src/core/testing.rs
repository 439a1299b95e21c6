//=========================================================================
// Test Support
//=========================================================================
//
// Owns the pieces a FrameContext borrows so unit tests can drive actors,
// controllers and managers without a full Game.
//
//=========================================================================

use std::time::Duration;

use glam::Vec2;

use crate::core::context::FrameContext;
use crate::core::events::EventQueue;
use crate::core::input::{InputEvent, KeyboardManager, MouseManager};
use crate::core::physics::PhysicsWorld;
use crate::core::time::GameTime;

pub(crate) struct FrameHarness {
    pub time: GameTime,
    pub keyboard: KeyboardManager,
    pub mouse: MouseManager,
    pub events: EventQueue,
    pub physics: PhysicsWorld,
    pub screen_centre: Vec2,
}

impl FrameHarness {
    /// 16 ms frames, 800×600 screen.
    pub fn new() -> Self {
        let screen_centre = Vec2::new(400.0, 300.0);
        Self {
            time: GameTime::from_elapsed(Duration::from_millis(16)),
            keyboard: KeyboardManager::new(),
            mouse: MouseManager::at(screen_centre),
            events: EventQueue::new(),
            physics: PhysicsWorld::default(),
            screen_centre,
        }
    }

    /// Starts a new frame with `events` as this frame's input.
    pub fn input(&mut self, events: &[InputEvent]) {
        self.time.advance(self.time.elapsed());
        self.keyboard.begin_frame();
        self.keyboard.process_events(events);
        self.mouse.begin_frame();
        self.mouse.process_events(events);
    }

    pub fn context(&mut self) -> FrameContext<'_> {
        FrameContext {
            time: &self.time,
            keyboard: &self.keyboard,
            mouse: &self.mouse,
            events: &mut self.events,
            physics: &mut self.physics,
            screen_centre: self.screen_centre,
        }
    }
}
