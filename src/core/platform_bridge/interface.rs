//=========================================================================
// Platform Messages
//=========================================================================
//
// What the window layer tells the game. One `Input` message carries
// everything the user did between two redraws.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputFrame ==========================================================

/// Input accumulated over one frame.
///
/// Key and button edges are kept in the order they happened. The cursor
/// only needs its final position; wheel travel is summed so fast
/// scrolling loses no notches.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct InputFrame {
    transitions: Vec<InputEvent>,
    cursor: Option<Vec2>,
    wheel: i32,
}

impl InputFrame {
    pub(crate) fn record(&mut self, event: InputEvent) {
        match event {
            InputEvent::MouseMoved { x, y } => self.cursor = Some(Vec2::new(x, y)),
            InputEvent::MouseWheel { delta } => self.wheel += delta,
            edge => self.transitions.push(edge),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.transitions.is_empty() && self.cursor.is_none() && self.wheel == 0
    }

    pub(crate) fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub(crate) fn wheel(&self) -> i32 {
        self.wheel
    }

    /// Replays the frame for the input managers: edges first, then the
    /// final cursor position and the summed wheel travel.
    pub(crate) fn replay(&self) -> impl Iterator<Item = InputEvent> + '_ {
        let cursor = self.cursor.map(|p| InputEvent::MouseMoved { x: p.x, y: p.y });
        let wheel = (self.wheel != 0).then_some(InputEvent::MouseWheel { delta: self.wheel });
        self.transitions.iter().copied().chain(cursor).chain(wheel)
    }
}

impl FromIterator<InputEvent> for InputFrame {
    fn from_iter<I: IntoIterator<Item = InputEvent>>(events: I) -> Self {
        let mut frame = Self::default();
        events.into_iter().for_each(|e| frame.record(e));
        frame
    }
}

//=== PlatformEvent =======================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    Input(InputFrame),

    /// Inner size in physical pixels.
    Resized { width: u32, height: u32 },

    WindowClosed,
}

//=========================================================================
// Tests
//=========================================================================
