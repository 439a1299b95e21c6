//=========================================================================
// Input Processor
//=========================================================================
//
// Folds winit window events into the frame's `InputFrame`.
//
// The processor keeps its own record of held keys and buttons, so OS
// auto-repeat and unmatched releases never reach the game, and a focus
// loss can release whatever the user was holding when the window went
// to the background.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::trace;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton as WinitButton, MouseScrollDelta},
    keyboard::{KeyCode as WinitKey, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, MouseButton};
use crate::core::platform_bridge::InputFrame;

//=== InputProcessor ======================================================

#[derive(Debug, Default)]
pub(crate) struct InputProcessor {
    held_keys: HashSet<KeyCode>,
    held_buttons: HashSet<MouseButton>,
    frame: InputFrame,
}

impl InputProcessor {
    /// Wheel units per line of a notched wheel.
    const UNITS_PER_LINE: f32 = 120.0;

    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Window Events ----------------------------------------------------

    pub(crate) fn key(&mut self, event: &KeyEvent) {
        if event.repeat {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(code) => self.key_transition(code, event.state),
            PhysicalKey::Unidentified(native) => trace!(target: "platform::input", "No key code for {:?}", native),
        }
    }

    pub(crate) fn button(&mut self, button: WinitButton, state: ElementState) {
        let Some(button) = engine_button(button) else {
            return;
        };
        let changed = match state {
            ElementState::Pressed => self.held_buttons.insert(button),
            ElementState::Released => self.held_buttons.remove(&button),
        };
        if changed {
            self.frame.record(match state {
                ElementState::Pressed => InputEvent::MouseButtonDown { button },
                ElementState::Released => InputEvent::MouseButtonUp { button },
            });
        }
    }

    pub(crate) fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.frame.record(InputEvent::MouseMoved { x: position.x as f32, y: position.y as f32 });
    }

    /// Line deltas scale to 120 per line; trackpad pixels pass through.
    pub(crate) fn wheel(&mut self, delta: MouseScrollDelta) {
        let delta = match delta {
            MouseScrollDelta::LineDelta(_, lines) => (lines * Self::UNITS_PER_LINE).round() as i32,
            MouseScrollDelta::PixelDelta(offset) => offset.y.round() as i32,
        };
        self.frame.record(InputEvent::MouseWheel { delta });
    }

    /// Releases everything held. The matching key-up events go to
    /// whichever window has focus now.
    pub(crate) fn release_all(&mut self) {
        for key in self.held_keys.drain() {
            self.frame.record(InputEvent::KeyUp { key });
        }
        for button in self.held_buttons.drain() {
            self.frame.record(InputEvent::MouseButtonUp { button });
        }
    }

    //--- Frame Boundary ---------------------------------------------------

    /// Hands over this frame's input, or `None` if nothing happened.
    pub(crate) fn take_frame(&mut self) -> Option<InputFrame> {
        if self.frame.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.frame))
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn key_transition(&mut self, code: WinitKey, state: ElementState) {
        let Some(key) = engine_key(code) else {
            trace!(target: "platform::input", "Unbound key {:?} ignored", code);
            return;
        };
        let changed = match state {
            ElementState::Pressed => self.held_keys.insert(key),
            ElementState::Released => self.held_keys.remove(&key),
        };
        if changed {
            self.frame.record(match state {
                ElementState::Pressed => InputEvent::KeyDown { key },
                ElementState::Released => InputEvent::KeyUp { key },
            });
        }
    }
}

//=== Key and Button Mapping ==============================================

fn engine_key(code: WinitKey) -> Option<KeyCode> {
    let key = match code {
        WinitKey::KeyW => KeyCode::KeyW,
        WinitKey::KeyA => KeyCode::KeyA,
        WinitKey::KeyS => KeyCode::KeyS,
        WinitKey::KeyD => KeyCode::KeyD,
        WinitKey::KeyC => KeyCode::KeyC,
        WinitKey::Space => KeyCode::Space,
        WinitKey::ArrowUp => KeyCode::ArrowUp,
        WinitKey::ArrowDown => KeyCode::ArrowDown,
        WinitKey::ArrowLeft => KeyCode::ArrowLeft,
        WinitKey::ArrowRight => KeyCode::ArrowRight,
        WinitKey::ControlLeft => KeyCode::ControlLeft,
        WinitKey::KeyU => KeyCode::KeyU,
        WinitKey::KeyJ => KeyCode::KeyJ,
        WinitKey::KeyH => KeyCode::KeyH,
        WinitKey::KeyK => KeyCode::KeyK,
        _ => return None,
    };
    Some(key)
}

/// Side and thumb buttons are not bound.
fn engine_button(button: WinitButton) -> Option<MouseButton> {
    match button {
        WinitButton::Left => Some(MouseButton::Left),
        WinitButton::Middle => Some(MouseButton::Middle),
        WinitButton::Right => Some(MouseButton::Right),
        _ => None,
    }
}

//=========================================================================
// Tests
//=========================================================================
