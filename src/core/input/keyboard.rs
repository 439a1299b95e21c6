//=========================================================================
// Keyboard Manager
//=========================================================================
//
// Per-frame keyboard state with last-frame comparison.
//
// Architecture:
//   InputEvent → process_events() → keys held (HashSet) → query
//
// Frame lifecycle: begin_frame() → process_events() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode};

//=== KeyboardManager =====================================================

/// Tracks keys held this frame and last frame.
#[derive(Debug, Default)]
pub struct KeyboardManager {
    //--- Persistent State -------------------------------------------------
    keys_down: HashSet<KeyCode>,

    //--- Last Frame -------------------------------------------------------
    previous_keys_down: HashSet<KeyCode>,

    //--- Frame Deltas (reset by begin_frame) -----------------------------
    pressed_this_frame: HashSet<KeyCode>,
    released_this_frame: HashSet<KeyCode>,
}

impl KeyboardManager {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Snapshots this frame's state as "last frame" and clears deltas.
    pub fn begin_frame(&mut self) {
        self.previous_keys_down.clone_from(&self.keys_down);
        self.pressed_this_frame.clear();
        self.released_this_frame.clear();
    }

    pub fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            match event {
                InputEvent::KeyDown { key } => {
                    if self.keys_down.insert(*key) {
                        self.pressed_this_frame.insert(*key);
                    }
                }
                InputEvent::KeyUp { key } => {
                    if self.keys_down.remove(key) {
                        self.released_this_frame.insert(*key);
                    }
                }
                _ => {}
            }
        }
    }

    //--- Query API --------------------------------------------------------

    /// True while `key` is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// True if `key` was held last frame.
    pub fn was_key_down(&self, key: KeyCode) -> bool {
        self.previous_keys_down.contains(&key)
    }

    /// True only on the frame `key` went down.
    ///
    /// A press and release inside one frame still counts.
    pub fn is_first_key_press(&self, key: KeyCode) -> bool {
        self.pressed_this_frame.contains(&key)
    }

    /// True only on the frame `key` came up.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.released_this_frame.contains(&key)
    }

    pub fn is_any_key_pressed(&self) -> bool {
        !self.keys_down.is_empty()
    }

    /// True if the set of held keys differs from last frame.
    pub fn is_state_changed(&self) -> bool {
        self.keys_down != self.previous_keys_down
    }

    pub fn keys_down(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_down.iter()
    }
}

//=========================================================================
// Tests
//=========================================================================
