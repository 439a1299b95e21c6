//=========================================================================
// Input
//=========================================================================
//
// Per-frame keyboard and mouse state fed by platform input events.
//
// Architecture:
//   platform (winit) → InputFrame per redraw → channel
//     → KeyboardManager / MouseManager (begin_frame + process_events)
//     → read-only queries from controllers and managers
//
// Both managers keep last frame's state so "first press" and "moved
// since last frame" queries need no extra bookkeeping by callers.
//
//=========================================================================

//=== Module Declarations =================================================

mod event;
mod keyboard;
mod mouse;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, MouseButton};
pub use keyboard::KeyboardManager;
pub use mouse::{MouseManager, PickResult};
