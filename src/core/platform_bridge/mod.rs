//=========================================================================
// Platform Bridge
//=========================================================================
//
// The only contact point between the window layer and the game: a
// crossbeam channel of `PlatformEvent`s, drained once per tick.
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use event_collector::TickControl;

//=== Internal API ========================================================

pub(crate) use event_collector::EventCollector;
pub(crate) use interface::{InputFrame, PlatformEvent};
