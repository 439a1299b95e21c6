//=========================================================================
// Core
//=========================================================================
//
// Everything that runs inside a frame, independent of the windowing layer.
//
// Layers (dependency order):
// ```text
//   events, math, time
//     → actors, controllers
//     → physics (bodies, world, collidable actors)
//     → input (keyboard, mouse, picking rays)
//     → managers (pausable per-frame components)
//     → game (frame orchestrator)
// ```
//
// The platform layer talks to the core only through `platform_bridge`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod actors;
pub mod context;
pub mod controllers;
pub mod events;
pub mod input;
pub mod managers;
pub mod math;
pub mod physics;
pub mod time;

pub(crate) mod platform_bridge;

mod game;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use game::{Game, GameConfig};
pub use platform_bridge::TickControl;
