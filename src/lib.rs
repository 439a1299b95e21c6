//=========================================================================
// Aetheric Stage: Library Root
//=========================================================================
//
// Real-time scene runtime: an event bus, actors with attachable
// controllers, a rigid-body physics bridge and pausable per-frame
// managers, driven by a winit window.
//
// Typical usage:
// ```no_run
// use aetheric_stage::EngineBuilder;
// # fn renderer() -> impl aetheric_stage::core::managers::Renderer { unimplemented!() }
//
// EngineBuilder::new()
//     .build()
//     .init(|game| { /* build the scene */ })
//     .run(renderer())
//     .unwrap();
// ```
//
// Layout:
// - `core`: everything that runs inside a frame; public so games can
//   build actors, controllers and managers directly
// - `platform`: winit window and input conversion, kept private
// - `engine`: the builder and runtime entry point
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod core;
pub mod error;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------

mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
pub use error::{EngineError, Result};
