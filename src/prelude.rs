//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_stage::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::core::{Game, GameConfig, TickControl};
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::error::{EngineError, Result};

// Actors
pub use crate::core::actors::{
    share, Actor, ActorRef, ActorType, Camera3D, Color, DrawnActor2D, DrawnActor3D, EffectParameters,
    ProjectionParameters, StatusType, UiContent, Viewport,
};

// Controllers
pub use crate::core::controllers::{Controller, ControllerType};

// Events
pub use crate::core::events::{EventAction, EventCategory, EventData, EventHandler, EventPayload, EventQueue};

// Input
pub use crate::core::input::{KeyCode, MouseButton};

// Managers
pub use crate::core::managers::{DrawableComponent, GameComponent, RenderState, Renderer, ScreenLayout};

// Math
pub use crate::core::math::{Transform2D, Transform3D};

// Physics
pub use crate::core::physics::{CollidableObject, MaterialProperties, Primitive};
