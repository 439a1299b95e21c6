//=========================================================================
// Event System
//=========================================================================
//
// Decouples producers of state changes from their consumers.
//
// Architecture:
//   EventData        category + action + typed payload
//   EventQueue       publish side (dedup, pending list)
//   EventDispatcher  subscriber table + once-per-frame drain
//   EventScheduler   delayed publishing by accumulated frame time
//
//=========================================================================

//=== Module Declarations =================================================

mod data;
mod dispatcher;
mod scheduler;

//=== Public API ==========================================================

pub use data::{EventAction, EventCategory, EventData, EventPayload};
pub use dispatcher::{EventDispatcher, EventHandler, EventQueue, SubscriptionId};
pub use scheduler::{EventScheduler, SchedulerStatus};
