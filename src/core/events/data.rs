//=========================================================================
// Event Data
//=========================================================================
//
// Immutable notifications routed by the dispatcher.
//
// Architecture:
//   EventData { category, action, payload }
//     category → which subscribers receive it
//     action   → what happened
//     payload  → typed arguments (one closed enum, no positional lists)
//
// Equality is by value so the dispatcher can suppress duplicates.
// Actor payloads compare by identity (same shared actor), never by
// field contents.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::rc::Rc;

use glam::Vec3;

//=== Internal Dependencies ===============================================

use crate::core::actors::ActorRef;

//=== EventCategory =======================================================

/// Routing key for subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Camera,
    Player,
    NonPlayer,
    Pickup,
    Sound,
    Menu,
    UI,
    Object,
    Opacity,
    UIPicking,
    Scheduler,
}

//=== EventAction =========================================================

/// What happened within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventAction {
    //--- Lifecycle --------------------------------------------------------
    OnPlay,
    OnPause,
    OnResume,
    OnStop,
    OnStopAll,
    OnStart,
    OnRestart,
    OnExit,

    //--- Sound ------------------------------------------------------------
    OnVolumeDelta,
    OnVolumeSet,
    OnMute,
    OnUnMute,
    OnPlay2D,
    OnPlay3D,

    //--- Menu / UI --------------------------------------------------------
    OnClick,
    OnHover,

    //--- Camera -----------------------------------------------------------
    OnCameraSetActive,
    OnCameraCycle,

    //--- Gameplay ---------------------------------------------------------
    OnHealthDelta,
    OnHealthSet,
    OnLose,
    OnWin,
    OnPickup,
    OnSpawn,

    //--- Scene graph ------------------------------------------------------
    OnOpaqueToTransparent,
    OnTransparentToOpaque,
    OnAddActor,
    OnRemoveActor,

    //--- Picking ----------------------------------------------------------
    OnObjectPicked,
    OnNoObjectPicked,
    OnBeginDrag,

    //--- Scheduler --------------------------------------------------------
    OnAdd,
    OnReset,
}

//=== EventPayload ========================================================

/// Typed event arguments.
///
/// Each producer/consumer pair agrees on a variant instead of on the
/// position of untyped parameters; consumers match and ignore anything
/// else.
#[derive(Clone)]
pub enum EventPayload {
    /// No arguments.
    None,

    /// A shared actor (add/remove/opacity changes, spawn).
    Actor(ActorRef),

    /// Result of a successful ray pick.
    Picked {
        actor: ActorRef,
        position: Vec3,
        normal: Vec3,
        distance: f32,
    },

    /// A string identifier (camera id, scene id, button id).
    Id(String),

    /// A scalar argument (health delta, volume).
    Value(f32),

    /// A sound cue with its playback volume.
    Sound { cue: String, volume: f32 },

    /// An event to deliver after a delay (scheduler input).
    Scheduled { delay_ms: u32, event: Box<EventData> },
}

impl EventPayload {
    /// Returns the actor carried by `Actor` or `Picked`, if any.
    pub fn actor(&self) -> Option<&ActorRef> {
        match self {
            Self::Actor(actor) | Self::Picked { actor, .. } => Some(actor),
            _ => None,
        }
    }

    /// Returns the identifier carried by `Id`, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the scalar carried by `Value`, if any.
    pub fn value(&self) -> Option<f32> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for EventPayload {
    fn eq(&self, other: &Self) -> bool {
        use EventPayload::*;
        match (self, other) {
            (None, None) => true,
            (Actor(a), Actor(b)) => Rc::ptr_eq(a, b),
            (
                Picked { actor: a, position: pa, normal: na, distance: da },
                Picked { actor: b, position: pb, normal: nb, distance: db },
            ) => Rc::ptr_eq(a, b) && pa == pb && na == nb && da == db,
            (Id(a), Id(b)) => a == b,
            (Value(a), Value(b)) => a == b,
            (Sound { cue: ca, volume: va }, Sound { cue: cb, volume: vb }) => ca == cb && va == vb,
            (
                Scheduled { delay_ms: da, event: ea },
                Scheduled { delay_ms: db, event: eb },
            ) => da == db && ea == eb,
            _ => false,
        }
    }
}

impl fmt::Debug for EventPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Actor(actor) => match actor.try_borrow() {
                Ok(a) => write!(f, "Actor({})", a.core().id()),
                Err(_) => write!(f, "Actor(<borrowed>)"),
            },
            Self::Picked { actor, position, distance, .. } => match actor.try_borrow() {
                Ok(a) => write!(f, "Picked({} @ {:?}, d={})", a.core().id(), position, distance),
                Err(_) => write!(f, "Picked(<borrowed> @ {:?})", position),
            },
            Self::Id(id) => write!(f, "Id({id})"),
            Self::Value(v) => write!(f, "Value({v})"),
            Self::Sound { cue, volume } => write!(f, "Sound({cue}, {volume})"),
            Self::Scheduled { delay_ms, event } => write!(f, "Scheduled({delay_ms}ms, {event:?})"),
        }
    }
}

//=== EventData ===========================================================

/// A single notification routed through the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct EventData {
    category: EventCategory,
    action: EventAction,
    payload: EventPayload,
}

impl EventData {
    /// Creates an event without arguments.
    pub fn new(category: EventCategory, action: EventAction) -> Self {
        Self { category, action, payload: EventPayload::None }
    }

    /// Creates an event carrying a payload.
    pub fn with_payload(category: EventCategory, action: EventAction, payload: EventPayload) -> Self {
        Self { category, action, payload }
    }

    /// Shorthand for an event carrying a shared actor.
    pub fn for_actor(category: EventCategory, action: EventAction, actor: ActorRef) -> Self {
        Self::with_payload(category, action, EventPayload::Actor(actor))
    }

    pub fn category(&self) -> EventCategory {
        self.category
    }

    pub fn action(&self) -> EventAction {
        self.action
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// True if this event matches the given category and action.
    pub fn is(&self, category: EventCategory, action: EventAction) -> bool {
        self.category == category && self.action == action
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actors::{Actor3D, ActorType, StatusType};
    use crate::core::math::Transform3D;
    use std::cell::RefCell;

    fn helper(id: &str) -> ActorRef {
        Rc::new(RefCell::new(Actor3D::new(
            id,
            ActorType::Helper,
            StatusType::UPDATE,
            Transform3D::identity(),
        )))
    }

    #[test]
    fn events_equal_by_value() {
        let a = EventData::with_payload(EventCategory::UI, EventAction::OnHealthDelta, EventPayload::Value(1.0));
        let b = EventData::with_payload(EventCategory::UI, EventAction::OnHealthDelta, EventPayload::Value(1.0));
        let c = EventData::with_payload(EventCategory::UI, EventAction::OnHealthDelta, EventPayload::Value(-1.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn actor_payloads_compare_by_identity() {
        let first = helper("crate");
        let second = helper("crate");

        let a = EventData::for_actor(EventCategory::Object, EventAction::OnRemoveActor, first.clone());
        let b = EventData::for_actor(EventCategory::Object, EventAction::OnRemoveActor, first);
        let c = EventData::for_actor(EventCategory::Object, EventAction::OnRemoveActor, second);

        assert_eq!(a, b);
        assert_ne!(a, c, "Same id but different actor must not be equal");
    }

    #[test]
    fn payload_accessors() {
        assert_eq!(EventPayload::Id("main".into()).id(), Some("main"));
        assert_eq!(EventPayload::Value(0.5).value(), Some(0.5));
        assert!(EventPayload::None.actor().is_none());
        assert!(EventPayload::Actor(helper("x")).actor().is_some());
    }

    #[test]
    fn debug_output_names_actor() {
        let event = EventData::for_actor(EventCategory::Object, EventAction::OnAddActor, helper("tree"));
        assert!(format!("{:?}", event).contains("tree"));
    }
}
