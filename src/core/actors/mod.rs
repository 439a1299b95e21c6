//=========================================================================
// Actors
//=========================================================================
//
// Everything that lives in a scene: helpers, drawn models, cameras, UI
// elements and physics-backed objects.
//
// Architecture:
//   ActorCore    identity, status flags, attached controllers
//   Actor trait  capability interface (transform, effect, body, ...)
//   ActorRef     shared handle used by managers, targets and events
//
// Controllers run before the actor's own update, in attachment order.
// A controller receives the actor it is attached to; controllers added
// while the list runs take effect from the next frame.
//
//=========================================================================

//=== Module Declarations =================================================

mod actor2d;
mod actor3d;
mod camera;

//=== Public API ==========================================================

pub use actor2d::{DrawnActor2D, UiContent};
pub use actor3d::{Actor3D, Color, DrawnActor3D, EffectParameters};
pub use camera::{Camera3D, CameraRef, ProjectionParameters, Viewport};

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::ops::{BitOr, BitOrAssign};
use std::rc::Rc;

use glam::{Mat4, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::context::FrameContext;
use crate::core::controllers::Controller;
use crate::core::events::{EventCategory, SubscriptionId};
use crate::core::math::{Transform2D, Transform3D};
use crate::core::physics::{BodyRef, PhysicsWorld};

//=== Public Types ========================================================

/// Shared handle to any actor.
pub type ActorRef = Rc<RefCell<dyn Actor>>;

/// Role of an actor in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorType {
    NonPlayer,
    Player,
    Decorator,
    Primitive,
    Camera2D,
    Camera3D,
    Helper,
    CollidableGround,
    CollidablePickup,
    CollidableDecorator,
    CollidableCamera,
    CollidableInventory,
    UITextureObject,
    UIText,
    UIMouse,
}

/// How much of an actor's state is copied by [`Actor::clone_actor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneBehaviours {
    /// Copy data only; the clone starts with no controllers.
    Skip,
    /// Also clone every controller that supports cloning.
    Deep,
}

//=== StatusType ==========================================================

/// Bit set selecting whether an actor is updated and/or drawn.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusType(u8);

impl StatusType {
    pub const OFF: Self = Self(0);
    pub const DRAWN: Self = Self(1);
    pub const UPDATE: Self = Self(2);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every flag in `other` is set. `OFF` is contained in anything.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_off(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for StatusType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for StatusType {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.contains(Self::UPDATE), self.contains(Self::DRAWN)) {
            (false, false) => write!(f, "Off"),
            (true, false) => write!(f, "Update"),
            (false, true) => write!(f, "Drawn"),
            (true, true) => write!(f, "Update | Drawn"),
        }
    }
}

//=== ActorCore ===========================================================

/// State shared by every actor.
pub struct ActorCore {
    id: String,
    description: String,
    actor_type: ActorType,
    status: StatusType,
    controllers: Vec<Box<dyn Controller>>,
    subscriptions: Vec<(EventCategory, SubscriptionId)>,
}

impl ActorCore {
    //--- Construction -----------------------------------------------------

    pub fn new(id: &str, actor_type: ActorType, status: StatusType) -> Self {
        let id = id.trim().to_string();
        Self {
            description: id.clone(),
            id,
            actor_type,
            status,
            controllers: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Copies identity and status; controllers are cloned for `Deep` only.
    pub fn clone_with(&self, behaviours: CloneBehaviours) -> Self {
        let controllers = match behaviours {
            CloneBehaviours::Skip => Vec::new(),
            CloneBehaviours::Deep => self.controllers.iter().filter_map(|c| c.clone_box()).collect(),
        };
        Self {
            id: format!("clone - {}", self.id),
            description: self.description.clone(),
            actor_type: self.actor_type,
            status: self.status,
            controllers,
            subscriptions: Vec::new(),
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = id.trim().to_string();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.trim().to_string();
    }

    pub fn actor_type(&self) -> ActorType {
        self.actor_type
    }

    pub fn status(&self) -> StatusType {
        self.status
    }

    pub fn set_status(&mut self, status: StatusType) {
        self.status = status;
    }

    //--- Controllers ------------------------------------------------------

    pub fn attach(&mut self, controller: Box<dyn Controller>) {
        self.controllers.push(controller);
    }

    /// Removes the first controller with `id`.
    pub fn detach(&mut self, id: &str) -> bool {
        match self.controllers.iter().position(|c| c.id() == id) {
            Some(index) => {
                self.controllers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn controller(&self, id: &str) -> Option<&dyn Controller> {
        self.controllers.iter().find(|c| c.id() == id).map(|c| c.as_ref())
    }

    pub fn controllers(&self) -> impl Iterator<Item = &dyn Controller> {
        self.controllers.iter().map(|c| c.as_ref())
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    //--- Event Handlers ---------------------------------------------------

    /// Records a bus subscription owned by this actor.
    pub fn add_subscription(&mut self, category: EventCategory, id: SubscriptionId) {
        self.subscriptions.push((category, id));
    }

    pub fn subscriptions(&self) -> &[(EventCategory, SubscriptionId)] {
        &self.subscriptions
    }

    //--- Internal Helpers -------------------------------------------------

    fn take_controllers(&mut self) -> Vec<Box<dyn Controller>> {
        mem::take(&mut self.controllers)
    }

    fn restore_controllers(&mut self, controllers: Vec<Box<dyn Controller>>) {
        let added = mem::replace(&mut self.controllers, controllers);
        self.controllers.extend(added);
    }
}

impl fmt::Debug for ActorCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorCore")
            .field("id", &self.id)
            .field("actor_type", &self.actor_type)
            .field("status", &self.status)
            .field("controllers", &self.controllers.iter().map(|c| c.id()).collect::<Vec<_>>())
            .finish()
    }
}

//=== Actor ===============================================================

/// Capability interface implemented by every scene object.
///
/// Capabilities an actor does not have return `None`; callers (mostly
/// controllers) skip the actor in that case.
pub trait Actor: Any {
    fn core(&self) -> &ActorCore;
    fn core_mut(&mut self) -> &mut ActorCore;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    //--- Capabilities -----------------------------------------------------

    fn transform3d(&self) -> Option<&Transform3D> {
        None
    }

    fn transform3d_mut(&mut self) -> Option<&mut Transform3D> {
        None
    }

    fn transform2d(&self) -> Option<&Transform2D> {
        None
    }

    fn transform2d_mut(&mut self) -> Option<&mut Transform2D> {
        None
    }

    fn effect(&self) -> Option<&EffectParameters> {
        None
    }

    fn effect_mut(&mut self) -> Option<&mut EffectParameters> {
        None
    }

    /// Key of the model drawn for this actor.
    fn model(&self) -> Option<&str> {
        None
    }

    /// Physics body backing this actor.
    fn body(&self) -> Option<&BodyRef> {
        None
    }

    //--- Derived State ----------------------------------------------------

    fn position(&self) -> Vec3 {
        if let Some(transform) = self.transform3d() {
            transform.translation()
        } else if let Some(transform) = self.transform2d() {
            transform.translation().extend(0.0)
        } else {
            Vec3::ZERO
        }
    }

    fn world_matrix(&self) -> Mat4 {
        if let Some(transform) = self.transform3d() {
            transform.world()
        } else if let Some(transform) = self.transform2d() {
            transform.world()
        } else {
            Mat4::IDENTITY
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Actor-specific work after its controllers have run.
    fn on_update(&mut self, _ctx: &mut FrameContext) {}

    /// Detaches the actor from engine systems (physics) before it is dropped.
    fn release(&mut self, _world: &mut PhysicsWorld) {}

    fn clone_actor(&self, behaviours: CloneBehaviours) -> ActorRef;
}

impl dyn Actor {
    /// Runs attached controllers in order, then the actor's own update.
    pub fn update(&mut self, ctx: &mut FrameContext) {
        let mut controllers = self.core_mut().take_controllers();
        for controller in controllers.iter_mut() {
            controller.update(ctx, self);
        }
        self.core_mut().restore_controllers(controllers);
        self.on_update(ctx);
    }

    pub fn id(&self) -> &str {
        self.core().id()
    }

    pub fn status(&self) -> StatusType {
        self.core().status()
    }

    pub fn downcast_ref<T: Actor>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Actor>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Wraps a concrete actor into a shared handle.
pub fn share<A: Actor>(actor: A) -> ActorRef {
    Rc::new(RefCell::new(actor))
}

//=========================================================================
// Tests
//=========================================================================
