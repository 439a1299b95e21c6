//=========================================================================
// Object Manager
//=========================================================================
//
// Owns the drawn 3D actors of the scene, split into opaque and
// transparent lists so the renderer can draw them in two passes.
//
// Removal is deferred: `remove` only buffers the actor, the buffer is
// flushed at the start of the next update and every removed actor is
// released from the physics world.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{GameComponent, Pausable};
use crate::core::actors::{Actor, ActorRef, StatusType};
use crate::core::context::FrameContext;
use crate::core::events::{EventAction, EventCategory, EventData, EventHandler, EventQueue};
use crate::error::Result;

//=== ObjectManager =======================================================

pub struct ObjectManager {
    pausable: Pausable,
    opaque: Vec<ActorRef>,
    transparent: Vec<ActorRef>,
    /// Waiting to leave the lists.
    remove_buffer: Vec<ActorRef>,
    /// Already out of the lists, still to be released from physics.
    release_buffer: Vec<ActorRef>,
}

impl ObjectManager {
    //--- Construction -----------------------------------------------------

    pub fn new(status: StatusType) -> Self {
        Self {
            pausable: Pausable::new(status, false),
            opaque: Vec::new(),
            transparent: Vec::new(),
            remove_buffer: Vec::new(),
            release_buffer: Vec::new(),
        }
    }

    //--- Collection API ---------------------------------------------------

    /// Adds to the transparent list if the actor's alpha is below one,
    /// otherwise to the opaque list. Body-backed actors become the owner
    /// of their body so picking can find them.
    pub fn add(&mut self, actor: ActorRef) {
        let transparent = {
            let a = actor.borrow();
            if let Some(body) = a.body() {
                body.borrow_mut().set_owner(Rc::downgrade(&actor));
            }
            a.effect().is_some_and(|e| e.is_transparent())
        };

        if transparent {
            self.transparent.push(actor);
        } else {
            self.opaque.push(actor);
        }
    }

    /// Buffers `actor` for removal at the start of the next update.
    pub fn remove(&mut self, actor: &ActorRef) {
        if !self.remove_buffer.iter().any(|a| Rc::ptr_eq(a, actor)) {
            self.remove_buffer.push(Rc::clone(actor));
        }
    }

    /// Removes the first match from each list immediately.
    pub fn remove_first_if(&mut self, predicate: impl Fn(&dyn Actor) -> bool) -> bool {
        let mut removed = false;
        for list in [&mut self.opaque, &mut self.transparent] {
            if let Some(index) = list.iter().position(|a| predicate(&*a.borrow())) {
                self.release_buffer.push(list.remove(index));
                removed = true;
            }
        }
        removed
    }

    /// Removes every match immediately. Returns how many were removed.
    pub fn remove_all(&mut self, predicate: impl Fn(&dyn Actor) -> bool) -> usize {
        let mut count = 0;
        for list in [&mut self.opaque, &mut self.transparent] {
            let (matched, kept): (Vec<_>, Vec<_>) = list.drain(..).partition(|a| predicate(&*a.borrow()));
            *list = kept;
            count += matched.len();
            self.release_buffer.extend(matched);
        }
        count
    }

    pub fn find(&self, predicate: impl Fn(&dyn Actor) -> bool) -> Option<ActorRef> {
        self.opaque.iter().chain(&self.transparent).find(|a| predicate(&*a.borrow())).cloned()
    }

    //--- Query API --------------------------------------------------------

    pub fn opaque(&self) -> &[ActorRef] {
        &self.opaque
    }

    pub fn transparent(&self) -> &[ActorRef] {
        &self.transparent
    }

    pub fn len(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Actors waiting for the next update to be removed.
    pub fn pending_removals(&self) -> usize {
        self.remove_buffer.len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn apply_batch_remove(&mut self, ctx: &mut FrameContext) {
        for actor in self.remove_buffer.drain(..) {
            let before = self.opaque.len() + self.transparent.len();
            self.opaque.retain(|a| !Rc::ptr_eq(a, &actor));
            self.transparent.retain(|a| !Rc::ptr_eq(a, &actor));
            if self.opaque.len() + self.transparent.len() < before {
                self.release_buffer.push(actor);
            }
        }

        for actor in self.release_buffer.drain(..) {
            let mut a = actor.borrow_mut();
            a.release(ctx.physics);
            debug!(target: "managers", "Removed '{}'", a.core().id());
        }
    }

    /// Moves `actor` to `to` if it is in `from`.
    fn shift(from: &mut Vec<ActorRef>, to: &mut Vec<ActorRef>, actor: &ActorRef) {
        if let Some(index) = from.iter().position(|a| Rc::ptr_eq(a, actor)) {
            to.push(from.remove(index));
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl GameComponent for ObjectManager {
    fn pausable(&self) -> &Pausable {
        &self.pausable
    }

    fn pausable_mut(&mut self) -> &mut Pausable {
        &mut self.pausable
    }

    fn apply_update(&mut self, ctx: &mut FrameContext) -> Result<()> {
        self.apply_batch_remove(ctx);

        for actor in self.opaque.iter().chain(&self.transparent) {
            let Ok(mut a) = actor.try_borrow_mut() else {
                warn!(target: "managers", "Skipping update of an actor that is already borrowed");
                continue;
            };
            if a.status().contains(StatusType::UPDATE) {
                a.update(ctx);
            }
        }
        Ok(())
    }
}

impl EventHandler for ObjectManager {
    fn handle_event(&mut self, event: &EventData, _queue: &mut EventQueue) {
        if self.pausable.handle_menu_event(event) {
            return;
        }

        let Some(actor) = event.payload().actor() else {
            return;
        };

        match (event.category(), event.action()) {
            (EventCategory::Opacity, EventAction::OnOpaqueToTransparent) => {
                Self::shift(&mut self.opaque, &mut self.transparent, actor);
            }
            (EventCategory::Opacity, EventAction::OnTransparentToOpaque) => {
                Self::shift(&mut self.transparent, &mut self.opaque, actor);
            }
            (EventCategory::Object, EventAction::OnAddActor) | (EventCategory::Player, EventAction::OnSpawn) => {
                self.add(Rc::clone(actor));
            }
            (EventCategory::Object, EventAction::OnRemoveActor) => self.remove(actor),
            _ => {}
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
