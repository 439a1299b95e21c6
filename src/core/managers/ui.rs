//=========================================================================
// UI Manager
//=========================================================================
//
// Screen-space actors (HUD text, textures, reticule) drawn on top of
// the 3D scene, back to front by layer depth (1 = back, 0 = front).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cmp::Ordering;

//=== Internal Dependencies ===============================================

use super::{DrawableComponent, GameComponent, Pausable, Renderer};
use crate::core::actors::{Actor, ActorRef, DrawnActor2D, StatusType};
use crate::core::context::FrameContext;
use crate::core::events::{EventData, EventHandler, EventQueue};
use crate::error::Result;

//=== UiManager ===========================================================

pub struct UiManager {
    pausable: Pausable,
    actors: Vec<ActorRef>,
}

impl UiManager {
    pub fn new(status: StatusType) -> Self {
        Self { pausable: Pausable::new(status, true), actors: Vec::new() }
    }

    pub fn add(&mut self, actor: ActorRef) {
        self.actors.push(actor);
    }

    pub fn remove_first_if(&mut self, predicate: impl Fn(&dyn Actor) -> bool) -> bool {
        match self.actors.iter().position(|a| predicate(&*a.borrow())) {
            Some(index) => {
                self.actors.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn find(&self, predicate: impl Fn(&dyn Actor) -> bool) -> Option<ActorRef> {
        self.actors.iter().find(|a| predicate(&*a.borrow())).cloned()
    }

    pub fn actors(&self) -> &[ActorRef] {
        &self.actors
    }
}

/// Draws `actors` with DRAWN set, back layers first.
pub(crate) fn draw_back_to_front(actors: &[ActorRef], renderer: &mut dyn Renderer) -> Result<()> {
    let mut ordered: Vec<(f32, &ActorRef)> = actors.iter().map(|a| (layer_depth(&*a.borrow()), a)).collect();
    ordered.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    for (_, actor) in ordered {
        let actor = actor.borrow();
        if actor.status().contains(StatusType::DRAWN) {
            renderer.draw_2d(&*actor)?;
        }
    }
    Ok(())
}

/// Updates `actors` with UPDATE set.
pub(crate) fn update_all(actors: &[ActorRef], ctx: &mut FrameContext) {
    for actor in actors {
        let Ok(mut actor) = actor.try_borrow_mut() else {
            continue;
        };
        if actor.status().contains(StatusType::UPDATE) {
            actor.update(ctx);
        }
    }
}

pub(crate) fn layer_depth(actor: &dyn Actor) -> f32 {
    actor.downcast_ref::<DrawnActor2D>().map_or(0.0, DrawnActor2D::layer_depth)
}

//--- Trait Implementations -----------------------------------------------

impl GameComponent for UiManager {
    fn pausable(&self) -> &Pausable {
        &self.pausable
    }

    fn pausable_mut(&mut self) -> &mut Pausable {
        &mut self.pausable
    }

    fn apply_update(&mut self, ctx: &mut FrameContext) -> Result<()> {
        update_all(&self.actors, ctx);
        Ok(())
    }
}

impl DrawableComponent for UiManager {
    fn apply_draw(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        draw_back_to_front(&self.actors, renderer)
    }
}

impl EventHandler for UiManager {
    fn handle_event(&mut self, event: &EventData, _queue: &mut EventQueue) {
        self.pausable.handle_menu_event(event);
    }
}

//=========================================================================
// Tests
//=========================================================================
