//=========================================================================
// Collidable Object
//=========================================================================
//
// A drawn actor backed by a physics body.
//
// Once enabled, the body is the only authority on where the actor is:
// the displayed transform keeps scale and base orientation but its
// translation is copied from the body every update, and no mutable
// transform is handed out.
//
// Lifecycle: new → add_primitive(..)* → enable(world) → ... → release(world)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Quat, Vec3};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::body::{Body, BodyRef, CollisionCallback};
use super::primitive::{MaterialProperties, Primitive};
use super::world::PhysicsWorld;
use crate::core::actors::{Actor, ActorCore, ActorRef, ActorType, CloneBehaviours, EffectParameters, StatusType};
use crate::core::context::FrameContext;
use crate::core::math::Transform3D;
use crate::error::{EngineError, Result};

//=== CollidableObject ====================================================

#[derive(Debug)]
pub struct CollidableObject {
    core: ActorCore,
    transform: Transform3D,
    effect: EffectParameters,
    model: String,
    body: BodyRef,
    mass: f32,
}

impl CollidableObject {
    //--- Construction -----------------------------------------------------

    pub fn new(
        id: &str,
        actor_type: ActorType,
        status: StatusType,
        transform: Transform3D,
        effect: EffectParameters,
        model: &str,
    ) -> Self {
        Self::with_body(id, actor_type, status, transform, effect, model, Body::new())
    }

    pub(crate) fn with_body(
        id: &str,
        actor_type: ActorType,
        status: StatusType,
        transform: Transform3D,
        effect: EffectParameters,
        model: &str,
        body: Body,
    ) -> Self {
        Self {
            core: ActorCore::new(id, actor_type, status),
            transform,
            effect,
            model: model.to_string(),
            body: Rc::new(RefCell::new(body)),
            mass: 0.0,
        }
    }

    pub fn add_primitive(&mut self, primitive: Primitive, material: MaterialProperties) {
        self.body.borrow_mut().skin_mut().add_primitive(primitive, material);
    }

    pub fn set_collision_callback(&mut self, callback: CollisionCallback) {
        self.body.borrow_mut().skin_mut().set_callback(callback);
    }

    //--- Physics ----------------------------------------------------------

    /// Spreads `mass` uniformly over the primitives, places the body at
    /// the transform's translation, registers it with `world` and
    /// returns the centre of mass (skin-local).
    pub fn enable(&mut self, world: &mut PhysicsWorld, immovable: bool, mass: f32) -> Vec3 {
        self.mass = mass;
        let mut body = self.body.borrow_mut();

        if body.skin().is_empty() {
            warn!(target: "physics", "Enabling '{}' with no collision primitives", self.core.id());
        }
        let centre_of_mass = body.distribute_mass(mass);

        body.set_immovable(immovable);
        body.move_to(self.transform.translation(), Quat::IDENTITY);
        body.skin_mut().set_offset(-centre_of_mass);
        body.enable();
        drop(body);

        world.add(&self.body);
        debug!(target: "physics", "Enabled '{}' (mass {}, immovable {})", self.core.id(), mass, immovable);
        centre_of_mass
    }

    /// The body, if `enable` has been called.
    pub fn enabled_body(&self) -> Result<&BodyRef> {
        if self.body.borrow().is_enabled() {
            Ok(&self.body)
        } else {
            Err(EngineError::BodyNotEnabled(self.core.id().to_string()))
        }
    }

    /// Total mass given to `enable`.
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Read-only view of the displayed transform.
    pub fn transform(&self) -> &Transform3D {
        &self.transform
    }

    /// Sets the translation used by the next `enable`. No effect on an
    /// enabled body; move the body instead.
    pub fn place(&mut self, translation: Vec3) {
        self.transform.set_translation(translation);
    }

    //--- Internal Helpers -------------------------------------------------

    pub(crate) fn sync_from_body(&mut self) {
        let position = self.body.borrow().position();
        self.transform.set_translation(position);
    }

    /// Copy with `body` (unregistered) carrying the same primitives.
    pub(crate) fn clone_with_body(&self, behaviours: CloneBehaviours, mut body: Body) -> Self {
        for (primitive, material) in self.body.borrow().skin().primitives() {
            body.skin_mut().add_primitive(*primitive, *material);
        }
        Self {
            core: self.core.clone_with(behaviours),
            transform: self.transform.clone(),
            effect: self.effect.clone(),
            model: self.model.clone(),
            body: Rc::new(RefCell::new(body)),
            mass: self.mass,
        }
    }
}

impl Actor for CollidableObject {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn transform3d(&self) -> Option<&Transform3D> {
        Some(&self.transform)
    }

    fn effect(&self) -> Option<&EffectParameters> {
        Some(&self.effect)
    }

    fn effect_mut(&mut self) -> Option<&mut EffectParameters> {
        Some(&mut self.effect)
    }

    fn model(&self) -> Option<&str> {
        Some(&self.model)
    }

    fn body(&self) -> Option<&BodyRef> {
        Some(&self.body)
    }

    fn position(&self) -> Vec3 {
        self.body.borrow().position()
    }

    fn world_matrix(&self) -> Mat4 {
        let body = self.body.borrow();
        let primitive_orientation = body.skin().primitive(0).map_or(Quat::IDENTITY, Primitive::orientation);
        Mat4::from_translation(body.position())
            * self.transform.orientation()
            * Mat4::from_quat(body.orientation())
            * Mat4::from_quat(primitive_orientation)
            * Mat4::from_scale(self.transform.scale())
    }

    fn on_update(&mut self, _ctx: &mut FrameContext) {
        self.sync_from_body();
    }

    fn release(&mut self, world: &mut PhysicsWorld) {
        world.remove(&self.body);
        self.body.borrow_mut().disable();
    }

    /// The copy gets its own, not yet enabled body with the same primitives.
    fn clone_actor(&self, behaviours: CloneBehaviours) -> ActorRef {
        Rc::new(RefCell::new(self.clone_with_body(behaviours, Body::new())))
    }
}

//=========================================================================
// Tests
//=========================================================================
