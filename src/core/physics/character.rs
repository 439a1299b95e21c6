//=========================================================================
// Character Objects
//=========================================================================
//
// Upright capsule actors driven by a character body: they steer toward a
// desired velocity, jump off the ground and never tip over.
//
// PlayerObject adds what a user-controlled character needs on top (jump
// height, camera offset) and is held by the controller that drives it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};

//=== Internal Dependencies ===============================================

use super::body::{Body, BodyRef, CharacterState, CollisionCallback};
use super::collidable::CollidableObject;
use super::primitive::{MaterialProperties, Primitive};
use super::world::PhysicsWorld;
use crate::core::actors::{Actor, ActorCore, ActorRef, ActorType, CloneBehaviours, EffectParameters, StatusType};
use crate::core::context::FrameContext;
use crate::core::math::Transform3D;

//=== CharacterObject =====================================================

#[derive(Debug)]
pub struct CharacterObject {
    inner: CollidableObject,
    radius: f32,
    height: f32,
}

impl CharacterObject {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        actor_type: ActorType,
        status: StatusType,
        transform: Transform3D,
        effect: EffectParameters,
        model: &str,
        radius: f32,
        height: f32,
        acceleration_rate: f32,
        deceleration_rate: f32,
    ) -> Self {
        let body = Body::new_character(acceleration_rate, deceleration_rate);
        let mut inner = CollidableObject::with_body(id, actor_type, status, transform, effect, model, body);
        inner.add_primitive(Primitive::capsule(Vec3::ZERO, height, radius), MaterialProperties::NORMAL_SMOOTH);
        Self { inner, radius, height }
    }

    /// Enables the body with rotation locked.
    pub fn enable(&mut self, world: &mut PhysicsWorld, immovable: bool, mass: f32) -> Vec3 {
        if let Some(body) = self.inner.body() {
            body.borrow_mut().lock_rotation();
        }
        self.inner.enable(world, immovable, mass)
    }

    pub fn collidable(&self) -> &CollidableObject {
        &self.inner
    }

    pub fn collidable_mut(&mut self) -> &mut CollidableObject {
        &mut self.inner
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_collision_callback(&mut self, callback: CollisionCallback) {
        self.inner.set_collision_callback(callback);
    }

    //--- Character Body ---------------------------------------------------

    pub fn character_state(&self) -> Option<CharacterState> {
        self.inner.body().and_then(|b| b.borrow().character().copied())
    }

    pub fn set_desired_velocity(&mut self, velocity: Vec3) {
        self.with_state(|state| state.desired_velocity = velocity);
    }

    pub fn do_jump(&mut self, jump_height: f32) {
        if let Some(body) = self.inner.body() {
            body.borrow_mut().do_jump(jump_height);
        }
    }

    pub fn is_crouching(&self) -> bool {
        self.character_state().is_some_and(|s| s.is_crouching)
    }

    pub fn set_crouching(&mut self, crouching: bool) {
        self.with_state(|state| state.is_crouching = crouching);
    }

    fn with_state(&mut self, f: impl FnOnce(&mut CharacterState)) {
        if let Some(body) = self.inner.body() {
            if let Some(state) = body.borrow_mut().character_mut() {
                f(state);
            }
        }
    }
}

impl Actor for CharacterObject {
    fn core(&self) -> &ActorCore {
        self.inner.core()
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        self.inner.core_mut()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn transform3d(&self) -> Option<&Transform3D> {
        self.inner.transform3d()
    }

    fn effect(&self) -> Option<&EffectParameters> {
        self.inner.effect()
    }

    fn effect_mut(&mut self) -> Option<&mut EffectParameters> {
        self.inner.effect_mut()
    }

    fn model(&self) -> Option<&str> {
        self.inner.model()
    }

    fn body(&self) -> Option<&BodyRef> {
        self.inner.body()
    }

    fn position(&self) -> Vec3 {
        self.inner.position()
    }

    fn world_matrix(&self) -> Mat4 {
        self.inner.world_matrix()
    }

    fn on_update(&mut self, _ctx: &mut FrameContext) {
        self.inner.sync_from_body();
    }

    fn release(&mut self, world: &mut PhysicsWorld) {
        self.inner.release(world);
    }

    fn clone_actor(&self, behaviours: CloneBehaviours) -> ActorRef {
        let (acceleration, deceleration) = self
            .character_state()
            .map_or((1.0, 1.0), |s| (s.acceleration_rate, s.deceleration_rate));
        let body = Body::new_character(acceleration, deceleration);
        Rc::new(RefCell::new(Self {
            inner: self.inner.clone_with_body(behaviours, body),
            radius: self.radius,
            height: self.height,
        }))
    }
}

//=== PlayerObject ========================================================

/// A character steered by user input.
#[derive(Debug)]
pub struct PlayerObject {
    character: CharacterObject,
    jump_height: f32,
    translation_offset: Vec3,
}

impl PlayerObject {
    /// A non-positive `jump_height` becomes 1.
    pub fn new(character: CharacterObject, jump_height: f32, translation_offset: Vec3) -> Self {
        let mut player = Self { character, jump_height: 1.0, translation_offset };
        player.set_jump_height(jump_height);
        player
    }

    pub fn character(&self) -> &CharacterObject {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut CharacterObject {
        &mut self.character
    }

    pub fn jump_height(&self) -> f32 {
        self.jump_height
    }

    pub fn set_jump_height(&mut self, jump_height: f32) {
        self.jump_height = if jump_height > 0.0 { jump_height } else { 1.0 };
    }

    pub fn translation_offset(&self) -> Vec3 {
        self.translation_offset
    }

    pub fn set_translation_offset(&mut self, offset: Vec3) {
        self.translation_offset = offset;
    }

    pub fn position(&self) -> Vec3 {
        self.character.position()
    }

    /// Character pose drawn `translation_offset` away from the body.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation_offset) * self.character.world_matrix()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::EventQueue;

    fn character(at: Vec3) -> CharacterObject {
        CharacterObject::new(
            "hero",
            ActorType::Player,
            StatusType::UPDATE,
            Transform3D::from_trs(at, Vec3::ZERO, Vec3::ONE),
            EffectParameters::basic("lit"),
            "capsule",
            1.0,
            2.0,
            1.0,
            1.0,
        )
    }

    fn ground(world: &mut PhysicsWorld) {
        let mut body = Body::new();
        body.skin_mut().add_primitive(Primitive::ground(), MaterialProperties::NOT_BOUNCY_NORMAL);
        body.set_immovable(true);
        body.enable();
        world.add_body(body);
    }

    #[test]
    fn enabled_character_never_rotates() {
        let mut world = PhysicsWorld::default();
        let mut hero = character(Vec3::new(0.0, 5.0, 0.0));
        hero.enable(&mut world, false, 10.0);

        let body = hero.body().map(Rc::clone).expect("body");
        assert!(body.borrow().is_rotation_locked());
        assert_eq!(hero.collidable().body().map(|b| b.borrow().skin().len()), Some(1));

        body.borrow_mut().add_world_torque(Vec3::new(50.0, 0.0, 50.0));
        body.borrow_mut().add_world_force(Vec3::X * 100.0, Some(Vec3::new(0.0, 6.0, 0.0)));
        let mut events = EventQueue::new();
        for _ in 0..10 {
            world.integrate(1.0 / 60.0, &mut events);
        }
        assert!(body.borrow().orientation().abs_diff_eq(glam::Quat::IDENTITY, 1e-5));
        assert!(body.borrow().angular_velocity().length() < 1e-5);
    }

    #[test]
    fn character_walks_toward_desired_velocity() {
        let mut world = PhysicsWorld::default();
        ground(&mut world);
        let mut hero = character(Vec3::new(0.0, 2.0, 0.0));
        hero.enable(&mut world, false, 10.0);
        hero.set_desired_velocity(Vec3::new(5.0, 0.0, 0.0));

        let mut events = EventQueue::new();
        for _ in 0..60 {
            world.integrate(1.0 / 60.0, &mut events);
        }
        assert!(hero.position().x > 0.5, "{:?}", hero.position());
    }

    #[test]
    fn crouch_flag_round_trips_through_body() {
        let mut hero = character(Vec3::ZERO);
        assert!(!hero.is_crouching());
        hero.set_crouching(true);
        assert!(hero.is_crouching());
    }

    #[test]
    fn player_jump_height_defaults_to_one() {
        let player = PlayerObject::new(character(Vec3::ZERO), 0.0, Vec3::Y);
        assert_eq!(player.jump_height(), 1.0);

        let mut player = PlayerObject::new(character(Vec3::ZERO), 3.0, Vec3::Y);
        assert_eq!(player.jump_height(), 3.0);
        player.set_jump_height(-2.0);
        assert_eq!(player.jump_height(), 1.0);
    }
}
