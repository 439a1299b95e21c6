//=========================================================================
// Collidable First-Person Controller
//=========================================================================
//
// First-person camera with a body: the controller owns a character
// capsule in the physics world, steers it from the keyboard and keeps
// the camera at the capsule's position plus an eye offset.
//
// Move and strafe speeds are in units per millisecond like the other
// user controllers; the character body receives them per second.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use super::{mouse_look, move_vector, Controller, ControllerType, MoveKeys};
use crate::core::actors::{Actor, ActorType, Color, EffectParameters, StatusType};
use crate::core::context::FrameContext;
use crate::core::events::{EventAction, EventCategory, EventData, EventQueue};
use crate::core::math::Transform3D;
use crate::core::physics::{CharacterObject, CollisionEvent, PhysicsWorld, PlayerObject};

//=== PlayerSettings ======================================================

/// Shape and handling of the capsule behind the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSettings {
    /// Camera position relative to the capsule's centre.
    pub translation_offset: Vec3,
    pub radius: f32,
    pub height: f32,
    pub acceleration_rate: f32,
    pub deceleration_rate: f32,
    pub mass: f32,
    pub jump_height: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            translation_offset: Vec3::new(0.0, 1.0, 0.0),
            radius: 1.0,
            height: 2.0,
            acceleration_rate: 2.0,
            deceleration_rate: 2.0,
            mass: 10.0,
            jump_height: 5.0,
        }
    }
}

//=== CollidableFirstPersonController =====================================

pub struct CollidableFirstPersonController {
    id: String,
    keys: MoveKeys,
    move_speed: f32,
    strafe_speed: f32,
    rotation_speed: f32,
    player: PlayerObject,
}

impl CollidableFirstPersonController {
    /// Builds the player capsule where `camera` stands and enables it in
    /// `world`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        keys: MoveKeys,
        move_speed: f32,
        strafe_speed: f32,
        rotation_speed: f32,
        camera: &Transform3D,
        settings: PlayerSettings,
        world: &mut PhysicsWorld,
    ) -> Self {
        let id = id.trim().to_string();
        let mut character = CharacterObject::new(
            &format!("{id} - player object"),
            ActorType::CollidableCamera,
            StatusType::UPDATE,
            camera.clone(),
            EffectParameters::basic(""),
            "",
            settings.radius,
            settings.height,
            settings.acceleration_rate,
            settings.deceleration_rate,
        );
        character.set_collision_callback(Box::new(handle_collision));
        character.enable(world, false, settings.mass);

        Self {
            id,
            keys,
            move_speed,
            strafe_speed,
            rotation_speed,
            player: PlayerObject::new(character, settings.jump_height, settings.translation_offset),
        }
    }

    pub fn player(&self) -> &PlayerObject {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerObject {
        &mut self.player
    }

    /// Removes the capsule from `world`.
    pub fn release(&mut self, world: &mut PhysicsWorld) {
        self.player.character_mut().release(world);
    }

    /// Eye offset, halved in height while crouching.
    fn eye_offset(&self) -> Vec3 {
        let offset = self.player.translation_offset();
        if self.player.character().is_crouching() {
            Vec3::new(offset.x, offset.y * 0.5, offset.z)
        } else {
            offset
        }
    }
}

impl Controller for CollidableFirstPersonController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::FirstPersonCollidable
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        let Some(transform) = actor.transform3d_mut() else {
            return;
        };

        //--- Walk ---------------------------------------------------------
        let look = Vec3::new(transform.look().x, 0.0, transform.look().z);
        let right = Vec3::new(transform.right().x, 0.0, transform.right().z);
        let per_ms = move_vector(ctx.keyboard, &self.keys, look, right, self.move_speed, self.strafe_speed);
        self.player.character_mut().set_desired_velocity(per_ms * 1000.0);

        //--- Jump / Crouch ------------------------------------------------
        if ctx.keyboard.is_key_down(self.keys.jump) {
            let height = self.player.jump_height();
            self.player.character_mut().do_jump(height);
        } else if ctx.keyboard.is_first_key_press(self.keys.crouch) {
            let crouching = self.player.character().is_crouching();
            self.player.character_mut().set_crouching(!crouching);
        }

        transform.set_translation(self.player.position() + self.eye_offset());

        mouse_look(ctx, transform, self.rotation_speed);
    }
}

//=== Collision Handling ==================================================

/// Touching an inventory item highlights it and marks it transparent.
fn handle_collision(event: &CollisionEvent, queue: &mut EventQueue) -> bool {
    let Some(collidee) = &event.collidee else {
        return true;
    };
    let Ok(mut actor) = collidee.try_borrow_mut() else {
        return true;
    };
    if actor.core().actor_type() != ActorType::CollidableInventory {
        return true;
    }
    if let Some(effect) = actor.effect_mut() {
        effect.set_diffuse_color(Color::RED);
        effect.set_alpha(0.4);
    }
    drop(actor);

    queue.publish(EventData::for_actor(EventCategory::Opacity, EventAction::OnOpaqueToTransparent, collidee.clone()));
    true
}

//=========================================================================
// Tests
//=========================================================================
