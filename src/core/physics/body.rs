//=========================================================================
// Rigid Body
//=========================================================================
//
// Actor-side proxy of one rapier rigid body plus its collision skin.
//
// Architecture:
//   Body
//     ├─ pose (position = centre of mass, orientation)
//     ├─ motion (velocity, angular velocity, force/torque accumulators)
//     ├─ mass (total, principal inertia, collider density)
//     ├─ kind (Rigid | Character)
//     ├─ CollisionSkin (primitives, local offset, callback, contacts)
//     └─ handle → RigidBody in PhysicsWorld
//
// Edits made between steps are marked pending and pushed into rapier at
// the start of the next step; the simulated pose and velocities are
// pulled back after it.
//
// Bodies are shared as `BodyRef` between the world and the actor that
// owns them; the owner is held weakly so picking and collision
// callbacks can reach the actor without a reference cycle.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use glam::{Quat, Vec3};
use log::warn;
use num_traits::Zero;
use rapier3d::parry::mass_properties::MassProperties;
use rapier3d::prelude::{RigidBody, RigidBodyHandle, RigidBodyType};

//=== Internal Dependencies ===============================================

use super::conversions::{from_point, from_rotation, from_vector, to_isometry, to_vector};
use super::primitive::{MaterialProperties, Primitive};
use crate::core::actors::{Actor, ActorRef};
use crate::core::events::EventQueue;

//=== Public Types ========================================================

pub type BodyRef = Rc<RefCell<Body>>;

/// Decides whether a detected contact is resolved physically.
///
/// Runs when the skin first touches another one. Returning `false` lets
/// the pair pass through each other until they separate (triggers,
/// pickups).
pub type CollisionCallback = Box<dyn FnMut(&CollisionEvent, &mut EventQueue) -> bool>;

/// What a collision callback is told about a contact.
pub struct CollisionEvent {
    /// Actor owning the body whose callback runs.
    pub collider: Option<ActorRef>,
    /// Actor owning the other body.
    pub collidee: Option<ActorRef>,
    /// Contact normal pointing toward the collider.
    pub normal: Vec3,
    pub point: Vec3,
}

/// A solver contact from the last step, seen from one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing toward this body.
    pub normal: Vec3,
    pub point: Vec3,
    pub depth: f32,
}

//=== CollisionSkin =======================================================

#[derive(Default)]
pub struct CollisionSkin {
    primitives: Vec<(Primitive, MaterialProperties)>,
    offset: Vec3,
    callback: Option<CollisionCallback>,
    contacts: Vec<Contact>,
}

impl CollisionSkin {
    pub fn add_primitive(&mut self, primitive: Primitive, material: MaterialProperties) {
        self.primitives.push((primitive, material));
    }

    pub fn primitives(&self) -> impl Iterator<Item = &(Primitive, MaterialProperties)> + Clone {
        self.primitives.iter()
    }

    pub fn primitive(&self, index: usize) -> Option<&Primitive> {
        self.primitives.get(index).map(|(p, _)| p)
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Translation applied to every primitive (−centre of mass once enabled).
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub(crate) fn set_offset(&mut self, offset: Vec3) {
        self.offset = offset;
    }

    pub fn set_callback(&mut self, callback: CollisionCallback) {
        self.callback = Some(callback);
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub(crate) fn take_callback(&mut self) -> Option<CollisionCallback> {
        self.callback.take()
    }

    pub(crate) fn restore_callback(&mut self, callback: Option<CollisionCallback>) {
        if self.callback.is_none() {
            self.callback = callback;
        }
    }

    /// Combined solid mass properties at `density`, unshifted frame.
    fn mass_properties(&self, density: f32) -> MassProperties {
        self.primitives
            .iter()
            .map(|(p, _)| p.mass_properties(density))
            .fold(MassProperties::zero(), |acc, m| acc + m)
    }

    /// Contacts touching this skin after the last step.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub(crate) fn contacts_mut(&mut self) -> &mut Vec<Contact> {
        &mut self.contacts
    }
}

impl fmt::Debug for CollisionSkin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionSkin")
            .field("primitives", &self.primitives)
            .field("offset", &self.offset)
            .field("callback", &self.callback.is_some())
            .field("contacts", &self.contacts.len())
            .finish()
    }
}

//=== Character State =====================================================

/// Movement state of a character body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterState {
    pub desired_velocity: Vec3,
    pub acceleration_rate: f32,
    pub deceleration_rate: f32,
    pub jump_height: f32,
    pub is_jumping: bool,
    pub is_crouching: bool,
}

impl CharacterState {
    const FORCE_FACTOR: f32 = 500.0;
    const GROUND_NORMAL_THRESHOLD: f32 = 0.7;

    pub fn new(acceleration_rate: f32, deceleration_rate: f32) -> Self {
        Self {
            desired_velocity: Vec3::ZERO,
            acceleration_rate,
            deceleration_rate,
            jump_height: 5.0,
            is_jumping: false,
            is_crouching: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    Rigid,
    Character(CharacterState),
}

//=== Body ================================================================

#[derive(Debug, Default, Clone, Copy)]
struct Pending {
    pose: bool,
    velocity: bool,
    settings: bool,
}

pub struct Body {
    //--- Pose -------------------------------------------------------------
    position: Vec3,
    orientation: Quat,

    //--- Motion -----------------------------------------------------------
    velocity: Vec3,
    angular_velocity: Vec3,
    force: Vec3,
    torque: Vec3,

    //--- Mass -------------------------------------------------------------
    mass: f32,
    principal_inertia: Vec3,
    density: f32,

    //--- Flags ------------------------------------------------------------
    immovable: bool,
    enabled: bool,
    rotation_locked: bool,

    kind: BodyKind,
    skin: CollisionSkin,
    owner: Option<Weak<RefCell<dyn Actor>>>,

    handle: Option<RigidBodyHandle>,
    pending: Pending,
}

impl Body {
    //--- Construction -----------------------------------------------------

    /// A disabled rigid body at the origin with no mass.
    pub fn new() -> Self {
        Self::with_kind(BodyKind::Rigid)
    }

    pub fn new_character(acceleration_rate: f32, deceleration_rate: f32) -> Self {
        Self::with_kind(BodyKind::Character(CharacterState::new(acceleration_rate, deceleration_rate)))
    }

    fn with_kind(kind: BodyKind) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            mass: 0.0,
            principal_inertia: Vec3::ZERO,
            density: 0.0,
            immovable: false,
            enabled: false,
            rotation_locked: false,
            kind,
            skin: CollisionSkin::default(),
            owner: None,
            handle: None,
            pending: Pending::default(),
        }
    }

    //--- Pose -------------------------------------------------------------

    /// World position of the centre of mass.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn move_to(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = orientation;
        self.pending.pose = true;
    }

    //--- Motion -----------------------------------------------------------

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
        self.pending.velocity = true;
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.angular_velocity = angular_velocity;
        self.pending.velocity = true;
    }

    /// Force accumulated for the next step.
    pub fn force(&self) -> Vec3 {
        self.force
    }

    pub fn torque(&self) -> Vec3 {
        self.torque
    }

    /// World-space force, optionally applied at a world point.
    pub fn add_world_force(&mut self, force: Vec3, at: Option<Vec3>) {
        self.force += force;
        if let Some(point) = at {
            self.torque += (point - self.position).cross(force);
        }
    }

    /// Body-space force, optionally applied at a body-local point.
    pub fn add_body_force(&mut self, force: Vec3, at: Option<Vec3>) {
        let world_force = self.orientation * force;
        let world_point = at.map(|p| self.position + self.orientation * p);
        self.add_world_force(world_force, world_point);
    }

    pub fn add_world_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    pub fn add_body_torque(&mut self, torque: Vec3) {
        self.torque += self.orientation * torque;
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    //--- Mass -------------------------------------------------------------

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Principal moments of inertia about the centre of mass.
    pub fn principal_inertia(&self) -> Vec3 {
        self.principal_inertia
    }

    /// Density given to this body's colliders.
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Spreads `total_mass` uniformly over the skin's volume and returns
    /// the centre of mass in skin coordinates.
    ///
    /// A skin with no volume (empty, or only planes) gets no mass.
    pub fn distribute_mass(&mut self, total_mass: f32) -> Vec3 {
        let volume = self.skin.mass_properties(1.0).mass();
        if volume <= f32::EPSILON || total_mass <= 0.0 {
            if total_mass > 0.0 {
                warn!(target: "physics", "Cannot spread mass {} over a skin with no volume", total_mass);
            }
            self.mass = 0.0;
            self.principal_inertia = Vec3::ZERO;
            self.density = 0.0;
            return Vec3::ZERO;
        }

        self.density = total_mass / volume;
        let props = self.skin.mass_properties(self.density);
        self.mass = total_mass;
        self.principal_inertia = from_vector(&props.principal_inertia());
        from_point(&props.local_com)
    }

    /// Prevents rotation in response to contacts or torques.
    pub fn lock_rotation(&mut self) {
        self.rotation_locked = true;
        self.angular_velocity = Vec3::ZERO;
        self.pending.settings = true;
        self.pending.velocity = true;
    }

    pub fn is_rotation_locked(&self) -> bool {
        self.rotation_locked
    }

    //--- Flags ------------------------------------------------------------

    pub fn is_immovable(&self) -> bool {
        self.immovable
    }

    pub fn set_immovable(&mut self, immovable: bool) {
        self.immovable = immovable;
        self.pending.settings = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        self.pending.settings = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.pending.settings = true;
    }

    /// True if this body reacts to forces and contacts.
    pub fn is_dynamic(&self) -> bool {
        self.enabled && !self.immovable
    }

    //--- Kind -------------------------------------------------------------

    pub fn kind(&self) -> &BodyKind {
        &self.kind
    }

    pub fn character(&self) -> Option<&CharacterState> {
        match &self.kind {
            BodyKind::Character(state) => Some(state),
            BodyKind::Rigid => None,
        }
    }

    pub fn character_mut(&mut self) -> Option<&mut CharacterState> {
        match &mut self.kind {
            BodyKind::Character(state) => Some(state),
            BodyKind::Rigid => None,
        }
    }

    /// Requests a jump; applied next step only if standing on something.
    pub fn do_jump(&mut self, jump_height: f32) {
        if let Some(state) = self.character_mut() {
            state.jump_height = jump_height;
            state.is_jumping = true;
        }
    }

    //--- Skin -------------------------------------------------------------

    pub fn skin(&self) -> &CollisionSkin {
        &self.skin
    }

    pub fn skin_mut(&mut self) -> &mut CollisionSkin {
        &mut self.skin
    }

    //--- Owner ------------------------------------------------------------

    pub fn owner(&self) -> Option<ActorRef> {
        self.owner.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_owner(&mut self, owner: Weak<RefCell<dyn Actor>>) {
        self.owner = Some(owner);
    }

    //--- Rapier Bridge ----------------------------------------------------

    pub(crate) fn handle(&self) -> Option<RigidBodyHandle> {
        self.handle
    }

    pub(crate) fn set_handle(&mut self, handle: Option<RigidBodyHandle>) {
        self.handle = handle;
        self.pending = Pending::default();
    }

    pub(crate) fn body_type(&self) -> RigidBodyType {
        if self.immovable {
            RigidBodyType::Fixed
        } else {
            RigidBodyType::Dynamic
        }
    }

    /// Accumulates the character steering force. Gravity is left to the
    /// pipeline.
    pub(crate) fn add_external_forces(&mut self, dt: f32) {
        let up = self.orientation * Vec3::Y;
        let mass = self.mass;
        let grounded = self.skin.contacts.iter().any(|c| c.normal.dot(up) > CharacterState::GROUND_NORMAL_THRESHOLD);

        let BodyKind::Character(state) = &mut self.kind else {
            return;
        };

        let mut velocity = self.velocity;
        let jumped = state.is_jumping && grounded;
        if jumped {
            velocity.y = state.jump_height;
        }

        let running = state.desired_velocity.length_squared() > f32::EPSILON;
        let mut delta = state.desired_velocity - velocity;
        if running {
            delta = delta.normalize_or_zero();
        }
        delta.y = -2.0;
        delta *= if running { state.acceleration_rate } else { state.deceleration_rate };

        state.is_jumping = false;
        self.force += delta * mass * dt * CharacterState::FORCE_FACTOR;
        if jumped {
            self.set_velocity(velocity);
        }
    }

    /// Writes pending edits and this step's forces into `rb`.
    pub(crate) fn push(&mut self, rb: &mut RigidBody) {
        if self.pending.settings {
            rb.set_body_type(self.body_type(), true);
            rb.lock_rotations(self.rotation_locked, true);
            rb.set_enabled(self.enabled);
        }
        if self.pending.pose {
            rb.set_position(to_isometry(self.position, self.orientation), true);
        }
        if self.pending.velocity {
            rb.set_linvel(to_vector(self.velocity), true);
            rb.set_angvel(to_vector(self.angular_velocity), true);
        }

        rb.reset_forces(false);
        rb.reset_torques(false);
        if self.force != Vec3::ZERO || self.torque != Vec3::ZERO {
            rb.add_force(to_vector(self.force), true);
            rb.add_torque(to_vector(self.torque), true);
        }

        self.clear_forces();
        self.pending = Pending::default();
    }

    /// Copies the simulated pose and velocities back from `rb`.
    pub(crate) fn pull(&mut self, rb: &RigidBody) {
        let pose = rb.position();
        self.position = from_vector(&pose.translation.vector);
        self.orientation = from_rotation(&pose.rotation);
        self.velocity = from_vector(rb.linvel());
        self.angular_velocity = from_vector(rb.angvel());
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("mass", &self.mass)
            .field("immovable", &self.immovable)
            .field("enabled", &self.enabled)
            .field("kind", &self.kind)
            .field("skin", &self.skin)
            .field("handle", &self.handle)
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
