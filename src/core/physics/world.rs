//=========================================================================
// Physics World
//=========================================================================
//
// Owns the rapier pipeline and keeps it in step with the actors' bodies.
//
// Architecture:
//   integrate(dt, events)
//     1. character steering forces, pending body edits → rapier
//     2. PhysicsPipeline::step (gravity, contacts, solver, query update)
//     3. new contacts → skin callbacks → vetoed pairs pass through
//     4. poses, velocities and contacts → bodies
//
// Pose convention: a body's position is its centre of mass; each
// primitive's collider sits at `centre + skin offset` in the body frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crossbeam_channel::{Receiver, Sender};
use glam::Vec3;
use log::{debug, trace, warn};
use rapier3d::prelude::{
    ActiveEvents, ActiveHooks, BroadPhaseMultiSap, CCDSolver, CoefficientCombineRule, Collider, ColliderBuilder,
    ColliderHandle, ColliderSet, CollisionEvent as PairEvent, ContactPair, EventHandler, ImpulseJointSet,
    IntegrationParameters, IslandManager, LockedAxes, MultibodyJointSet, NarrowPhase, PairFilterContext,
    PhysicsHooks, PhysicsPipeline, QueryFilter, QueryPipeline, Ray, Real, RigidBodyBuilder, RigidBodyHandle,
    RigidBodySet, SolverFlags,
};

//=== Internal Dependencies ===============================================

use super::body::{Body, BodyRef, CollisionEvent, Contact};
use super::conversions::{from_point, from_vector, to_isometry, to_point, to_vector};
use crate::core::events::EventQueue;

//=== SegmentHit ==========================================================

/// Nearest body crossed by a segment query.
#[derive(Debug, Clone)]
pub struct SegmentHit {
    pub body: BodyRef,
    /// Position along the segment in [0, 1].
    pub fraction: f32,
    pub position: Vec3,
    /// Surface normal facing the segment start.
    pub normal: Vec3,
}

//=== Pipeline Plumbing ===================================================

/// Pairs whose contact was vetoed by a callback. Kept until the broad
/// phase drops the pair.
#[derive(Default)]
struct PassThrough {
    pairs: HashSet<(ColliderHandle, ColliderHandle)>,
}

impl PassThrough {
    fn insert(&mut self, a: ColliderHandle, b: ColliderHandle) {
        self.pairs.insert((a, b));
        self.pairs.insert((b, a));
    }

    fn contains(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.pairs.contains(&(a, b))
    }
}

impl PhysicsHooks for PassThrough {
    fn filter_contact_pair(&self, context: &PairFilterContext) -> Option<SolverFlags> {
        if self.contains(context.collider1, context.collider2) {
            None
        } else {
            Some(SolverFlags::COMPUTE_IMPULSES)
        }
    }
}

/// Forwards contact starts out of the pipeline.
struct ContactStarts {
    sender: Sender<(ColliderHandle, ColliderHandle)>,
}

impl EventHandler for ContactStarts {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: PairEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let PairEvent::Started(a, b, _) = event {
            if self.sender.send((a, b)).is_err() {
                warn!(target: "physics", "Contact event dropped: receiver gone");
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

//=== PhysicsWorld ========================================================

pub struct PhysicsWorld {
    gravity: Vec3,
    bodies: Vec<BodyRef>,

    rigid_bodies: RigidBodySet,
    colliders: ColliderSet,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseMultiSap,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    pass_through: PassThrough,
    starts: ContactStarts,
    started: Receiver<(ColliderHandle, ColliderHandle)>,
}

impl PhysicsWorld {
    //--- Construction -----------------------------------------------------

    pub fn new(gravity: Vec3) -> Self {
        let (sender, started) = crossbeam_channel::unbounded();
        Self {
            gravity,
            bodies: Vec::new(),
            rigid_bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseMultiSap::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            pass_through: PassThrough::default(),
            starts: ContactStarts { sender },
            started,
        }
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    //--- Body Registry ----------------------------------------------------

    /// Wraps `body` in a shared handle and registers it.
    pub fn add_body(&mut self, body: Body) -> BodyRef {
        let body = Rc::new(RefCell::new(body));
        self.add(&body);
        body
    }

    /// Registers an existing handle, building its rigid body and one
    /// collider per primitive. Returns `false` if already present.
    pub fn add(&mut self, body: &BodyRef) -> bool {
        if self.contains(body) {
            return false;
        }

        let handle = self.insert_rigid_body(&body.borrow());
        body.borrow_mut().set_handle(Some(handle));
        self.query_pipeline.update(&self.colliders);

        self.bodies.push(Rc::clone(body));
        debug!(target: "physics", "Body added ({} total)", self.bodies.len());
        true
    }

    /// Unregisters `body` and drops its rigid body and colliders.
    /// Returns `false` if it was not registered.
    pub fn remove(&mut self, body: &BodyRef) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| !Rc::ptr_eq(b, body));
        if self.bodies.len() == before {
            return false;
        }

        let handle = body.borrow().handle();
        if let Some(handle) = handle {
            let removed = self.rigid_bodies.remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
            if let Some(rb) = removed {
                let gone: HashSet<ColliderHandle> = rb.colliders().iter().copied().collect();
                self.pass_through.pairs.retain(|(a, b)| !gone.contains(a) && !gone.contains(b));
            }
            self.query_pipeline.update(&self.colliders);
        }
        body.borrow_mut().set_handle(None);

        debug!(target: "physics", "Body removed ({} remaining)", self.bodies.len());
        true
    }

    pub fn contains(&self, body: &BodyRef) -> bool {
        self.bodies.iter().any(|b| Rc::ptr_eq(b, body))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &BodyRef> {
        self.bodies.iter()
    }

    //--- Simulation -------------------------------------------------------

    /// Advances the simulation by `dt` seconds.
    ///
    /// Collision callbacks publish through `events`.
    pub fn integrate(&mut self, dt: f32, events: &mut EventQueue) {
        if dt <= 0.0 {
            return;
        }

        for body in &self.bodies {
            let mut body = body.borrow_mut();
            if body.is_dynamic() {
                body.add_external_forces(dt);
            }
            let rb = body.handle().and_then(|h| self.rigid_bodies.get_mut(h));
            match rb {
                Some(rb) => body.push(rb),
                None => body.clear_forces(),
            }
        }

        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &to_vector(self.gravity),
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &self.pass_through,
            &self.starts,
        );

        let started: Vec<_> = self.started.try_iter().collect();
        for &(a, b) in &started {
            if !self.run_callbacks(a, b, events) {
                self.pass_through.insert(a, b);
                debug!(target: "physics", "Contact vetoed; pair passes through");
            }
        }

        let narrow_phase = &self.narrow_phase;
        self.pass_through.pairs.retain(|&(a, b)| narrow_phase.contact_pair(a, b).is_some());

        let mut touching = 0;
        for body in &self.bodies {
            let mut body = body.borrow_mut();
            let Some(rb) = body.handle().and_then(|h| self.rigid_bodies.get(h)) else {
                continue;
            };
            body.pull(rb);

            let contacts = body.skin_mut().contacts_mut();
            contacts.clear();
            for &collider in rb.colliders() {
                contacts.extend(contacts_of(narrow_phase, &self.pass_through, collider));
            }
            touching += contacts.len();
        }

        trace!(target: "physics", "Step {:.4}s: {} new contacts, {} touching", dt, started.len(), touching);
    }

    //--- Queries ----------------------------------------------------------

    /// Finds the nearest enabled body crossed by `start → start + delta`
    /// whose body satisfies `filter`.
    pub fn segment_intersect(&self, start: Vec3, delta: Vec3, filter: impl Fn(&Body) -> bool) -> Option<SegmentHit> {
        let accept = |_: ColliderHandle, collider: &Collider| {
            self.body_of_collider(collider)
                .and_then(|body| body.try_borrow().ok().map(|b| b.is_enabled() && filter(&b)))
                .unwrap_or(false)
        };

        let ray = Ray::new(to_point(start), to_vector(delta));
        let (collider, hit) = self.query_pipeline.cast_ray_and_get_normal(
            &self.rigid_bodies,
            &self.colliders,
            &ray,
            1.0,
            true,
            QueryFilter::default().predicate(&accept),
        )?;

        let body = self.colliders.get(collider).and_then(|c| self.body_of_collider(c))?;
        let fraction = hit.time_of_impact;
        Some(SegmentHit {
            body: Rc::clone(body),
            fraction,
            position: start + delta * fraction,
            normal: from_vector(&hit.normal),
        })
    }

    //--- Internal Helpers -------------------------------------------------

    fn insert_rigid_body(&mut self, body: &Body) -> RigidBodyHandle {
        let mut builder = RigidBodyBuilder::new(body.body_type())
            .position(to_isometry(body.position(), body.orientation()))
            .linvel(to_vector(body.velocity()))
            .angvel(to_vector(body.angular_velocity()))
            .can_sleep(body.character().is_none())
            .enabled(body.is_enabled());
        if body.is_rotation_locked() {
            builder = builder.locked_axes(LockedAxes::ROTATION_LOCKED);
        }
        let handle = self.rigid_bodies.insert(builder.build());

        let offset = body.skin().offset();
        for (primitive, material) in body.skin().primitives() {
            let density = if primitive.has_volume() { body.density() } else { 0.0 };
            let collider = ColliderBuilder::new(primitive.shape())
                .position(primitive.local_pose(offset))
                .density(density)
                .restitution(material.elasticity)
                .restitution_combine_rule(CoefficientCombineRule::Multiply)
                .friction(material.dynamic_roughness)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .active_hooks(ActiveHooks::FILTER_CONTACT_PAIRS)
                .build();
            self.colliders.insert_with_parent(collider, handle, &mut self.rigid_bodies);
        }

        handle
    }

    fn body_of_collider(&self, collider: &Collider) -> Option<&BodyRef> {
        let parent = collider.parent()?;
        self.bodies.iter().find(|b| b.try_borrow().is_ok_and(|b| b.handle() == Some(parent)))
    }

    fn body_of_handle(&self, collider: ColliderHandle) -> Option<&BodyRef> {
        self.colliders.get(collider).and_then(|c| self.body_of_collider(c))
    }

    /// Runs both skins' callbacks for a new contact; true if it stays solid.
    fn run_callbacks(&self, a: ColliderHandle, b: ColliderHandle, events: &mut EventQueue) -> bool {
        let (Some(body_a), Some(body_b)) = (self.body_of_handle(a), self.body_of_handle(b)) else {
            return true;
        };
        if !body_a.borrow().skin().has_callback() && !body_b.borrow().skin().has_callback() {
            return true;
        }

        // Normal from a toward b, first solver contact as the point.
        let (normal, point) = self
            .narrow_phase
            .contact_pair(a, b)
            .and_then(|pair| {
                let flip = pair.collider1 != a;
                pair.manifolds.iter().find_map(|m| {
                    let contact = m.data.solver_contacts.first()?;
                    let n = from_vector(&m.data.normal);
                    Some((if flip { -n } else { n }, from_point(&contact.point)))
                })
            })
            .unwrap_or((Vec3::ZERO, Vec3::ZERO));

        let (mut callback_a, owner_a) = {
            let mut body = body_a.borrow_mut();
            (body.skin_mut().take_callback(), body.owner())
        };
        let (mut callback_b, owner_b) = {
            let mut body = body_b.borrow_mut();
            (body.skin_mut().take_callback(), body.owner())
        };

        let mut solid = true;
        if let Some(callback) = callback_a.as_mut() {
            let event = CollisionEvent { collider: owner_a.clone(), collidee: owner_b.clone(), normal: -normal, point };
            solid &= callback(&event, events);
        }
        if let Some(callback) = callback_b.as_mut() {
            let event = CollisionEvent { collider: owner_b, collidee: owner_a, normal, point };
            solid &= callback(&event, events);
        }

        body_a.borrow_mut().skin_mut().restore_callback(callback_a);
        body_b.borrow_mut().skin_mut().restore_callback(callback_b);
        solid
    }
}

/// Solver contacts on `collider`, normals pointing toward it.
fn contacts_of(narrow_phase: &NarrowPhase, pass_through: &PassThrough, collider: ColliderHandle) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for pair in narrow_phase.contact_pairs_with(collider) {
        if pass_through.contains(pair.collider1, pair.collider2) {
            continue;
        }
        let sign = if pair.collider1 == collider { -1.0 } else { 1.0 };
        for manifold in &pair.manifolds {
            let normal = from_vector(&manifold.data.normal) * sign;
            contacts.extend(manifold.data.solver_contacts.iter().take(1).map(|c| Contact {
                normal,
                point: from_point(&c.point),
                depth: (-c.dist).max(0.0),
            }));
        }
    }
    contacts
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -10.0, 0.0))
    }
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("gravity", &self.gravity)
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .field("pass_through", &(self.pass_through.pairs.len() / 2))
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::{MaterialProperties, Primitive};
    use approx::assert_relative_eq;
    use std::cell::Cell;

    fn dynamic(primitive: Primitive, position: Vec3, mass: f32) -> Body {
        let mut body = Body::new();
        body.skin_mut().add_primitive(primitive, MaterialProperties::NOT_BOUNCY_NORMAL);
        body.distribute_mass(mass);
        body.move_to(position, glam::Quat::IDENTITY);
        body.enable();
        body
    }

    fn ground() -> Body {
        let mut body = Body::new();
        body.skin_mut().add_primitive(Primitive::ground(), MaterialProperties::NOT_BOUNCY_NORMAL);
        body.set_immovable(true);
        body.enable();
        body
    }

    //--- Registry ---------------------------------------------------------

    #[test]
    fn add_and_remove_bodies() {
        let mut world = PhysicsWorld::default();
        let body = world.add_body(dynamic(Primitive::sphere(Vec3::ZERO, 0.5), Vec3::ZERO, 1.0));
        assert!(!world.add(&body), "Duplicate registration rejected");
        assert_eq!(world.len(), 1);
        assert!(body.borrow().handle().is_some());

        assert!(world.remove(&body));
        assert!(!world.remove(&body));
        assert!(world.is_empty());
        assert!(body.borrow().handle().is_none());
    }

    //--- Integration ------------------------------------------------------

    #[test]
    fn free_body_falls() {
        let mut world = PhysicsWorld::default();
        let mut events = EventQueue::new();
        let body = world.add_body(dynamic(Primitive::sphere(Vec3::ZERO, 0.5), Vec3::new(0.0, 10.0, 0.0), 1.0));

        world.integrate(0.1, &mut events);

        assert_relative_eq!(body.borrow().velocity().y, -1.0, epsilon = 1e-3);
        assert!(body.borrow().position().y < 10.0);
    }

    #[test]
    fn disabled_body_does_not_move() {
        let mut world = PhysicsWorld::default();
        let mut events = EventQueue::new();
        let body = world.add_body(dynamic(Primitive::sphere(Vec3::ZERO, 0.5), Vec3::new(0.0, 10.0, 0.0), 1.0));
        body.borrow_mut().disable();

        world.integrate(0.1, &mut events);
        assert_eq!(body.borrow().position(), Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn moved_body_is_pushed_before_the_step() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let mut events = EventQueue::new();
        let body = world.add_body(dynamic(Primitive::sphere(Vec3::ZERO, 0.5), Vec3::ZERO, 1.0));

        body.borrow_mut().move_to(Vec3::new(3.0, 0.0, 0.0), glam::Quat::IDENTITY);
        body.borrow_mut().set_velocity(Vec3::new(0.0, 0.0, 2.0));
        world.integrate(0.5, &mut events);

        let b = body.borrow();
        assert!(b.position().abs_diff_eq(Vec3::new(3.0, 0.0, 1.0), 1e-3), "{:?}", b.position());
    }

    #[test]
    fn box_comes_to_rest_on_ground() {
        let mut world = PhysicsWorld::default();
        let mut events = EventQueue::new();
        world.add_body(ground());
        let body = world.add_body(dynamic(Primitive::cuboid(Vec3::ZERO, Vec3::splat(2.0)), Vec3::new(0.0, 3.0, 0.0), 8.0));

        for _ in 0..240 {
            world.integrate(1.0 / 60.0, &mut events);
        }

        let b = body.borrow();
        assert!((b.position().y - 1.0).abs() < 0.1, "Box should rest on the plane, got {:?}", b.position());
        assert!(b.velocity().length() < 0.5);
        assert!(!b.skin().contacts().is_empty());
        assert!(b.skin().contacts()[0].normal.dot(Vec3::Y) > 0.7, "Normal points toward the box");
    }

    #[test]
    fn callback_veto_lets_body_fall_through() {
        let mut world = PhysicsWorld::default();
        let mut events = EventQueue::new();
        world.add_body(ground());

        let mut falling = dynamic(Primitive::sphere(Vec3::ZERO, 0.5), Vec3::new(0.0, 0.4, 0.0), 1.0);
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        falling.skin_mut().set_callback(Box::new(move |event: &CollisionEvent, _: &mut EventQueue| {
            seen.set(seen.get() + 1);
            assert!(event.normal.dot(Vec3::Y) > 0.9, "{:?}", event.normal);
            false
        }));
        let body = world.add_body(falling);

        for _ in 0..30 {
            world.integrate(1.0 / 60.0, &mut events);
        }

        let b = body.borrow();
        assert_eq!(calls.get(), 1, "Called once when the contact starts");
        assert!(b.skin().contacts().is_empty(), "Vetoed pair has no contacts");
        assert!(b.position().y < 0.0, "Fell through the ground: {:?}", b.position());
        assert!(b.skin().has_callback(), "Callback restored after the step");
    }

    #[test]
    fn accepting_callback_keeps_body_on_ground() {
        let mut world = PhysicsWorld::default();
        let mut events = EventQueue::new();
        world.add_body(ground());

        let mut resting = dynamic(Primitive::sphere(Vec3::ZERO, 0.5), Vec3::new(0.0, 0.6, 0.0), 1.0);
        resting.skin_mut().set_callback(Box::new(|_: &CollisionEvent, _: &mut EventQueue| true));
        let body = world.add_body(resting);

        for _ in 0..60 {
            world.integrate(1.0 / 60.0, &mut events);
        }
        assert!(body.borrow().position().y > 0.3, "{:?}", body.borrow().position());
    }

    #[test]
    fn spheres_push_apart() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let mut events = EventQueue::new();
        let left = world.add_body(dynamic(Primitive::sphere(Vec3::ZERO, 1.0), Vec3::new(-0.9, 0.0, 0.0), 1.0));
        let right = world.add_body(dynamic(Primitive::sphere(Vec3::ZERO, 1.0), Vec3::new(0.9, 0.0, 0.0), 1.0));
        left.borrow_mut().set_velocity(Vec3::X);
        right.borrow_mut().set_velocity(-Vec3::X);

        for _ in 0..10 {
            world.integrate(1.0 / 60.0, &mut events);
        }

        assert!(left.borrow().velocity().x <= 0.0);
        assert!(right.borrow().velocity().x >= 0.0);
    }

    //--- Segment Queries --------------------------------------------------

    #[test]
    fn segment_hits_nearest_body() {
        let mut world = PhysicsWorld::default();
        let far = world.add_body(dynamic(Primitive::cuboid(Vec3::ZERO, Vec3::splat(2.0)), Vec3::new(0.0, 0.0, -20.0), 1.0));
        let near = world.add_body(dynamic(Primitive::sphere(Vec3::ZERO, 1.0), Vec3::new(0.0, 0.0, -10.0), 1.0));

        let hit = world.segment_intersect(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0), |_| true).expect("hit");
        assert!(Rc::ptr_eq(&hit.body, &near));
        assert_relative_eq!(hit.position.z, -9.0, epsilon = 1e-3);
        assert_relative_eq!(hit.fraction, 0.09, epsilon = 1e-4);
        assert!(hit.normal.abs_diff_eq(Vec3::Z, 1e-4));

        let filtered = world
            .segment_intersect(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0), |b| b.skin().primitive(0).map_or(false, |p| matches!(p, Primitive::Box { .. })))
            .expect("hit");
        assert!(Rc::ptr_eq(&filtered.body, &far));
        assert_relative_eq!(filtered.position.z, -19.0, epsilon = 1e-3);
    }

    #[test]
    fn segment_misses_beyond_end() {
        let mut world = PhysicsWorld::default();
        world.add_body(dynamic(Primitive::sphere(Vec3::ZERO, 1.0), Vec3::new(0.0, 0.0, -50.0), 1.0));
        assert!(world.segment_intersect(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0), |_| true).is_none());
    }

    #[test]
    fn segment_hits_capsule_side() {
        let mut world = PhysicsWorld::default();
        world.add_body(dynamic(Primitive::capsule(Vec3::ZERO, 2.0, 0.5), Vec3::new(0.0, 1.0, 0.0), 1.0));

        let hit = world.segment_intersect(Vec3::new(-5.0, 1.0, 0.0), Vec3::new(10.0, 0.0, 0.0), |_| true).expect("hit");
        assert_relative_eq!(hit.fraction, 0.45, epsilon = 1e-4);
        assert!(hit.normal.abs_diff_eq(-Vec3::X, 1e-4));
    }

    #[test]
    fn removed_body_is_not_hit() {
        let mut world = PhysicsWorld::default();
        let body = world.add_body(dynamic(Primitive::sphere(Vec3::ZERO, 1.0), Vec3::new(0.0, 0.0, -5.0), 1.0));
        world.remove(&body);
        assert!(world.segment_intersect(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0), |_| true).is_none());
    }
}
