//=========================================================================
// Physics
//=========================================================================
//
// Bridge between actors and the rapier3d rigid-body pipeline.
//
// Architecture:
//   CollidableObject / CharacterObject (actors)
//     └─ BodyRef ──shared── PhysicsWorld (rapier sets, pipeline, ray queries)
//          └─ CollisionSkin (primitives → colliders, offset, callback, contacts)
//
//=========================================================================

//=== Module Declarations =================================================

mod body;
mod character;
mod collidable;
mod conversions;
mod primitive;
mod world;

//=== Public API ==========================================================

pub use body::{Body, BodyKind, BodyRef, CharacterState, CollisionCallback, CollisionEvent, CollisionSkin, Contact};
pub use character::{CharacterObject, PlayerObject};
pub use collidable::CollidableObject;
pub use primitive::{MaterialProperties, Primitive};
pub use world::{PhysicsWorld, SegmentHit};
