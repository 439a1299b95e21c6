//=========================================================================
// Controllers
//=========================================================================
//
// Reusable behaviours attached to actors.
//
// Architecture:
//   ActorCore.controllers ─┐
//                          ├→ Controller::update(ctx, actor)   (in order)
//   dyn Actor::update ─────┘
//
// A controller asks the actor for the capability it needs (transform,
// effect, body) and does nothing when the actor lacks it.
//
//=========================================================================

//=== Module Declarations =================================================

mod collidable_first_person;
mod curve;
mod drive;
mod first_person;
mod pan;
mod physics;
mod rail;
mod third_person;
mod ui;
mod wave;

//=== Public API ==========================================================

pub use collidable_first_person::{CollidableFirstPersonController, PlayerSettings};
pub use curve::Curve3DController;
pub use drive::DriveController;
pub use first_person::{FirstPersonController, FlightCameraController};
pub use pan::{PanController, TrigonometricParameters};
pub use physics::{CoordinateSystem, PhysicsController};
pub use rail::{RailController, RailParameters};
pub use third_person::ThirdPersonController;
pub use ui::{ColorLerpController, MouseOverController, Progress, ProgressController, RotationController, ScaleLerpController};
pub use wave::{AlphaCycleController, SinTranslationController};

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use crate::core::actors::Actor;
use crate::core::context::FrameContext;
use crate::core::input::{KeyCode, KeyboardManager};
use crate::core::math::Transform3D;

//=== Controller ==========================================================

/// A behaviour run once per frame on the actor it is attached to.
pub trait Controller {
    fn id(&self) -> &str;

    fn controller_type(&self) -> ControllerType;

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor);

    /// Independent copy for actor cloning; `None` if the controller holds
    /// state that cannot be shared (physics bodies, one-shot timers).
    fn clone_box(&self) -> Option<Box<dyn Controller>> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerType {
    FlightCamera,
    ThirdPerson,
    FirstPerson,
    Pan,
    Rail,
    Curve,
    AlphaCycle,
    SinTranslation,
    FirstPersonCollidable,
    RotationOverTime,
    ColorLerpOverTime,
    MouseOver,
    Progress,
    ScaleLerpOverTime,
    Drive,
    Physics,
}

//=== LerpSpeed ===========================================================

/// Interpolation factors for smoothed camera motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LerpSpeed {
    VerySlow,
    Slow,
    Medium,
    Fast,
    VeryFast,
}

impl LerpSpeed {
    pub fn value(self) -> f32 {
        match self {
            Self::VerySlow => 0.05,
            Self::Slow => 0.1,
            Self::Medium => 0.2,
            Self::Fast => 0.4,
            Self::VeryFast => 0.8,
        }
    }
}

//=== MoveKeys ============================================================

/// Key bindings for user-driven movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: KeyCode,
    pub back: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
    pub crouch: KeyCode,
}

impl MoveKeys {
    pub const WASD: Self = Self {
        forward: KeyCode::KeyW,
        back: KeyCode::KeyS,
        left: KeyCode::KeyA,
        right: KeyCode::KeyD,
        jump: KeyCode::Space,
        crouch: KeyCode::KeyC,
    };

    pub const ARROWS: Self = Self {
        forward: KeyCode::ArrowUp,
        back: KeyCode::ArrowDown,
        left: KeyCode::ArrowLeft,
        right: KeyCode::ArrowRight,
        jump: KeyCode::Space,
        crouch: KeyCode::ControlLeft,
    };
}

impl Default for MoveKeys {
    fn default() -> Self {
        Self::WASD
    }
}

//=== Shared Input Helpers ================================================

/// Forward/back along `look`, strafe along `right`. Forward wins over
/// back and left over right when both are held.
pub(crate) fn move_vector(
    keyboard: &KeyboardManager,
    keys: &MoveKeys,
    look: Vec3,
    right: Vec3,
    move_speed: f32,
    strafe_speed: f32,
) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if keyboard.is_key_down(keys.forward) {
        direction = look * move_speed;
    } else if keyboard.is_key_down(keys.back) {
        direction = -look * move_speed;
    }

    if keyboard.is_key_down(keys.left) {
        direction -= right * strafe_speed;
    } else if keyboard.is_key_down(keys.right) {
        direction += right * strafe_speed;
    }
    direction
}

/// Turns the cursor's offset from the screen centre into a yaw/pitch
/// offset from the transform's original orientation.
pub(crate) fn mouse_look(ctx: &FrameContext, transform: &mut Transform3D, rotation_speed: f32) {
    let delta = ctx.mouse.delta_from_centre(ctx.screen_centre) * rotation_speed * ctx.elapsed_ms() as f32;
    if delta.length_squared() != 0.0 {
        transform.rotate_by(Vec3::new(-delta.x, -delta.y, 0.0));
    }
}

//=========================================================================
// Tests
//=========================================================================
