//=========================================================================
// 3D Actors
//=========================================================================
//
// Helpers (transform only) and drawn models (transform + effect + model).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::{Actor, ActorCore, ActorRef, ActorType, CloneBehaviours, StatusType};
use crate::core::math::{round_f32, Transform3D};

//=== Color ===============================================================

/// Linear RGBA color, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Component-wise blend; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self::rgba(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b), mix(self.a, other.a))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

//=== EffectParameters ====================================================

/// Shading inputs of a drawn 3D actor.
///
/// The effect and texture are content keys resolved by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectParameters {
    effect_id: String,
    texture_id: Option<String>,
    diffuse_color: Color,
    alpha: f32,
}

impl EffectParameters {
    pub fn new(effect_id: &str, texture_id: Option<&str>, diffuse_color: Color, alpha: f32) -> Self {
        let mut params = Self {
            effect_id: effect_id.to_string(),
            texture_id: texture_id.map(str::to_string),
            diffuse_color,
            alpha: 1.0,
        };
        params.set_alpha(alpha);
        params
    }

    /// Opaque, white, untextured.
    pub fn basic(effect_id: &str) -> Self {
        Self::new(effect_id, None, Color::WHITE, 1.0)
    }

    pub fn effect_id(&self) -> &str {
        &self.effect_id
    }

    pub fn texture_id(&self) -> Option<&str> {
        self.texture_id.as_deref()
    }

    pub fn set_texture_id(&mut self, texture_id: Option<&str>) {
        self.texture_id = texture_id.map(str::to_string);
    }

    pub fn diffuse_color(&self) -> Color {
        self.diffuse_color
    }

    pub fn set_diffuse_color(&mut self, color: Color) {
        self.diffuse_color = color;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Clamped to [0, 1] and kept to two decimals.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = round_f32(alpha.clamp(0.0, 1.0), 2);
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha < 1.0
    }
}

//=== Actor3D =============================================================

/// An invisible actor with a transform (camera targets, waypoints).
#[derive(Debug)]
pub struct Actor3D {
    core: ActorCore,
    transform: Transform3D,
}

impl Actor3D {
    pub fn new(id: &str, actor_type: ActorType, status: StatusType, transform: Transform3D) -> Self {
        Self { core: ActorCore::new(id, actor_type, status), transform }
    }
}

impl Actor for Actor3D {
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

    fn transform3d_mut(&mut self) -> Option<&mut Transform3D> {
        Some(&mut self.transform)
    }

    fn clone_actor(&self, behaviours: CloneBehaviours) -> ActorRef {
        Rc::new(RefCell::new(Self {
            core: self.core.clone_with(behaviours),
            transform: self.transform.clone(),
        }))
    }
}

//=== DrawnActor3D ========================================================

/// A model or primitive drawn with an effect.
#[derive(Debug)]
pub struct DrawnActor3D {
    core: ActorCore,
    transform: Transform3D,
    effect: EffectParameters,
    model: String,
}

impl DrawnActor3D {
    pub fn new(
        id: &str,
        actor_type: ActorType,
        status: StatusType,
        transform: Transform3D,
        effect: EffectParameters,
        model: &str,
    ) -> Self {
        Self {
            core: ActorCore::new(id, actor_type, status),
            transform,
            effect,
            model: model.to_string(),
        }
    }
}

impl Actor for DrawnActor3D {
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

    fn transform3d_mut(&mut self) -> Option<&mut Transform3D> {
        Some(&mut self.transform)
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

    fn clone_actor(&self, behaviours: CloneBehaviours) -> ActorRef {
        Rc::new(RefCell::new(Self {
            core: self.core.clone_with(behaviours),
            transform: self.transform.clone(),
            effect: self.effect.clone(),
            model: self.model.clone(),
        }))
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_lerp_clamps_factor() {
        let mid = Color::BLACK.lerp(Color::rgba(1.0, 0.5, 0.0, 0.0), 0.5);
        assert_eq!(mid, Color::rgba(0.5, 0.25, 0.0, 0.5));
        assert_eq!(Color::BLACK.lerp(Color::RED, 2.0), Color::RED);
    }

    #[test]
    fn alpha_clamped_and_rounded() {
        let mut effect = EffectParameters::basic("lit");
        effect.set_alpha(1.7);
        assert_eq!(effect.alpha(), 1.0);
        effect.set_alpha(-0.2);
        assert_eq!(effect.alpha(), 0.0);
        effect.set_alpha(0.456);
        assert_eq!(effect.alpha(), 0.46);
        assert!(effect.is_transparent());
    }

    #[test]
    fn default_diffuse_is_white() {
        assert_eq!(EffectParameters::basic("unlit").diffuse_color(), Color::WHITE);
    }

    #[test]
    fn drawn_clone_copies_effect_and_model() {
        let mut effect = EffectParameters::basic("lit");
        effect.set_alpha(0.5);
        let actor = DrawnActor3D::new("crate", ActorType::Decorator, StatusType::DRAWN, Transform3D::identity(), effect, "box");

        let clone = actor.clone_actor(CloneBehaviours::Skip);
        let clone = clone.borrow();
        assert_eq!(clone.model(), Some("box"));
        assert_eq!(clone.effect().map(EffectParameters::alpha), Some(0.5));
        assert_eq!(clone.core().status(), StatusType::DRAWN);
    }
}
