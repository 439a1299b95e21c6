//=========================================================================
// Wave Controllers
//=========================================================================
//
// Sine-driven fades and bobbing, sharing the pan controller's wave
// parameters. Both are absolute in game time, so dropped frames never
// accumulate drift.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use super::{Controller, ControllerType, TrigonometricParameters};
use crate::core::actors::{Actor, DrawnActor2D};
use crate::core::context::FrameContext;

fn seconds(ctx: &FrameContext) -> f32 {
    (ctx.time.total_ms() / 1000.0) as f32
}

//=== AlphaCycleController ================================================

/// Fades the actor about half opacity: alpha = 0.5 + wave, clamped to
/// [0, 1]. Drives a 2D element's colour alpha or a 3D actor's effect.
#[derive(Debug, Clone)]
pub struct AlphaCycleController {
    id: String,
    parameters: TrigonometricParameters,
}

impl AlphaCycleController {
    pub fn new(id: &str, parameters: TrigonometricParameters) -> Self {
        Self { id: id.trim().to_string(), parameters }
    }
}

impl Controller for AlphaCycleController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::AlphaCycle
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        let alpha = (0.5 + self.parameters.evaluate(seconds(ctx))).clamp(0.0, 1.0);

        if let Some(drawn) = actor.downcast_mut::<DrawnActor2D>() {
            let mut color = drawn.color();
            color.a = alpha;
            drawn.set_color(color);
        } else if let Some(effect) = actor.effect_mut() {
            effect.set_alpha(alpha);
        }
    }

    fn clone_box(&self) -> Option<Box<dyn Controller>> {
        Some(Box::new(self.clone()))
    }
}

//=== SinTranslationController ============================================

/// Bobs the actor along `axis` around the translation it was built with.
#[derive(Debug, Clone)]
pub struct SinTranslationController {
    id: String,
    axis: Vec3,
    parameters: TrigonometricParameters,
}

impl SinTranslationController {
    /// `parameters.max_amplitude` is in world units.
    pub fn new(id: &str, axis: Vec3, parameters: TrigonometricParameters) -> Self {
        Self { id: id.trim().to_string(), axis: axis.normalize_or_zero(), parameters }
    }
}

impl Controller for SinTranslationController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::SinTranslation
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        let offset = self.axis * self.parameters.evaluate(seconds(ctx));
        if let Some(transform) = actor.transform3d_mut() {
            let origin = transform.original_translation();
            transform.set_translation(origin + offset);
        }
    }

    fn clone_box(&self) -> Option<Box<dyn Controller>> {
        Some(Box::new(self.clone()))
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actors::{Actor3D, ActorType, Color, DrawnActor3D, EffectParameters, StatusType, UiContent};
    use crate::core::math::{Transform2D, Transform3D};
    use crate::core::testing::FrameHarness;
    use glam::Vec2;

    #[test]
    fn alpha_cycles_between_opaque_and_clear() {
        let mut harness = FrameHarness::new();
        let mut icon = DrawnActor2D::new(
            "icon",
            ActorType::UITextureObject,
            StatusType::UPDATE | StatusType::DRAWN,
            Transform2D::from_scale(Vec2::ONE),
            Color::RED,
            0.0,
            UiContent::Texture { texture_id: "icon".into(), source: None },
        );

        AlphaCycleController::new("fade", TrigonometricParameters::new(0.5, 0.0, 90.0)).update(&mut harness.context(), &mut icon);
        assert_eq!(icon.color(), Color::rgba(1.0, 0.0, 0.0, 1.0));

        AlphaCycleController::new("fade", TrigonometricParameters::new(0.5, 0.0, 270.0)).update(&mut harness.context(), &mut icon);
        assert!(icon.color().a.abs() < 1e-5);
    }

    #[test]
    fn alpha_cycle_drives_3d_effect() {
        let mut harness = FrameHarness::new();
        let mut crate_box = DrawnActor3D::new(
            "crate",
            ActorType::Decorator,
            StatusType::UPDATE | StatusType::DRAWN,
            Transform3D::identity(),
            EffectParameters::basic("lit"),
            "crate.obj",
        );

        AlphaCycleController::new("fade", TrigonometricParameters::new(0.25, 0.0, 90.0)).update(&mut harness.context(), &mut crate_box);
        assert_eq!(crate_box.effect_mut().map(|e| e.alpha()), Some(0.75));
    }

    #[test]
    fn bobs_around_original_translation() {
        let mut harness = FrameHarness::new();
        let mut actor = Actor3D::new(
            "buoy",
            ActorType::Helper,
            StatusType::UPDATE,
            Transform3D::from_trs(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::ONE),
        );
        let mut bob = SinTranslationController::new("bob", Vec3::Y * 4.0, TrigonometricParameters::new(2.0, 0.0, 90.0));

        bob.update(&mut harness.context(), &mut actor);
        bob.update(&mut harness.context(), &mut actor);

        let translation = actor.transform3d().map(Transform3D::translation).unwrap_or_default();
        assert!(translation.abs_diff_eq(Vec3::new(1.0, 4.0, 3.0), 1e-5), "{translation:?}");
    }
}
