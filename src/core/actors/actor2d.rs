//=========================================================================
// 2D Actors
//=========================================================================
//
// Screen-space UI elements: textures, text and the mouse reticule.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::{Actor, ActorCore, ActorRef, ActorType, CloneBehaviours, Color, StatusType};
use crate::core::context::FrameContext;
use crate::core::math::{Rect, Transform2D};

//=== UiContent ===========================================================

/// What a 2D actor draws.
#[derive(Debug, Clone, PartialEq)]
pub enum UiContent {
    /// A (sub-rectangle of a) texture.
    Texture { texture_id: String, source: Option<Rect> },

    Text { text: String, font_id: String },

    /// Reticule following the cursor with an optional caption
    /// (updated from picking results).
    Mouse { texture_id: String, source: Option<Rect>, caption: Option<String>, font_id: String },
}

//=== DrawnActor2D ========================================================

#[derive(Debug)]
pub struct DrawnActor2D {
    core: ActorCore,
    transform: Transform2D,
    color: Color,
    layer_depth: f32,
    content: UiContent,
}

impl DrawnActor2D {
    pub fn new(
        id: &str,
        actor_type: ActorType,
        status: StatusType,
        transform: Transform2D,
        color: Color,
        layer_depth: f32,
        content: UiContent,
    ) -> Self {
        let mut actor = Self {
            core: ActorCore::new(id, actor_type, status),
            transform,
            color,
            layer_depth: 0.0,
            content,
        };
        actor.set_layer_depth(layer_depth);
        actor
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Draw order key; 0 is front-most.
    pub fn layer_depth(&self) -> f32 {
        self.layer_depth
    }

    /// Values outside [0, 1] fall back to 0.
    pub fn set_layer_depth(&mut self, layer_depth: f32) {
        self.layer_depth = if (0.0..=1.0).contains(&layer_depth) { layer_depth } else { 0.0 };
    }

    pub fn content(&self) -> &UiContent {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut UiContent {
        &mut self.content
    }

    /// Replaces the text of a text element or the caption of a reticule.
    pub fn set_text(&mut self, value: &str) {
        match &mut self.content {
            UiContent::Text { text, .. } => *text = value.to_string(),
            UiContent::Mouse { caption, .. } => *caption = Some(value.to_string()),
            UiContent::Texture { .. } => {}
        }
    }
}

impl Actor for DrawnActor2D {
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

    fn transform2d(&self) -> Option<&Transform2D> {
        Some(&self.transform)
    }

    fn transform2d_mut(&mut self) -> Option<&mut Transform2D> {
        Some(&mut self.transform)
    }

    fn on_update(&mut self, ctx: &mut FrameContext) {
        if matches!(self.content, UiContent::Mouse { .. }) {
            self.transform.set_translation(ctx.mouse.position());
        }
    }

    fn clone_actor(&self, behaviours: CloneBehaviours) -> ActorRef {
        Rc::new(RefCell::new(Self {
            core: self.core.clone_with(behaviours),
            transform: self.transform.clone(),
            color: self.color,
            layer_depth: self.layer_depth,
            content: self.content.clone(),
        }))
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, MouseManager};
    use crate::core::testing::FrameHarness;
    use glam::Vec2;

    fn text(layer_depth: f32) -> DrawnActor2D {
        DrawnActor2D::new(
            "score",
            ActorType::UIText,
            StatusType::UPDATE | StatusType::DRAWN,
            Transform2D::from_scale(Vec2::ONE),
            Color::WHITE,
            layer_depth,
            UiContent::Text { text: "0".into(), font_id: "hud".into() },
        )
    }

    #[test]
    fn layer_depth_out_of_range_resets_to_zero() {
        assert_eq!(text(0.25).layer_depth(), 0.25);
        assert_eq!(text(1.5).layer_depth(), 0.0);
        assert_eq!(text(-0.1).layer_depth(), 0.0);
    }

    #[test]
    fn set_text_updates_text_content() {
        let mut actor = text(0.0);
        actor.set_text("42");
        assert!(matches!(actor.content(), UiContent::Text { text, .. } if text == "42"));
    }

    #[test]
    fn reticule_follows_cursor() {
        let mut harness = FrameHarness::new();
        harness.mouse = MouseManager::new();
        harness.mouse.process_events(&[InputEvent::MouseMoved { x: 120.0, y: 80.0 }]);

        let mut reticule = DrawnActor2D::new(
            "mouse",
            ActorType::UIMouse,
            StatusType::UPDATE | StatusType::DRAWN,
            Transform2D::from_scale(Vec2::ONE),
            Color::WHITE,
            0.0,
            UiContent::Mouse { texture_id: "reticule".into(), source: None, caption: None, font_id: "hud".into() },
        );

        let actor: &mut dyn Actor = &mut reticule;
        actor.update(&mut harness.context());
        assert_eq!(reticule.transform2d().map(Transform2D::translation), Some(Vec2::new(120.0, 80.0)));
    }
}
