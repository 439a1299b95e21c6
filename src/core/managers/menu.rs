//=========================================================================
// Menu Manager
//=========================================================================
//
// Named menu scenes (main, audio, controls, ...) of screen-space actors.
// One scene is active at a time; it is shown while the game is paused
// and hidden while it plays.
//
// Scenes are stored in a HashMap by id and keep their actors between
// activations. Clicking an actor publishes Menu/OnClick with its id;
// a click whose id names a scene switches to that scene.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cmp::Ordering;
use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::ui::{draw_back_to_front, layer_depth, update_all};
use super::{DrawableComponent, GameComponent, Pausable, Renderer};
use crate::core::actors::{Actor, ActorRef, StatusType};
use crate::core::context::FrameContext;
use crate::core::events::{EventAction, EventCategory, EventData, EventHandler, EventPayload, EventQueue};
use crate::error::{EngineError, Result};

//=== MenuManager =========================================================

pub struct MenuManager {
    pausable: Pausable,
    scenes: HashMap<String, Vec<ActorRef>>,
    active: Option<String>,
}

impl MenuManager {
    //--- Construction -----------------------------------------------------

    /// Starts hidden when `status` is OFF; a Menu/OnPause shows it.
    pub fn new(status: StatusType) -> Self {
        Self { pausable: Pausable::menu(status), scenes: HashMap::new(), active: None }
    }

    //--- Scene Editing ----------------------------------------------------

    /// Adds `actor` to `scene_id`, creating the scene on first use.
    pub fn add(&mut self, scene_id: &str, actor: ActorRef) {
        self.scenes.entry(scene_id.to_string()).or_default().push(actor);
    }

    /// Removes the first actor of `scene_id` matching `predicate`.
    pub fn remove(&mut self, scene_id: &str, predicate: impl Fn(&dyn Actor) -> bool) -> Result<bool> {
        let scene = self.scenes.get_mut(scene_id).ok_or_else(|| EngineError::InvalidScene(scene_id.to_string()))?;
        match scene.iter().position(|a| predicate(&*a.borrow())) {
            Some(index) => {
                scene.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drops every scene; the manager needs a new `set_scene` afterwards.
    pub fn clear(&mut self) {
        self.scenes.clear();
        self.active = None;
    }

    //--- Scene Selection --------------------------------------------------

    pub fn set_scene(&mut self, scene_id: &str) -> Result<()> {
        if !self.scenes.contains_key(scene_id) {
            return Err(EngineError::InvalidScene(scene_id.to_string()));
        }
        debug!(target: "managers", "Menu scene → '{}'", scene_id);
        self.active = Some(scene_id.to_string());
        Ok(())
    }

    pub fn active_scene(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn contains_scene(&self, scene_id: &str) -> bool {
        self.scenes.contains_key(scene_id)
    }

    pub fn scene(&self, scene_id: &str) -> Option<&[ActorRef]> {
        self.scenes.get(scene_id).map(Vec::as_slice)
    }

    //--- Internal Helpers -------------------------------------------------

    fn active_actors(&self) -> Result<&[ActorRef]> {
        self.active
            .as_ref()
            .and_then(|id| self.scenes.get(id))
            .map(Vec::as_slice)
            .ok_or(EngineError::NoActiveScene)
    }

    /// Id of the front-most drawn actor of the active scene under the
    /// cursor: lowest layer depth, and the later one on a tie, as drawn.
    fn clicked_actor(&self, ctx: &FrameContext) -> Option<String> {
        if !ctx.mouse.is_left_clicked_once() {
            return None;
        }
        let cursor = ctx.mouse.position();

        self.active_actors()
            .ok()?
            .iter()
            .rev()
            .filter_map(|a| {
                let a = a.borrow();
                let hit = a.status().contains(StatusType::DRAWN)
                    && a.transform2d().is_some_and(|t| t.bounds().contains(cursor));
                hit.then(|| (layer_depth(&*a), a.id().to_string()))
            })
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
            .map(|(_, id)| id)
    }
}

//--- Trait Implementations -----------------------------------------------

impl GameComponent for MenuManager {
    fn pausable(&self) -> &Pausable {
        &self.pausable
    }

    fn pausable_mut(&mut self) -> &mut Pausable {
        &mut self.pausable
    }

    fn apply_update(&mut self, ctx: &mut FrameContext) -> Result<()> {
        if let Some(id) = self.clicked_actor(ctx) {
            ctx.events.publish(EventData::with_payload(EventCategory::Menu, EventAction::OnClick, EventPayload::Id(id)));
        }
        update_all(self.active_actors()?, ctx);
        Ok(())
    }
}

impl DrawableComponent for MenuManager {
    fn apply_draw(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        draw_back_to_front(self.active_actors()?, renderer)
    }
}

impl EventHandler for MenuManager {
    fn handle_event(&mut self, event: &EventData, _queue: &mut EventQueue) {
        if self.pausable.handle_menu_event(event) {
            return;
        }

        if event.is(EventCategory::Menu, EventAction::OnClick) {
            if let Some(id) = event.payload().id() {
                if self.contains_scene(id) {
                    if let Err(e) = self.set_scene(id) {
                        warn!(target: "managers", "{}", e);
                    }
                }
            }
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actors::{share, ActorType, Color, DrawnActor2D, UiContent};
    use crate::core::input::{InputEvent, MouseButton};
    use crate::core::managers::RecordingRenderer;
    use crate::core::math::Transform2D;
    use crate::core::testing::FrameHarness;
    use glam::Vec2;

    fn button(id: &str, at: Vec2) -> ActorRef {
        layered_button(id, at, 0.5)
    }

    fn layered_button(id: &str, at: Vec2, layer_depth: f32) -> ActorRef {
        share(DrawnActor2D::new(
            id,
            ActorType::UITextureObject,
            StatusType::UPDATE | StatusType::DRAWN,
            Transform2D::new(at, 0.0, Vec2::ONE, Vec2::ZERO, Vec2::new(100.0, 40.0)),
            Color::WHITE,
            layer_depth,
            UiContent::Texture { texture_id: "button".into(), source: None },
        ))
    }

    fn menu() -> MenuManager {
        let mut menu = MenuManager::new(StatusType::UPDATE | StatusType::DRAWN);
        menu.add("main", button("play", Vec2::new(10.0, 10.0)));
        menu.add("main", button("controls", Vec2::new(10.0, 100.0)));
        menu.add("controls", button("back", Vec2::new(10.0, 10.0)));
        menu
    }

    #[test]
    fn set_scene_requires_existing_scene() {
        let mut menu = menu();
        assert_eq!(menu.set_scene("audio"), Err(EngineError::InvalidScene("audio".into())));
        assert!(menu.set_scene("main").is_ok());
        assert_eq!(menu.active_scene(), Some("main"));
    }

    #[test]
    fn update_and_draw_need_an_active_scene() {
        let mut harness = FrameHarness::new();
        let mut menu = menu();
        let mut renderer = RecordingRenderer::default();

        assert_eq!(menu.update(&mut harness.context()), Err(EngineError::NoActiveScene));
        assert_eq!(menu.draw(&mut renderer), Err(EngineError::NoActiveScene));

        menu.set_scene("main").unwrap();
        menu.update(&mut harness.context()).unwrap();
        menu.draw(&mut renderer).unwrap();
        assert_eq!(renderer.drawn_actors(), vec!["play", "controls"]);
    }

    #[test]
    fn remove_reports_unknown_scene() {
        let mut menu = menu();
        assert!(menu.remove("main", |a| a.id() == "play").unwrap());
        assert!(!menu.remove("main", |a| a.id() == "play").unwrap());
        assert!(menu.remove("audio", |_| true).is_err());
        assert_eq!(menu.scene("main").map(<[ActorRef]>::len), Some(1));
    }

    #[test]
    fn clear_drops_scenes_and_selection() {
        let mut menu = menu();
        menu.set_scene("main").unwrap();
        menu.clear();
        assert!(menu.active_scene().is_none());
        assert!(!menu.contains_scene("main"));
    }

    #[test]
    fn shown_on_pause_hidden_on_play() {
        let mut menu = MenuManager::new(StatusType::OFF);
        let mut queue = EventQueue::new();
        menu.handle_event(&EventData::new(EventCategory::Menu, EventAction::OnPause), &mut queue);
        assert_eq!(menu.status(), StatusType::UPDATE | StatusType::DRAWN);
        menu.handle_event(&EventData::new(EventCategory::Menu, EventAction::OnPlay), &mut queue);
        assert!(menu.status().is_off());
    }

    #[test]
    fn click_publishes_id_and_switches_scene() {
        let mut harness = FrameHarness::new();
        let mut menu = menu();
        menu.set_scene("main").unwrap();

        harness.input(&[
            InputEvent::MouseMoved { x: 50.0, y: 120.0 },
            InputEvent::MouseButtonDown { button: MouseButton::Left },
        ]);
        menu.update(&mut harness.context()).unwrap();

        let click = harness.events.iter().next().cloned();
        let expected = EventData::with_payload(EventCategory::Menu, EventAction::OnClick, EventPayload::Id("controls".into()));
        assert_eq!(click, Some(expected.clone()));

        menu.handle_event(&expected, &mut harness.events);
        assert_eq!(menu.active_scene(), Some("controls"));

        // Ids that are not scenes leave the selection alone.
        let play = EventData::with_payload(EventCategory::Menu, EventAction::OnClick, EventPayload::Id("play".into()));
        menu.handle_event(&play, &mut harness.events);
        assert_eq!(menu.active_scene(), Some("controls"));
    }

    #[test]
    fn overlapping_click_picks_front_most() {
        let mut harness = FrameHarness::new();
        let mut menu = MenuManager::new(StatusType::UPDATE | StatusType::DRAWN);
        menu.add("main", layered_button("front", Vec2::new(10.0, 10.0), 0.1));
        menu.add("main", layered_button("back", Vec2::new(10.0, 10.0), 0.9));
        menu.set_scene("main").unwrap();

        harness.input(&[
            InputEvent::MouseMoved { x: 50.0, y: 20.0 },
            InputEvent::MouseButtonDown { button: MouseButton::Left },
        ]);
        menu.update(&mut harness.context()).unwrap();

        let clicked = harness.events.iter().next().and_then(|e| e.payload().id().map(str::to_string));
        assert_eq!(clicked.as_deref(), Some("front"));
    }
}
