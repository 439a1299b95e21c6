//=========================================================================
// Picking Manager
//=========================================================================
//
// Turns mouse clicks into events about the body-backed actor under the
// cursor, seen through the active camera.
//
//   left   → Object/OnRemoveActor(Actor)
//   right  → UIPicking/OnObjectPicked(Picked) or OnNoObjectPicked
//   middle → Object/OnBeginDrag(Picked), then the picked body is lifted
//            along the mouse ray while the button stays down; the wheel
//            moves it nearer or further
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::Vec3;
use log::debug;

//=== Internal Dependencies ===============================================

use super::{CameraManager, GameComponent, Pausable};
use crate::core::actors::{Actor, StatusType};
use crate::core::context::FrameContext;
use crate::core::events::{EventAction, EventCategory, EventData, EventHandler, EventPayload, EventQueue};
use crate::core::input::{MouseButton, PickResult};
use crate::core::physics::BodyRef;
use crate::error::Result;

/// Hold distance change per scroll-wheel unit (120 units per notch).
const WHEEL_DISTANCE_SCALE: f32 = 0.1;
/// Velocity per unit of distance between the held point and its target.
const DRAG_GAIN: f32 = 10.0;

/// Decides which picked actors the manager reports.
pub type PickPredicate = Box<dyn Fn(&dyn Actor) -> bool>;

//=== PickingSettings =====================================================

/// Segment along the mouse ray that is tested, in world units from the
/// camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickingSettings {
    pub pick_start_distance: f32,
    pub pick_end_distance: f32,
}

impl Default for PickingSettings {
    fn default() -> Self {
        Self { pick_start_distance: 10.0, pick_end_distance: 1000.0 }
    }
}

//=== PickingManager ======================================================

/// A body held by the middle button.
struct Drag {
    body: BodyRef,
    /// Distance from the camera to the held point.
    distance: f32,
    /// Held point in the body frame.
    anchor: Vec3,
}

pub struct PickingManager {
    pausable: Pausable,
    settings: PickingSettings,
    cameras: Rc<RefCell<CameraManager>>,
    predicate: PickPredicate,
    drag: Option<Drag>,
}

impl PickingManager {
    pub fn new(
        status: StatusType,
        settings: PickingSettings,
        cameras: Rc<RefCell<CameraManager>>,
        predicate: PickPredicate,
    ) -> Self {
        Self { pausable: Pausable::new(status, false), settings, cameras, predicate, drag: None }
    }

    pub fn settings(&self) -> PickingSettings {
        self.settings
    }

    pub fn set_predicate(&mut self, predicate: PickPredicate) {
        self.predicate = predicate;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    //--- Internal Helpers -------------------------------------------------

    /// Nearest accepted actor under the cursor, if any.
    fn pick(&self, ctx: &FrameContext) -> Option<PickResult> {
        let camera = self.cameras.borrow().active_camera()?;
        let camera = camera.try_borrow().ok()?;
        let result = ctx.mouse.picked_object(
            &camera,
            &*ctx.physics,
            self.settings.pick_start_distance,
            self.settings.pick_end_distance,
        )?;

        let accepted = result.actor.try_borrow().is_ok_and(|a| (self.predicate)(&*a));
        accepted.then_some(result)
    }

    fn begin_drag(&mut self, result: &PickResult) {
        let Some(body) = result.actor.try_borrow().ok().and_then(|a| a.body().map(Rc::clone)) else {
            return;
        };
        let anchor = {
            let b = body.borrow();
            if !b.is_dynamic() {
                return;
            }
            b.orientation().inverse() * (result.position - b.position())
        };
        self.drag = Some(Drag { body, distance: result.distance, anchor });
        debug!(target: "managers", "Drag started at distance {:.2}", result.distance);
    }

    /// Steers the held point toward the mouse ray; lets go once the
    /// middle button is up.
    fn update_drag(&mut self, ctx: &FrameContext) {
        if !ctx.mouse.is_middle_clicked() {
            if self.drag.take().is_some() {
                debug!(target: "managers", "Drag released");
            }
            return;
        }
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let Some(camera) = self.cameras.borrow().active_camera() else {
            return;
        };
        let Ok(camera) = camera.try_borrow() else {
            return;
        };

        drag.distance = (drag.distance + ctx.mouse.delta_from_scroll_wheel() as f32 * WHEEL_DISTANCE_SCALE).max(0.0);
        let ray = ctx.mouse.mouse_ray(&camera);
        let target = camera.transform().translation() + ray.direction * drag.distance;

        let mut body = drag.body.borrow_mut();
        let held = body.position() + body.orientation() * drag.anchor;
        body.set_velocity((target - held) * DRAG_GAIN);
        body.set_angular_velocity(Vec3::ZERO);
    }
}

fn picked_payload(result: PickResult) -> EventPayload {
    EventPayload::Picked {
        actor: result.actor,
        position: result.position,
        normal: result.normal,
        distance: result.distance,
    }
}

//--- Trait Implementations -----------------------------------------------

impl GameComponent for PickingManager {
    fn pausable(&self) -> &Pausable {
        &self.pausable
    }

    fn pausable_mut(&mut self) -> &mut Pausable {
        &mut self.pausable
    }

    fn apply_update(&mut self, ctx: &mut FrameContext) -> Result<()> {
        let button = [MouseButton::Left, MouseButton::Right, MouseButton::Middle]
            .into_iter()
            .find(|b| ctx.mouse.is_clicked_once(*b));
        if let Some(button) = button {
            self.on_click(button, ctx);
        }
        self.update_drag(ctx);
        Ok(())
    }
}

impl PickingManager {
    fn on_click(&mut self, button: MouseButton, ctx: &mut FrameContext) {
        let picked = self.pick(ctx);
        debug!(target: "managers", "{:?} pick: {}", button, if picked.is_some() { "hit" } else { "nothing" });

        let event = match (button, picked) {
            (MouseButton::Left, Some(result)) => {
                EventData::for_actor(EventCategory::Object, EventAction::OnRemoveActor, result.actor)
            }
            (MouseButton::Right, Some(result)) => {
                EventData::with_payload(EventCategory::UIPicking, EventAction::OnObjectPicked, picked_payload(result))
            }
            (MouseButton::Right, None) => EventData::new(EventCategory::UIPicking, EventAction::OnNoObjectPicked),
            (MouseButton::Middle, Some(result)) => {
                self.begin_drag(&result);
                EventData::with_payload(EventCategory::Object, EventAction::OnBeginDrag, picked_payload(result))
            }
            _ => return,
        };
        ctx.events.publish(event);
    }
}

impl EventHandler for PickingManager {
    fn handle_event(&mut self, event: &EventData, _queue: &mut EventQueue) {
        self.pausable.handle_menu_event(event);
    }
}

impl fmt::Debug for PickingManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickingManager")
            .field("status", &self.pausable.status())
            .field("settings", &self.settings)
            .field("dragging", &self.drag.is_some())
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actors::{share, ActorRef, ActorType, Camera3D, EffectParameters, ProjectionParameters, Viewport};
    use crate::core::input::InputEvent;
    use crate::core::managers::ObjectManager;
    use crate::core::math::Transform3D;
    use crate::core::physics::{CollidableObject, MaterialProperties, Primitive};
    use crate::core::testing::FrameHarness;

    fn scene(harness: &mut FrameHarness, predicate: PickPredicate) -> (PickingManager, ActorRef) {
        scene_with(harness, predicate, true)
    }

    /// Camera at the origin looking down -Z at a crate 20 units away.
    fn scene_with(harness: &mut FrameHarness, predicate: PickPredicate, immovable: bool) -> (PickingManager, ActorRef) {
        let cameras = Rc::new(RefCell::new(CameraManager::new(StatusType::UPDATE)));
        cameras.borrow_mut().add(Camera3D::new(
            "main",
            StatusType::UPDATE,
            Transform3D::from_look(Vec3::ZERO, -Vec3::Z, Vec3::Y),
            ProjectionParameters::standard_deep_four_three(),
            Viewport::new(0.0, 0.0, 800.0, 600.0),
        ));

        let mut crate_box = CollidableObject::new(
            "crate",
            ActorType::CollidablePickup,
            StatusType::UPDATE | StatusType::DRAWN,
            Transform3D::from_trs(Vec3::new(0.0, 0.0, -20.0), Vec3::ZERO, Vec3::ONE),
            EffectParameters::basic("basic"),
            "box",
        );
        crate_box.add_primitive(Primitive::cuboid(Vec3::ZERO, Vec3::splat(2.0)), MaterialProperties::NORMAL_NORMAL);
        crate_box.enable(&mut harness.physics, immovable, 1.0);

        let actor = share(crate_box);
        ObjectManager::new(StatusType::UPDATE).add(Rc::clone(&actor));

        let manager = PickingManager::new(StatusType::UPDATE, PickingSettings::default(), cameras, predicate);
        (manager, actor)
    }

    fn click(harness: &mut FrameHarness, button: MouseButton) {
        harness.input(&[InputEvent::MouseButtonDown { button }]);
    }

    fn crate_position(actor: &ActorRef) -> Vec3 {
        actor.borrow().position()
    }

    /// Runs `frames` frames of input, picking and physics.
    fn hold(harness: &mut FrameHarness, manager: &mut PickingManager, events: &[InputEvent], frames: usize) {
        harness.input(events);
        for frame in 0..frames {
            if frame > 0 {
                harness.input(&[]);
            }
            manager.update(&mut harness.context()).unwrap();
            harness.physics.integrate(1.0 / 60.0, &mut harness.events);
        }
    }

    fn published(harness: &FrameHarness) -> Vec<(EventCategory, EventAction)> {
        harness.events.iter().map(|e| (e.category(), e.action())).collect()
    }

    #[test]
    fn default_distances() {
        let settings = PickingSettings::default();
        assert_eq!((settings.pick_start_distance, settings.pick_end_distance), (10.0, 1000.0));
    }

    #[test]
    fn left_click_requests_removal() {
        let mut harness = FrameHarness::new();
        let (mut manager, actor) = scene(&mut harness, Box::new(|_: &dyn Actor| true));

        click(&mut harness, MouseButton::Left);
        manager.update(&mut harness.context()).unwrap();

        let event = harness.events.iter().next().cloned();
        assert_eq!(event, Some(EventData::for_actor(EventCategory::Object, EventAction::OnRemoveActor, actor)));
    }

    #[test]
    fn right_click_reports_pick_details() {
        let mut harness = FrameHarness::new();
        let (mut manager, _actor) = scene(&mut harness, Box::new(|_: &dyn Actor| true));

        click(&mut harness, MouseButton::Right);
        manager.update(&mut harness.context()).unwrap();

        let event = harness.events.iter().next().cloned();
        match event.as_ref().map(EventData::payload) {
            Some(EventPayload::Picked { distance, normal, .. }) => {
                assert!((distance - 19.0).abs() < 1e-2, "distance {distance}");
                assert!(normal.abs_diff_eq(Vec3::Z, 1e-4));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejected_actor_reports_nothing_picked() {
        let mut harness = FrameHarness::new();
        let (mut manager, _actor) = scene(&mut harness, Box::new(|a: &dyn Actor| a.core().actor_type() == ActorType::CollidableInventory));

        click(&mut harness, MouseButton::Right);
        manager.update(&mut harness.context()).unwrap();
        assert_eq!(published(&harness), vec![(EventCategory::UIPicking, EventAction::OnNoObjectPicked)]);

        harness.events = EventQueue::new();
        click(&mut harness, MouseButton::Left);
        manager.update(&mut harness.context()).unwrap();
        assert!(harness.events.is_empty());
    }

    #[test]
    fn middle_click_begins_drag() {
        let mut harness = FrameHarness::new();
        let (mut manager, _actor) = scene(&mut harness, Box::new(|_: &dyn Actor| true));

        click(&mut harness, MouseButton::Middle);
        manager.update(&mut harness.context()).unwrap();
        assert_eq!(published(&harness), vec![(EventCategory::Object, EventAction::OnBeginDrag)]);
    }

    #[test]
    fn held_button_picks_once() {
        let mut harness = FrameHarness::new();
        let (mut manager, _actor) = scene(&mut harness, Box::new(|_: &dyn Actor| true));

        click(&mut harness, MouseButton::Middle);
        harness.input(&[]);
        manager.update(&mut harness.context()).unwrap();
        assert!(harness.events.is_empty());
    }

    #[test]
    fn middle_drag_follows_mouse_ray_until_release() {
        let mut harness = FrameHarness::new();
        harness.physics.set_gravity(Vec3::ZERO);
        let (mut manager, actor) = scene_with(&mut harness, Box::new(|_: &dyn Actor| true), false);

        click(&mut harness, MouseButton::Middle);
        manager.update(&mut harness.context()).unwrap();
        assert!(manager.is_dragging());

        hold(&mut harness, &mut manager, &[InputEvent::MouseMoved { x: 600.0, y: 300.0 }], 60);
        let moved = crate_position(&actor);
        assert!(moved.x > 1.0, "Body follows the ray to the right: {moved:?}");
        assert!(manager.is_dragging());

        harness.input(&[InputEvent::MouseButtonUp { button: MouseButton::Middle }]);
        manager.update(&mut harness.context()).unwrap();
        assert!(!manager.is_dragging());

        if let Some(body) = actor.borrow().body() {
            body.borrow_mut().set_velocity(Vec3::ZERO);
        }
        hold(&mut harness, &mut manager, &[], 10);
        assert!(crate_position(&actor).abs_diff_eq(moved, 1e-3), "Released body is left alone");
    }

    #[test]
    fn scroll_wheel_changes_hold_distance() {
        let mut harness = FrameHarness::new();
        harness.physics.set_gravity(Vec3::ZERO);
        let (mut manager, actor) = scene_with(&mut harness, Box::new(|_: &dyn Actor| true), false);

        click(&mut harness, MouseButton::Middle);
        manager.update(&mut harness.context()).unwrap();

        // One notch away: 120 units × 0.1 = 12 further along the ray.
        hold(&mut harness, &mut manager, &[InputEvent::MouseWheel { delta: 120 }], 90);
        let z = crate_position(&actor).z;
        assert!(z < -28.0 && z > -36.0, "Pushed out to about -32: {z}");
    }

    #[test]
    fn immovable_pick_is_not_lifted() {
        let mut harness = FrameHarness::new();
        let (mut manager, _actor) = scene(&mut harness, Box::new(|_: &dyn Actor| true));

        click(&mut harness, MouseButton::Middle);
        manager.update(&mut harness.context()).unwrap();
        assert!(!manager.is_dragging());
        assert_eq!(published(&harness), vec![(EventCategory::Object, EventAction::OnBeginDrag)]);
    }
}
