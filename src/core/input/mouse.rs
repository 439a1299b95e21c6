//=========================================================================
// Mouse Manager
//=========================================================================
//
// Per-frame mouse state (buttons, cursor, wheel) with last-frame
// comparison, plus ray picking against the physics world.
//
// Frame lifecycle: begin_frame() → process_events() → query
//
// Cursor warps requested during the frame (mouse-look controllers
// re-centring the pointer) are collected here and applied by the
// platform layer after the frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::collections::HashSet;

use glam::{Vec2, Vec3};

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, MouseButton};
use crate::core::actors::{ActorRef, Camera3D};
use crate::core::math::Ray;
use crate::core::physics::PhysicsWorld;

//=== PickResult ==========================================================

/// Actor under the cursor and where the pick ray touched it.
#[derive(Clone)]
pub struct PickResult {
    pub actor: ActorRef,
    pub position: Vec3,
    pub normal: Vec3,
    /// Distance from the camera to `position`.
    pub distance: f32,
}

//=== MouseManager ========================================================

#[derive(Debug, Default)]
pub struct MouseManager {
    //--- Current Frame ----------------------------------------------------
    position: Vec2,
    buttons_down: HashSet<MouseButton>,
    scroll_wheel: i32,

    //--- Last Frame -------------------------------------------------------
    previous_position: Vec2,
    previous_buttons_down: HashSet<MouseButton>,
    previous_scroll_wheel: i32,

    warp_request: Cell<Option<Vec2>>,
}

impl MouseManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the cursor at `position` (usually the screen centre).
    pub fn at(position: Vec2) -> Self {
        Self { position, previous_position: position, ..Self::default() }
    }

    //--- Frame Processing -------------------------------------------------

    pub fn begin_frame(&mut self) {
        self.previous_position = self.position;
        self.previous_buttons_down.clone_from(&self.buttons_down);
        self.previous_scroll_wheel = self.scroll_wheel;
    }

    pub fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            match *event {
                InputEvent::MouseMoved { x, y } => self.position = Vec2::new(x, y),
                InputEvent::MouseButtonDown { button, .. } => {
                    self.buttons_down.insert(button);
                }
                InputEvent::MouseButtonUp { button, .. } => {
                    self.buttons_down.remove(&button);
                }
                InputEvent::MouseWheel { delta } => self.scroll_wheel += delta,
                _ => {}
            }
        }
    }

    //--- Buttons ----------------------------------------------------------

    pub fn is_clicked(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Down this frame but not last frame.
    pub fn is_clicked_once(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button) && !self.previous_buttons_down.contains(&button)
    }

    pub fn is_left_clicked(&self) -> bool {
        self.is_clicked(MouseButton::Left)
    }

    pub fn is_left_clicked_once(&self) -> bool {
        self.is_clicked_once(MouseButton::Left)
    }

    pub fn is_middle_clicked(&self) -> bool {
        self.is_clicked(MouseButton::Middle)
    }

    pub fn is_middle_clicked_once(&self) -> bool {
        self.is_clicked_once(MouseButton::Middle)
    }

    pub fn is_right_clicked(&self) -> bool {
        self.is_clicked(MouseButton::Right)
    }

    pub fn is_right_clicked_once(&self) -> bool {
        self.is_clicked_once(MouseButton::Right)
    }

    /// True if buttons, cursor or wheel differ from last frame.
    pub fn is_state_changed(&self) -> bool {
        self.position != self.previous_position
            || self.buttons_down != self.previous_buttons_down
            || self.scroll_wheel != self.previous_scroll_wheel
    }

    //--- Wheel ------------------------------------------------------------

    /// Accumulated wheel value (120 per notch).
    pub fn scroll_wheel_value(&self) -> i32 {
        self.scroll_wheel
    }

    pub fn delta_from_scroll_wheel(&self) -> i32 {
        self.scroll_wheel - self.previous_scroll_wheel
    }

    //--- Position ---------------------------------------------------------

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// True if the cursor moved further than `sensitivity` pixels since
    /// last frame.
    pub fn has_moved(&self, sensitivity: f32) -> bool {
        (self.position - self.previous_position).length() > sensitivity
    }

    pub fn delta_from_centre(&self, screen_centre: Vec2) -> Vec2 {
        self.position - screen_centre
    }

    /// Offset from `target`, then asks for the cursor to be moved back
    /// onto it. Upside-down cameras report no movement.
    pub fn delta_from_position(&self, target: Vec2, camera: &Camera3D) -> Vec2 {
        if self.position == target {
            return Vec2::ZERO;
        }
        self.set_position(target);
        if camera.transform().up().y <= -1.0 + f32::EPSILON {
            Vec2::ZERO
        } else {
            self.position - target
        }
    }

    /// Requests a cursor warp; applied by the platform after the frame.
    pub fn set_position(&self, position: Vec2) {
        self.warp_request.set(Some(position));
    }

    pub fn take_position_request(&self) -> Option<Vec2> {
        self.warp_request.take()
    }

    //--- Picking ----------------------------------------------------------

    pub fn mouse_ray(&self, camera: &Camera3D) -> Ray {
        camera.mouse_ray(self.position)
    }

    /// Nearest actor-owned body under the cursor between `start_distance`
    /// and `end_distance` from the camera.
    pub fn picked_object(
        &self,
        camera: &Camera3D,
        world: &PhysicsWorld,
        start_distance: f32,
        end_distance: f32,
    ) -> Option<PickResult> {
        let ray = self.mouse_ray(camera);
        let eye = camera.transform().translation();
        let start = eye + ray.direction * start_distance;
        let delta = ray.direction * (end_distance - start_distance);

        let hit = world.segment_intersect(start, delta, |body| body.owner().is_some())?;
        let actor = hit.body.borrow().owner()?;
        Some(PickResult {
            actor,
            position: hit.position,
            normal: hit.normal,
            distance: hit.position.distance(eye),
        })
    }
}

//=========================================================================
// Tests
//=========================================================================
