//=========================================================================
// Render Manager
//=========================================================================
//
// Draws the object manager's actors through one or more cameras.
//
// Architecture:
//   per camera: set_viewport
//     → RenderState::Opaque      → opaque actors (list order)
//     → RenderState::Transparent → transparent actors, far to near
//
// The graphics backend sits behind the `Renderer` trait; the engine
// only decides what is drawn, in which order and with which state.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use log::warn;

//=== Internal Dependencies ===============================================

use super::{CameraManager, DrawableComponent, GameComponent, ObjectManager, Pausable};
use crate::core::actors::{Actor, ActorRef, Camera3D, StatusType, Viewport};
use crate::core::context::FrameContext;
use crate::core::events::{EventData, EventHandler, EventQueue};
use crate::error::Result;

//=== Renderer ============================================================

/// Graphics backend driven by the draw phase of a frame.
pub trait Renderer {
    fn begin_frame(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport);

    fn set_render_state(&mut self, state: RenderState);

    /// Draws a 3D actor (model, effect, world matrix) seen from `camera`.
    fn draw_actor(&mut self, camera: &Camera3D, actor: &dyn Actor) -> Result<()>;

    /// Draws a screen-space actor.
    fn draw_2d(&mut self, actor: &dyn Actor) -> Result<()>;

    /// Presents the frame.
    fn end_frame(&mut self) -> Result<()> {
        Ok(())
    }
}

//=== RenderState =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderState {
    /// Back-face culling, depth read and write, no blending.
    Opaque,
    /// No culling, alpha blending, depth read only.
    Transparent,
}

impl RenderState {
    pub fn culls_back_faces(self) -> bool {
        matches!(self, Self::Opaque)
    }

    pub fn alpha_blends(self) -> bool {
        matches!(self, Self::Transparent)
    }

    pub fn writes_depth(self) -> bool {
        matches!(self, Self::Opaque)
    }
}

//=== ScreenLayout ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenLayout {
    /// Full screen through the active camera.
    #[default]
    Single,
    /// Up to four cameras, each in its own viewport.
    Multi,
}

impl ScreenLayout {
    pub const MAX_MULTI_CAMERAS: usize = 4;
}

//=== RenderManager =======================================================

pub struct RenderManager {
    pausable: Pausable,
    layout: ScreenLayout,
    cameras: Rc<RefCell<CameraManager>>,
    objects: Rc<RefCell<ObjectManager>>,
}

impl RenderManager {
    pub fn new(
        status: StatusType,
        layout: ScreenLayout,
        cameras: Rc<RefCell<CameraManager>>,
        objects: Rc<RefCell<ObjectManager>>,
    ) -> Self {
        Self { pausable: Pausable::new(status, true), layout, cameras, objects }
    }

    pub fn layout(&self) -> ScreenLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: ScreenLayout) {
        self.layout = layout;
    }

    //--- Internal Helpers -------------------------------------------------

    fn draw_through(&self, camera: &Camera3D, renderer: &mut dyn Renderer) -> Result<()> {
        let objects = self.objects.borrow();
        renderer.set_viewport(camera.viewport());

        renderer.set_render_state(RenderState::Opaque);
        for actor in objects.opaque() {
            Self::draw_one(camera, actor, renderer)?;
        }

        renderer.set_render_state(RenderState::Transparent);
        for actor in sorted_far_to_near(camera, objects.transparent()) {
            Self::draw_one(camera, &actor, renderer)?;
        }
        Ok(())
    }

    fn draw_one(camera: &Camera3D, actor: &ActorRef, renderer: &mut dyn Renderer) -> Result<()> {
        let actor = actor.borrow();
        if actor.status().contains(StatusType::DRAWN) {
            renderer.draw_actor(camera, &*actor)?;
        }
        Ok(())
    }
}

/// Transparent actors ordered by descending distance from the camera.
fn sorted_far_to_near(camera: &Camera3D, actors: &[ActorRef]) -> Vec<ActorRef> {
    let eye = camera.transform().translation();
    let mut keyed: Vec<(f32, ActorRef)> =
        actors.iter().map(|a| (a.borrow().position().distance_squared(eye), Rc::clone(a))).collect();
    keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    keyed.into_iter().map(|(_, a)| a).collect()
}

//--- Trait Implementations -----------------------------------------------

impl GameComponent for RenderManager {
    fn pausable(&self) -> &Pausable {
        &self.pausable
    }

    fn pausable_mut(&mut self) -> &mut Pausable {
        &mut self.pausable
    }

    fn apply_update(&mut self, _ctx: &mut FrameContext) -> Result<()> {
        Ok(())
    }
}

impl DrawableComponent for RenderManager {
    fn apply_draw(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let cameras = self.cameras.borrow();
        match self.layout {
            ScreenLayout::Single => match cameras.active_camera() {
                Some(camera) => self.draw_through(&camera.borrow(), renderer),
                None => {
                    warn!(target: "managers", "Nothing drawn: no active camera");
                    Ok(())
                }
            },
            ScreenLayout::Multi => {
                for camera in cameras.iter().take(ScreenLayout::MAX_MULTI_CAMERAS) {
                    self.draw_through(&camera.borrow(), renderer)?;
                }
                Ok(())
            }
        }
    }
}

impl EventHandler for RenderManager {
    fn handle_event(&mut self, event: &EventData, _queue: &mut EventQueue) {
        self.pausable.handle_menu_event(event);
    }
}

//=========================================================================
// Test Support
//=========================================================================


//=========================================================================
// Tests
//=========================================================================
