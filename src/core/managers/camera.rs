//=========================================================================
// Camera Manager
//=========================================================================
//
// Ordered list of cameras plus the index of the one currently used for
// single-view rendering and picking.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{GameComponent, Pausable};
use crate::core::actors::{Actor, Camera3D, CameraRef, StatusType, Viewport};
use crate::core::context::FrameContext;
use crate::core::events::{EventAction, EventCategory, EventData, EventHandler, EventQueue};
use crate::error::Result;

//=== CameraManager =======================================================

pub struct CameraManager {
    pausable: Pausable,
    cameras: Vec<CameraRef>,
    active: usize,
}

impl CameraManager {
    pub fn new(status: StatusType) -> Self {
        Self { pausable: Pausable::new(status, false), cameras: Vec::new(), active: 0 }
    }

    //--- Collection API ---------------------------------------------------

    pub fn add(&mut self, camera: Camera3D) -> CameraRef {
        let camera = Rc::new(RefCell::new(camera));
        self.cameras.push(Rc::clone(&camera));
        camera
    }

    pub fn remove_first_if(&mut self, predicate: impl Fn(&Camera3D) -> bool) -> bool {
        let Some(index) = self.cameras.iter().position(|c| predicate(&c.borrow())) else {
            return false;
        };
        self.cameras.remove(index);
        if self.active >= self.cameras.len() {
            self.active = 0;
        }
        true
    }

    pub fn get(&self, index: usize) -> Option<CameraRef> {
        self.cameras.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CameraRef> {
        self.cameras.iter()
    }

    //--- Active Camera ----------------------------------------------------

    pub fn active_camera(&self) -> Option<CameraRef> {
        self.get(self.active)
    }

    pub fn active_camera_index(&self) -> usize {
        self.active
    }

    /// Any index is accepted; it wraps around the camera count.
    pub fn set_active_camera_index(&mut self, index: usize) {
        if self.cameras.is_empty() {
            warn!(target: "managers", "No cameras to activate");
            return;
        }
        self.active = index % self.cameras.len();
        debug!(target: "managers", "Active camera {}", self.active);
    }

    pub fn cycle_active_camera(&mut self) {
        self.set_active_camera_index(self.active + 1);
    }

    /// Activates the first camera matching `predicate`.
    pub fn set_active_camera(&mut self, predicate: impl Fn(&Camera3D) -> bool) -> bool {
        match self.cameras.iter().position(|c| predicate(&c.borrow())) {
            Some(index) => {
                self.set_active_camera_index(index);
                true
            }
            None => false,
        }
    }

    /// Scales every camera's viewport by the change in screen size.
    pub fn resize(&mut self, old_size: (f32, f32), new_size: (f32, f32)) {
        if old_size.0 <= 0.0 || old_size.1 <= 0.0 {
            return;
        }
        let (sx, sy) = (new_size.0 / old_size.0, new_size.1 / old_size.1);
        for camera in &self.cameras {
            let mut camera = camera.borrow_mut();
            let v = camera.viewport();
            let viewport = Viewport { x: v.x * sx, y: v.y * sy, width: v.width * sx, height: v.height * sy, ..v };
            camera.set_viewport(viewport);
            camera.projection_parameters_mut().set_aspect_ratio(viewport.aspect_ratio());
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl GameComponent for CameraManager {
    fn pausable(&self) -> &Pausable {
        &self.pausable
    }

    fn pausable_mut(&mut self) -> &mut Pausable {
        &mut self.pausable
    }

    fn apply_update(&mut self, ctx: &mut FrameContext) -> Result<()> {
        for camera in &self.cameras {
            let Ok(mut camera) = camera.try_borrow_mut() else {
                continue;
            };
            let camera: &mut dyn Actor = &mut *camera;
            if camera.status().contains(StatusType::UPDATE) {
                camera.update(ctx);
            }
        }
        Ok(())
    }
}

impl EventHandler for CameraManager {
    fn handle_event(&mut self, event: &EventData, _queue: &mut EventQueue) {
        if self.pausable.handle_menu_event(event) || event.category() != EventCategory::Camera {
            return;
        }

        match event.action() {
            EventAction::OnCameraCycle => self.cycle_active_camera(),
            EventAction::OnCameraSetActive => match event.payload().id() {
                Some(id) => {
                    if !self.set_active_camera(|c| c.core().id() == id) {
                        warn!(target: "managers", "No camera with id '{}'", id);
                    }
                }
                None => warn!(target: "managers", "OnCameraSetActive without a camera id"),
            },
            _ => {}
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
