//=========================================================================
// Managers
//=========================================================================
//
// Per-frame components owned by the game: each keeps a collection of
// actors (or settings) and updates/draws them when its status allows.
//
// Architecture:
//   Game::tick ─→ GameComponent::update(ctx)
//                    ├→ handle_input(ctx)      (always)
//                    └→ apply_update(ctx)      (status has UPDATE)
//              ─→ DrawableComponent::draw(renderer)
//                    └→ apply_draw(renderer)   (status has DRAWN)
//
// Every manager listens to the Menu category: gameplay managers stop on
// OnPause and resume on OnPlay; the menu manager does the opposite.
//
//=========================================================================

//=== Module Declarations =================================================

mod camera;
mod content;
mod menu;
mod object;
mod physics;
mod picking;
mod render;
mod ui;

//=== Public API ==========================================================

pub use camera::CameraManager;
pub use content::{key_from_path, ContentDictionary};
pub use menu::MenuManager;
pub use object::ObjectManager;
pub use physics::{PhysicsManager, DEFAULT_MAX_STEP};
pub use picking::{PickPredicate, PickingManager, PickingSettings};
pub use render::{RenderManager, RenderState, Renderer, ScreenLayout};
pub use ui::UiManager;

#[cfg(test)]
pub(crate) use render::testing::{DrawCall, RecordingRenderer};

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::actors::StatusType;
use crate::core::context::FrameContext;
use crate::core::events::{EventAction, EventCategory, EventData};
use crate::error::Result;

//=== Pausable ============================================================

/// Status flags of a manager plus how it reacts to menu events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pausable {
    status: StatusType,
    drawable: bool,
    shown_when_paused: bool,
}

impl Pausable {
    /// Gameplay component: stopped by OnPause, restarted by OnPlay.
    pub fn new(status: StatusType, drawable: bool) -> Self {
        Self { status, drawable, shown_when_paused: false }
    }

    /// Menu-style component: running while the game is paused.
    pub fn menu(status: StatusType) -> Self {
        Self { status, drawable: true, shown_when_paused: true }
    }

    pub fn status(&self) -> StatusType {
        self.status
    }

    pub fn set_status(&mut self, status: StatusType) {
        self.status = status;
    }

    /// Applies a Menu OnPause/OnPlay event. Returns false for anything else.
    pub fn handle_menu_event(&mut self, event: &EventData) -> bool {
        if event.category() != EventCategory::Menu {
            return false;
        }

        let running = if self.drawable { StatusType::UPDATE | StatusType::DRAWN } else { StatusType::UPDATE };
        let paused = match event.action() {
            EventAction::OnPause => true,
            EventAction::OnPlay => false,
            _ => return false,
        };

        self.status = if paused == self.shown_when_paused { running } else { StatusType::OFF };
        debug!(target: "managers", "Menu {:?} → {:?}", event.action(), self.status);
        true
    }
}

//=== GameComponent =======================================================

/// A manager updated once per frame by the game loop.
pub trait GameComponent {
    fn pausable(&self) -> &Pausable;
    fn pausable_mut(&mut self) -> &mut Pausable;

    fn status(&self) -> StatusType {
        self.pausable().status()
    }

    fn set_status(&mut self, status: StatusType) {
        self.pausable_mut().set_status(status);
    }

    /// Runs even while paused.
    fn handle_input(&mut self, _ctx: &mut FrameContext) {}

    fn apply_update(&mut self, ctx: &mut FrameContext) -> Result<()>;

    fn update(&mut self, ctx: &mut FrameContext) -> Result<()> {
        self.handle_input(ctx);
        if self.status().contains(StatusType::UPDATE) {
            self.apply_update(ctx)
        } else {
            Ok(())
        }
    }
}

/// A manager that also draws.
pub trait DrawableComponent: GameComponent {
    fn apply_draw(&mut self, renderer: &mut dyn Renderer) -> Result<()>;

    fn draw(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        if self.status().contains(StatusType::DRAWN) {
            self.apply_draw(renderer)
        } else {
            Ok(())
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
