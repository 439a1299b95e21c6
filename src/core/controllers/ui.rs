//=========================================================================
// UI Controllers
//=========================================================================
//
// Behaviours for screen-space elements. Each one works on the actor's
// Transform2D, or on DrawnActor2D's colour and texture source, and
// leaves other actors alone.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Controller, ControllerType, TrigonometricParameters};
use crate::core::actors::{Actor, Color, DrawnActor2D, UiContent};
use crate::core::context::FrameContext;
use crate::core::events::{EventAction, EventCategory, EventData, EventHandler, EventQueue};
use crate::core::math::Rect;

fn is_hovered(ctx: &FrameContext, actor: &dyn Actor) -> bool {
    actor.transform2d().is_some_and(|t| t.bounds().contains(ctx.mouse.position()))
}

//=== ColorLerpController =================================================

/// Pulses the element's colour between two end points as game time runs.
#[derive(Debug, Clone)]
pub struct ColorLerpController {
    id: String,
    start: Color,
    end: Color,
}

impl ColorLerpController {
    pub fn new(id: &str, start: Color, end: Color) -> Self {
        Self { id: id.trim().to_string(), start, end }
    }

    /// Blend factor in [0, 1]; a full cycle takes 720 ms.
    fn factor(total_ms: f64) -> f32 {
        (0.5 * (total_ms as f32).to_radians()).sin() * 0.5 + 0.5
    }
}

impl Controller for ColorLerpController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::ColorLerpOverTime
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        if let Some(drawn) = actor.downcast_mut::<DrawnActor2D>() {
            drawn.set_color(self.start.lerp(self.end, Self::factor(ctx.time.total_ms())));
        }
    }

    fn clone_box(&self) -> Option<Box<dyn Controller>> {
        Some(Box::new(self.clone()))
    }
}

//=== MouseOverController =================================================

/// Highlights the element while the cursor is inside its bounds.
#[derive(Debug, Clone)]
pub struct MouseOverController {
    id: String,
    active: Color,
    inactive: Color,
}

impl MouseOverController {
    pub fn new(id: &str, active: Color, inactive: Color) -> Self {
        Self { id: id.trim().to_string(), active, inactive }
    }
}

impl Controller for MouseOverController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::MouseOver
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        let color = if is_hovered(ctx, actor) { self.active } else { self.inactive };
        if let Some(drawn) = actor.downcast_mut::<DrawnActor2D>() {
            drawn.set_color(color);
        }
    }

    fn clone_box(&self) -> Option<Box<dyn Controller>> {
        Some(Box::new(self.clone()))
    }
}

//=== Progress ============================================================

/// Value shown by a progress bar. Subscribe it to `EventCategory::UI` to
/// have `OnHealthDelta` events move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    current: i32,
    max: i32,
}

impl Progress {
    /// A start value outside [0, max] begins at 0.
    pub fn new(start: i32, max: i32) -> Self {
        let max = max.max(1);
        let current = if (0..=max).contains(&start) { start } else { 0 };
        Self { current, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Adds `delta`, clamped into [0, max].
    pub fn add(&mut self, delta: i32) {
        self.current = self.current.saturating_add(delta).clamp(0, self.max);
    }

    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.max as f32
    }
}

impl EventHandler for Progress {
    fn handle_event(&mut self, event: &EventData, _queue: &mut EventQueue) {
        if event.category() != EventCategory::UI || event.action() != EventAction::OnHealthDelta {
            return;
        }
        if let Some(delta) = event.payload().value() {
            self.add(delta.round() as i32);
            debug!(target: "controllers", "progress now {}/{}", self.current, self.max);
        }
    }
}

//=== ProgressController ==================================================

/// Crops a texture element's source rectangle to the progress fraction,
/// left to right.
#[derive(Debug, Clone)]
pub struct ProgressController {
    id: String,
    progress: Rc<RefCell<Progress>>,
    full_source: Option<Rect>,
}

impl ProgressController {
    pub fn new(id: &str, start: i32, max: i32) -> Self {
        Self { id: id.trim().to_string(), progress: Rc::new(RefCell::new(Progress::new(start, max))), full_source: None }
    }

    /// Shared value; clones of this controller show the same one.
    pub fn progress(&self) -> &Rc<RefCell<Progress>> {
        &self.progress
    }
}

impl Controller for ProgressController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::Progress
    }

    fn update(&mut self, _ctx: &mut FrameContext, actor: &mut dyn Actor) {
        let dimensions = actor.transform2d().map(|t| t.dimensions()).unwrap_or_default();
        let Some(drawn) = actor.downcast_mut::<DrawnActor2D>() else {
            return;
        };
        let UiContent::Texture { source, .. } = drawn.content_mut() else {
            return;
        };

        let full = *self.full_source.get_or_insert_with(|| source.unwrap_or(Rect::new(0.0, 0.0, dimensions.x, dimensions.y)));
        let width = full.width * self.progress.borrow().fraction();
        *source = Some(Rect { width, ..full });
    }

    fn clone_box(&self) -> Option<Box<dyn Controller>> {
        Some(Box::new(self.clone()))
    }
}

//=== RotationController ==================================================

/// Spins the element at a fixed rate.
#[derive(Debug, Clone)]
pub struct RotationController {
    id: String,
    degrees_per_ms: f32,
}

impl RotationController {
    pub const DEFAULT_RATE: f32 = 0.1;

    pub fn new(id: &str, degrees_per_ms: f32) -> Self {
        Self { id: id.trim().to_string(), degrees_per_ms }
    }
}

impl Controller for RotationController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::RotationOverTime
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        if let Some(transform) = actor.transform2d_mut() {
            transform.rotate_by(self.degrees_per_ms * ctx.elapsed_ms() as f32);
        }
    }

    fn clone_box(&self) -> Option<Box<dyn Controller>> {
        Some(Box::new(self.clone()))
    }
}

//=== ScaleLerpController =================================================

/// Breathes the element's scale while it is hovered; snaps back to the
/// original scale otherwise.
#[derive(Debug, Clone)]
pub struct ScaleLerpController {
    id: String,
    /// `max_amplitude` is a fraction of the original scale.
    parameters: TrigonometricParameters,
}

impl ScaleLerpController {
    pub fn new(id: &str, parameters: TrigonometricParameters) -> Self {
        Self { id: id.trim().to_string(), parameters }
    }
}

impl Controller for ScaleLerpController {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::ScaleLerpOverTime
    }

    fn update(&mut self, ctx: &mut FrameContext, actor: &mut dyn Actor) {
        let hovered = is_hovered(ctx, actor);
        let seconds = (ctx.time.total_ms() / 1000.0) as f32;
        let Some(transform) = actor.transform2d_mut() else {
            return;
        };

        let original = transform.original_scale();
        if hovered {
            transform.set_scale(original * (1.0 + self.parameters.evaluate(seconds)));
        } else {
            transform.set_scale(original);
        }
    }

    fn clone_box(&self) -> Option<Box<dyn Controller>> {
        Some(Box::new(self.clone()))
    }
}

//=========================================================================
// Tests
//=========================================================================
