//=========================================================================
// Aetheric Stage Engine
//=========================================================================
//
// Main entry point: configures a `Game`, lets the application build its
// scene, then hands both to the winit runtime.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init(|game|)──>  Engine
//         │                                                     │
//         ├─ with_title()                             run(renderer)
//         ├─ with_window_size()                                 │
//         ├─ with_channel_capacity()              Platform (winit, main thread)
//         ├─ with_max_physics_step()                  └─ Game::tick per redraw
//         ├─ with_gravity()
//         └─ with_screen_layout()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use glam::Vec3;
use log::info;

//=== Internal Dependencies ===============================================

use crate::core::managers::{Renderer, ScreenLayout};
use crate::core::{Game, GameConfig};
use crate::error::Result;
use crate::platform::{Platform, WindowSettings};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: "Aetheric Stage"
/// - **Window size**: 1024×768
/// - **Channel capacity**: 128 platform messages
/// - **Max physics step**: 1/60 s
/// - **Gravity**: (0, -10, 0)
/// - **Screen layout**: [`ScreenLayout::Single`]
///
/// # Examples
///
/// ```no_run
/// use aetheric_stage::EngineBuilder;
/// # use aetheric_stage::core::managers::Renderer;
/// # use aetheric_stage::core::actors::{Actor, Camera3D, Viewport};
/// # struct NullRenderer;
/// # impl Renderer for NullRenderer {
/// #     fn set_viewport(&mut self, _: Viewport) {}
/// #     fn set_render_state(&mut self, _: aetheric_stage::core::managers::RenderState) {}
/// #     fn draw_actor(&mut self, _: &Camera3D, _: &dyn Actor) -> aetheric_stage::Result<()> { Ok(()) }
/// #     fn draw_2d(&mut self, _: &dyn Actor) -> aetheric_stage::Result<()> { Ok(()) }
/// # }
///
/// EngineBuilder::new()
///     .with_title("Crates")
///     .with_window_size(1280, 720)
///     .build()
///     .init(|game| {
///         // add cameras, actors and menu scenes
///         let _ = game.cameras();
///     })
///     .run(NullRenderer)
///     .unwrap();
/// ```
pub struct EngineBuilder {
    title: String,
    config: GameConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self { title: "Aetheric Stage".to_string(), config: GameConfig::default() }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Initial inner size of the window, in physical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.config.screen_width = width;
        self.config.screen_height = height;
        self
    }

    /// Capacity of the platform → game channel. Messages beyond it are
    /// dropped with a warning.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.config.channel_capacity = capacity;
        self
    }

    /// Longest step the physics world is advanced by in one frame.
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn with_max_physics_step(mut self, step: Duration) -> Self {
        assert!(!step.is_zero(), "Max physics step must be positive");
        self.config.max_physics_step = step;
        self
    }

    /// # Panics
    ///
    /// Panics if any component is not finite.
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        assert!(gravity.is_finite(), "Gravity must be finite, got {}", gravity);
        self.config.gravity = gravity;
        self
    }

    pub fn with_screen_layout(mut self, layout: ScreenLayout) -> Self {
        self.config.screen_layout = layout;
        self
    }

    /// Creates the game with every manager subscribed to its bus.
    pub fn build(self) -> Engine {
        info!(
            "Building engine ('{}', {}x{}, channel: {})",
            self.title, self.config.screen_width, self.config.screen_height, self.config.channel_capacity
        );

        let settings = WindowSettings {
            title: self.title,
            width: self.config.screen_width,
            height: self.config.screen_height,
        };
        Engine { settings, game: Game::new(self.config) }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// A configured game waiting to be run. Create via [`EngineBuilder`].
pub struct Engine {
    settings: WindowSettings,
    game: Game,
}

impl Engine {
    /// Gives the application the game to build its scene: cameras,
    /// actors, menus, scheduled events and extra subscribers.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut Game),
    {
        info!("Initializing game");
        init_fn(&mut self.game);
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Opens the window and drives frames until it closes. Blocks the
    /// calling thread, which must be the main thread on macOS.
    ///
    /// # Errors
    ///
    /// [`EngineError::Platform`](crate::EngineError::Platform) if the
    /// window or event loop fails, or the error that aborted a frame.
    pub fn run<R: Renderer>(self, renderer: R) -> Result<()> {
        info!("Starting engine runtime");
        let result = Platform::new(self.settings, self.game, renderer).run();
        info!("Engine shutdown complete");
        result
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.title, "Aetheric Stage");
        assert_eq!(builder.config, GameConfig::default());
        assert_eq!((builder.config.screen_width, builder.config.screen_height), (1024, 768));
        assert_eq!(builder.config.channel_capacity, 128);
        assert_eq!(builder.config.gravity, Vec3::new(0.0, -10.0, 0.0));
    }

    #[test]
    fn fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_title("Crates")
            .with_window_size(1280, 720)
            .with_channel_capacity(256)
            .with_max_physics_step(Duration::from_millis(10))
            .with_gravity(Vec3::new(0.0, -9.81, 0.0))
            .with_screen_layout(ScreenLayout::Multi)
            .build();

        assert_eq!(engine.settings, WindowSettings { title: "Crates".into(), width: 1280, height: 720 });
        let config = engine.game().config();
        assert_eq!(config.channel_capacity, 256);
        assert_eq!(config.max_physics_step, Duration::from_millis(10));
        assert_eq!(config.screen_layout, ScreenLayout::Multi);
        assert_eq!(engine.game().screen_size(), (1280, 720));
    }

    #[test]
    fn init_runs_against_the_game() {
        let engine = EngineBuilder::new().build().init(|game| {
            game.menu().borrow_mut().clear();
            game.physics_mut().set_gravity(Vec3::ZERO);
        });
        assert_eq!(engine.game().physics().gravity(), Vec3::ZERO);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn zero_channel_capacity_panics() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn zero_window_size_panics() {
        EngineBuilder::new().with_window_size(0, 600);
    }

    #[test]
    #[should_panic(expected = "Max physics step must be positive")]
    fn zero_physics_step_panics() {
        EngineBuilder::new().with_max_physics_step(Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "Gravity must be finite")]
    fn non_finite_gravity_panics() {
        EngineBuilder::new().with_gravity(Vec3::new(0.0, f32::NAN, 0.0));
    }
}
