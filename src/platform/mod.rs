//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Owns the window and the winit event loop, and turns each redraw into
// one game tick. Everything here runs on the main thread.
//
// Per redraw:
//   1. the processor's InputFrame (if any) goes down the channel
//   2. Game::tick runs with the wall-clock time since the last redraw
//   3. a cursor warp requested during the tick is applied
//   4. the next redraw is requested
//
// Resizes and the close request take the same channel, so the game
// sees them in the order they happened relative to input.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use crate::core::managers::Renderer;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::{Game, TickControl};
use crate::error::{EngineError, Result};
use input_processor::InputProcessor;

//=== WindowSettings ======================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Window owner and frame driver. Not `Send`; stays on the main thread.
pub(crate) struct Platform<R: Renderer> {
    settings: WindowSettings,
    /// Created lazily in `resumed()`.
    window: Option<Window>,
    input: InputProcessor,
    event_sender: Sender<PlatformEvent>,
    game: Game,
    renderer: R,
    last_frame: Option<Instant>,
    /// First error that stopped the loop, returned from `run`.
    failure: Option<EngineError>,
}

impl<R: Renderer> Platform<R> {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(settings: WindowSettings, game: Game, renderer: R) -> Self {
        info!(target: "platform", "Platform ready for \"{}\"", settings.title);
        Self {
            settings,
            window: None,
            input: InputProcessor::new(),
            event_sender: game.platform_sender(),
            game,
            renderer,
            last_frame: None,
            failure: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes or a frame fails.
    ///
    /// # Errors
    ///
    /// [`EngineError::Platform`] if the event loop cannot be created or
    /// run; otherwise the error that aborted a frame, if any.
    pub(crate) fn run(mut self) -> Result<()> {
        debug!(target: "platform", "Entering event loop");

        let event_loop = EventLoop::new().map_err(|e| {
            error!(target: "platform", "Event loop creation failed: {}", e);
            EngineError::Platform(e.to_string())
        })?;

        event_loop.run_app(&mut self).map_err(|e| EngineError::Platform(e.to_string()))?;

        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends the input gathered since the last redraw, if there was any.
    fn flush_input(&mut self) {
        if let Some(frame) = self.input.take_frame() {
            trace!(target: "platform::input", "Input frame sent: {:?}", frame);
            self.send(PlatformEvent::Input(frame));
        }
    }

    fn send(&self, event: PlatformEvent) {
        if self.event_sender.try_send(event).is_err() {
            warn!(target: "platform", "Platform channel full or closed, event dropped");
        }
    }

    /// Time since the previous frame; zero for the first one.
    fn frame_delta(&mut self) -> Duration {
        let now = Instant::now();
        let delta = self.last_frame.map_or(Duration::ZERO, |last| now - last);
        self.last_frame = Some(now);
        delta
    }

    /// One frame: flush input, tick, warp the cursor if the game asked.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.flush_input();

        let elapsed = self.frame_delta();
        match self.game.tick(elapsed, &mut self.renderer) {
            Ok(TickControl::Continue) => {}
            Ok(TickControl::Exit) => {
                event_loop.exit();
                return;
            }
            Err(e) => {
                error!(target: "platform", "Frame failed: {}", e);
                self.failure = Some(e);
                event_loop.exit();
                return;
            }
        }

        let Some(window) = &self.window else {
            return;
        };
        if let Some(target) = self.game.mouse().take_position_request() {
            let position = PhysicalPosition::new(f64::from(target.x), f64::from(target.y));
            if let Err(e) = window.set_cursor_position(position) {
                trace!(target: "platform::input", "Cursor warp unsupported: {}", e);
            }
        }
        window.request_redraw();
    }
}

//=== Winit Integration ===================================================

impl<R: Renderer> ApplicationHandler for Platform<R> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Resumed with a live window");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.settings.title.clone())
            .with_inner_size(PhysicalSize::new(self.settings.width, self.settings.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Opened {}x{} window (scale {})",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.send(PlatformEvent::Resized { width: size.width, height: size.height });
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Could not open window: {}", e);
                self.failure = Some(EngineError::Platform(e.to_string()));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Close requested");
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                debug!(target: "platform", "Window resized: {}x{}", size.width, size.height);
                self.send(PlatformEvent::Resized { width: size.width, height: size.height });
            }

            WindowEvent::Focused(false) => {
                debug!(target: "platform::input", "Focus lost, releasing held input");
                self.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } => self.input.key(&event),
            WindowEvent::MouseInput { state, button, .. } => self.input.button(button, state),
            WindowEvent::CursorMoved { position, .. } => self.input.cursor_moved(position),
            WindowEvent::MouseWheel { delta, .. } => self.input.wheel(delta),

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
