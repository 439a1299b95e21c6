//=========================================================================
// Game
//=========================================================================
//
// Frame orchestrator: owns the event bus, the physics world, the input
// managers and every game component, and runs them in a fixed order once
// per frame.
//
// Frame order (`tick`):
// ```text
//   1. platform channel → keyboard / mouse        (collect)
//   2. physics manager: integrate min(dt, max_step)
//   3. scheduler, cameras, objects, picking, UI, menu   (may publish)
//   4. EventDispatcher::update()                  (single drain)
//   5. renderer.begin_frame → render, UI, menu draw → renderer.end_frame
// ```
//
// Forces queued by physics controllers during step 3 are applied by the
// next frame's integration.
//
// The game is single-threaded and headless: the winit runtime in
// `engine.rs` feeds it through the platform channel and calls `tick` on
// every redraw, and tests do the same through `send_input`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crossbeam_channel::{bounded, Sender};
use glam::{Vec2, Vec3};
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::actors::{Actor, StatusType};
use crate::core::context::FrameContext;
use crate::core::events::{EventCategory, EventData, EventDispatcher, EventScheduler};
use crate::core::input::{InputEvent, KeyboardManager, MouseManager};
use crate::core::managers::{
    CameraManager, DrawableComponent, GameComponent, MenuManager, ObjectManager, PhysicsManager, PickingManager,
    PickingSettings, RenderManager, Renderer, ScreenLayout, UiManager, DEFAULT_MAX_STEP,
};
use crate::core::physics::PhysicsWorld;
use crate::core::platform_bridge::{EventCollector, InputFrame, PlatformEvent, TickControl};
use crate::core::time::GameTime;
use crate::error::Result;

//=== GameConfig ==========================================================

/// Values the game is built from. `EngineBuilder` fills one in.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Capacity of the platform → game channel.
    pub channel_capacity: usize,
    /// Longest simulated step per frame.
    pub max_physics_step: Duration,
    pub gravity: Vec3,
    pub screen_layout: ScreenLayout,
    pub picking: PickingSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 1024,
            screen_height: 768,
            channel_capacity: 128,
            max_physics_step: DEFAULT_MAX_STEP,
            gravity: Vec3::new(0.0, -10.0, 0.0),
            screen_layout: ScreenLayout::default(),
            picking: PickingSettings::default(),
        }
    }
}

//=== Game ================================================================

pub struct Game {
    config: GameConfig,
    time: GameTime,

    //--- Bus --------------------------------------------------------------
    dispatcher: EventDispatcher,
    scheduler: Rc<RefCell<EventScheduler>>,

    //--- Platform ---------------------------------------------------------
    platform_sender: Sender<PlatformEvent>,
    collector: EventCollector,
    keyboard: KeyboardManager,
    mouse: MouseManager,
    screen_size: (u32, u32),

    //--- World ------------------------------------------------------------
    physics: PhysicsWorld,

    //--- Components -------------------------------------------------------
    cameras: Rc<RefCell<CameraManager>>,
    objects: Rc<RefCell<ObjectManager>>,
    physics_manager: Rc<RefCell<PhysicsManager>>,
    render: Rc<RefCell<RenderManager>>,
    ui: Rc<RefCell<UiManager>>,
    menu: Rc<RefCell<MenuManager>>,
    picking: Rc<RefCell<PickingManager>>,
}

impl Game {
    //--- Construction -----------------------------------------------------

    /// Builds every component and subscribes it to the bus. The menu starts
    /// hidden; publish Menu/OnPause to show it.
    pub fn new(config: GameConfig) -> Self {
        let (platform_sender, receiver) = bounded(config.channel_capacity);
        let screen_size = (config.screen_width, config.screen_height);

        let cameras = Rc::new(RefCell::new(CameraManager::new(StatusType::UPDATE)));
        let objects = Rc::new(RefCell::new(ObjectManager::new(StatusType::UPDATE)));
        let physics_manager =
            Rc::new(RefCell::new(PhysicsManager::new(StatusType::UPDATE, config.max_physics_step)));
        let render = Rc::new(RefCell::new(RenderManager::new(
            StatusType::UPDATE | StatusType::DRAWN,
            config.screen_layout,
            Rc::clone(&cameras),
            Rc::clone(&objects),
        )));
        let ui = Rc::new(RefCell::new(UiManager::new(StatusType::UPDATE | StatusType::DRAWN)));
        let menu = Rc::new(RefCell::new(MenuManager::new(StatusType::OFF)));
        let picking = Rc::new(RefCell::new(PickingManager::new(
            StatusType::UPDATE,
            config.picking,
            Rc::clone(&cameras),
            Box::new(|_: &dyn Actor| true),
        )));
        let scheduler = Rc::new(RefCell::new(EventScheduler::new("game")));

        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe_handler(EventCategory::Scheduler, &scheduler);
        dispatcher.subscribe_handler(EventCategory::Camera, &cameras);
        for category in [EventCategory::Object, EventCategory::Opacity, EventCategory::Player] {
            dispatcher.subscribe_handler(category, &objects);
        }
        dispatcher.subscribe_handler(EventCategory::Menu, &cameras);
        dispatcher.subscribe_handler(EventCategory::Menu, &objects);
        dispatcher.subscribe_handler(EventCategory::Menu, &physics_manager);
        dispatcher.subscribe_handler(EventCategory::Menu, &render);
        dispatcher.subscribe_handler(EventCategory::Menu, &ui);
        dispatcher.subscribe_handler(EventCategory::Menu, &menu);
        dispatcher.subscribe_handler(EventCategory::Menu, &picking);

        info!(
            target: "managers",
            "Game created ({}x{}, {:?} layout, max step {:?})",
            screen_size.0, screen_size.1, config.screen_layout, config.max_physics_step
        );

        Self {
            time: GameTime::new(),
            dispatcher,
            scheduler,
            platform_sender,
            collector: EventCollector::new(receiver),
            keyboard: KeyboardManager::new(),
            mouse: MouseManager::at(centre_of(screen_size)),
            screen_size,
            physics: PhysicsWorld::new(config.gravity),
            cameras,
            objects,
            physics_manager,
            render,
            ui,
            menu,
            picking,
            config,
        }
    }

    //--- Frame ------------------------------------------------------------

    /// Runs one frame of `elapsed` duration, drawing through `renderer`.
    ///
    /// Returns `Exit` once the window was closed. Errors from components
    /// (for example a shown menu with no scene) abort the frame.
    pub fn tick(&mut self, elapsed: Duration, renderer: &mut dyn Renderer) -> Result<TickControl> {
        let pending = self.collector.collect();
        if pending.control == TickControl::Exit {
            info!(target: "platform", "Platform requested exit");
            return Ok(TickControl::Exit);
        }
        if let Some((width, height)) = pending.resized {
            self.resize(width, height);
        }

        self.keyboard.begin_frame();
        self.mouse.begin_frame();
        self.keyboard.process_events(&pending.input);
        self.mouse.process_events(&pending.input);
        self.time.advance(elapsed);

        self.update_components()?;

        let delivered = self.dispatcher.update();
        trace!(target: "events", "Frame {}: {} events delivered", self.time.frame(), delivered);

        renderer.begin_frame()?;
        self.render.borrow_mut().draw(renderer)?;
        self.ui.borrow_mut().draw(renderer)?;
        self.menu.borrow_mut().draw(renderer)?;
        renderer.end_frame()?;

        Ok(TickControl::Continue)
    }

    /// Queues `events` as one frame of platform input.
    pub fn send_input(&self, events: Vec<InputEvent>) {
        self.send(PlatformEvent::Input(events.into_iter().collect::<InputFrame>()));
    }

    /// Queues a window size change for the next frame.
    pub fn send_resize(&self, width: u32, height: u32) {
        self.send(PlatformEvent::Resized { width, height });
    }

    //--- Bus --------------------------------------------------------------

    /// Publishes for delivery at the next drain.
    pub fn publish(&mut self, event: EventData) -> bool {
        self.dispatcher.publish(event)
    }

    /// For subscribing game-specific handlers.
    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }

    pub fn scheduler(&self) -> &Rc<RefCell<EventScheduler>> {
        &self.scheduler
    }

    //--- Components -------------------------------------------------------

    pub fn cameras(&self) -> &Rc<RefCell<CameraManager>> {
        &self.cameras
    }

    pub fn objects(&self) -> &Rc<RefCell<ObjectManager>> {
        &self.objects
    }

    pub fn physics_manager(&self) -> &Rc<RefCell<PhysicsManager>> {
        &self.physics_manager
    }

    pub fn render(&self) -> &Rc<RefCell<RenderManager>> {
        &self.render
    }

    pub fn ui(&self) -> &Rc<RefCell<UiManager>> {
        &self.ui
    }

    pub fn menu(&self) -> &Rc<RefCell<MenuManager>> {
        &self.menu
    }

    pub fn picking(&self) -> &Rc<RefCell<PickingManager>> {
        &self.picking
    }

    //--- Query API --------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn time(&self) -> &GameTime {
        &self.time
    }

    pub fn keyboard(&self) -> &KeyboardManager {
        &self.keyboard
    }

    pub fn mouse(&self) -> &MouseManager {
        &self.mouse
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// For enabling collidable bodies during scene setup.
    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn screen_size(&self) -> (u32, u32) {
        self.screen_size
    }

    pub fn screen_centre(&self) -> Vec2 {
        centre_of(self.screen_size)
    }

    //--- Internal Helpers -------------------------------------------------

    pub(crate) fn platform_sender(&self) -> Sender<PlatformEvent> {
        self.platform_sender.clone()
    }

    fn send(&self, event: PlatformEvent) {
        if self.platform_sender.try_send(event).is_err() {
            warn!(target: "platform::input", "Platform channel full, event dropped");
        }
    }

    fn update_components(&mut self) -> Result<()> {
        let mut ctx = FrameContext {
            time: &self.time,
            keyboard: &self.keyboard,
            mouse: &self.mouse,
            events: self.dispatcher.queue_mut(),
            physics: &mut self.physics,
            screen_centre: centre_of(self.screen_size),
        };

        self.physics_manager.borrow_mut().update(&mut ctx)?;

        let elapsed_ms = ctx.elapsed_ms();
        self.scheduler.borrow_mut().update(elapsed_ms, ctx.events);

        self.cameras.borrow_mut().update(&mut ctx)?;
        self.objects.borrow_mut().update(&mut ctx)?;
        self.picking.borrow_mut().update(&mut ctx)?;
        self.ui.borrow_mut().update(&mut ctx)?;
        self.menu.borrow_mut().update(&mut ctx)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == self.screen_size || width == 0 || height == 0 {
            return;
        }
        let old = (self.screen_size.0 as f32, self.screen_size.1 as f32);
        self.cameras.borrow_mut().resize(old, (width as f32, height as f32));
        self.screen_size = (width, height);
        debug!(target: "platform", "Screen resized to {}x{}", width, height);
    }
}

fn centre_of((width, height): (u32, u32)) -> Vec2 {
    Vec2::new(width as f32 / 2.0, height as f32 / 2.0)
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actors::{
        share, ActorType, Camera3D, Color, DrawnActor2D, EffectParameters, ProjectionParameters, UiContent, Viewport,
    };
    use crate::core::events::{EventAction, EventPayload};
    use crate::core::input::{KeyCode, MouseButton};
    use crate::core::managers::{DrawCall, RecordingRenderer};
    use crate::core::math::{Transform2D, Transform3D};
    use crate::core::physics::{CollidableObject, MaterialProperties, Primitive};
    use crate::error::EngineError;
    use approx::assert_abs_diff_eq;

    const FRAME: Duration = Duration::from_millis(16);

    fn camera(id: &str, viewport: Viewport) -> Camera3D {
        Camera3D::new(
            id,
            StatusType::UPDATE,
            Transform3D::from_look(Vec3::new(0.0, 5.0, 20.0), -Vec3::Z, Vec3::Y),
            ProjectionParameters::standard_deep_four_three(),
            viewport,
        )
    }

    fn tick(game: &mut Game) -> TickControl {
        game.tick(FRAME, &mut RecordingRenderer::default()).unwrap()
    }

    //--- Frame Order ------------------------------------------------------

    #[test]
    fn input_is_visible_in_the_same_frame() {
        let mut game = Game::new(GameConfig::default());
        game.send_input(vec![InputEvent::KeyDown { key: KeyCode::KeyW }]);

        tick(&mut game);
        assert!(game.keyboard().is_first_key_press(KeyCode::KeyW));

        tick(&mut game);
        assert!(game.keyboard().is_key_down(KeyCode::KeyW));
        assert!(!game.keyboard().is_first_key_press(KeyCode::KeyW));
        assert_eq!(game.time().frame(), 2);
    }

    #[test]
    fn window_close_exits() {
        let mut game = Game::new(GameConfig::default());
        game.platform_sender().send(PlatformEvent::WindowClosed).unwrap();
        assert_eq!(tick(&mut game), TickControl::Exit);
    }

    #[test]
    fn frame_draws_and_presents() {
        let mut game = Game::new(GameConfig::default());
        game.cameras().borrow_mut().add(camera("main", Viewport::new(0.0, 0.0, 1024.0, 768.0)));

        let mut renderer = RecordingRenderer::default();
        game.tick(FRAME, &mut renderer).unwrap();

        assert_eq!(renderer.calls.first(), Some(&DrawCall::Begin));
        assert_eq!(renderer.calls.last(), Some(&DrawCall::End));
    }

    #[test]
    fn scheduled_event_reaches_subscriber() {
        let mut game = Game::new(GameConfig::default());
        game.cameras().borrow_mut().add(camera("a", Viewport::new(0.0, 0.0, 1024.0, 768.0)));
        game.cameras().borrow_mut().add(camera("b", Viewport::new(0.0, 0.0, 1024.0, 768.0)));

        {
            let mut scheduler = game.scheduler().borrow_mut();
            scheduler.add(EventData::new(EventCategory::Camera, EventAction::OnCameraCycle), 20);
            scheduler.start();
        }

        tick(&mut game);
        assert_eq!(game.cameras().borrow().active_camera_index(), 0);
        tick(&mut game);
        assert_eq!(game.cameras().borrow().active_camera_index(), 1);
    }

    #[test]
    fn resize_moves_centre_and_viewports() {
        let mut game = Game::new(GameConfig { screen_width: 800, screen_height: 600, ..GameConfig::default() });
        let main = game.cameras().borrow_mut().add(camera("main", Viewport::new(0.0, 0.0, 800.0, 600.0)));

        game.send_resize(1600, 900);
        tick(&mut game);

        assert_eq!(game.screen_size(), (1600, 900));
        assert_eq!(game.screen_centre(), Vec2::new(800.0, 450.0));
        let viewport = main.borrow().viewport();
        assert_abs_diff_eq!(viewport.width, 1600.0);
        assert_abs_diff_eq!(viewport.height, 900.0);
    }

    #[test]
    fn paused_menu_without_scene_fails_the_frame() {
        let mut game = Game::new(GameConfig::default());
        game.publish(EventData::new(EventCategory::Menu, EventAction::OnPause));

        // The drain shows the menu, which then has nothing to draw.
        let result = game.tick(FRAME, &mut RecordingRenderer::default());
        assert_eq!(result, Err(EngineError::NoActiveScene));
    }

    //--- End-to-End -------------------------------------------------------

    #[test]
    fn cameras_cycle_and_menu_pauses_objects() {
        let mut game = Game::new(GameConfig::default());
        game.cameras().borrow_mut().add(camera("left", Viewport::new(0.0, 0.0, 512.0, 768.0)));
        game.cameras().borrow_mut().add(camera("right", Viewport::new(512.0, 0.0, 512.0, 768.0)));
        let play = DrawnActor2D::new(
            "play",
            ActorType::UITextureObject,
            StatusType::UPDATE | StatusType::DRAWN,
            Transform2D::from_scale(Vec2::ONE),
            Color::WHITE,
            0.0,
            UiContent::Texture { texture_id: "play".into(), source: None },
        );
        game.menu().borrow_mut().add("main", share(play));
        game.menu().borrow_mut().set_scene("main").unwrap();

        game.cameras().borrow_mut().cycle_active_camera();
        assert_eq!(game.cameras().borrow().active_camera_index(), 1);

        game.publish(EventData::new(EventCategory::Menu, EventAction::OnPause));
        tick(&mut game);
        assert!(!game.objects().borrow().status().contains(StatusType::UPDATE));
        assert!(game.menu().borrow().status().contains(StatusType::DRAWN));

        game.publish(EventData::new(EventCategory::Menu, EventAction::OnPlay));
        tick(&mut game);
        assert!(game.objects().borrow().status().contains(StatusType::UPDATE));
        assert!(game.menu().borrow().status().is_off());
    }

    #[test]
    fn collidable_box_mass_and_centre() {
        let mut game = Game::new(GameConfig::default());
        let start = Vec3::new(3.0, 4.0, -5.0);

        let mut crate_box = CollidableObject::new(
            "crate",
            ActorType::CollidableDecorator,
            StatusType::UPDATE | StatusType::DRAWN,
            Transform3D::from_trs(start, Vec3::ZERO, Vec3::ONE),
            EffectParameters::basic("basic"),
            "box",
        );
        crate_box.add_primitive(Primitive::cuboid(Vec3::ZERO, Vec3::splat(2.0)), MaterialProperties::NORMAL_NORMAL);
        let local_centre = crate_box.enable(game.physics_mut(), false, 8.0);

        let body = crate_box.enabled_body().unwrap();
        assert_abs_diff_eq!(body.borrow().mass(), 8.0, epsilon = 1e-5);
        assert!(local_centre.abs_diff_eq(Vec3::ZERO, 1e-5));
        assert!(body.borrow().position().abs_diff_eq(start, 1e-5));
        assert_eq!(game.physics().len(), 1);
    }

    #[test]
    fn picked_crate_is_removed_through_the_bus() {
        let mut game = Game::new(GameConfig::default());
        game.cameras().borrow_mut().add(Camera3D::new(
            "main",
            StatusType::UPDATE,
            Transform3D::from_look(Vec3::ZERO, -Vec3::Z, Vec3::Y),
            ProjectionParameters::standard_deep_four_three(),
            Viewport::new(0.0, 0.0, 1024.0, 768.0),
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
        crate_box.enable(game.physics_mut(), true, 1.0);
        game.objects().borrow_mut().add(share(crate_box));

        game.send_input(vec![
            InputEvent::MouseMoved { x: 512.0, y: 384.0 },
            InputEvent::MouseButtonDown { button: MouseButton::Left },
        ]);
        // Pick publishes; the drain queues the removal; the next update flushes it.
        tick(&mut game);
        assert_eq!(game.objects().borrow().pending_removals(), 1);
        tick(&mut game);

        assert!(game.objects().borrow().is_empty());
        assert!(game.physics().is_empty());
    }

    #[test]
    fn spawned_player_is_added() {
        let mut game = Game::new(GameConfig::default());
        let actor = share(CollidableObject::new(
            "player",
            ActorType::Player,
            StatusType::UPDATE,
            Transform3D::from_trs(Vec3::ZERO, Vec3::ZERO, Vec3::ONE),
            EffectParameters::basic("basic"),
            "player",
        ));
        game.publish(EventData::with_payload(EventCategory::Player, EventAction::OnSpawn, EventPayload::Actor(actor)));
        tick(&mut game);
        assert_eq!(game.objects().borrow().len(), 1);
    }
}
