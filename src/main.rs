//! SSGL - free-roaming camera viewer
//!
//! Opens a window, feeds its keyboard and mouse input to the camera once per
//! frame, and culls a grid of ground tiles against the camera frustum.

mod settings;

use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use ssgl_core::{Aabb, GameTime, Vec3};
use ssgl_game::{Camera, Frustum, FrustumTest, InputAction, InputHandler, InputState};

use settings::GameSettings;

/// Edge length of one ground tile
const TILE_SIZE: f32 = 50.0;
/// Tiles along each side of the ground grid
const TILES_PER_SIDE: i32 = 40;
/// How often the window title is refreshed, in frames
const TITLE_REFRESH_FRAMES: u64 = 30;

const START_POSITION: Vec3 = Vec3::new(0.0, 100.0, 100.0);

/// Application state
struct SsglApp {
    settings: GameSettings,
    window: Option<Window>,
    camera: Option<Camera>,
    input: InputHandler,
    /// Snapshot handed to the previous frame, for the pause toggle
    previous_input: InputState,
    game_time: GameTime,
    /// Set when the pause came from losing focus rather than the player
    paused_by_focus: bool,
    tiles: Vec<Aabb>,
    visible_tiles: usize,
    last_frame: Instant,
    /// Fatal error raised inside the event loop
    error: Option<anyhow::Error>,
}

impl SsglApp {
    fn new(settings: GameSettings) -> Self {
        let game_time = GameTime::new(settings.time.clone());
        Self {
            settings,
            window: None,
            camera: None,
            input: InputHandler::new(),
            previous_input: InputState::new(),
            game_time,
            paused_by_focus: false,
            tiles: ground_tiles(),
            visible_tiles: 0,
            last_frame: Instant::now(),
            error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.settings.video.resolution();
        let attrs = Window::default_attributes()
            .with_title("SSGL")
            .with_inner_size(LogicalSize::new(width, height));
        let window = event_loop
            .create_window(attrs)
            .context("Failed to create window")?;

        let size = window.inner_size();
        let (vp_w, vp_h) = if size.width > 0 && size.height > 0 {
            (size.width, size.height)
        } else {
            (width.max(1), height.max(1))
        };

        // Start with the cursor centred so free-look has no initial jump
        let center = PhysicalPosition::new(vp_w as f64 / 2.0, vp_h as f64 / 2.0);
        if let Err(e) = window.set_cursor_position(center) {
            warn!("Could not centre cursor: {}", e);
        }
        self.input.handle_cursor_moved((center.x, center.y));

        let mut camera = Camera::with_config(
            START_POSITION,
            Vec3::ZERO,
            Vec3::Y,
            vp_w as f32 / vp_h as f32,
            self.settings.camera.clone(),
        )
        .context("Failed to create camera")?;
        camera.initialize(&self.input.snapshot());

        info!("Window created ({}x{})", vp_w, vp_h);
        self.previous_input = self.input.snapshot();
        self.last_frame = Instant::now();
        self.camera = Some(camera);
        self.window = Some(window);
        Ok(())
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let input = self.input.snapshot();
        if input.pressed_since(&self.previous_input, InputAction::Pause) {
            self.game_time.toggle_pause();
            self.paused_by_focus = false;
            info!("{}", if self.game_time.paused { "Paused" } else { "Resumed" });
        }
        self.game_time.update(raw_delta);

        let (Some(camera), Some(window)) = (&mut self.camera, &self.window) else {
            return;
        };
        camera.update(&input, self.game_time.delta_time);
        self.previous_input = input;

        let (inside, partial) = count_visible(camera.frustum(), &self.tiles);
        let visible = inside + partial;
        if visible != self.visible_tiles {
            debug!(
                "Visible tiles: {} of {} ({} inside, {} clipped)",
                visible,
                self.tiles.len(),
                inside,
                partial
            );
            self.visible_tiles = visible;
        }

        if self.game_time.frame_count % TITLE_REFRESH_FRAMES == 0 {
            let p = camera.position();
            window.set_title(&format!(
                "SSGL - ({:.1}, {:.1}, {:.1}) - {} tiles visible{}",
                p.x,
                p.y,
                p.z,
                self.visible_tiles,
                if self.game_time.paused { " - paused" } else { "" }
            ));
        }
    }

    fn handle_focus(&mut self, focused: bool) {
        if !focused {
            // Key-up events for keys held during the switch never arrive
            self.input.release_all();
        }
        if !self.settings.time.pause_on_unfocus {
            return;
        }
        if !focused && !self.game_time.paused {
            self.game_time.pause();
            self.paused_by_focus = true;
        } else if focused && self.paused_by_focus {
            self.game_time.resume();
            self.paused_by_focus = false;
        }
    }
}

impl ApplicationHandler for SsglApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            error!("{:#}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(camera) = &mut self.camera {
                    match camera.set_viewport(size.width, size.height) {
                        Ok(()) => info!("Window resized to {}x{}", size.width, size.height),
                        Err(e) => debug!("Ignoring resize: {}", e),
                    }
                }
            }
            WindowEvent::Focused(focused) => self.handle_focus(focused),
            WindowEvent::KeyboardInput { event, .. } => {
                if !event.repeat {
                    self.input.handle_keyboard(event.physical_key, event.state);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.handle_mouse_button(button, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.handle_cursor_moved((position.x, position.y));
            }
            WindowEvent::RedrawRequested => self.frame(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Flat grid of tiles centred on the origin
fn ground_tiles() -> Vec<Aabb> {
    let half = TILES_PER_SIDE / 2;
    (-half..half)
        .flat_map(|x| (-half..half).map(move |z| (x, z)))
        .map(|(x, z)| {
            let min = Vec3::new(x as f32 * TILE_SIZE, 0.0, z as f32 * TILE_SIZE);
            Aabb::new(min, min + Vec3::new(TILE_SIZE, 1.0, TILE_SIZE))
        })
        .collect()
}

/// Tiles fully inside the frustum, and tiles straddling one of its planes
fn count_visible(frustum: &Frustum, tiles: &[Aabb]) -> (usize, usize) {
    tiles
        .iter()
        .fold((0, 0), |(inside, partial), tile| match frustum.classify_aabb(tile) {
            FrustumTest::Inside => (inside + 1, partial),
            FrustumTest::Partial => (inside, partial + 1),
            FrustumTest::Outside => (inside, partial),
        })
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    if std::env::args().any(|arg| arg == "--save-default-settings") {
        let path = GameSettings::default().save()?;
        info!("Default settings written to {:?}", path);
        return Ok(());
    }

    info!("Starting SSGL viewer...");
    let settings = GameSettings::load();

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = SsglApp::new(settings);
    event_loop.run_app(&mut app).context("Event loop failed")?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_tiles_cover_grid() {
        let tiles = ground_tiles();
        assert_eq!(tiles.len(), (TILES_PER_SIDE * TILES_PER_SIDE) as usize);

        let extent = TILE_SIZE * (TILES_PER_SIDE / 2) as f32;
        assert!(tiles.iter().any(|t| t.contains_point(Vec3::new(1.0, 0.5, 1.0))));
        assert!(tiles.iter().all(|t| t.min.x >= -extent && t.max.x <= extent));
    }

    #[test]
    fn test_start_camera_sees_ground() {
        let camera = Camera::new(START_POSITION, Vec3::ZERO, Vec3::Y, 16.0 / 9.0).unwrap();
        let tiles = ground_tiles();
        let visible = tiles
            .iter()
            .filter(|tile| camera.frustum().intersects_aabb(tile))
            .count();
        assert!(visible > 0);
        assert!(visible < tiles.len());

        let (inside, partial) = count_visible(camera.frustum(), &tiles);
        assert!(inside > 0);
        assert!(partial > 0);
        assert_eq!(inside + partial, visible);
    }
}
