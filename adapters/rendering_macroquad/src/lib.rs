#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Maze Chase.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the crate depends on macroquad without its default `audio` feature.

mod sprites;

use anyhow::Result;
use glam::Vec2;
use log::{info, warn};
use macroquad::input::{is_key_pressed, is_key_released, KeyCode};
use maze_chase_rendering::{
    BoardPresentation, Color, FrameInput, HudPresentation, ItemPresentation, Presentation,
    RenderingBackend, Scene, SpritePresentation, HUD_COLOR, HUD_FONT_SIZE, ITEM_COLOR,
};
use std::{
    collections::VecDeque,
    path::PathBuf,
    time::{Duration, Instant},
};

use self::sprites::{DrawParams, SpriteAtlas};

/// Default location of the sprite manifest relative to the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = "assets/manifest.toml";

/// Physical keys forwarded to the simulation, paired with their key-code names.
///
/// Only these keys reach the controls, so only they can restart a finished
/// game. Modifiers, Tab and punctuation are never reported.
const TRACKED_KEYS: [(KeyCode, &str); 42] = [
    (KeyCode::Up, "ArrowUp"),
    (KeyCode::Down, "ArrowDown"),
    (KeyCode::Left, "ArrowLeft"),
    (KeyCode::Right, "ArrowRight"),
    (KeyCode::A, "KeyA"),
    (KeyCode::B, "KeyB"),
    (KeyCode::C, "KeyC"),
    (KeyCode::D, "KeyD"),
    (KeyCode::E, "KeyE"),
    (KeyCode::F, "KeyF"),
    (KeyCode::G, "KeyG"),
    (KeyCode::H, "KeyH"),
    (KeyCode::I, "KeyI"),
    (KeyCode::J, "KeyJ"),
    (KeyCode::K, "KeyK"),
    (KeyCode::L, "KeyL"),
    (KeyCode::M, "KeyM"),
    (KeyCode::N, "KeyN"),
    (KeyCode::O, "KeyO"),
    (KeyCode::P, "KeyP"),
    (KeyCode::Q, "KeyQ"),
    (KeyCode::R, "KeyR"),
    (KeyCode::S, "KeyS"),
    (KeyCode::T, "KeyT"),
    (KeyCode::U, "KeyU"),
    (KeyCode::V, "KeyV"),
    (KeyCode::W, "KeyW"),
    (KeyCode::X, "KeyX"),
    (KeyCode::Y, "KeyY"),
    (KeyCode::Z, "KeyZ"),
    (KeyCode::Key0, "Digit0"),
    (KeyCode::Key1, "Digit1"),
    (KeyCode::Key2, "Digit2"),
    (KeyCode::Key3, "Digit3"),
    (KeyCode::Key4, "Digit4"),
    (KeyCode::Key5, "Digit5"),
    (KeyCode::Key6, "Digit6"),
    (KeyCode::Key7, "Digit7"),
    (KeyCode::Key8, "Digit8"),
    (KeyCode::Key9, "Digit9"),
    (KeyCode::Space, "Space"),
    (KeyCode::Enter, "Enter"),
];

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` quits the game loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
    manifest_path: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: false,
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }

    /// Overrides the sprite manifest location.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames.max(1),
            avg_render: self.render_accum / frames.max(1),
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
            manifest_path,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.board.width().round() as i32,
            window_height: scene.board.height().round() as i32,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = if load_sprites {
                match SpriteAtlas::from_manifest_path(&manifest_path) {
                    Ok(atlas) => Some(atlas),
                    Err(error) => {
                        warn!("drawing primitive shapes, sprites unavailable: {error:#}");
                        None
                    }
                }
            } else {
                None
            };

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(is_key_released);

                let simulation_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let simulation_duration = simulation_start.elapsed();

                let metrics = BoardMetrics::from_board(
                    &scene.board,
                    Vec2::new(
                        macroquad::window::screen_width(),
                        macroquad::window::screen_height(),
                    ),
                );

                let render_start = Instant::now();
                draw_sprite(&scene.player, &metrics, sprite_atlas.as_ref());
                for adversary in &scene.adversaries {
                    draw_sprite(adversary, &metrics, sprite_atlas.as_ref());
                }
                for wall in &scene.walls {
                    draw_sprite(wall, &metrics, sprite_atlas.as_ref());
                }
                draw_items(&scene.items, &metrics);
                draw_hud(&scene.hud, &scene.board, &metrics);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: simulation_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_render,
                    }) = fps_metrics
                    {
                        info!(
                            "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Collects the tracked keys released this frame as key-code names.
fn gather_frame_input(is_released: impl Fn(KeyCode) -> bool) -> FrameInput {
    FrameInput {
        released_keys: TRACKED_KEYS
            .iter()
            .filter(|(code, _)| is_released(*code))
            .map(|(_, name)| (*name).to_owned())
            .collect(),
    }
}

/// Maps board units onto the window, preserving the board's aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
struct BoardMetrics {
    scale: f32,
    offset: Vec2,
}

impl BoardMetrics {
    fn from_board(board: &BoardPresentation, screen: Vec2) -> Self {
        Self {
            scale: board.fit_scale(screen),
            offset: board.fit_offset(screen),
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.scale
    }
}

fn draw_sprite(
    sprite: &SpritePresentation,
    metrics: &BoardMetrics,
    sprite_atlas: Option<&SpriteAtlas>,
) {
    let position = metrics.to_screen(sprite.position);
    let size = sprite.size * metrics.scale;

    let drawn = sprite_atlas
        .map(|atlas| atlas.draw(sprite.sprite, DrawParams::new(position, size)))
        .map_or(false, |result| result.is_ok());
    if !drawn {
        macroquad::shapes::draw_rectangle(
            position.x,
            position.y,
            size.x,
            size.y,
            to_macroquad_color(sprite.sprite.fallback_color()),
        );
    }
}

fn draw_items(items: &[ItemPresentation], metrics: &BoardMetrics) {
    let color = to_macroquad_color(ITEM_COLOR);
    for item in items {
        let position = metrics.to_screen(item.position);
        let size = item.size * metrics.scale;
        macroquad::shapes::draw_rectangle(position.x, position.y, size.x, size.y, color);
    }
}

fn draw_hud(hud: &HudPresentation, board: &BoardPresentation, metrics: &BoardMetrics) {
    let anchor = metrics.to_screen(HudPresentation::anchor(board));
    let _ = macroquad::text::draw_text(
        &hud.status_line(),
        anchor.x,
        anchor.y,
        HUD_FONT_SIZE * metrics.scale,
        to_macroquad_color(HUD_COLOR),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
