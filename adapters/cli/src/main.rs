#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Chase experience.

mod config;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use maze_chase_rendering::{BoardPresentation, Color, Presentation, RenderingBackend, Scene};
use maze_chase_rendering_macroquad::MacroquadBackend;
use maze_chase_system_ticker::{Config as TickerConfig, DEFAULT_MAX_TICKS_PER_FRAME};
use maze_chase_world::{query, World};

use self::{
    config::{Args, Settings},
    session::{populate_scene, run_headless, Session},
};

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = Settings::load(&args).context("failed to load configuration")?;

    let seed = settings.seed.unwrap_or_else(rand::random);
    info!("adversary seed: {seed}");

    let mut world = World::with_layout(settings.tile_map, settings.rules, seed);
    info!("{}", query::welcome_banner(&world));

    if let Some(ticks) = settings.headless_ticks {
        let summary = run_headless(&mut world, ticks);
        info!(
            "headless run finished after {} ticks: {:?}, lives {}, score {}, {} items, {} boards cleared",
            summary.ticks,
            summary.status,
            summary.lives,
            summary.score,
            summary.items_collected,
            summary.levels_cleared,
        );
        return Ok(());
    }

    let board = BoardPresentation::from_tile_grid(query::tile_grid(&world))
        .context("failed to describe the board")?;
    let mut scene = Scene::new(board);
    populate_scene(&world, &mut scene);

    let mut session = Session::new(
        world,
        TickerConfig::new(settings.tick_interval, DEFAULT_MAX_TICKS_PER_FRAME),
    );
    let window = settings.window;
    let backend = MacroquadBackend::new()
        .with_vsync(window.vsync)
        .with_show_fps(window.show_fps)
        .with_sprite_loading(window.sprites)
        .with_manifest_path(window.manifest);

    backend.run(
        Presentation::new("Maze Chase", Color::from_rgb_u8(0, 0, 0), scene),
        move |dt, input, scene| {
            session.advance(dt, input.released_keys.as_slice());
            populate_scene(session.world(), scene);
        },
    )
}
