//! Command-line flags, the optional TOML config file and their validation.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use maze_chase_core::{Rules, ITEM_POINTS, STARTING_LIVES, TICK_INTERVAL};
use maze_chase_rendering_macroquad::DEFAULT_MANIFEST_PATH;
use maze_chase_world::{TileMap, TileMapError};
use serde::Deserialize;
use thiserror::Error;

/// Command-line arguments; flags override values read from `--config`.
#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Steer through the maze, collect every item and avoid the adversaries"
)]
pub(crate) struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,
    /// Seed for adversary movement; drawn at random when omitted.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Milliseconds between simulation ticks.
    #[arg(long = "tick-ms")]
    pub(crate) tick_ms: Option<u64>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    pub(crate) vsync: bool,
    /// Log frame timing once per second.
    #[arg(long = "show-fps")]
    pub(crate) show_fps: bool,
    /// Load sprites from the manifest instead of drawing coloured rectangles.
    #[arg(long)]
    pub(crate) sprites: bool,
    /// Sprite manifest location.
    #[arg(long)]
    pub(crate) manifest: Option<PathBuf>,
    /// Run the given number of ticks without opening a window.
    #[arg(long, value_name = "TICKS")]
    pub(crate) headless: Option<u64>,
}

/// Failures raised while loading or validating configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The config file is not valid TOML for the expected schema.
    #[error("failed to parse config file {path}")]
    Parse {
        /// File that was requested.
        path: PathBuf,
        /// Underlying TOML failure.
        #[source]
        source: toml::de::Error,
    },
    /// Ticks must be spaced by a positive interval.
    #[error("tick interval must be greater than 0 ms")]
    ZeroTickInterval,
    /// A game must start with at least one life.
    #[error("starting lives must be greater than 0")]
    ZeroLives,
    /// The custom layout was rejected.
    #[error("invalid layout")]
    Layout(#[from] TileMapError),
}

/// Schema of the TOML config file.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    game: GameSection,
    window: WindowSection,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct GameSection {
    seed: Option<u64>,
    tick_interval_ms: u64,
    starting_lives: u32,
    item_points: u32,
    layout: Option<Vec<String>>,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            seed: None,
            tick_interval_ms: TICK_INTERVAL.as_millis() as u64,
            starting_lives: STARTING_LIVES,
            item_points: ITEM_POINTS,
            layout: None,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct WindowSection {
    vsync: bool,
    show_fps: bool,
    sprites: bool,
    manifest: PathBuf,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            vsync: false,
            show_fps: false,
            sprites: false,
            manifest: PathBuf::from(DEFAULT_MANIFEST_PATH),
        }
    }
}

impl FileConfig {
    /// Reads and parses the config file at `path`.
    pub(crate) fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Window options handed to the rendering backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct WindowSettings {
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
    pub(crate) sprites: bool,
    pub(crate) manifest: PathBuf,
}

/// Fully resolved and validated settings for one run.
#[derive(Clone, Debug)]
pub(crate) struct Settings {
    pub(crate) seed: Option<u64>,
    pub(crate) tick_interval: Duration,
    pub(crate) rules: Rules,
    pub(crate) tile_map: TileMap,
    pub(crate) window: WindowSettings,
    pub(crate) headless_ticks: Option<u64>,
}

impl Settings {
    /// Loads the config file named by `args`, if any, and applies the flags on top.
    pub(crate) fn load(args: &Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, args)
    }

    fn resolve(file: FileConfig, args: &Args) -> Result<Self, ConfigError> {
        let FileConfig { game, window } = file;

        let tick_interval_ms = args.tick_ms.unwrap_or(game.tick_interval_ms);
        if tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if game.starting_lives == 0 {
            return Err(ConfigError::ZeroLives);
        }

        let tile_map = match &game.layout {
            Some(rows) => TileMap::parse(rows.as_slice())?,
            None => TileMap::classic(),
        };

        Ok(Self {
            seed: args.seed.or(game.seed),
            tick_interval: Duration::from_millis(tick_interval_ms),
            rules: Rules {
                starting_lives: game.starting_lives,
                item_points: game.item_points,
            },
            tile_map,
            window: WindowSettings {
                vsync: window.vsync || args.vsync,
                show_fps: window.show_fps || args.show_fps,
                sprites: window.sprites || args.sprites,
                manifest: args.manifest.clone().unwrap_or(window.manifest),
            },
            headless_ticks: args.headless,
        })
    }
}
