#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Chase adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_chase_core::{AdversaryKind, Appearance, Direction, GameStatus, Rect, TileGrid};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Fill used for collectible items.
pub const ITEM_COLOR: Color = Color::from_rgb_u8(0x00, 0xff, 0xff);

/// Color of the status line.
pub const HUD_COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);

/// Font size of the status line expressed in board units.
pub const HUD_FONT_SIZE: f32 = 14.0;

/// Named image resources that backends may load from a sprite manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Wall tile.
    Wall,
    /// Blue adversary.
    BlueAdversary,
    /// Orange adversary.
    OrangeAdversary,
    /// Pink adversary.
    PinkAdversary,
    /// Red adversary.
    RedAdversary,
    /// Player heading up.
    PlayerUp,
    /// Player heading down.
    PlayerDown,
    /// Player heading left.
    PlayerLeft,
    /// Player heading right.
    PlayerRight,
}

impl SpriteKey {
    /// Every sprite in manifest order.
    pub const ALL: [SpriteKey; 9] = [
        SpriteKey::Wall,
        SpriteKey::BlueAdversary,
        SpriteKey::OrangeAdversary,
        SpriteKey::PinkAdversary,
        SpriteKey::RedAdversary,
        SpriteKey::PlayerUp,
        SpriteKey::PlayerDown,
        SpriteKey::PlayerLeft,
        SpriteKey::PlayerRight,
    ];

    /// Sprite representing the provided appearance, if it is drawn from an image.
    ///
    /// Items are plain filled squares and have no sprite.
    #[must_use]
    pub const fn for_appearance(appearance: Appearance) -> Option<Self> {
        match appearance {
            Appearance::Wall => Some(Self::Wall),
            Appearance::Item => None,
            Appearance::Player { facing } => Some(match facing {
                Direction::Up => Self::PlayerUp,
                Direction::Down => Self::PlayerDown,
                Direction::Left => Self::PlayerLeft,
                Direction::Right => Self::PlayerRight,
            }),
            Appearance::Adversary { kind } => Some(match kind {
                AdversaryKind::Blue => Self::BlueAdversary,
                AdversaryKind::Orange => Self::OrangeAdversary,
                AdversaryKind::Pink => Self::PinkAdversary,
                AdversaryKind::Red => Self::RedAdversary,
            }),
        }
    }

    /// Identifier used for the sprite in manifests.
    #[must_use]
    pub const fn manifest_name(self) -> &'static str {
        match self {
            Self::Wall => "Wall",
            Self::BlueAdversary => "BlueAdversary",
            Self::OrangeAdversary => "OrangeAdversary",
            Self::PinkAdversary => "PinkAdversary",
            Self::RedAdversary => "RedAdversary",
            Self::PlayerUp => "PlayerUp",
            Self::PlayerDown => "PlayerDown",
            Self::PlayerLeft => "PlayerLeft",
            Self::PlayerRight => "PlayerRight",
        }
    }

    /// Resolves a manifest identifier back into a sprite key.
    #[must_use]
    pub fn from_manifest_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.manifest_name() == name)
    }

    /// Solid color drawn when sprites are disabled or unavailable.
    #[must_use]
    pub const fn fallback_color(self) -> Color {
        match self {
            Self::Wall => Color::from_rgb_u8(0x21, 0x21, 0xde),
            Self::BlueAdversary => Color::from_rgb_u8(0x00, 0xb8, 0xff),
            Self::OrangeAdversary => Color::from_rgb_u8(0xff, 0xb8, 0x52),
            Self::PinkAdversary => Color::from_rgb_u8(0xff, 0xb8, 0xff),
            Self::RedAdversary => Color::from_rgb_u8(0xff, 0x00, 0x00),
            Self::PlayerUp | Self::PlayerDown | Self::PlayerLeft | Self::PlayerRight => {
                Color::from_rgb_u8(0xff, 0xff, 0x00)
            }
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Key codes released during the frame (`"ArrowUp"`, `"KeyW"`, ...), in release order.
    pub released_keys: Vec<String>,
}

/// Describes the fixed board surface rendered by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a single tile expressed in board units.
    pub tile_length: f32,
}

impl BoardPresentation {
    /// Creates a new board descriptor.
    ///
    /// Returns an error when the board has no area.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
    ) -> std::result::Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyBoard { columns, rows });
        }
        if !(tile_length > 0.0 && tile_length.is_finite()) {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
        })
    }

    /// Mirrors the world's grid geometry.
    pub fn from_tile_grid(grid: TileGrid) -> std::result::Result<Self, RenderingError> {
        Self::new(grid.columns(), grid.rows(), grid.tile_length() as f32)
    }

    /// Width of the board in board units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Height of the board in board units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Uniform scale that fits the board inside the provided viewport.
    #[must_use]
    pub fn fit_scale(&self, viewport: Vec2) -> f32 {
        let scale = (viewport.x / self.width()).min(viewport.y / self.height());
        if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            0.0
        }
    }

    /// Top-left screen offset that centres the scaled board in the viewport.
    #[must_use]
    pub fn fit_offset(&self, viewport: Vec2) -> Vec2 {
        let scale = self.fit_scale(viewport);
        let used = Vec2::new(self.width(), self.height()) * scale;
        ((viewport - used) * 0.5).max(Vec2::ZERO)
    }
}

/// Rectangle drawn either from a sprite or as a solid fallback fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePresentation {
    /// Image used when sprites are available.
    pub sprite: SpriteKey,
    /// Top-left corner in board units.
    pub position: Vec2,
    /// Extent in board units.
    pub size: Vec2,
}

impl SpritePresentation {
    /// Creates a new sprite descriptor.
    #[must_use]
    pub const fn new(sprite: SpriteKey, position: Vec2, size: Vec2) -> Self {
        Self {
            sprite,
            position,
            size,
        }
    }
}

/// Filled square marking an uncollected item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemPresentation {
    /// Top-left corner in board units.
    pub position: Vec2,
    /// Extent in board units.
    pub size: Vec2,
}

impl ItemPresentation {
    /// Creates a new item descriptor.
    #[must_use]
    pub const fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }
}

/// Lives, score and game-over flag shown in the status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HudPresentation {
    /// Lives remaining.
    pub lives: u32,
    /// Current score.
    pub score: u32,
    /// Whether the game has ended.
    pub status: GameStatus,
}

impl HudPresentation {
    /// Creates a new status descriptor.
    #[must_use]
    pub const fn new(lives: u32, score: u32, status: GameStatus) -> Self {
        Self {
            lives,
            score,
            status,
        }
    }

    /// Text of the status line.
    #[must_use]
    pub fn status_line(&self) -> String {
        match self.status {
            GameStatus::Running => format!("x{}  {}", self.lives, self.score),
            GameStatus::GameOver => format!("Game Over: {}", self.score),
        }
    }

    /// Baseline anchor of the status line in board units.
    #[must_use]
    pub fn anchor(board: &BoardPresentation) -> Vec2 {
        Vec2::splat(board.tile_length / 2.0)
    }
}

/// Scene description combining the board and everything drawn on it.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board surface the scene is laid out on.
    pub board: BoardPresentation,
    /// Wall tiles.
    pub walls: Vec<SpritePresentation>,
    /// Items that remain to be collected.
    pub items: Vec<ItemPresentation>,
    /// Player sprite oriented along its heading.
    pub player: SpritePresentation,
    /// Roaming adversaries.
    pub adversaries: Vec<SpritePresentation>,
    /// Status line contents.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates an empty scene for the provided board.
    #[must_use]
    pub fn new(board: BoardPresentation) -> Self {
        Self {
            board,
            walls: Vec::new(),
            items: Vec::new(),
            player: SpritePresentation::new(
                SpriteKey::PlayerRight,
                Vec2::ZERO,
                Vec2::splat(board.tile_length),
            ),
            adversaries: Vec::new(),
            hud: HudPresentation::default(),
        }
    }
}

/// Converts an integer rectangle to `(position, size)` in board units.
#[must_use]
pub fn rect_to_board(rect: Rect) -> (Vec2, Vec2) {
    (
        Vec2::new(rect.left() as f32, rect.top() as f32),
        Vec2::new(rect.size.width as f32, rect.size.height as f32),
    )
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Chase scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// keys released during the frame, and refreshes the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The board must have at least one column and one row.
    EmptyBoard {
        /// Provided column count.
        columns: u32,
        /// Provided row count.
        rows: u32,
    },
    /// Tiles must have a positive, finite side length.
    InvalidTileLength {
        /// Provided tile length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBoard { columns, rows } => {
                write!(f, "board must not be empty (received {columns}x{rows})")
            }
            Self::InvalidTileLength { tile_length } => {
                write!(
                    f,
                    "tile_length must be positive and finite (received {tile_length})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{Position, Size, BOARD_COLUMNS, BOARD_ROWS, TILE_SIZE};

    fn classic_board() -> BoardPresentation {
        BoardPresentation::from_tile_grid(TileGrid::new(BOARD_COLUMNS, BOARD_ROWS, TILE_SIZE))
            .expect("classic board is valid")
    }

    #[test]
    fn board_creation_rejects_degenerate_input_without_panicking() {
        assert_eq!(
            BoardPresentation::new(0, 5, 32.0),
            Err(RenderingError::EmptyBoard {
                columns: 0,
                rows: 5,
            })
        );
        assert!(matches!(
            BoardPresentation::new(3, 3, 0.0),
            Err(RenderingError::InvalidTileLength { .. })
        ));
        assert!(BoardPresentation::new(3, 3, f32::NAN).is_err());
    }

    #[test]
    fn classic_board_is_608_by_672() {
        let board = classic_board();
        assert_eq!(board.width(), 608.0);
        assert_eq!(board.height(), 672.0);
    }

    #[test]
    fn fit_keeps_aspect_ratio_and_centres_the_board() {
        let board = classic_board();
        let viewport = Vec2::new(1216.0, 672.0);
        assert_eq!(board.fit_scale(viewport), 1.0);
        assert_eq!(board.fit_offset(viewport), Vec2::new(304.0, 0.0));

        let tall = Vec2::new(304.0, 1000.0);
        assert_eq!(board.fit_scale(tall), 0.5);
        assert_eq!(board.fit_offset(tall), Vec2::new(0.0, 332.0));

        assert_eq!(board.fit_scale(Vec2::ZERO), 0.0);
    }

    #[test]
    fn status_line_matches_running_and_game_over_formats() {
        let running = HudPresentation::new(3, 120, GameStatus::Running);
        assert_eq!(running.status_line(), "x3  120");

        let over = HudPresentation::new(0, 120, GameStatus::GameOver);
        assert_eq!(over.status_line(), "Game Over: 120");

        assert_eq!(HudPresentation::anchor(&classic_board()), Vec2::splat(16.0));
    }

    #[test]
    fn every_sprite_round_trips_through_its_manifest_name() {
        for key in SpriteKey::ALL {
            assert_eq!(SpriteKey::from_manifest_name(key.manifest_name()), Some(key));
        }
        assert_eq!(SpriteKey::from_manifest_name("wall"), None);
    }

    #[test]
    fn appearances_map_to_sprites() {
        assert_eq!(SpriteKey::for_appearance(Appearance::Item), None);
        assert_eq!(
            SpriteKey::for_appearance(Appearance::Player {
                facing: Direction::Left,
            }),
            Some(SpriteKey::PlayerLeft)
        );
        assert_eq!(
            SpriteKey::for_appearance(Appearance::Adversary {
                kind: AdversaryKind::Pink,
            }),
            Some(SpriteKey::PinkAdversary)
        );
    }

    #[test]
    fn rect_conversion_preserves_geometry() {
        let rect = Rect::new(Position::new(46, 78), Size::square(4));
        assert_eq!(
            rect_to_board(rect),
            (Vec2::new(46.0, 78.0), Vec2::new(4.0, 4.0))
        );
    }

    #[test]
    fn new_scene_is_empty_apart_from_player() {
        let scene = Scene::new(classic_board());
        assert!(scene.walls.is_empty());
        assert!(scene.items.is_empty());
        assert!(scene.adversaries.is_empty());
        assert_eq!(scene.player.sprite, SpriteKey::PlayerRight);
        assert_eq!(scene.hud.status_line(), "x0  0");
    }
}
