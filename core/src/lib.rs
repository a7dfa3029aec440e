#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened. Geometry lives here too: every entity in the maze is an
//! axis-aligned [`Rect`] and the single collision test, [`collides`], is shared
//! by wall blocking, item pickup and adversary contact.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Side length of a single square tile expressed in world units.
pub const TILE_SIZE: i32 = 32;

/// Number of tile columns in the classic board.
pub const BOARD_COLUMNS: u32 = 19;

/// Number of tile rows in the classic board.
pub const BOARD_ROWS: u32 = 21;

/// Distance covered by a moving entity during a single tick.
pub const STEP_LENGTH: i32 = TILE_SIZE / 4;

/// Offset applied on both axes when placing an item inside its tile.
pub const ITEM_INSET: i32 = 14;

/// Side length of an item dot.
pub const ITEM_LENGTH: i32 = 4;

/// Points awarded for each collected item under the default rules.
pub const ITEM_POINTS: u32 = 10;

/// Lives granted at the start of every game under the default rules.
pub const STARTING_LIVES: u32 = 3;

/// Simulated time covered by a single game tick (20 ticks per second).
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation by one fixed step.
    Tick,
    /// Requests that the player turn toward the provided direction.
    TurnPlayer {
        /// Direction the player wants to face.
        direction: Direction,
    },
    /// Reloads the board and restores lives and score after a game over.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that the player accepted a new heading.
    PlayerTurned {
        /// Direction the player now faces.
        direction: Direction,
    },
    /// Reports that a turn was refused because a wall lies ahead.
    TurnRejected {
        /// Direction that was requested.
        requested: Direction,
        /// Direction the player kept.
        retained: Direction,
    },
    /// Confirms that the player consumed an item.
    ItemCollected {
        /// Points awarded for the item.
        points: u32,
        /// Score after the award.
        score: u32,
    },
    /// Reports that an adversary caught the player.
    LifeLost {
        /// Lives left after the contact.
        lives_remaining: u32,
    },
    /// Announces that the last life was lost.
    GameOver {
        /// Score reached before the game ended.
        final_score: u32,
    },
    /// Announces that every item was collected and the board was reloaded.
    LevelCleared {
        /// Score carried into the next round.
        score: u32,
    },
    /// Confirms that a finished game was reset to its starting state.
    GameRestarted,
}

/// Cardinal headings available to moving entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    #[default]
    Right,
}

impl Direction {
    /// Every direction in the order used for uniform random selection.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Velocity produced by travelling in this direction at `speed` units per tick.
    #[must_use]
    pub const fn velocity(self, speed: i32) -> Velocity {
        match self {
            Self::Up => Velocity::new(0, -speed),
            Self::Down => Velocity::new(0, speed),
            Self::Left => Velocity::new(-speed, 0),
            Self::Right => Velocity::new(speed, 0),
        }
    }
}

/// Top-left coordinate of an entity expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Position {
    /// Creates a position from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position displaced by the provided velocity.
    #[must_use]
    pub const fn offset(self, velocity: Velocity) -> Self {
        Self::new(self.x + velocity.dx, self.y + velocity.dy)
    }
}

/// Displacement applied to a moving entity on every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Velocity {
    /// Horizontal displacement.
    pub dx: i32,
    /// Vertical displacement.
    pub dy: i32,
}

impl Velocity {
    /// Velocity of a stationary entity.
    pub const ZERO: Velocity = Velocity::new(0, 0);

    /// Creates a velocity from its components.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Returns the velocity pointing the opposite way.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self::new(-self.dx, -self.dy)
    }
}

/// Width and height of an entity in world units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Size {
    /// Creates a size from explicit dimensions.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Creates a square size.
    #[must_use]
    pub const fn square(length: i32) -> Self {
        Self::new(length, length)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub position: Position,
    /// Extent of the rectangle.
    pub size: Size,
}

impl Rect {
    /// Creates a rectangle from its corner and size.
    #[must_use]
    pub const fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.position.x
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.position.y
    }

    /// Right edge (exclusive).
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.position.x + self.size.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.position.y + self.size.height
    }
}

/// Reports whether two rectangles overlap.
///
/// All four comparisons are strict, so rectangles that merely share an edge do
/// not collide. The test is symmetric.
#[must_use]
pub const fn collides(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Identity of one of the four roaming adversaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AdversaryKind {
    /// Adversary spawned from the `b` marker.
    Blue,
    /// Adversary spawned from the `o` marker.
    Orange,
    /// Adversary spawned from the `p` marker.
    Pink,
    /// Adversary spawned from the `r` marker.
    Red,
}

impl AdversaryKind {
    /// Every adversary in marker order.
    pub const ALL: [AdversaryKind; 4] = [
        AdversaryKind::Blue,
        AdversaryKind::Orange,
        AdversaryKind::Pink,
        AdversaryKind::Red,
    ];

    /// Tile map character marking the adversary's start cell.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Blue => 'b',
            Self::Orange => 'o',
            Self::Pink => 'p',
            Self::Red => 'r',
        }
    }

    /// Resolves an adversary from its tile map marker.
    #[must_use]
    pub const fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'b' => Some(Self::Blue),
            'o' => Some(Self::Orange),
            'p' => Some(Self::Pink),
            'r' => Some(Self::Red),
            _ => None,
        }
    }
}

/// Opaque visual reference attached to every entity.
///
/// Renderers map appearances to sprites; the simulation never inspects them
/// beyond keeping the player's facing in sync with its heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Appearance {
    /// Solid maze wall.
    Wall,
    /// Collectible dot, drawn as a filled square.
    Item,
    /// Player sprite facing the provided direction.
    Player {
        /// Direction the sprite faces.
        facing: Direction,
    },
    /// Adversary sprite.
    Adversary {
        /// Which adversary is drawn.
        kind: AdversaryKind,
    },
}

/// Describes whether the game still accepts ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Ticks advance the simulation.
    #[default]
    Running,
    /// The last life was lost; only a restart resumes play.
    GameOver,
}

/// Scoring and lives configuration applied by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Lives granted at the start of every game.
    pub starting_lives: u32,
    /// Points awarded for each collected item.
    pub item_points: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            item_points: ITEM_POINTS,
        }
    }
}

/// Describes the discrete tile layout of the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_length: i32,
}

impl TileGrid {
    /// Creates a new tile grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_length: i32) -> Self {
        Self {
            columns,
            rows,
            tile_length,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> i32 {
        self.tile_length
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.columns as i32 * self.tile_length
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.rows as i32 * self.tile_length
    }

    /// World position of the top-left corner of the provided tile.
    #[must_use]
    pub const fn tile_origin(&self, column: u32, row: u32) -> Position {
        Position::new(
            column as i32 * self.tile_length,
            row as i32 * self.tile_length,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{
        collides, AdversaryKind, Command, Direction, Event, Position, Rect, Size, TileGrid,
        Velocity, STEP_LENGTH,
    };

    fn rect(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect::new(Position::new(x, y), Size::new(width, height))
    }

    #[test]
    fn overlapping_rectangles_collide_both_ways() {
        let a = rect(0, 0, 32, 32);
        let b = rect(16, 16, 32, 32);
        assert!(collides(&a, &b));
        assert!(collides(&b, &a));
    }

    #[test]
    fn disjoint_rectangles_do_not_collide() {
        let a = rect(0, 0, 32, 32);
        let b = rect(64, 0, 32, 32);
        assert!(!collides(&a, &b));
        assert!(!collides(&b, &a));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = rect(0, 0, 32, 32);
        let right = rect(32, 0, 32, 32);
        let below = rect(0, 32, 32, 32);
        let corner = rect(32, 32, 32, 32);
        for other in [right, below, corner] {
            assert!(!collides(&a, &other));
            assert!(!collides(&other, &a));
        }
    }

    #[test]
    fn contained_rectangle_collides() {
        let tile = rect(0, 0, 32, 32);
        let item = rect(14, 14, 4, 4);
        assert!(collides(&tile, &item));
        assert!(collides(&item, &tile));
    }

    #[test]
    fn direction_velocity_uses_quarter_tile() {
        assert_eq!(Direction::Up.velocity(STEP_LENGTH), Velocity::new(0, -8));
        assert_eq!(Direction::Down.velocity(STEP_LENGTH), Velocity::new(0, 8));
        assert_eq!(Direction::Left.velocity(STEP_LENGTH), Velocity::new(-8, 0));
        assert_eq!(Direction::Right.velocity(STEP_LENGTH), Velocity::new(8, 0));
    }

    #[test]
    fn default_direction_is_right() {
        assert_eq!(Direction::default(), Direction::Right);
    }

    #[test]
    fn adversary_markers_round_trip() {
        for kind in AdversaryKind::ALL {
            assert_eq!(AdversaryKind::from_marker(kind.marker()), Some(kind));
        }
        assert_eq!(AdversaryKind::from_marker('X'), None);
    }

    #[test]
    fn classic_grid_matches_board_size() {
        let grid = TileGrid::new(19, 21, 32);
        assert_eq!(grid.width(), 608);
        assert_eq!(grid.height(), 672);
        assert_eq!(grid.tile_origin(9, 8), Position::new(288, 256));
    }

    #[test]
    fn command_log_round_trips_through_bincode() {
        let commands = vec![
            Command::TurnPlayer {
                direction: Direction::Left,
            },
            Command::Tick,
            Command::Restart,
        ];
        let bytes = bincode::serialize(&commands).expect("serialize");
        let restored: Vec<Command> = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, commands);

        let events = vec![
            Event::ItemCollected {
                points: 10,
                score: 40,
            },
            Event::GameOver { final_score: 40 },
        ];
        let bytes = bincode::serialize(&events).expect("serialize");
        let restored: Vec<Event> = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, events);
    }
}
