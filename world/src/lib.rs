#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.

mod block;
mod tile_map;

use log::{debug, info};
use maze_chase_core::{
    collides, Appearance, Command, Direction, Event, GameStatus, Position, Rect,
    Rules, Size, TileGrid, ITEM_INSET, ITEM_LENGTH, TILE_SIZE, WELCOME_BANNER,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use block::{hits_any, turn, Block};
pub use tile_map::{Tile, TileMap, TileMapError, CLASSIC_LAYOUT};

use block::turn_unless;

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tile_map: TileMap,
    tile_grid: TileGrid,
    rules: Rules,
    walls: Vec<Block>,
    items: Vec<Block>,
    adversaries: Vec<Block>,
    player: Block,
    score: u32,
    lives: u32,
    status: GameStatus,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Creates a world on the classic board with default rules.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_layout(TileMap::classic(), Rules::default(), seed)
    }

    /// Creates a world from an explicit layout and rule set.
    ///
    /// Adversaries receive their first random heading immediately.
    #[must_use]
    pub fn with_layout(tile_map: TileMap, rules: Rules, seed: u64) -> Self {
        let tile_grid = tile_map.grid(TILE_SIZE);
        let player = player_block(Position::default());
        let mut world = Self {
            banner: WELCOME_BANNER,
            tile_map,
            tile_grid,
            rules,
            walls: Vec::new(),
            items: Vec::new(),
            adversaries: Vec::new(),
            player,
            score: 0,
            lives: rules.starting_lives,
            status: GameStatus::Running,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick_index: 0,
        };
        world.load_map();
        world.scatter_adversaries();
        world
    }

    fn load_map(&mut self) {
        self.walls.clear();
        self.items.clear();
        self.adversaries.clear();

        let tile_size = Size::square(TILE_SIZE);
        for (column, row, tile) in self.tile_map.iter() {
            let origin = self.tile_grid.tile_origin(column, row);
            match tile {
                Tile::Wall => self
                    .walls
                    .push(Block::new(Appearance::Wall, origin, tile_size)),
                Tile::Open => self.items.push(Block::new(
                    Appearance::Item,
                    Position::new(origin.x + ITEM_INSET, origin.y + ITEM_INSET),
                    Size::square(ITEM_LENGTH),
                )),
                Tile::PlayerStart => self.player = player_block(origin),
                Tile::AdversaryStart(kind) => self.adversaries.push(Block::new(
                    Appearance::Adversary { kind },
                    origin,
                    tile_size,
                )),
            }
        }
    }

    fn reset_positions(&mut self) {
        self.player.reset();
        self.player.halt();
        for adversary in &mut self.adversaries {
            adversary.reset();
        }
        self.scatter_adversaries();
    }

    fn scatter_adversaries(&mut self) {
        let board_width = self.tile_grid.width();
        for adversary in &mut self.adversaries {
            let direction = random_direction(&mut self.rng);
            let _ = turn_unless(adversary, direction, |rect| {
                adversary_blocked(rect, &self.walls, board_width)
            });
        }
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.status == GameStatus::GameOver {
            return;
        }
        self.tick_index = self.tick_index.saturating_add(1);

        self.player.advance();
        if hits_any(&self.player, &self.walls) {
            self.player.retreat();
        }

        let board_width = self.tile_grid.width();
        for index in 0..self.adversaries.len() {
            if collides(&self.adversaries[index].rect(), &self.player.rect()) {
                self.lives = self.lives.saturating_sub(1);
                out_events.push(Event::LifeLost {
                    lives_remaining: self.lives,
                });

                if self.lives == 0 {
                    self.status = GameStatus::GameOver;
                    info!("game over with a final score of {}", self.score);
                    out_events.push(Event::GameOver {
                        final_score: self.score,
                    });
                    return;
                }

                debug!("player caught, {} lives remaining", self.lives);
                self.reset_positions();
            }

            let adversary = &mut self.adversaries[index];
            adversary.advance();
            if adversary_blocked(&adversary.rect(), &self.walls, board_width) {
                adversary.retreat();
                let direction = random_direction(&mut self.rng);
                let _ = turn_unless(adversary, direction, |rect| {
                    adversary_blocked(rect, &self.walls, board_width)
                });
            }
        }

        let player_rect = self.player.rect();
        if let Some(index) = self
            .items
            .iter()
            .position(|item| collides(&player_rect, &item.rect()))
        {
            let _ = self.items.remove(index);
            self.score = self.score.saturating_add(self.rules.item_points);
            out_events.push(Event::ItemCollected {
                points: self.rules.item_points,
                score: self.score,
            });
        }

        if self.items.is_empty() {
            debug!("level cleared at score {}", self.score);
            self.load_map();
            self.reset_positions();
            out_events.push(Event::LevelCleared { score: self.score });
        }
    }

    fn turn_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.status == GameStatus::GameOver {
            return;
        }

        if turn(&mut self.player, direction, &self.walls) {
            out_events.push(Event::PlayerTurned { direction });
        } else {
            debug!("turn {direction:?} rejected by a wall");
            out_events.push(Event::TurnRejected {
                requested: direction,
                retained: self.player.direction(),
            });
        }

        self.player.set_appearance(Appearance::Player {
            facing: self.player.direction(),
        });
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        if self.status != GameStatus::GameOver {
            return;
        }

        self.load_map();
        self.reset_positions();
        self.lives = self.rules.starting_lives;
        self.score = 0;
        self.status = GameStatus::Running;
        info!("game restarted");
        out_events.push(Event::GameRestarted);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.tick(out_events),
        Command::TurnPlayer { direction } => world.turn_player(direction, out_events),
        Command::Restart => world.restart(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_chase_core::{GameStatus, Rules, TileGrid};

    use super::{Block, TileMap, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the world's tile grid definition.
    #[must_use]
    pub fn tile_grid(world: &World) -> TileGrid {
        world.tile_grid
    }

    /// Layout the world reloads on every level clear.
    #[must_use]
    pub fn tile_map(world: &World) -> &TileMap {
        &world.tile_map
    }

    /// Scoring and lives configuration in effect.
    #[must_use]
    pub fn rules(world: &World) -> Rules {
        world.rules
    }

    /// The player-controlled block.
    #[must_use]
    pub fn player(world: &World) -> &Block {
        &world.player
    }

    /// Roaming adversaries in layout order.
    #[must_use]
    pub fn adversaries(world: &World) -> &[Block] {
        &world.adversaries
    }

    /// Wall blocks in layout order.
    #[must_use]
    pub fn walls(world: &World) -> &[Block] {
        &world.walls
    }

    /// Items that remain to be collected, in layout order.
    #[must_use]
    pub fn items(world: &World) -> &[Block] {
        &world.items
    }

    /// Points accumulated in the current game.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Lives left in the current game.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Whether the game is running or over.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Number of ticks simulated since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

fn player_block(position: Position) -> Block {
    Block::new(
        Appearance::Player {
            facing: Direction::Right,
        },
        position,
        Size::square(TILE_SIZE),
    )
}

// Walls and the left and right board edges stop adversaries; the edges are
// inclusive so an adversary never settles on the border column.
fn adversary_blocked(rect: &Rect, walls: &[Block], board_width: i32) -> bool {
    rect.left() <= 0
        || rect.right() >= board_width
        || walls.iter().any(|wall| collides(rect, &wall.rect()))
}

fn random_direction(rng: &mut ChaCha8Rng) -> Direction {
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{AdversaryKind, STARTING_LIVES, STEP_LENGTH};

    const SEED: u64 = 0x5eed_cafe;

    fn classic() -> World {
        World::new(SEED)
    }

    fn catch_player(world: &mut World) -> Vec<Event> {
        let player_position = world.player.position();
        world.adversaries[0].place(player_position);
        let mut events = Vec::new();
        apply(world, Command::Tick, &mut events);
        events
    }

    fn adversary(world: &World, kind: AdversaryKind) -> &Block {
        world
            .adversaries
            .iter()
            .find(|block| block.appearance() == Appearance::Adversary { kind })
            .expect("adversary present")
    }

    #[test]
    fn classic_board_populates_every_collection() {
        let world = classic();
        assert_eq!(world.walls.len(), 196);
        assert_eq!(world.items.len(), 198);
        assert_eq!(world.adversaries.len(), 4);
        assert_eq!(world.player.home(), Position::new(9 * 32, 15 * 32));
        assert_eq!(world.player.velocity(), maze_chase_core::Velocity::ZERO);
        assert_eq!(world.lives, STARTING_LIVES);
        assert_eq!(world.score, 0);
    }

    #[test]
    fn red_adversary_home_matches_its_column_and_row() {
        let world = classic();
        let red = adversary(&world, AdversaryKind::Red);
        assert_eq!(red.home(), Position::new(9 * 32, 8 * 32));
    }

    #[test]
    fn items_are_inset_dots() {
        let world = classic();
        let first = &world.items[0];
        assert_eq!(first.position(), Position::new(32 + 14, 32 + 14));
        assert_eq!(first.size(), Size::square(4));
    }

    #[test]
    fn load_map_is_idempotent() {
        let mut world = classic();
        let walls = world.walls.clone();
        world.load_map();
        world.load_map();
        assert_eq!(world.walls, walls);
        assert_eq!(world.items.len(), 198);
        assert_eq!(world.adversaries.len(), 4);
    }

    #[test]
    fn three_contacts_end_the_game() {
        let mut world = classic();

        let first = catch_player(&mut world);
        assert_eq!(first, vec![Event::LifeLost { lives_remaining: 2 }]);
        let second = catch_player(&mut world);
        assert_eq!(second, vec![Event::LifeLost { lives_remaining: 1 }]);
        let third = catch_player(&mut world);
        assert_eq!(
            third,
            vec![
                Event::LifeLost { lives_remaining: 0 },
                Event::GameOver { final_score: 0 },
            ]
        );
        assert_eq!(world.status, GameStatus::GameOver);

        let fourth = catch_player(&mut world);
        assert!(fourth.is_empty());
        assert_eq!(world.lives, 0);
    }

    #[test]
    fn contact_resets_player_and_adversaries_home() {
        let mut world = classic();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::TurnPlayer {
                direction: Direction::Left,
            },
            &mut events,
        );
        assert_ne!(world.player.position(), world.player.home());

        let _ = catch_player(&mut world);
        assert_eq!(world.player.position(), world.player.home());
        assert_eq!(world.player.velocity(), maze_chase_core::Velocity::ZERO);
        for adversary in &world.adversaries {
            let position = adversary.position();
            let home = adversary.home();
            let drift = (position.x - home.x).abs() + (position.y - home.y).abs();
            assert!(drift <= 2 * STEP_LENGTH, "adversary strayed {drift} units");
        }
    }

    #[test]
    fn game_over_stops_the_tick_before_items() {
        let mut world = classic();
        world.lives = 1;
        let item_position = world.items[0].position();
        world.player.place(Position::new(item_position.x - 14, item_position.y - 14));
        world.adversaries[0].place(world.player.position());

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);

        assert_eq!(world.status, GameStatus::GameOver);
        assert_eq!(world.items.len(), 198);
        assert_eq!(world.score, 0);
    }

    #[test]
    fn at_most_one_item_is_collected_per_tick() {
        let mut world = classic();
        // Straddles the items of columns 1 and 2 in row 1.
        world.player.place(Position::new(48, 32));
        assert_eq!(
            world
                .items
                .iter()
                .filter(|item| collides(&world.player.rect(), &item.rect()))
                .count(),
            2
        );

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(world.items.len(), 197);
        assert_eq!(world.score, 10);
        assert!(events.contains(&Event::ItemCollected {
            points: 10,
            score: 10,
        }));

        events.clear();
        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(world.items.len(), 196);
        assert_eq!(world.score, 20);
    }

    #[test]
    fn clearing_the_last_item_reloads_the_board() {
        let mut world = classic();
        world.lives = 2;
        let last = world.items[5].clone();
        world.items = vec![last.clone()];
        world.score = 990;
        world.player.place(Position::new(
            last.position().x - ITEM_INSET,
            last.position().y - ITEM_INSET,
        ));

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);

        assert!(events.contains(&Event::LevelCleared { score: 1000 }));
        assert_eq!(world.items.len(), 198);
        assert_eq!(world.score, 1000);
        assert_eq!(world.lives, 2);
        assert_eq!(world.player.position(), world.player.home());
    }

    #[test]
    fn restart_restores_a_fresh_game() {
        let mut world = classic();
        world.score = 70;
        let _ = world.items.drain(..10);
        for _ in 0..3 {
            let _ = catch_player(&mut world);
        }
        assert_eq!(world.status, GameStatus::GameOver);

        let mut events = Vec::new();
        apply(&mut world, Command::Restart, &mut events);

        assert_eq!(events, vec![Event::GameRestarted]);
        assert_eq!(world.status, GameStatus::Running);
        assert_eq!(world.lives, STARTING_LIVES);
        assert_eq!(world.score, 0);
        assert_eq!(world.items.len(), 198);
        assert_eq!(world.player.position(), world.player.home());
        assert_eq!(world.player.direction(), Direction::Right);
    }

    #[test]
    fn restart_is_ignored_while_running() {
        let mut world = classic();
        world.score = 30;
        let mut events = Vec::new();
        apply(&mut world, Command::Restart, &mut events);
        assert!(events.is_empty());
        assert_eq!(world.score, 30);
    }

    #[test]
    fn player_appearance_follows_accepted_heading() {
        let mut world = classic();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::TurnPlayer {
                direction: Direction::Up,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::TurnRejected {
                requested: Direction::Up,
                retained: Direction::Right,
            }]
        );
        assert_eq!(
            world.player.appearance(),
            Appearance::Player {
                facing: Direction::Right,
            }
        );

        events.clear();
        apply(
            &mut world,
            Command::TurnPlayer {
                direction: Direction::Left,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::PlayerTurned {
                direction: Direction::Left,
            }]
        );
        assert_eq!(
            world.player.appearance(),
            Appearance::Player {
                facing: Direction::Left,
            }
        );
    }

    #[test]
    fn player_stops_at_walls_without_sliding() {
        let mut world = classic();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::TurnPlayer {
                direction: Direction::Left,
            },
            &mut events,
        );
        for _ in 0..40 {
            apply(&mut world, Command::Tick, &mut events);
            if world.status == GameStatus::GameOver {
                break;
            }
            assert!(!hits_any(&world.player, &world.walls));
        }
    }

    #[test]
    fn adversaries_never_overlap_walls_or_leave_the_board() {
        let mut world = classic();
        let mut events = Vec::new();
        let width = world.tile_grid.width();
        for _ in 0..2_000 {
            apply(&mut world, Command::Tick, &mut events);
            if world.status == GameStatus::GameOver {
                apply(&mut world, Command::Restart, &mut events);
            }
            for adversary in &world.adversaries {
                assert!(!hits_any(adversary, &world.walls));
                assert!(adversary.rect().left() > 0);
                assert!(adversary.rect().right() < width);
            }
        }
    }

    #[test]
    fn boxed_in_adversary_keeps_its_heading_and_stalls() {
        let map = TileMap::parse(&["XXXXX", "XbX P", "XXXXX"]).expect("valid layout");
        let mut world = World::with_layout(map, Rules::default(), SEED);
        let mut events = Vec::new();
        for _ in 0..20 {
            apply(&mut world, Command::Tick, &mut events);
            let blue = &world.adversaries[0];
            assert_eq!(blue.position(), blue.home());
            assert_eq!(blue.direction(), Direction::Right);
        }
    }

    #[test]
    fn blocked_adversary_may_repick_its_blocked_heading_and_stall() {
        let rows = ["XXXXXXX", "X     X", "Xb   PX", "X     X", "XXXXXXX"];
        let start = Position::new(TILE_SIZE, 2 * TILE_SIZE);
        let mut stalls = 0;
        for seed in 0..64 {
            let map = TileMap::parse(&rows).expect("valid layout");
            let mut world = World::with_layout(map, Rules::default(), seed);
            world.adversaries[0].place(start);
            world.adversaries[0].steer(Direction::Left);

            let mut events = Vec::new();
            apply(&mut world, Command::Tick, &mut events);
            assert!(events.is_empty());

            let blue = &world.adversaries[0];
            if blue.position() == start {
                assert_eq!(blue.direction(), Direction::Left);
                stalls += 1;
            } else {
                assert_ne!(blue.direction(), Direction::Left);
                assert_eq!(
                    blue.position(),
                    start.offset(blue.direction().velocity(STEP_LENGTH))
                );
            }
        }
        assert!(stalls > 0, "re-picking the blocked heading must be possible");
        assert!(stalls < 64, "open headings must be picked as well");
    }

    #[test]
    fn left_board_edge_only_lets_adversaries_leave_rightward() {
        let rows = ["XXXXXXX", "b  P   ", "XXXXXXX"];
        let mut departures = 0;
        for seed in 0..64 {
            let map = TileMap::parse(&rows).expect("valid layout");
            let mut world = World::with_layout(map, Rules::default(), seed);
            let blue = &world.adversaries[0];
            assert_eq!(blue.home(), Position::new(0, TILE_SIZE));
            assert_eq!(blue.direction(), Direction::Right);
            match blue.position().x {
                0 => {}
                STEP_LENGTH => departures += 1,
                x => panic!("adversary left its start column sideways to x={x}"),
            }

            let mut events = Vec::new();
            apply(&mut world, Command::Tick, &mut events);
            assert!(world.adversaries[0].position().x > 0);
        }
        assert!(departures > 0);
    }

    #[test]
    fn right_board_edge_rolls_adversaries_back() {
        let rows = ["XXXXXXX", " P   b ", "XXXXXXX"];
        let width = 7 * TILE_SIZE;
        let last_free_x = width - TILE_SIZE - STEP_LENGTH;
        for seed in 0..32 {
            let map = TileMap::parse(&rows).expect("valid layout");
            let mut world = World::with_layout(map, Rules::default(), seed);
            assert_eq!(world.tile_grid.width(), width);
            world.adversaries[0].place(Position::new(last_free_x, TILE_SIZE));
            world.adversaries[0].steer(Direction::Right);

            let mut events = Vec::new();
            apply(&mut world, Command::Tick, &mut events);

            let blue = &world.adversaries[0];
            assert!(blue.rect().right() < width);
            match blue.direction() {
                Direction::Right => {
                    assert_eq!(blue.position(), Position::new(last_free_x, TILE_SIZE));
                }
                Direction::Left => assert_eq!(
                    blue.position(),
                    Position::new(last_free_x - STEP_LENGTH, TILE_SIZE)
                ),
                other => panic!("walls should have rejected {other:?}"),
            }
        }
    }

    #[test]
    fn same_seed_replays_identically() {
        let script = [
            Command::TurnPlayer {
                direction: Direction::Left,
            },
            Command::Tick,
            Command::Tick,
            Command::TurnPlayer {
                direction: Direction::Up,
            },
        ];
        let run = || {
            let mut world = classic();
            let mut events = Vec::new();
            for _ in 0..50 {
                for command in script {
                    apply(&mut world, command, &mut events);
                }
            }
            let positions: Vec<Position> =
                world.adversaries.iter().map(Block::position).collect();
            (events, positions, world.score, world.lives)
        };
        assert_eq!(run(), run());
    }
}
