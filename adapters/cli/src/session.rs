//! Frame-by-frame wiring of controls, ticker and world, plus scene population.

use std::time::Duration;

use log::{debug, info};
use maze_chase_core::{Command, Event, GameStatus};
use maze_chase_rendering::{
    rect_to_board, HudPresentation, ItemPresentation, Scene, SpriteKey, SpritePresentation,
};
use maze_chase_system_controls::Controls;
use maze_chase_system_ticker::{Config as TickerConfig, Ticker};
use maze_chase_world::{self as world, query, Block, World};

/// Owns the world and the systems that drive it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    controls: Controls,
    ticker: Ticker,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Session {
    pub(crate) fn new(world: World, ticker: TickerConfig) -> Self {
        Self {
            world,
            controls: Controls::new(),
            ticker: Ticker::new(ticker),
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Runs one frame: released keys first, then every tick that became due.
    pub(crate) fn advance<S: AsRef<str>>(&mut self, dt: Duration, released_keys: &[S]) {
        self.controls.handle(&self.events, released_keys, &mut self.commands);
        self.events.clear();
        self.apply_pending();

        let status = query::status(&self.world);
        self.ticker.handle(dt, status, &mut self.commands);
        self.apply_pending();

        for event in &self.events {
            log_event(event);
        }
    }

    fn apply_pending(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Events produced during the most recent frame.
    #[cfg(test)]
    pub(crate) fn events(&self) -> &[Event] {
        &self.events
    }
}

fn log_event(event: &Event) {
    match event {
        Event::LifeLost { lives_remaining } => {
            debug!("life lost, {lives_remaining} remaining");
        }
        Event::LevelCleared { score } => info!("board cleared with a score of {score}"),
        _ => {}
    }
}

fn sprite_for(block: &Block) -> Option<SpritePresentation> {
    let sprite = SpriteKey::for_appearance(block.appearance())?;
    let (position, size) = rect_to_board(block.rect());
    Some(SpritePresentation::new(sprite, position, size))
}

/// Rebuilds the scene from the world's current state.
pub(crate) fn populate_scene(world: &World, scene: &mut Scene) {
    scene.walls.clear();
    scene.walls.extend(query::walls(world).iter().filter_map(sprite_for));

    scene.items.clear();
    scene.items.extend(query::items(world).iter().map(|item| {
        let (position, size) = rect_to_board(item.rect());
        ItemPresentation::new(position, size)
    }));

    scene.adversaries.clear();
    scene
        .adversaries
        .extend(query::adversaries(world).iter().filter_map(sprite_for));

    let player = query::player(world);
    scene.player = sprite_for(player).unwrap_or_else(|| {
        let (position, size) = rect_to_board(player.rect());
        SpritePresentation::new(SpriteKey::PlayerRight, position, size)
    });

    scene.hud = HudPresentation::new(
        query::lives(world),
        query::score(world),
        query::status(world),
    );
}

/// Outcome of a windowless run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HeadlessSummary {
    pub(crate) ticks: u64,
    pub(crate) lives: u32,
    pub(crate) score: u32,
    pub(crate) status: GameStatus,
    pub(crate) items_collected: u32,
    pub(crate) levels_cleared: u32,
}

/// Applies up to `ticks` ticks without input, stopping early when the game ends.
pub(crate) fn run_headless(world: &mut World, ticks: u64) -> HeadlessSummary {
    let mut events = Vec::new();
    let mut summary = HeadlessSummary {
        ticks: 0,
        lives: query::lives(world),
        score: query::score(world),
        status: query::status(world),
        items_collected: 0,
        levels_cleared: 0,
    };

    while summary.ticks < ticks && query::status(world) == GameStatus::Running {
        world::apply(world, Command::Tick, &mut events);
        summary.ticks += 1;
        for event in events.drain(..) {
            match event {
                Event::ItemCollected { .. } => summary.items_collected += 1,
                Event::LevelCleared { .. } => summary.levels_cleared += 1,
                _ => {}
            }
        }
    }

    summary.lives = query::lives(world);
    summary.score = query::score(world);
    summary.status = query::status(world);
    summary
}
