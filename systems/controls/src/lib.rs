#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system translating released keys into player commands.

use maze_chase_core::{Command, Direction, Event, GameStatus};

const KEY_BINDINGS: [(&str, Direction); 8] = [
    ("ArrowUp", Direction::Up),
    ("KeyW", Direction::Up),
    ("ArrowDown", Direction::Down),
    ("KeyS", Direction::Down),
    ("ArrowLeft", Direction::Left),
    ("KeyA", Direction::Left),
    ("ArrowRight", Direction::Right),
    ("KeyD", Direction::Right),
];

/// Resolves a physical key code such as `"ArrowUp"` or `"KeyW"` to a heading.
///
/// Matching ignores ASCII case.
#[must_use]
pub fn direction_for_key(code: &str) -> Option<Direction> {
    KEY_BINDINGS
        .iter()
        .find(|(binding, _)| binding.eq_ignore_ascii_case(code))
        .map(|(_, direction)| *direction)
}

/// Input system that follows the game status through world events.
#[derive(Clone, Debug, Default)]
pub struct Controls {
    status: GameStatus,
}

impl Controls {
    /// Creates a controls system for a game that is already running.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: GameStatus::Running,
        }
    }

    /// Status last observed through the event stream.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Consumes world events and the keys released this frame to emit commands.
    ///
    /// While running, every bound key produces a turn and unbound keys are
    /// ignored. After the game ends, the first released key of any kind
    /// requests a restart and the remaining keys of that frame are dropped.
    pub fn handle<S: AsRef<str>>(
        &mut self,
        events: &[Event],
        released_keys: &[S],
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::GameOver { .. } => self.status = GameStatus::GameOver,
                Event::GameRestarted => self.status = GameStatus::Running,
                _ => {}
            }
        }

        match self.status {
            GameStatus::GameOver => {
                if !released_keys.is_empty() {
                    out.push(Command::Restart);
                }
            }
            GameStatus::Running => out.extend(
                released_keys
                    .iter()
                    .filter_map(|key| direction_for_key(key.as_ref()))
                    .map(|direction| Command::TurnPlayer { direction }),
            ),
        }
    }
}
