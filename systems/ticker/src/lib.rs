#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-rate clock that turns frame time into simulation ticks.

use std::time::Duration;

use maze_chase_core::{Command, GameStatus, TICK_INTERVAL};

/// Upper bound on ticks emitted for a single frame by default.
pub const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 5;

/// Configuration parameters required to construct the ticker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    tick_interval: Duration,
    max_ticks_per_frame: u32,
}

impl Config {
    /// Creates a configuration with the provided cadence and per-frame cap.
    #[must_use]
    pub const fn new(tick_interval: Duration, max_ticks_per_frame: u32) -> Self {
        Self {
            tick_interval,
            max_ticks_per_frame,
        }
    }

    /// Time that elapses between consecutive ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(TICK_INTERVAL, DEFAULT_MAX_TICKS_PER_FRAME)
    }
}

/// Pure system that emits [`Command::Tick`] once per elapsed interval.
#[derive(Debug)]
pub struct Ticker {
    tick_interval: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
}

impl Ticker {
    /// Creates a ticker using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tick_interval: config.tick_interval,
            max_ticks_per_frame: config.max_ticks_per_frame,
            accumulator: Duration::ZERO,
        }
    }

    /// Accumulates frame time and emits the ticks that became due.
    ///
    /// Nothing accumulates while the game is over. When a frame falls behind
    /// by more than the per-frame cap, the surplus time is discarded instead of
    /// being replayed on later frames.
    pub fn handle(&mut self, dt: Duration, status: GameStatus, out: &mut Vec<Command>) {
        if status == GameStatus::GameOver {
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.tick_interval.is_zero() || dt.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let ticks = self.resolve_due_ticks();
        out.extend((0..ticks).map(|_| Command::Tick));
    }

    fn resolve_due_ticks(&mut self) -> u32 {
        if self.tick_interval.is_zero() {
            return 0;
        }

        let mut ticks = 0;
        while self.accumulator >= self.tick_interval {
            if ticks == self.max_ticks_per_frame {
                self.accumulator = Duration::ZERO;
                break;
            }
            self.accumulator -= self.tick_interval;
            ticks += 1;
        }
        ticks
    }
}
