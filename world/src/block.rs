//! Rectangular entities and the direction controller that steers them.

use maze_chase_core::{
    collides, Appearance, Direction, Position, Rect, Size, Velocity, STEP_LENGTH,
};

/// Positioned rectangle shared by walls, items, adversaries and the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    appearance: Appearance,
    rect: Rect,
    home: Position,
    direction: Direction,
    velocity: Velocity,
}

impl Block {
    /// Creates a stationary block facing right whose home is its starting position.
    #[must_use]
    pub const fn new(appearance: Appearance, position: Position, size: Size) -> Self {
        Self {
            appearance,
            rect: Rect::new(position, size),
            home: position,
            direction: Direction::Right,
            velocity: Velocity::ZERO,
        }
    }

    /// Visual reference used by renderers.
    #[must_use]
    pub const fn appearance(&self) -> Appearance {
        self.appearance
    }

    /// Bounding box at the current position.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Current top-left corner.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.rect.position
    }

    /// Fixed extent of the block.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.rect.size
    }

    /// Position restored after a contact or a level reload.
    #[must_use]
    pub const fn home(&self) -> Position {
        self.home
    }

    /// Current heading.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Displacement applied on each tick.
    #[must_use]
    pub const fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub(crate) fn set_appearance(&mut self, appearance: Appearance) {
        self.appearance = appearance;
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, position: Position) {
        self.rect.position = position;
    }

    #[cfg(test)]
    pub(crate) fn steer(&mut self, direction: Direction) {
        self.head(direction);
    }

    pub(crate) fn advance(&mut self) {
        self.rect.position = self.rect.position.offset(self.velocity);
    }

    pub(crate) fn retreat(&mut self) {
        self.rect.position = self.rect.position.offset(self.velocity.reversed());
    }

    pub(crate) fn reset(&mut self) {
        self.rect.position = self.home;
    }

    pub(crate) fn halt(&mut self) {
        self.velocity = Velocity::ZERO;
    }

    fn head(&mut self, direction: Direction) {
        self.direction = direction;
        self.velocity = direction.velocity(STEP_LENGTH);
    }
}

/// Reports whether the block overlaps any of `others`.
#[must_use]
pub fn hits_any(block: &Block, others: &[Block]) -> bool {
    let rect = block.rect();
    others.iter().any(|other| collides(&rect, &other.rect()))
}

/// Turns `block` toward `direction` unless a wall lies one step ahead.
///
/// An accepted turn moves the block one step immediately. A rejected turn
/// restores the previous position and heading and recomputes the velocity for
/// that heading, so a block at rest starts moving along its old direction.
/// Returns whether the turn was accepted.
pub fn turn(block: &mut Block, direction: Direction, walls: &[Block]) -> bool {
    turn_unless(block, direction, |rect| {
        walls.iter().any(|wall| collides(rect, &wall.rect()))
    })
}

/// Variant of [`turn`] that consults an arbitrary blocking predicate.
pub(crate) fn turn_unless<F>(block: &mut Block, direction: Direction, is_blocked: F) -> bool
where
    F: Fn(&Rect) -> bool,
{
    let previous = block.direction;
    block.head(direction);
    block.advance();

    if is_blocked(&block.rect) {
        block.retreat();
        block.head(previous);
        return false;
    }

    true
}
