//! Grid simulation for a terminal snake game.
//!
//! A [`GridWorld`] is built once per game from a [`GameConfig`], then advanced
//! one tick at a time with [`GridWorld::step`]. The world never touches the
//! terminal: the caller reads the dirty cells after each tick and redraws them.

pub mod config;
pub mod error;
pub mod snake;
pub mod step;
pub mod world;

pub use config::{GameConfig, Symbols};
pub use error::{ConfigError, Error, Result};
pub use snake::{Direction, Snake};
pub use step::{Collision, StepOutcome};
pub use world::{BadGuy, Cell, Glyph, GridWorld};

pub type GridInt = i32;

/// Grid position as `(row, col)`.
pub type Coords = (GridInt, GridInt);

/// Movement as `(d_row, d_col)`, each component in `-1..=1`.
pub type Vector = (GridInt, GridInt);

pub const STATIONARY: Vector = (0, 0);

pub fn offset(pos: Coords, vector: Vector) -> Coords {
    (pos.0 + vector.0, pos.1 + vector.1)
}
