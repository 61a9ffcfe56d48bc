//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of host
//! concerns:
//! - One tick per call, no wall-clock time
//! - Randomness only through an injected `RandomSource`
//! - Stable iteration order (obstacles by id)
//! - No rendering, persistence or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod input;
pub mod physics;
pub mod random;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Collision, Rect};
pub use difficulty::{gap_for_spawn, speed_for};
pub use input::InputController;
pub use random::{PcgRandom, RandomSource, SequenceRandom};
pub use state::{
    Body, Cell, Command, ContinuousWorld, Direction, GameEvent, GamePhase, GridWorld, Obstacle,
    ObstacleShape, Snake, World,
};
pub use tick::{TickOutcome, init_continuous, init_grid, step_grid, tick_continuous};
