//! Arcade Engine - tick-driven simulation for single-player mini-games
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, spawning, difficulty, input)
//! - `session`: Game session state machine and render snapshots
//! - `notifier`: Score tracking and new-high-score rewards
//! - `driver`: Frame loop driver
//! - `config`: Per-game configuration constants
//! - `highscores` / `rewards`: External collaborator interfaces

pub mod autopilot;
pub mod config;
pub mod driver;
pub mod highscores;
pub mod notifier;
pub mod rewards;
pub mod session;
pub mod sim;

pub use config::{ConfigError, ContinuousConfig, GameConfig, GameKind, GridConfig, RewardGrant};
pub use driver::{FrameScheduler, LoopDriver};
pub use highscores::{HighScoreStore, HighScoreTable, PersistError};
pub use rewards::{RecordingLedger, RewardLedger};
pub use session::{EntityView, GameSession, Snapshot};
pub use sim::{Command, GameEvent, GamePhase};

/// Engine-wide constants
pub mod consts {
    /// Host display refresh rate assumed by the loop driver (Hz)
    pub const REFRESH_HZ: f32 = 60.0;
    /// Duration of one display refresh (seconds)
    pub const FRAME_DT: f32 = 1.0 / REFRESH_HZ;
    /// Maximum grid steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Capacity of the buffered direction queue (grid game)
    pub const DIRECTION_QUEUE_CAPACITY: usize = 2;
}
