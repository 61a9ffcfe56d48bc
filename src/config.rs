//! Per-game configuration constants
//!
//! Fixed at session construction; never edited while a game runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Direction;

/// Which mini-game a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Runner,
    Flyer,
    Snake,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Runner => "runner",
            GameKind::Flyer => "flyer",
            GameKind::Snake => "snake",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "runner" | "dino" => Some(GameKind::Runner),
            "flyer" | "flappy" => Some(GameKind::Flyer),
            "snake" => Some(GameKind::Snake),
            _ => None,
        }
    }

    /// Whether the game uses gravity/impulse physics (vs grid movement)
    pub fn is_continuous(&self) -> bool {
        !matches!(self, GameKind::Snake)
    }
}

/// Fixed reward granted once per new high score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardGrant {
    pub experience: u32,
    pub currency: u32,
}

/// Speed progression: `min(max, initial + floor(score / interval) * step)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedCurve {
    pub initial: f32,
    pub max: f32,
    pub step: f32,
    /// Score points per speed step
    pub interval: u32,
}

/// Gap/spacing progression
///
/// Held at `initial` until the score reaches `variance_score`, then redrawn
/// per spawn within `[min, initial]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapCurve {
    pub initial: f32,
    pub min: f32,
    pub variance_score: u32,
}

/// Configuration shared by the runner and the flyer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousConfig {
    /// Playfield width and height (y grows downward)
    pub playfield: Vec2,
    /// Top of the ground strip (runner only; the flyer's floor is the
    /// playfield bottom)
    pub ground_y: f32,
    /// Fixed horizontal position of the player's left edge
    pub player_x: f32,
    pub player_size: Vec2,
    /// Player top edge at start
    pub start_y: f32,
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Vertical velocity set by a jump/flap (negative = up)
    pub impulse: f32,
    /// Obstacle scroll speed in pixels per tick
    pub speed: SpeedCurve,
    /// Runner: lower bound of the spawn spacing. Flyer: vertical opening size.
    pub gap: GapCurve,
    /// Lower bound of the spawn spacing (flyer only)
    pub min_spacing: f32,
    /// Upper bound of the spawn spacing
    pub max_spacing: f32,
    pub obstacle_width: f32,
    /// Obstacle height bounds (runner only; flyer pipes are sized by `gap`)
    pub min_obstacle_height: f32,
    pub max_obstacle_height: f32,
    /// Minimum distance between the opening and the playfield edges (flyer only)
    pub gap_margin: f32,
    pub reward: RewardGrant,
}

impl ContinuousConfig {
    /// Endless runner defaults
    pub fn runner() -> Self {
        Self {
            playfield: Vec2::new(800.0, 300.0),
            ground_y: 250.0,
            player_x: 50.0,
            player_size: Vec2::new(30.0, 40.0),
            start_y: 210.0,
            gravity: 0.6,
            impulse: -10.0,
            speed: SpeedCurve {
                initial: 6.0,
                max: 14.0,
                step: 0.5,
                interval: 5,
            },
            gap: GapCurve {
                initial: 300.0,
                min: 220.0,
                variance_score: 15,
            },
            min_spacing: 300.0,
            max_spacing: 520.0,
            obstacle_width: 20.0,
            min_obstacle_height: 25.0,
            max_obstacle_height: 55.0,
            gap_margin: 0.0,
            reward: RewardGrant {
                experience: 50,
                currency: 10,
            },
        }
    }

    /// Side-scrolling flyer defaults
    pub fn flyer() -> Self {
        Self {
            playfield: Vec2::new(400.0, 600.0),
            ground_y: 600.0,
            player_x: 80.0,
            player_size: Vec2::new(34.0, 24.0),
            start_y: 288.0,
            gravity: 0.5,
            impulse: -8.0,
            speed: SpeedCurve {
                initial: 3.0,
                max: 6.0,
                step: 0.25,
                interval: 5,
            },
            gap: GapCurve {
                initial: 160.0,
                min: 120.0,
                variance_score: 10,
            },
            min_spacing: 220.0,
            max_spacing: 300.0,
            obstacle_width: 60.0,
            min_obstacle_height: 0.0,
            max_obstacle_height: 0.0,
            gap_margin: 50.0,
            reward: RewardGrant {
                experience: 50,
                currency: 10,
            },
        }
    }

    /// Highest point above the take-off line a single jump reaches
    ///
    /// Closed form of the per-tick rise `-(impulse + k * gravity)` summed
    /// over the ticks where the velocity is still upward. `None` without a
    /// finite positive gravity and a finite impulse.
    pub fn jump_apex(&self) -> Option<f32> {
        let gravity = f64::from(self.gravity);
        let impulse = f64::from(self.impulse);
        if !(gravity > 0.0 && gravity.is_finite() && impulse.is_finite()) {
            return None;
        }
        if impulse >= 0.0 {
            return Some(0.0);
        }
        let rising = ((-impulse / gravity).ceil() - 1.0).max(0.0);
        let height = -(rising * impulse + gravity * rising * (rising + 1.0) / 2.0);
        Some(height as f32)
    }
}

/// Snake grid configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub columns: u32,
    pub rows: u32,
    /// Head cell at start
    pub start: (i32, i32),
    pub start_heading: Direction,
    /// Grid steps per second
    pub speed: SpeedCurve,
    pub reward: RewardGrant,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 20,
            start: (10, 10),
            start_heading: Direction::Up,
            speed: SpeedCurve {
                initial: 8.0,
                max: 20.0,
                step: 1.0,
                interval: 5,
            },
            reward: RewardGrant {
                experience: 30,
                currency: 5,
            },
        }
    }
}

/// Configuration for one game variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameConfig {
    Runner(ContinuousConfig),
    Flyer(ContinuousConfig),
    Snake(GridConfig),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field}: lower bound {min} exceeds upper bound {max}")]
    InvertedBounds {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{0} must be positive")]
    NotPositive(&'static str),
    #[error("obstacle height {max_height} is not clearable by a {apex} jump")]
    Untraversable { max_height: f32, apex: f32 },
    #[error("opening {gap} plus margins does not fit a playfield of height {height}")]
    GapTooLarge { gap: f32, height: f32 },
    #[error("grid {columns}x{rows} exceeds the addressable cell range")]
    GridTooLarge { columns: u32, rows: u32 },
    #[error("start cell ({0}, {1}) lies outside the grid")]
    StartOutsideGrid(i32, i32),
}

impl GameConfig {
    pub fn kind(&self) -> GameKind {
        match self {
            GameConfig::Runner(_) => GameKind::Runner,
            GameConfig::Flyer(_) => GameKind::Flyer,
            GameConfig::Snake(_) => GameKind::Snake,
        }
    }

    /// Default configuration for a game kind
    pub fn preset(kind: GameKind) -> Self {
        match kind {
            GameKind::Runner => GameConfig::Runner(ContinuousConfig::runner()),
            GameKind::Flyer => GameConfig::Flyer(ContinuousConfig::flyer()),
            GameKind::Snake => GameConfig::Snake(GridConfig::default()),
        }
    }

    pub fn reward(&self) -> RewardGrant {
        match self {
            GameConfig::Runner(c) | GameConfig::Flyer(c) => c.reward,
            GameConfig::Snake(c) => c.reward,
        }
    }

    pub fn speed_curve(&self) -> &SpeedCurve {
        match self {
            GameConfig::Runner(c) | GameConfig::Flyer(c) => &c.speed,
            GameConfig::Snake(c) => &c.speed,
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ordering constraints between bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_speed(self.speed_curve())?;
        match self {
            GameConfig::Runner(c) => {
                validate_continuous(c)?;
                ordered("obstacle height", c.min_obstacle_height, c.max_obstacle_height)?;
                ordered("spacing", c.gap.initial, c.max_spacing)?;
                let apex = c.jump_apex().ok_or(ConfigError::NotPositive("gravity"))?;
                if c.max_obstacle_height >= apex {
                    return Err(ConfigError::Untraversable {
                        max_height: c.max_obstacle_height,
                        apex,
                    });
                }
                Ok(())
            }
            GameConfig::Flyer(c) => {
                validate_continuous(c)?;
                ordered("spacing", c.min_spacing, c.max_spacing)?;
                if c.gap.initial + 2.0 * c.gap_margin > c.playfield.y {
                    return Err(ConfigError::GapTooLarge {
                        gap: c.gap.initial,
                        height: c.playfield.y,
                    });
                }
                Ok(())
            }
            GameConfig::Snake(c) => {
                if c.columns == 0 {
                    return Err(ConfigError::NotPositive("columns"));
                }
                if c.rows == 0 {
                    return Err(ConfigError::NotPositive("rows"));
                }
                if c.columns > i32::MAX as u32 || c.rows > i32::MAX as u32 {
                    return Err(ConfigError::GridTooLarge {
                        columns: c.columns,
                        rows: c.rows,
                    });
                }
                let (x, y) = c.start;
                if x < 0 || y < 0 || x >= c.columns as i32 || y >= c.rows as i32 {
                    return Err(ConfigError::StartOutsideGrid(x, y));
                }
                Ok(())
            }
        }
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedBounds { field, min, max });
    }
    Ok(())
}

fn validate_speed(speed: &SpeedCurve) -> Result<(), ConfigError> {
    if speed.interval == 0 {
        return Err(ConfigError::NotPositive("speed interval"));
    }
    if speed.initial <= 0.0 {
        return Err(ConfigError::NotPositive("initial speed"));
    }
    ordered("speed", speed.initial, speed.max)
}

fn validate_continuous(c: &ContinuousConfig) -> Result<(), ConfigError> {
    if c.playfield.x <= 0.0 || c.playfield.y <= 0.0 {
        return Err(ConfigError::NotPositive("playfield"));
    }
    if c.obstacle_width <= 0.0 {
        return Err(ConfigError::NotPositive("obstacle width"));
    }
    if !(c.gravity > 0.0 && c.gravity.is_finite()) {
        return Err(ConfigError::NotPositive("gravity"));
    }
    // Impulse points up (negative y)
    if !(c.impulse < 0.0 && c.impulse.is_finite()) {
        return Err(ConfigError::NotPositive("jump strength"));
    }
    ordered("gap", c.gap.min, c.gap.initial)
}
