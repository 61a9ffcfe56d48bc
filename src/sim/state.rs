//! Simulation state and core entity types
//!
//! Everything a tick mutates lives here; commands never touch these types
//! directly.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::{GameKind, RewardGrant};

/// Current phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start command
    #[default]
    Idle,
    /// Active gameplay (ticking)
    Playing,
    /// Run ended, last frame frozen
    GameOver,
}

/// Command tokens accepted by `GameSession::submit_command`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Jump,
    Up,
    Down,
    Left,
    Right,
    Pause,
    Resume,
}

impl Command {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Command::Up => Some(Direction::Up),
            Command::Down => Some(Direction::Down),
            Command::Left => Some(Direction::Left),
            Command::Right => Some(Direction::Right),
            _ => None,
        }
    }

    /// Whether the token belongs to the command set of a game kind
    pub fn accepted_by(&self, kind: GameKind) -> bool {
        match self {
            Command::Start => true,
            Command::Jump => kind.is_continuous(),
            _ => !kind.is_continuous(),
        }
    }
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Command::Up,
            Direction::Down => Command::Down,
            Direction::Left => Command::Left,
            Direction::Right => Command::Right,
        }
    }
}

/// Grid heading. Up decreases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(&self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Player body for the runner and the flyer (x fixed, y integrated)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel_y: f32,
    pub size: Vec2,
    /// Resting on the ground line (runner only)
    pub grounded: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel_y: 0.0,
            size,
            grounded: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Obstacle geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleShape {
    /// Block standing on the ground line
    Ground { height: f32 },
    /// Pipe pair with an opening between `gap_top` and `gap_bottom`
    Pipe { gap_top: f32, gap_bottom: f32 },
}

/// A scrolling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub shape: ObstacleShape,
    /// Set once the obstacle has scrolled behind the player
    pub passed: bool,
}

impl Obstacle {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Solid rectangles; `floor` is the ground line (runner) or playfield
    /// bottom (flyer)
    pub fn hitboxes(&self, floor: f32) -> [Option<Rect>; 2] {
        match self.shape {
            ObstacleShape::Ground { height } => [
                Some(Rect::new(
                    Vec2::new(self.x, floor - height),
                    Vec2::new(self.right(), floor),
                )),
                None,
            ],
            ObstacleShape::Pipe {
                gap_top,
                gap_bottom,
            } => [
                Some(Rect::new(Vec2::new(self.x, 0.0), Vec2::new(self.right(), gap_top))),
                Some(Rect::new(
                    Vec2::new(self.x, gap_bottom),
                    Vec2::new(self.right(), floor),
                )),
            ],
        }
    }
}

/// The snake: segments head-first, no duplicates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    pub segments: VecDeque<Cell>,
    pub heading: Direction,
}

impl Snake {
    pub fn new(head: Cell, heading: Direction) -> Self {
        let mut segments = VecDeque::with_capacity(16);
        segments.push_back(head);
        Self { segments, heading }
    }

    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    /// Cell the head moves into on the next step
    pub fn next_head(&self) -> Cell {
        self.head().step(self.heading)
    }
}

/// World state for the runner and the flyer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinuousWorld {
    pub body: Body,
    /// Active obstacles (ordered by id, oldest first)
    pub obstacles: Vec<Obstacle>,
    /// Current scroll speed (pixels per tick)
    pub speed: f32,
    /// Distance scrolled since the last spawn
    pub since_spawn: f32,
    /// Spacing threshold for the next spawn
    pub next_spawn: f32,
    next_id: u32,
}

impl ContinuousWorld {
    pub fn new(body: Body, speed: f32, next_spawn: f32) -> Self {
        Self {
            body,
            obstacles: Vec::new(),
            speed,
            since_spawn: 0.0,
            next_spawn,
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// World state for the snake game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridWorld {
    pub snake: Snake,
    /// Absent only when the snake fills the grid
    pub food: Option<Cell>,
    pub columns: u32,
    pub rows: u32,
    /// Grid steps per second
    pub speed: f32,
}

impl GridWorld {
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.columns as i32 && cell.y < self.rows as i32
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// Per-variant world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum World {
    Continuous(ContinuousWorld),
    Grid(GridWorld),
}

/// Domain events for the host to present
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Started { game: GameKind },
    Scored { score: u64 },
    GameOver { score: u64 },
    NewHighScore {
        score: u64,
        previous: u64,
        reward: RewardGrant,
    },
    PersistenceFailed {
        operation: &'static str,
        message: String,
    },
    Paused,
    Resumed,
}
