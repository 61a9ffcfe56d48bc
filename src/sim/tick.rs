//! World initialization and per-tick advancement
//!
//! Order within a tick: input, physics, spawning, collision, scoring, then
//! difficulty. A collision ends the tick immediately.

use glam::Vec2;

use super::collision::{Collision, body_obstacle_collision, body_out_of_bounds, cell_out_of_grid, head_hits_body};
use super::difficulty::{gap_for_spawn, speed_for};
use super::physics::{VerticalMode, advance_snake, integrate_body, scroll_obstacles};
use super::random::RandomSource;
use super::spawn::{draw_spacing, place_food, spawn_obstacle};
use super::state::{Body, Cell, ContinuousWorld, Direction, GridWorld, Snake};
use crate::config::{ContinuousConfig, GameKind, GridConfig};

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Points earned this tick
    pub scored: u64,
    /// Set when the run ended this tick
    pub collision: Option<Collision>,
}

impl TickOutcome {
    fn collided(collision: Collision) -> Self {
        Self {
            scored: 0,
            collision: Some(collision),
        }
    }
}

fn vertical_mode(kind: GameKind) -> VerticalMode {
    match kind {
        GameKind::Runner => VerticalMode::Grounded,
        _ => VerticalMode::Free,
    }
}

/// Line obstacles stand on and pipes extend to
fn floor_line(kind: GameKind, config: &ContinuousConfig) -> f32 {
    match kind {
        GameKind::Runner => config.ground_y,
        _ => config.playfield.y,
    }
}

/// Fresh runner/flyer world at score 0
pub fn init_continuous(kind: GameKind, config: &ContinuousConfig, rng: &mut dyn RandomSource) -> ContinuousWorld {
    let mut body = Body::new(Vec2::new(config.player_x, config.start_y), config.player_size);
    body.grounded = kind == GameKind::Runner && body.bottom() >= config.ground_y;

    let gap = gap_for_spawn(0, &config.gap, rng);
    let first_spawn = draw_spacing(kind, config, gap, rng);
    ContinuousWorld::new(body, speed_for(0, &config.speed), first_spawn)
}

/// Fresh snake world: single segment at the start cell, food placed
pub fn init_grid(config: &GridConfig, rng: &mut dyn RandomSource) -> GridWorld {
    let (x, y) = config.start;
    let mut world = GridWorld {
        snake: Snake::new(Cell::new(x, y), config.start_heading),
        food: None,
        columns: config.columns,
        rows: config.rows,
        speed: speed_for(0, &config.speed),
    };
    world.food = place_food(&world, rng);
    world
}

/// Advance the runner/flyer world by one tick
pub fn tick_continuous(
    world: &mut ContinuousWorld,
    kind: GameKind,
    config: &ContinuousConfig,
    score: u64,
    jump: bool,
    rng: &mut dyn RandomSource,
) -> TickOutcome {
    let mode = vertical_mode(kind);

    // Physics
    integrate_body(&mut world.body, config, mode, jump);
    scroll_obstacles(&mut world.obstacles, world.speed);
    world.since_spawn += world.speed;

    // Spawning
    if world.since_spawn >= world.next_spawn {
        let gap = gap_for_spawn(score, &config.gap, rng);
        let id = world.next_entity_id();
        let obstacle = spawn_obstacle(id, kind, config, gap, rng);
        log::debug!("Spawned obstacle {} ({:?}) gap={:.1}", id, obstacle.shape, gap);
        world.obstacles.push(obstacle);
        world.since_spawn = 0.0;
        world.next_spawn = draw_spacing(kind, config, gap, rng);
    }

    // Collision
    if mode == VerticalMode::Free && body_out_of_bounds(&world.body, config.playfield.y) {
        return TickOutcome::collided(Collision::Boundary);
    }
    if let Some(collision) = body_obstacle_collision(&world.body, &world.obstacles, floor_line(kind, config)) {
        return TickOutcome::collided(collision);
    }

    // Scoring: each obstacle counts once, when it is fully behind the player
    let player_left = world.body.pos.x;
    let mut scored = 0;
    for obstacle in world.obstacles.iter_mut() {
        if !obstacle.passed && obstacle.right() < player_left {
            obstacle.passed = true;
            scored += 1;
        }
    }
    world.obstacles.retain(|o| !o.passed || o.right() >= 0.0);

    // Difficulty
    let speed = speed_for(score + scored, &config.speed);
    if speed > world.speed {
        log::debug!("Speed {:.2} -> {:.2}", world.speed, speed);
        world.speed = speed;
    }

    TickOutcome {
        scored,
        collision: None,
    }
}

/// Advance the snake by one cell, applying `turn` first
pub fn step_grid(
    world: &mut GridWorld,
    config: &GridConfig,
    turn: Option<Direction>,
    score: u64,
    rng: &mut dyn RandomSource,
) -> TickOutcome {
    if let Some(direction) = turn {
        world.snake.heading = direction;
    }

    let next = world.snake.next_head();
    if cell_out_of_grid(world, next) {
        return TickOutcome::collided(Collision::Boundary);
    }

    let grow = world.food == Some(next);
    advance_snake(&mut world.snake, grow);

    if head_hits_body(&world.snake) {
        return TickOutcome::collided(Collision::SelfHit);
    }

    if !grow {
        return TickOutcome::default();
    }

    world.food = place_food(world, rng);
    log::debug!("Food eaten, length {}, next food {:?}", world.snake.len(), world.food);

    let speed = speed_for(score + 1, &config.speed);
    if speed > world.speed {
        log::debug!("Grid speed {:.1} -> {:.1} steps/s", world.speed, speed);
        world.speed = speed;
    }

    TickOutcome {
        scored: 1,
        collision: None,
    }
}
