//! Physics integration
//!
//! Arcade-style: constant gravity, an instantaneous jump impulse, and a
//! one-cell-per-step grid mover. Units are pixels and ticks.

use super::state::{Body, Obstacle, Snake};
use crate::config::ContinuousConfig;

/// Vertical integration mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalMode {
    /// Clamp at the ground line; jumps only while grounded
    Grounded,
    /// No clamp; leaving the playfield is a collision
    Free,
}

/// Advance a body by one tick. Returns whether the jump was consumed.
pub fn integrate_body(body: &mut Body, config: &ContinuousConfig, mode: VerticalMode, jump: bool) -> bool {
    let consumed = jump && (mode == VerticalMode::Free || body.grounded);
    if consumed {
        body.vel_y = config.impulse;
        body.grounded = false;
    }

    body.vel_y += config.gravity;
    body.pos.y += body.vel_y;

    if mode == VerticalMode::Grounded && body.bottom() >= config.ground_y {
        body.pos.y = config.ground_y - body.size.y;
        body.vel_y = 0.0;
        body.grounded = true;
    }

    consumed
}

/// Scroll obstacles left by `speed`
pub fn scroll_obstacles(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles.iter_mut() {
        obstacle.x -= speed;
    }
}

/// Move the snake one cell along its heading; the tail stays when growing
pub fn advance_snake(snake: &mut Snake, grow: bool) {
    let head = snake.next_head();
    snake.segments.push_front(head);
    if !grow {
        snake.segments.pop_back();
    }
}
