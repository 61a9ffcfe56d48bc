//! Pending input between ticks
//!
//! Commands only land here; the tick handler consumes them.

use std::collections::VecDeque;

use super::state::Direction;
use crate::consts::DIRECTION_QUEUE_CAPACITY;

#[derive(Debug, Clone, Default)]
pub struct InputController {
    /// Coalesced jump/flap request
    jump_pending: bool,
    /// Buffered turns (grid game)
    queued: VecDeque<Direction>,
}

impl InputController {
    pub fn new() -> Self {
        Self {
            jump_pending: false,
            queued: VecDeque::with_capacity(DIRECTION_QUEUE_CAPACITY),
        }
    }

    /// Request a jump; repeated requests within a tick coalesce
    pub fn press_jump(&mut self) {
        self.jump_pending = true;
    }

    /// Consume the pending jump (at most once per tick)
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_pending)
    }

    /// Queue a turn, filtered against the last queued direction (or the
    /// active heading when nothing is queued). Repeats, reversals and
    /// overflow are dropped. Returns whether the turn was queued.
    pub fn queue_direction(&mut self, direction: Direction, heading: Direction) -> bool {
        if self.queued.len() >= DIRECTION_QUEUE_CAPACITY {
            return false;
        }
        let last = self.last_direction().unwrap_or(heading);
        if direction == last || direction == last.opposite() {
            return false;
        }
        self.queued.push_back(direction);
        true
    }

    /// Pop the next turn, re-checked against the heading at drain time
    pub fn next_direction(&mut self, heading: Direction) -> Option<Direction> {
        self.queued
            .pop_front()
            .filter(|&direction| direction != heading.opposite())
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.queued.back().copied()
    }

    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    /// Drop everything pending
    pub fn clear(&mut self) {
        self.jump_pending = false;
        self.queued.clear();
    }
}
