//! Collision detection
//!
//! Axis-aligned boxes for the runner and the flyer, cell equality for the
//! snake. Boxes that only share an edge do not collide.

use glam::Vec2;

use super::state::{Body, Cell, GridWorld, Obstacle, Snake};

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Strict overlap (positive area intersection)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains(&self, other: &Rect) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Left the playfield or grid
    Boundary,
    /// Hit the obstacle with this id
    Obstacle(u32),
    /// Snake head ran into its own body
    SelfHit,
}

/// Flyer bounds: any part of the body above the top or below the bottom
pub fn body_out_of_bounds(body: &Body, height: f32) -> bool {
    let band = Rect::new(Vec2::new(f32::MIN, 0.0), Vec2::new(f32::MAX, height));
    !band.contains(&body.rect())
}

/// First obstacle (in iteration order) overlapping the body
pub fn body_obstacle_collision(body: &Body, obstacles: &[Obstacle], floor: f32) -> Option<Collision> {
    let rect = body.rect();
    obstacles
        .iter()
        .find(|obstacle| {
            obstacle
                .hitboxes(floor)
                .iter()
                .flatten()
                .any(|hitbox| hitbox.overlaps(&rect))
        })
        .map(|obstacle| Collision::Obstacle(obstacle.id))
}

/// Head cell against every non-head segment
pub fn head_hits_body(snake: &Snake) -> bool {
    let head = snake.head();
    snake.segments.iter().skip(1).any(|&cell| cell == head)
}

/// Grid boundary check for a prospective head cell
pub fn cell_out_of_grid(world: &GridWorld, cell: Cell) -> bool {
    !world.contains(cell)
}
