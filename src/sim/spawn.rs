//! Procedural generation of obstacles and food

use super::random::RandomSource;
use super::state::{Cell, GridWorld, Obstacle, ObstacleShape};
use crate::config::{ContinuousConfig, GameKind};

/// Distance to scroll before the next spawn
///
/// Runner: drawn from `[gap, max_spacing]`, where `gap` comes from the
/// difficulty scaler. Flyer: drawn from `[min_spacing, max_spacing]`.
pub fn draw_spacing(kind: GameKind, config: &ContinuousConfig, gap: f32, rng: &mut dyn RandomSource) -> f32 {
    let lo = match kind {
        GameKind::Runner => gap,
        _ => config.min_spacing,
    };
    rng.range(lo, config.max_spacing.max(lo))
}

/// Build an obstacle entering at the right edge of the playfield
///
/// Runner obstacles get a height within the configured bounds; flyer
/// obstacles get an opening of size `gap` placed fully inside the margins.
pub fn spawn_obstacle(
    id: u32,
    kind: GameKind,
    config: &ContinuousConfig,
    gap: f32,
    rng: &mut dyn RandomSource,
) -> Obstacle {
    let shape = match kind {
        GameKind::Runner => ObstacleShape::Ground {
            height: rng.range(config.min_obstacle_height, config.max_obstacle_height),
        },
        _ => {
            let lo = config.gap_margin;
            let hi = (config.playfield.y - config.gap_margin - gap).max(lo);
            let gap_top = rng.range(lo, hi);
            ObstacleShape::Pipe {
                gap_top,
                gap_bottom: gap_top + gap,
            }
        }
    };

    Obstacle {
        id,
        x: config.playfield.x,
        width: config.obstacle_width,
        shape,
        passed: false,
    }
}

/// Rejection samples before falling back to a scan
const FOOD_ATTEMPTS: u32 = 64;

/// Place food uniformly on a free cell (rejection sampling)
///
/// Returns `None` only when the snake covers the whole grid.
pub fn place_food(world: &GridWorld, rng: &mut dyn RandomSource) -> Option<Cell> {
    let snake = &world.snake;
    if snake.len() >= world.cell_count() {
        return None;
    }
    for _ in 0..FOOD_ATTEMPTS {
        let cell = Cell::new(
            rng.index(world.columns) as i32,
            rng.index(world.rows) as i32,
        );
        if !snake.occupies(cell) {
            return Some(cell);
        }
    }

    // Crowded grid: pick among the free cells directly
    let free: Vec<Cell> = (0..world.rows as i32)
        .flat_map(|y| (0..world.columns as i32).map(move |x| Cell::new(x, y)))
        .filter(|cell| !snake.occupies(*cell))
        .collect();
    let pick = rng.index(free.len() as u32) as usize;
    free.get(pick).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::{PcgRandom, SequenceRandom};
    use crate::sim::state::{Direction, Snake};
    use proptest::prelude::*;

    fn grid(snake: Snake, columns: u32, rows: u32) -> GridWorld {
        GridWorld {
            snake,
            food: None,
            columns,
            rows,
            speed: 8.0,
        }
    }

    #[test]
    fn test_runner_spacing_uses_gap() {
        let config = ContinuousConfig::runner();
        let mut rng = SequenceRandom::constant(0.0);
        assert_eq!(draw_spacing(GameKind::Runner, &config, 250.0, &mut rng), 250.0);
    }

    #[test]
    fn test_flyer_spacing_bounds() {
        let config = ContinuousConfig::flyer();
        let mut low = SequenceRandom::constant(0.0);
        assert_eq!(
            draw_spacing(GameKind::Flyer, &config, 160.0, &mut low),
            config.min_spacing
        );
        let mut high = SequenceRandom::constant(0.999_999);
        let spacing = draw_spacing(GameKind::Flyer, &config, 160.0, &mut high);
        assert!(spacing < config.max_spacing && spacing > config.max_spacing - 1.0);
    }

    #[test]
    fn test_runner_obstacle_height() {
        let config = ContinuousConfig::runner();
        let mut rng = SequenceRandom::constant(0.5);
        let obstacle = spawn_obstacle(7, GameKind::Runner, &config, 300.0, &mut rng);
        assert_eq!(obstacle.id, 7);
        assert_eq!(obstacle.x, config.playfield.x);
        assert!(!obstacle.passed);
        let expected = (config.min_obstacle_height + config.max_obstacle_height) / 2.0;
        assert_eq!(obstacle.shape, ObstacleShape::Ground { height: expected });
    }

    #[test]
    fn test_flyer_gap_inside_margins() {
        let config = ContinuousConfig::flyer();
        for sample in [0.0, 0.3, 0.999] {
            let mut rng = SequenceRandom::constant(sample);
            let obstacle = spawn_obstacle(1, GameKind::Flyer, &config, 140.0, &mut rng);
            let ObstacleShape::Pipe { gap_top, gap_bottom } = obstacle.shape else {
                panic!("flyer spawns pipes");
            };
            assert!(gap_top >= config.gap_margin);
            assert!(gap_bottom <= config.playfield.y - config.gap_margin + 1e-3);
            assert!((gap_bottom - gap_top - 140.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_food_rejects_occupied_cells() {
        let mut snake = Snake::new(Cell::new(0, 0), Direction::Right);
        snake.segments.push_back(Cell::new(1, 0));
        let world = grid(snake, 2, 2);
        // (0,0) then (1,0) are occupied; third draw lands on (1,1)
        let mut rng = SequenceRandom::new(vec![0.0, 0.0, 0.5, 0.0, 0.5, 0.5]);
        assert_eq!(place_food(&world, &mut rng), Some(Cell::new(1, 1)));
    }

    #[test]
    fn test_food_absent_on_full_grid() {
        let mut snake = Snake::new(Cell::new(0, 0), Direction::Right);
        snake.segments.push_back(Cell::new(1, 0));
        let world = grid(snake, 2, 1);
        let mut rng = SequenceRandom::constant(0.0);
        assert_eq!(place_food(&world, &mut rng), None);
    }

    proptest! {
        #[test]
        fn prop_food_never_on_snake(seed in any::<u64>(), length in 1usize..60) {
            let mut snake = Snake::new(Cell::new(0, 0), Direction::Right);
            for i in 1..length as i32 {
                snake.segments.push_back(Cell::new(i % 10, i / 10));
            }
            let world = grid(snake.clone(), 10, 10);
            let mut rng = PcgRandom::seeded(seed);
            let food = place_food(&world, &mut rng).unwrap();
            prop_assert!(!snake.occupies(food));
            prop_assert!(world.contains(food));
        }
    }
}
