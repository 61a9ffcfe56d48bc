//! Demo mode: picks commands from a snapshot so the games play themselves

use crate::config::GameKind;
use crate::session::{EntityView, Snapshot};
use crate::sim::{Body, Cell, Command, Direction, GamePhase, Obstacle, ObstacleShape, Snake};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autopilot {
    /// Runner jumps when the next obstacle is this many ticks away
    pub jump_lead_ticks: f32,
    /// Flyer flaps once it sinks this far below the target line
    pub flap_margin: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            jump_lead_ticks: 12.0,
            flap_margin: 10.0,
        }
    }
}

impl Autopilot {
    /// Command to submit before the next tick, if any
    pub fn choose(&self, snapshot: &Snapshot) -> Option<Command> {
        match snapshot.phase {
            GamePhase::Idle | GamePhase::GameOver => return Some(Command::Start),
            GamePhase::Playing if snapshot.paused => return None,
            GamePhase::Playing => {}
        }

        match (snapshot.game, snapshot.entity) {
            (GameKind::Runner, EntityView::Body(body)) => self.runner(body, snapshot),
            (GameKind::Flyer, EntityView::Body(body)) => self.flyer(body, snapshot),
            (GameKind::Snake, EntityView::Snake(snake)) => steer(snake, snapshot),
            _ => None,
        }
    }

    fn runner(&self, body: &Body, snapshot: &Snapshot) -> Option<Command> {
        if !body.grounded {
            return None;
        }
        let front = body.pos.x + body.size.x;
        let obstacle = next_obstacle(body, snapshot.obstacles)?;
        let distance = obstacle.x - front;
        (distance > 0.0 && distance <= snapshot.speed * self.jump_lead_ticks).then_some(Command::Jump)
    }

    fn flyer(&self, body: &Body, snapshot: &Snapshot) -> Option<Command> {
        let target = match next_obstacle(body, snapshot.obstacles).map(|o| o.shape) {
            Some(ObstacleShape::Pipe { gap_top, gap_bottom }) => (gap_top + gap_bottom) / 2.0,
            _ => snapshot.playfield.map(|p| p.y / 2.0)?,
        };
        let center = body.pos.y + body.size.y / 2.0;
        (center > target + self.flap_margin && body.vel_y >= 0.0).then_some(Command::Jump)
    }
}

/// First obstacle not yet fully behind the player
fn next_obstacle<'a>(body: &Body, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .filter(|o| o.right() >= body.pos.x)
        .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
}

/// Greedy step toward the food over safe cells; keeps the heading on ties
fn steer(snake: &Snake, snapshot: &Snapshot) -> Option<Command> {
    let (columns, rows) = snapshot.grid?;
    let head = snake.head();
    let safe = |cell: Cell| {
        cell.x >= 0 && cell.y >= 0 && cell.x < columns as i32 && cell.y < rows as i32 && !snake.occupies(cell)
    };

    let candidates = std::iter::once(snake.heading)
        .chain(Direction::ALL.into_iter().filter(|d| *d != snake.heading))
        .filter(|d| *d != snake.heading.opposite())
        .filter(|d| safe(head.step(*d)));

    let best = match snapshot.food {
        Some(food) => candidates.min_by_key(|d| head.step(*d).manhattan(food)),
        None => candidates.into_iter().next(),
    }?;

    (best != snake.heading).then(|| best.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, GridConfig};
    use crate::highscores::HighScoreTable;
    use crate::rewards::RecordingLedger;
    use crate::session::GameSession;
    use crate::sim::{PcgRandom, SequenceRandom};
    use glam::Vec2;

    fn snapshot<'a>(game: GameKind, entity: EntityView<'a>, obstacles: &'a [Obstacle]) -> Snapshot<'a> {
        Snapshot {
            game,
            phase: GamePhase::Playing,
            paused: false,
            score: 0,
            high_score: 0,
            frame_count: 0,
            speed: 6.0,
            entity,
            obstacles,
            food: None,
            grid: Some((20, 20)),
            playfield: Some(Vec2::new(400.0, 600.0)),
        }
    }

    fn ground(id: u32, x: f32) -> Obstacle {
        Obstacle {
            id,
            x,
            width: 20.0,
            shape: ObstacleShape::Ground { height: 40.0 },
            passed: false,
        }
    }

    fn runner_body() -> Body {
        let mut body = Body::new(Vec2::new(50.0, 210.0), Vec2::new(30.0, 40.0));
        body.grounded = true;
        body
    }

    #[test]
    fn test_starts_when_not_playing() {
        let body = runner_body();
        let mut snap = snapshot(GameKind::Runner, EntityView::Body(&body), &[]);
        snap.phase = GamePhase::GameOver;
        assert_eq!(Autopilot::default().choose(&snap), Some(Command::Start));
    }

    #[test]
    fn test_runner_jumps_within_lead() {
        let pilot = Autopilot::default();
        let body = runner_body();

        let near = [ground(1, 140.0)];
        let snap = snapshot(GameKind::Runner, EntityView::Body(&body), &near);
        assert_eq!(pilot.choose(&snap), Some(Command::Jump));

        let far = [ground(1, 400.0)];
        let snap = snapshot(GameKind::Runner, EntityView::Body(&body), &far);
        assert_eq!(pilot.choose(&snap), None);

        let mut airborne = body.clone();
        airborne.grounded = false;
        let snap = snapshot(GameKind::Runner, EntityView::Body(&airborne), &near);
        assert_eq!(pilot.choose(&snap), None);
    }

    #[test]
    fn test_flyer_holds_gap_center() {
        let pilot = Autopilot::default();
        let pipes = [Obstacle {
            id: 1,
            x: 200.0,
            width: 60.0,
            shape: ObstacleShape::Pipe {
                gap_top: 100.0,
                gap_bottom: 260.0,
            },
            passed: false,
        }];

        let mut low = Body::new(Vec2::new(80.0, 300.0), Vec2::new(34.0, 24.0));
        low.vel_y = 1.0;
        let snap = snapshot(GameKind::Flyer, EntityView::Body(&low), &pipes);
        assert_eq!(pilot.choose(&snap), Some(Command::Jump));

        let high = Body::new(Vec2::new(80.0, 120.0), Vec2::new(34.0, 24.0));
        let snap = snapshot(GameKind::Flyer, EntityView::Body(&high), &pipes);
        assert_eq!(pilot.choose(&snap), None);
    }

    #[test]
    fn test_snake_turns_toward_food() {
        let pilot = Autopilot::default();
        let snake = Snake::new(Cell::new(10, 10), Direction::Up);
        let mut snap = snapshot(GameKind::Snake, EntityView::Snake(&snake), &[]);

        snap.food = Some(Cell::new(15, 10));
        assert_eq!(pilot.choose(&snap), Some(Command::Right));

        // Already heading at the food
        snap.food = Some(Cell::new(10, 2));
        assert_eq!(pilot.choose(&snap), None);
    }

    #[test]
    fn test_snake_avoids_wall() {
        let snake = Snake::new(Cell::new(10, 0), Direction::Up);
        let mut snap = snapshot(GameKind::Snake, EntityView::Snake(&snake), &[]);
        snap.food = Some(Cell::new(10, 5));
        let choice = Autopilot::default().choose(&snap);
        assert!(matches!(choice, Some(Command::Left) | Some(Command::Right)));
    }

    fn play(session: &mut GameSession, ticks: u32) {
        let pilot = Autopilot::default();
        for _ in 0..ticks {
            if let Some(command) = pilot.choose(&session.snapshot()) {
                session.submit_command(command);
            }
            session.tick();
            if session.phase() == GamePhase::GameOver {
                break;
            }
        }
    }

    #[test]
    fn test_runner_clears_first_obstacles() {
        let mut session = GameSession::new(
            GameConfig::preset(GameKind::Runner),
            Box::new(HighScoreTable::new()),
            Box::new(RecordingLedger::new()),
            Box::new(SequenceRandom::constant(0.0)),
        )
        .unwrap();
        play(&mut session, 400);
        assert!(session.score() >= 3, "score = {}", session.score());
    }

    #[test]
    fn test_snake_eats() {
        let mut session = GameSession::new(
            GameConfig::Snake(GridConfig::default()),
            Box::new(HighScoreTable::new()),
            Box::new(RecordingLedger::new()),
            Box::new(PcgRandom::seeded(7)),
        )
        .unwrap();
        play(&mut session, 200);
        assert!(session.score() >= 1);
    }
}
