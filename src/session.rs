//! Game session state machine
//!
//! `Idle --start--> Playing --collision--> GameOver --start--> Playing`
//!
//! The session owns all mutable game state. Commands only touch pending
//! input (or trigger a start, which is always at a tick boundary since the
//! session is borrowed exclusively); `tick` is the only place entities move.

use glam::Vec2;

use crate::config::{ConfigError, GameConfig, GameKind};
use crate::highscores::HighScoreStore;
use crate::notifier::ScoreNotifier;
use crate::rewards::RewardLedger;
use crate::sim::{
    Body, Cell, Command, GameEvent, GamePhase, InputController, Obstacle, PcgRandom, RandomSource,
    Snake, World, init_continuous, init_grid, step_grid, tick_continuous,
};

/// Read-only view of the controlled entity
#[derive(Debug, Clone, Copy)]
pub enum EntityView<'a> {
    Body(&'a Body),
    Snake(&'a Snake),
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub game: GameKind,
    pub phase: GamePhase,
    pub paused: bool,
    pub score: u64,
    pub high_score: u64,
    pub frame_count: u64,
    /// Current scroll speed (px/tick) or grid speed (steps/s)
    pub speed: f32,
    pub entity: EntityView<'a>,
    pub obstacles: &'a [Obstacle],
    pub food: Option<Cell>,
    /// Columns and rows (snake only)
    pub grid: Option<(u32, u32)>,
    /// Playfield size in pixels (runner/flyer only)
    pub playfield: Option<Vec2>,
}

pub struct GameSession {
    config: GameConfig,
    phase: GamePhase,
    paused: bool,
    frame_count: u64,
    world: World,
    input: InputController,
    notifier: ScoreNotifier,
    rng: Box<dyn RandomSource>,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a session in `Idle`, reading the persisted high score
    pub fn new(
        config: GameConfig,
        store: Box<dyn HighScoreStore>,
        ledger: Box<dyn RewardLedger>,
        mut rng: Box<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut events = Vec::new();
        let notifier = ScoreNotifier::new(config.kind(), config.reward(), store, ledger, &mut events);
        let world = build_world(&config, rng.as_mut());

        Ok(Self {
            config,
            phase: GamePhase::Idle,
            paused: false,
            frame_count: 0,
            world,
            input: InputController::new(),
            notifier,
            rng,
            events,
        })
    }

    /// Default configuration for `game` with an unseeded random source
    pub fn with_defaults(
        game: GameKind,
        store: Box<dyn HighScoreStore>,
        ledger: Box<dyn RewardLedger>,
    ) -> Result<Self, ConfigError> {
        Self::new(
            GameConfig::preset(game),
            store,
            ledger,
            Box::new(PcgRandom::unseeded()),
        )
    }

    pub fn kind(&self) -> GameKind {
        self.config.kind()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether `tick` will advance the simulation
    pub fn is_ticking(&self) -> bool {
        self.phase == GamePhase::Playing && !self.paused
    }

    pub fn score(&self) -> u64 {
        self.notifier.score()
    }

    pub fn high_score(&self) -> u64 {
        self.notifier.high_score()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current speed: px/tick for runner/flyer, steps/s for snake
    pub fn speed(&self) -> f32 {
        match &self.world {
            World::Continuous(w) => w.speed,
            World::Grid(w) => w.speed,
        }
    }

    /// Seconds between grid steps; `None` for games that tick every frame
    pub fn step_interval(&self) -> Option<f32> {
        match &self.world {
            World::Continuous(_) => None,
            World::Grid(w) => Some(1.0 / w.speed),
        }
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Handle a command token. Illegal tokens are ignored.
    pub fn submit_command(&mut self, command: Command) {
        let game = self.kind();
        if !command.accepted_by(game) {
            log::trace!("Ignoring {:?}: not a {} command", command, game.as_str());
            return;
        }

        match self.phase {
            GamePhase::Idle | GamePhase::GameOver => match command {
                // Start, or any action token, begins a run
                Command::Start | Command::Jump | Command::Up | Command::Down | Command::Left | Command::Right => {
                    self.start()
                }
                _ => log::trace!("Ignoring {:?} while {:?}", command, self.phase),
            },
            GamePhase::Playing => self.submit_while_playing(command),
        }
    }

    fn submit_while_playing(&mut self, command: Command) {
        match command {
            Command::Start => log::trace!("Already playing"),
            Command::Jump => self.input.press_jump(),
            Command::Pause if !self.paused => {
                self.paused = true;
                log::info!("Paused");
                self.events.push(GameEvent::Paused);
            }
            Command::Resume if self.paused => {
                self.paused = false;
                log::info!("Resumed");
                self.events.push(GameEvent::Resumed);
            }
            Command::Pause | Command::Resume => {}
            _ => {
                let Some(direction) = command.direction() else {
                    return;
                };
                if self.paused {
                    log::trace!("Ignoring {:?} while paused", direction);
                    return;
                }
                if let World::Grid(world) = &self.world {
                    if self.input.queue_direction(direction, world.snake.heading) {
                        log::trace!("Queued turn {:?} ({} pending)", direction, self.input.queued());
                    } else {
                        log::trace!("Rejected turn {:?}", direction);
                    }
                }
            }
        }
    }

    /// `Idle`/`GameOver` → `Playing`: reset score, entities and input
    fn start(&mut self) {
        self.world = build_world(&self.config, self.rng.as_mut());
        self.input.clear();
        self.notifier.reset();
        self.frame_count = 0;
        self.paused = false;
        self.phase = GamePhase::Playing;
        log::info!("{} started", self.kind().as_str());
        self.events.push(GameEvent::Started { game: self.kind() });
    }

    /// Advance one tick (one grid step for the snake). No-op unless playing.
    pub fn tick(&mut self) {
        if !self.is_ticking() {
            return;
        }
        self.frame_count += 1;

        let score = self.notifier.score();
        let outcome = match (&mut self.world, &self.config) {
            (World::Continuous(world), GameConfig::Runner(config) | GameConfig::Flyer(config)) => {
                let jump = self.input.take_jump();
                tick_continuous(world, self.config.kind(), config, score, jump, self.rng.as_mut())
            }
            (World::Grid(world), GameConfig::Snake(config)) => {
                let turn = self.input.next_direction(world.snake.heading);
                step_grid(world, config, turn, score, self.rng.as_mut())
            }
            // World is always built from the config
            _ => return,
        };

        if let Some(collision) = outcome.collision {
            self.phase = GamePhase::GameOver;
            self.input.clear();
            let score = self.notifier.score();
            log::info!(
                "{} over after {} ticks: {:?}, score {}",
                self.kind().as_str(),
                self.frame_count,
                collision,
                score
            );
            self.events.push(GameEvent::GameOver { score });
            self.notifier.evaluate_game_over(&mut self.events);
            return;
        }

        self.notifier.add(outcome.scored, &mut self.events);
    }

    /// Borrowed view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        let (entity, obstacles, food, grid, playfield) = match &self.world {
            World::Continuous(w) => {
                let playfield = match &self.config {
                    GameConfig::Runner(c) | GameConfig::Flyer(c) => Some(c.playfield),
                    GameConfig::Snake(_) => None,
                };
                (EntityView::Body(&w.body), w.obstacles.as_slice(), None, None, playfield)
            }
            World::Grid(w) => (
                EntityView::Snake(&w.snake),
                &[][..],
                w.food,
                Some((w.columns, w.rows)),
                None,
            ),
        };

        Snapshot {
            game: self.kind(),
            phase: self.phase,
            paused: self.paused,
            score: self.score(),
            high_score: self.high_score(),
            frame_count: self.frame_count,
            speed: self.speed(),
            entity,
            obstacles,
            food,
            grid,
            playfield,
        }
    }
}

fn build_world(config: &GameConfig, rng: &mut dyn RandomSource) -> World {
    match config {
        GameConfig::Runner(c) => World::Continuous(init_continuous(GameKind::Runner, c, rng)),
        GameConfig::Flyer(c) => World::Continuous(init_continuous(GameKind::Flyer, c, rng)),
        GameConfig::Snake(c) => World::Grid(init_grid(c, rng)),
    }
}
