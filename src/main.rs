//! Arcade Engine headless demo
//!
//! Plays each game under the autopilot at a fixed 60 Hz refresh and logs the
//! outcome. Usage: `arcade-engine [runner|flyer|snake ...] [--scores FILE]`

use std::cell::RefCell;
use std::rc::Rc;

use arcade_engine::autopilot::Autopilot;
use arcade_engine::consts::{FRAME_DT, REFRESH_HZ};
use arcade_engine::highscores::JsonFileStore;
use arcade_engine::{
    FrameScheduler, GameEvent, GameKind, GamePhase, GameSession, HighScoreStore, HighScoreTable,
    LoopDriver, RecordingLedger, RewardLedger,
};

/// Frames per game before the demo gives up (two minutes of play)
const FRAME_LIMIT: u32 = 120 * REFRESH_HZ as u32;

/// Counts frame requests; the demo loop itself plays the role of the display
#[derive(Default)]
struct HeadlessScheduler {
    requested: u32,
}

impl FrameScheduler for HeadlessScheduler {
    fn request_frame(&mut self) {
        self.requested += 1;
    }
}

struct Args {
    games: Vec<GameKind>,
    scores: Option<String>,
}

fn parse_args() -> Args {
    let mut games = Vec::new();
    let mut scores = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--scores" {
            scores = args.next();
            continue;
        }
        match GameKind::from_str(&arg) {
            Some(game) => games.push(game),
            None => log::warn!("Unknown game '{}', skipping", arg),
        }
    }
    if games.is_empty() {
        games = vec![GameKind::Runner, GameKind::Flyer, GameKind::Snake];
    }
    Args { games, scores }
}

/// Shared store: the JSON file if given and readable, else an in-memory table
fn open_store(path: Option<&str>) -> Rc<RefCell<dyn HighScoreStore>> {
    let Some(path) = path else {
        return Rc::new(RefCell::new(HighScoreTable::new()));
    };
    match JsonFileStore::open(path) {
        Ok(store) => Rc::new(RefCell::new(store)),
        Err(e) => {
            log::warn!("Could not open {}: {}; using an in-memory table", path, e);
            Rc::new(RefCell::new(HighScoreTable::new()))
        }
    }
}

fn play(
    game: GameKind,
    store: Box<dyn HighScoreStore>,
    ledger: Box<dyn RewardLedger>,
) -> Result<(), arcade_engine::ConfigError> {
    let session = GameSession::with_defaults(game, store, ledger)?;
    let mut driver = LoopDriver::new(session, HeadlessScheduler::default());
    let pilot = Autopilot::default();

    if let Some(command) = pilot.choose(&driver.session().snapshot()) {
        driver.submit_command(command);
    }

    let mut frames = 0;
    let mut ticks = 0;
    while driver.is_frame_pending() && frames < FRAME_LIMIT {
        ticks += driver.on_frame(FRAME_DT, |_| {});
        frames += 1;

        for event in driver.session_mut().drain_events() {
            match event {
                GameEvent::NewHighScore { score, previous, reward } => println!(
                    "  new high score {} (was {}), +{} xp +{} coins",
                    score, previous, reward.experience, reward.currency
                ),
                GameEvent::PersistenceFailed { operation, message } => {
                    println!("  could not {}: {}", operation, message)
                }
                other => log::debug!("{:?}", other),
            }
        }

        if driver.session().phase() == GamePhase::Playing {
            if let Some(command) = pilot.choose(&driver.session().snapshot()) {
                driver.submit_command(command);
            }
        }
    }

    let session = driver.session();
    println!(
        "{}: score {} (best {}) after {} ticks over {} frames{}",
        game.as_str(),
        session.score(),
        session.high_score(),
        ticks,
        frames,
        if session.phase() == GamePhase::Playing { ", still alive" } else { "" },
    );
    log::info!("{} frame requests", driver.scheduler().requested);
    Ok(())
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Arcade Engine (headless) starting...");

    let args = parse_args();
    let store = open_store(args.scores.as_deref());
    let ledger = Rc::new(RefCell::new(RecordingLedger::new()));

    // One store and ledger shared across all games
    for game in args.games {
        if let Err(e) = play(game, Box::new(store.clone()), Box::new(ledger.clone())) {
            log::error!("Invalid {} config: {}", game.as_str(), e);
        }
    }

    let ledger = ledger.borrow();
    println!("Rewards earned: {} xp, {} coins", ledger.experience, ledger.currency);
}
