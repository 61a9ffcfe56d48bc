//! Score tracking and the new-high-score reward
//!
//! Evaluated once per game over. Collaborator failures are logged and
//! reported as events; the in-memory high score stays updated regardless.

use crate::config::{GameKind, RewardGrant};
use crate::highscores::{HighScoreStore, PersistError};
use crate::rewards::RewardLedger;
use crate::sim::GameEvent;

pub struct ScoreNotifier {
    game: GameKind,
    reward: RewardGrant,
    score: u64,
    high_score: u64,
    /// Set once the current game over has been evaluated
    evaluated: bool,
    store: Box<dyn HighScoreStore>,
    ledger: Box<dyn RewardLedger>,
}

impl ScoreNotifier {
    /// Read the persisted high score; a failed read starts from 0
    pub fn new(
        game: GameKind,
        reward: RewardGrant,
        store: Box<dyn HighScoreStore>,
        ledger: Box<dyn RewardLedger>,
        events: &mut Vec<GameEvent>,
    ) -> Self {
        let high_score = match store.read(game) {
            Ok(score) => score,
            Err(e) => {
                report_failure("read high score", &e, events);
                0
            }
        };
        log::info!("{} high score: {}", game.as_str(), high_score);

        Self {
            game,
            reward,
            score: 0,
            high_score,
            evaluated: false,
            store,
            ledger,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// New run: score back to 0, evaluation re-armed
    pub fn reset(&mut self) {
        self.score = 0;
        self.evaluated = false;
    }

    /// Add points earned this tick
    pub fn add(&mut self, points: u64, events: &mut Vec<GameEvent>) {
        if points == 0 {
            return;
        }
        self.score += points;
        events.push(GameEvent::Scored { score: self.score });
    }

    /// Compare the final score against the high score; rewards a strict
    /// improvement exactly once per game over. Returns whether it fired.
    pub fn evaluate_game_over(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if self.evaluated {
            return false;
        }
        self.evaluated = true;

        if self.score <= self.high_score {
            return false;
        }

        let previous = self.high_score;
        self.high_score = self.score;
        log::info!(
            "New {} high score: {} (previous {})",
            self.game.as_str(),
            self.score,
            previous
        );

        if let Err(e) = self.store.write(self.game, self.score) {
            report_failure("write high score", &e, events);
        }
        if let Err(e) = self.ledger.grant_experience(self.reward.experience) {
            report_failure("grant experience", &e, events);
        }
        if let Err(e) = self.ledger.grant_currency(self.reward.currency) {
            report_failure("grant currency", &e, events);
        }

        events.push(GameEvent::NewHighScore {
            score: self.score,
            previous,
            reward: self.reward,
        });
        true
    }
}

fn report_failure(operation: &'static str, error: &PersistError, events: &mut Vec<GameEvent>) {
    log::warn!("Failed to {}: {}", operation, error);
    events.push(GameEvent::PersistenceFailed {
        operation,
        message: error.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScoreTable;
    use crate::rewards::RecordingLedger;
    use std::cell::RefCell;
    use std::rc::Rc;

    const REWARD: RewardGrant = RewardGrant {
        experience: 50,
        currency: 10,
    };

    struct FailingStore;

    impl HighScoreStore for FailingStore {
        fn read(&self, _game: GameKind) -> Result<u64, PersistError> {
            Err(PersistError::Unavailable("offline".into()))
        }

        fn write(&mut self, _game: GameKind, _score: u64) -> Result<(), PersistError> {
            Err(PersistError::Rejected("offline".into()))
        }
    }

    struct FailingLedger;

    impl RewardLedger for FailingLedger {
        fn grant_experience(&mut self, _amount: u32) -> Result<(), PersistError> {
            Err(PersistError::Rejected("ledger closed".into()))
        }

        fn grant_currency(&mut self, _amount: u32) -> Result<(), PersistError> {
            Err(PersistError::Unavailable("ledger closed".into()))
        }
    }

    fn notifier_with(
        best: u64,
    ) -> (
        ScoreNotifier,
        Rc<RefCell<HighScoreTable>>,
        Rc<RefCell<RecordingLedger>>,
    ) {
        let mut table = HighScoreTable::new();
        table.record(GameKind::Runner, best, 0);
        let store = Rc::new(RefCell::new(table));
        let ledger = Rc::new(RefCell::new(RecordingLedger::new()));
        let notifier = ScoreNotifier::new(
            GameKind::Runner,
            REWARD,
            Box::new(store.clone()),
            Box::new(ledger.clone()),
            &mut Vec::new(),
        );
        (notifier, store, ledger)
    }

    #[test]
    fn test_reads_high_score() {
        let (notifier, _, _) = notifier_with(15);
        assert_eq!(notifier.high_score(), 15);
        assert_eq!(notifier.score(), 0);
    }

    #[test]
    fn test_new_high_score_fires_once() {
        let (mut notifier, store, ledger) = notifier_with(3);
        let mut events = Vec::new();
        notifier.add(5, &mut events);

        assert!(notifier.evaluate_game_over(&mut events));
        assert!(!notifier.evaluate_game_over(&mut events));

        assert_eq!(notifier.high_score(), 5);
        assert_eq!(store.borrow().read(GameKind::Runner).unwrap(), 5);
        assert_eq!(ledger.borrow().experience, 50);
        assert_eq!(ledger.borrow().currency, 10);
        let fired = events
            .iter()
            .filter(|e| matches!(e, GameEvent::NewHighScore { .. }))
            .count();
        assert_eq!(fired, 1);
        assert!(events.contains(&GameEvent::NewHighScore {
            score: 5,
            previous: 3,
            reward: REWARD,
        }));
    }

    #[test]
    fn test_tie_does_not_fire() {
        let (mut notifier, _, ledger) = notifier_with(4);
        let mut events = Vec::new();
        notifier.add(4, &mut events);
        assert!(!notifier.evaluate_game_over(&mut events));
        assert_eq!(notifier.high_score(), 4);
        assert_eq!(ledger.borrow().grants, 0);
    }

    #[test]
    fn test_reset_rearms() {
        let (mut notifier, _, ledger) = notifier_with(0);
        let mut events = Vec::new();
        notifier.add(1, &mut events);
        notifier.evaluate_game_over(&mut events);
        notifier.reset();
        assert_eq!(notifier.score(), 0);
        notifier.add(2, &mut events);
        assert!(notifier.evaluate_game_over(&mut events));
        assert_eq!(ledger.borrow().experience, 100);
    }

    #[test]
    fn test_failures_keep_memory_state() {
        let mut events = Vec::new();
        let mut notifier = ScoreNotifier::new(
            GameKind::Snake,
            REWARD,
            Box::new(FailingStore),
            Box::new(RecordingLedger::new()),
            &mut events,
        );
        assert_eq!(notifier.high_score(), 0);
        assert!(matches!(
            events[0],
            GameEvent::PersistenceFailed {
                operation: "read high score",
                ..
            }
        ));

        notifier.add(6, &mut events);
        assert!(notifier.evaluate_game_over(&mut events));
        assert_eq!(notifier.high_score(), 6);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::PersistenceFailed {
                operation: "write high score",
                ..
            }
        )));
    }

    #[test]
    fn test_failed_grants_keep_high_score() {
        let store = Rc::new(RefCell::new(HighScoreTable::new()));
        let mut events = Vec::new();
        let mut notifier = ScoreNotifier::new(
            GameKind::Flyer,
            REWARD,
            Box::new(store.clone()),
            Box::new(FailingLedger),
            &mut events,
        );
        assert!(events.is_empty());

        notifier.add(3, &mut events);
        assert!(notifier.evaluate_game_over(&mut events));
        assert!(!notifier.evaluate_game_over(&mut events));

        assert_eq!(notifier.high_score(), 3);
        assert_eq!(store.borrow().read(GameKind::Flyer).unwrap(), 3);
        let failed: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PersistenceFailed { operation, .. } => Some(*operation),
                _ => None,
            })
            .collect();
        assert_eq!(failed, ["grant experience", "grant currency"]);
        let fired = events
            .iter()
            .filter(|e| matches!(e, GameEvent::NewHighScore { .. }))
            .count();
        assert_eq!(fired, 1);
    }
}
