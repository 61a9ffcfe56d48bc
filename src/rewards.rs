//! Reward ledger interface
//!
//! The engine grants experience and currency on a new high score; the ledger
//! itself lives outside the engine.

use std::cell::RefCell;
use std::rc::Rc;

use crate::highscores::PersistError;

pub trait RewardLedger {
    fn grant_experience(&mut self, amount: u32) -> Result<(), PersistError>;
    fn grant_currency(&mut self, amount: u32) -> Result<(), PersistError>;
}

impl<L: RewardLedger + ?Sized> RewardLedger for Rc<RefCell<L>> {
    fn grant_experience(&mut self, amount: u32) -> Result<(), PersistError> {
        self.borrow_mut().grant_experience(amount)
    }

    fn grant_currency(&mut self, amount: u32) -> Result<(), PersistError> {
        self.borrow_mut().grant_currency(amount)
    }
}

/// In-memory ledger that keeps running totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingLedger {
    pub experience: u64,
    pub currency: u64,
    /// Number of grant calls received
    pub grants: u32,
}

impl RecordingLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RewardLedger for RecordingLedger {
    fn grant_experience(&mut self, amount: u32) -> Result<(), PersistError> {
        self.experience += u64::from(amount);
        self.grants += 1;
        Ok(())
    }

    fn grant_currency(&mut self, amount: u32) -> Result<(), PersistError> {
        self.currency += u64::from(amount);
        self.grants += 1;
        Ok(())
    }
}
