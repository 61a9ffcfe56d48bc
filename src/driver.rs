//! Frame loop driver
//!
//! Runs the session at the host's refresh cadence. Runner and flyer tick
//! once per frame; the snake accumulates frame time and steps at its current
//! grid speed. No frame is requested while the session is not ticking.

use crate::consts::MAX_SUBSTEPS;
use crate::session::{GameSession, Snapshot};
use crate::sim::Command;

/// Longest frame delta fed to the accumulator (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Host hook for requesting the next display refresh
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

pub struct LoopDriver<S: FrameScheduler> {
    session: GameSession,
    scheduler: S,
    accumulator: f32,
    /// A frame was requested and has not arrived yet
    frame_pending: bool,
}

impl<S: FrameScheduler> LoopDriver<S> {
    pub fn new(session: GameSession, scheduler: S) -> Self {
        let mut driver = Self {
            session,
            scheduler,
            accumulator: 0.0,
            frame_pending: false,
        };
        driver.schedule();
        driver
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Forward a command and resume scheduling if it started the session
    pub fn submit_command(&mut self, command: Command) {
        let was_ticking = self.session.is_ticking();
        self.session.submit_command(command);
        if !was_ticking && self.session.is_ticking() {
            self.accumulator = 0.0;
        }
        self.schedule();
    }

    /// Handle one display refresh. `render` runs after every tick.
    /// Returns the number of ticks run.
    pub fn on_frame(&mut self, dt: f32, mut render: impl FnMut(&Snapshot)) -> u32 {
        self.frame_pending = false;
        if !self.session.is_ticking() {
            self.accumulator = 0.0;
            return 0;
        }

        let ticks = match self.session.step_interval() {
            None => {
                self.session.tick();
                render(&self.session.snapshot());
                1
            }
            Some(_) => {
                self.accumulator += dt.min(MAX_FRAME_DT);
                let mut substeps = 0;
                while substeps < MAX_SUBSTEPS && self.session.is_ticking() {
                    // Interval shrinks as the snake speeds up
                    let Some(interval) = self.session.step_interval() else {
                        break;
                    };
                    if self.accumulator < interval {
                        break;
                    }
                    self.session.tick();
                    render(&self.session.snapshot());
                    self.accumulator -= interval;
                    substeps += 1;
                }
                if substeps == MAX_SUBSTEPS {
                    self.accumulator = self.accumulator.min(self.session.step_interval().unwrap_or(0.0));
                }
                substeps
            }
        };

        if !self.session.is_ticking() {
            log::debug!("Session stopped ticking, suspending frames");
            self.accumulator = 0.0;
        }
        self.schedule();
        ticks
    }

    fn schedule(&mut self) {
        if self.session.is_ticking() && !self.frame_pending {
            self.frame_pending = true;
            self.scheduler.request_frame();
        }
    }
}
