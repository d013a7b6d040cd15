//! Couples a [`Session`] with the delayed computer-move scheduler.
//!
//! Every entry point that can start a new game cancels the pending computer
//! move first, and every applied move schedules the next computer turn if one
//! is owed. Front ends feed human input and expired timers into the driver
//! and render whatever reports come back.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::engine::bot_strategy::StrategyKind;
use crate::engine::error::{ConfigError, MoveError};
use crate::engine::minimax::MinimaxParams;
use crate::engine::models::{ComputerTurn, MoveReport, PlayMode};
use crate::engine::scheduler::ComputerMoveScheduler;
use crate::engine::session::Session;

pub struct GameDriver {
    session: Session,
    scheduler: ComputerMoveScheduler,
}

impl GameDriver {
    /// Wrap `session`. The receiver yields computer turns whose delay expired;
    /// pass each one to [`GameDriver::on_timer`].
    pub fn new(session: Session, delay: Duration) -> (Self, mpsc::UnboundedReceiver<ComputerTurn>) {
        let (scheduler, rx) = ComputerMoveScheduler::new(delay);
        (Self { session, scheduler }, rx)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn pending_computer_turn(&self) -> Option<ComputerTurn> {
        self.scheduler.pending()
    }

    pub fn start(&mut self) {
        self.scheduler.cancel();
        let turn = self.session.start();
        self.follow_up(turn);
    }

    pub fn restart(&mut self) {
        self.scheduler.cancel();
        let turn = self.session.restart();
        self.follow_up(turn);
    }

    pub fn set_mode(&mut self, mode: PlayMode) {
        self.scheduler.cancel();
        let turn = self.session.set_mode(mode);
        self.follow_up(turn);
    }

    pub fn set_strategy(&mut self, kind: StrategyKind) {
        self.scheduler.cancel();
        let turn = self.session.set_strategy(kind);
        self.follow_up(turn);
    }

    pub fn set_minimax_params(&mut self, params: MinimaxParams) {
        self.scheduler.cancel();
        let turn = self.session.set_minimax_params(params);
        self.follow_up(turn);
    }

    /// On error the current game continues untouched, pending move included.
    pub fn apply_markers(&mut self, p1: &str, p2: &str) -> Result<(), ConfigError> {
        crate::engine::session::validate_markers(p1, p2)?;
        self.scheduler.cancel();
        let turn = self.session.apply_markers(p1, p2)?;
        self.follow_up(turn);
        Ok(())
    }

    pub fn reset_scores(&mut self) {
        self.session.reset_scores();
    }

    pub fn submit_move(&mut self, index: usize) -> Result<MoveReport, MoveError> {
        let report = self.session.submit_move(index)?;
        self.follow_up(report.pending_computer);
        Ok(report)
    }

    /// Handle a computer turn delivered by the scheduler's channel.
    ///
    /// Returns `None` for turns that were cancelled while in flight.
    pub fn on_timer(&mut self, turn: ComputerTurn) -> Option<Result<MoveReport, MoveError>> {
        if !self.scheduler.claim(turn) {
            tracing::debug!(?turn, "ignoring cancelled computer turn");
            return None;
        }
        let result = self.session.computer_turn(turn);
        if let Ok(report) = &result {
            self.follow_up(report.pending_computer);
        }
        Some(result)
    }

    fn follow_up(&mut self, turn: Option<ComputerTurn>) {
        if let Some(turn) = turn {
            self.scheduler.schedule(turn);
        }
    }
}
