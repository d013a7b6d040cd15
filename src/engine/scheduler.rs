//! Delayed, cancellable computer moves.
//!
//! The computer's reply is held back for a short pause so that a human can see
//! it arrive. The pause runs as a tokio task which posts the [`ComputerTurn`]
//! ticket back over a channel when it expires. Starting a new game cancels the
//! task; a ticket that was already in flight is recognised as stale on receipt.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::engine::models::ComputerTurn;

pub const DEFAULT_COMPUTER_DELAY: Duration = Duration::from_millis(700);

pub struct ComputerMoveScheduler {
    delay: Duration,
    tx: mpsc::UnboundedSender<ComputerTurn>,
    pending: Option<(ComputerTurn, JoinHandle<()>)>,
}

impl ComputerMoveScheduler {
    /// Create a scheduler and the receiver on which expired turns arrive.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<ComputerTurn>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { delay, tx, pending: None }, rx)
    }

    pub fn pending(&self) -> Option<ComputerTurn> {
        self.pending.as_ref().map(|(turn, _)| *turn)
    }

    /// Schedule `turn` after the configured delay, replacing any pending turn.
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, turn: ComputerTurn) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the front end shut down; nothing to do.
            let _ = tx.send(turn);
        });
        tracing::debug!(?turn, delay_ms = delay.as_millis() as u64, "computer move scheduled");
        self.pending = Some((turn, handle));
    }

    /// Drop the pending turn, if any. Returns the cancelled ticket.
    pub fn cancel(&mut self) -> Option<ComputerTurn> {
        let (turn, handle) = self.pending.take()?;
        handle.abort();
        tracing::debug!(?turn, "pending computer move cancelled");
        Some(turn)
    }

    /// Claim a turn received from the channel.
    ///
    /// Returns false for a turn that was cancelled or replaced after its timer
    /// had already fired; such turns must be ignored.
    pub fn claim(&mut self, turn: ComputerTurn) -> bool {
        match self.pending {
            Some((pending, _)) if pending == turn => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for ComputerMoveScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
