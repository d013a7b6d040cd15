//! Game session controller: turn order, computer turns, outcome bookkeeping.
//!
//! A [`Session`] owns the board, the score tally and the configured computer
//! strategy. Human moves come in through [`Session::submit_move`]; computer
//! moves are requested with a [`ComputerTurn`] ticket so that a move computed
//! for one game can never be applied to the next one.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::engine::bot_strategy::{build_strategy, MoveStrategy, StrategyKind};
use crate::engine::error::{ConfigError, MoveError};
use crate::engine::minimax::MinimaxParams;
use crate::engine::models::*;
use crate::games::tictactoe::board::Board;
use crate::games::tictactoe::rules::evaluate;
use crate::games::tictactoe::types::{GameOutcome, Marker};

/// Everything needed to set up a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub markers: [Marker; 2],
    #[serde(default)]
    pub mode: PlayMode,
    #[serde(default)]
    pub strategy: StrategyKind,
    #[serde(default)]
    pub minimax: MinimaxParams,
    /// Seed for the computer's random choices; None draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            markers: [Marker::x(), Marker::o()],
            mode: PlayMode::default(),
            strategy: StrategyKind::default(),
            minimax: MinimaxParams::default(),
            seed: None,
        }
    }
}

/// Normalize and check a pair of raw markers.
pub fn validate_markers(p1: &str, p2: &str) -> Result<[Marker; 2], ConfigError> {
    let first = Marker::new(p1)?;
    let second = Marker::new(p2)?;
    if first == second {
        return Err(ConfigError::DuplicateMarker(first.to_string()));
    }
    Ok([first, second])
}

pub struct Session {
    markers: [Marker; 2],
    mode: PlayMode,
    strategy_kind: StrategyKind,
    minimax: MinimaxParams,
    strategy: Box<dyn MoveStrategy>,
    board: Board,
    state: GameState,
    active: Slot,
    scores: ScoreTally,
    game: u64,
    rng: StdRng,
}

impl Session {
    /// Create an idle session. Call [`Session::start`] to begin the first game.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let [p1, p2] = &config.markers;
        let markers = validate_markers(p1.as_str(), p2.as_str())?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            markers,
            mode: config.mode,
            strategy: build_strategy(config.strategy, &config.minimax),
            strategy_kind: config.strategy,
            minimax: config.minimax,
            board: Board::new(),
            state: GameState::Idle,
            active: Slot::One,
            scores: ScoreTally::default(),
            game: 0,
            rng,
        })
    }

    // ------------------------------------------------------------------ //
    //  Read-only views
    // ------------------------------------------------------------------ //

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_in_progress(&self) -> bool {
        self.state == GameState::InProgress
    }

    pub fn active_slot(&self) -> Slot {
        self.active
    }

    pub fn active_marker(&self) -> &Marker {
        self.marker(self.active)
    }

    pub fn marker(&self, slot: Slot) -> &Marker {
        &self.markers[slot.index()]
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy_kind
    }

    pub fn minimax_params(&self) -> &MinimaxParams {
        &self.minimax
    }

    pub fn scores(&self) -> &ScoreTally {
        &self.scores
    }

    /// Number of games started so far; identifies the current game.
    pub fn game_number(&self) -> u64 {
        self.game
    }

    pub fn outcome(&self) -> GameOutcome {
        evaluate(&self.board)
    }

    /// The computer turn owed right now, if the active slot is computer-controlled.
    pub fn pending_computer_turn(&self) -> Option<ComputerTurn> {
        if !self.is_in_progress() || self.mode.controller(self.active) != ControllerKind::Computer {
            return None;
        }
        Some(ComputerTurn {
            game: self.game,
            move_number: self.board.move_count(),
            slot: self.active,
        })
    }

    /// One-line status for display.
    pub fn status_message(&self) -> String {
        match &self.state {
            GameState::Idle => "Waiting for a new game".to_string(),
            GameState::InProgress => format!("It's {}'s turn", self.active_marker()),
            GameState::Terminal { outcome: GameOutcome::Win { marker, .. } } => {
                format!("Player {} has won!", marker)
            }
            GameState::Terminal { .. } => "Game ended in a draw!".to_string(),
        }
    }

    // ------------------------------------------------------------------ //
    //  Game lifecycle
    // ------------------------------------------------------------------ //

    /// Begin a new game with slot one to move.
    pub fn start(&mut self) -> Option<ComputerTurn> {
        self.board.reset();
        self.active = Slot::One;
        self.state = GameState::InProgress;
        self.game += 1;
        tracing::info!(
            game = self.game,
            mode = ?self.mode,
            strategy = %self.strategy_kind,
            "game started"
        );
        self.pending_computer_turn()
    }

    /// Abandon the current game (if any) and start a fresh one. Scores are kept.
    pub fn restart(&mut self) -> Option<ComputerTurn> {
        self.state = GameState::Idle;
        self.start()
    }

    /// Apply a human move for the active slot.
    pub fn submit_move(&mut self, index: usize) -> Result<MoveReport, MoveError> {
        let result = self.check_human_move(index);
        if let Err(ref e) = result {
            tracing::debug!(game = self.game, index, error = %e, "move rejected");
        }
        result?;
        self.apply_move(index)
    }

    fn check_human_move(&self, index: usize) -> Result<(), MoveError> {
        if !self.is_in_progress() {
            return Err(MoveError::NotInProgress);
        }
        if self.mode.controller(self.active) != ControllerKind::Human {
            return Err(MoveError::NotHumanTurn(self.active));
        }
        if index >= self.board.cells().len() {
            return Err(MoveError::OutOfRange(index));
        }
        if !self.board.is_empty(index) {
            return Err(MoveError::Occupied(index));
        }
        Ok(())
    }

    /// Let the computer slot move. The ticket must match the current game and move.
    pub fn computer_turn(&mut self, ticket: ComputerTurn) -> Result<MoveReport, MoveError> {
        if !self.is_in_progress() {
            return Err(MoveError::NotInProgress);
        }
        if ticket.game != self.game
            || ticket.move_number != self.board.move_count()
            || ticket.slot != self.active
        {
            tracing::debug!(?ticket, game = self.game, "discarding stale computer turn");
            return Err(MoveError::StaleTicket {
                game: ticket.game,
                move_number: ticket.move_number,
            });
        }
        if self.mode.controller(self.active) != ControllerKind::Computer {
            return Err(MoveError::NotComputerTurn);
        }

        let me = self.marker(self.active).clone();
        let opponent = self.marker(self.active.other()).clone();
        let index = self
            .strategy
            .choose_move(&self.board, &me, &opponent, &mut self.rng)
            .ok_or(MoveError::NoEmptyCell)?;
        tracing::debug!(game = self.game, strategy = self.strategy.name(), index, "computer chose move");
        self.apply_move(index)
    }

    /// Run the owed computer turn immediately, without a delay.
    pub fn play_computer_turn(&mut self) -> Result<MoveReport, MoveError> {
        let ticket = self.pending_computer_turn().ok_or(MoveError::NotComputerTurn)?;
        self.computer_turn(ticket)
    }

    fn apply_move(&mut self, index: usize) -> Result<MoveReport, MoveError> {
        let slot = self.active;
        let marker = self.marker(slot).clone();
        self.board.place(index, marker.clone())?;

        let outcome = evaluate(&self.board);
        match &outcome {
            GameOutcome::InProgress => {
                self.active = slot.other();
                tracing::debug!(game = self.game, %marker, index, "move applied");
            }
            GameOutcome::Win { marker: winner, line } => {
                let winner_slot = self.slot_of(winner).unwrap_or(slot);
                self.scores.record(Some(winner_slot));
                tracing::info!(game = self.game, winner = %winner, ?line, "game won");
                self.state = GameState::Terminal { outcome: outcome.clone() };
            }
            GameOutcome::Draw => {
                self.scores.record(None);
                tracing::info!(game = self.game, "game drawn");
                self.state = GameState::Terminal { outcome: outcome.clone() };
            }
        }

        Ok(MoveReport {
            game: self.game,
            index,
            slot,
            marker,
            outcome,
            pending_computer: self.pending_computer_turn(),
        })
    }

    fn slot_of(&self, marker: &Marker) -> Option<Slot> {
        [Slot::One, Slot::Two]
            .into_iter()
            .find(|&s| self.marker(s) == marker)
    }

    // ------------------------------------------------------------------ //
    //  Reconfiguration (each restarts the game)
    // ------------------------------------------------------------------ //

    pub fn set_mode(&mut self, mode: PlayMode) -> Option<ComputerTurn> {
        self.mode = mode;
        self.restart()
    }

    pub fn set_strategy(&mut self, kind: StrategyKind) -> Option<ComputerTurn> {
        self.strategy_kind = kind;
        self.strategy = build_strategy(kind, &self.minimax);
        self.restart()
    }

    pub fn set_minimax_params(&mut self, params: MinimaxParams) -> Option<ComputerTurn> {
        self.minimax = params;
        self.strategy = build_strategy(self.strategy_kind, &self.minimax);
        self.restart()
    }

    /// Replace both markers. On error nothing changes and the game continues.
    pub fn apply_markers(&mut self, p1: &str, p2: &str) -> Result<Option<ComputerTurn>, ConfigError> {
        let markers = validate_markers(p1, p2)?;
        self.markers = markers;
        Ok(self.restart())
    }

    pub fn reset_scores(&mut self) {
        self.scores.reset();
    }
}
