//! Session-level data types: player slots, play modes, scores and move reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::games::tictactoe::types::{GameOutcome, Marker};

/// One of the two fixed player positions. Slot one always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    pub fn other(self) -> Slot {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Slot::One => 0,
            Slot::Two => 1,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::One => f.write_str("player 1"),
            Slot::Two => f.write_str("player 2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    Human,
    Computer,
}

/// Who controls which slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayMode {
    #[default]
    HumanVsHuman,
    HumanVsComputer { computer: Slot },
}

impl PlayMode {
    pub fn controller(&self, slot: Slot) -> ControllerKind {
        match self {
            PlayMode::HumanVsComputer { computer } if *computer == slot => ControllerKind::Computer,
            _ => ControllerKind::Human,
        }
    }

    pub fn computer_slot(&self) -> Option<Slot> {
        match self {
            PlayMode::HumanVsHuman => None,
            PlayMode::HumanVsComputer { computer } => Some(*computer),
        }
    }
}

/// Wins per slot plus draws. Persists across games of one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTally {
    pub slot_one_wins: u32,
    pub slot_two_wins: u32,
    pub draws: u32,
}

impl ScoreTally {
    /// Count a finished game. `winner` is None for a draw.
    pub fn record(&mut self, winner: Option<Slot>) {
        match winner {
            Some(Slot::One) => self.slot_one_wins += 1,
            Some(Slot::Two) => self.slot_two_wins += 1,
            None => self.draws += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.slot_one_wins + self.slot_two_wins + self.draws
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Lifecycle of a single game inside a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameState {
    Idle,
    InProgress,
    Terminal { outcome: GameOutcome },
}

/// Identifies a pending computer move: valid only for the game and move
/// number it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputerTurn {
    pub game: u64,
    pub move_number: usize,
    pub slot: Slot,
}

/// What happened on one applied move, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub game: u64,
    pub index: usize,
    pub slot: Slot,
    pub marker: Marker,
    pub outcome: GameOutcome,
    /// Set when the next move belongs to a computer slot.
    #[serde(default)]
    pub pending_computer: Option<ComputerTurn>,
}
